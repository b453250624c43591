//! Readiness of an issue: whether it can be picked up right now.

use std::collections::BTreeSet;

use crate::domain::{IssueId, IssueStatus};

/// Returns whether the issue is ready to work on.
///
/// Closed and deferred issues are never ready. Otherwise the issue is ready
/// unless `blocked_issue_ids` is supplied and contains it. A missing set means
/// no live blocking information is available, so every non-terminal issue is
/// treated as ready.
#[must_use]
pub fn compute_is_ready(
    issue_id: &IssueId,
    status: Option<IssueStatus>,
    blocked_issue_ids: Option<&BTreeSet<IssueId>>,
) -> bool {
    if status.is_some_and(IssueStatus::is_terminal_or_paused) {
        return false;
    }

    !blocked_issue_ids.is_some_and(|blocked| blocked.contains(issue_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn blocked(ids: &[&str]) -> BTreeSet<IssueId> {
        ids.iter().map(|id| IssueId::new(*id)).collect()
    }

    #[rstest]
    #[case::closed(IssueStatus::Closed)]
    #[case::deferred(IssueStatus::Deferred)]
    fn test_terminal_statuses_never_ready(#[case] status: IssueStatus) {
        let id = IssueId::new("bd-1");
        assert!(!compute_is_ready(&id, Some(status), None));
        assert!(!compute_is_ready(&id, Some(status), Some(&blocked(&[]))));
        assert!(!compute_is_ready(&id, Some(status), Some(&blocked(&["bd-1"]))));
    }

    #[rstest]
    #[case::open(Some(IssueStatus::Open))]
    #[case::in_progress(Some(IssueStatus::InProgress))]
    #[case::review(Some(IssueStatus::Review))]
    #[case::blocked_status(Some(IssueStatus::Blocked))]
    #[case::undefined(None)]
    fn test_active_statuses_follow_blocked_set(#[case] status: Option<IssueStatus>) {
        let id = IssueId::new("bd-1");
        assert!(compute_is_ready(&id, status, None));
        assert!(compute_is_ready(&id, status, Some(&blocked(&["bd-2"]))));
        assert!(!compute_is_ready(&id, status, Some(&blocked(&["bd-1", "bd-2"]))));
    }
}
