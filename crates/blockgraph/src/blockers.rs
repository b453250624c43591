//! Live blocked-issue detection from current issue statuses.
//!
//! The graph builder takes the set of issues currently blocked by *open*
//! blockers as an input. This module computes that set from an issue
//! collection:
//!
//! 1. Directly: an unclosed issue with a `blocks`, `conditional-blocks` or
//!    `waits-for` dependency on a present, unclosed issue
//! 2. Transitively: if a parent is blocked, its `parent-child` children are too
//!
//! # Edge Direction Reminder
//!
//! - Edges point from **dependent -> dependency** (source depends on target)
//! - For `Blocks`: blocked_issue -> blocker, so `edge.target()` is the blocker
//! - For `ParentChild`: child -> parent, so `Direction::Incoming` finds children

use crate::domain::{DependencyType, Issue, IssueId};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap, VecDeque};

/// Maximum depth for parent-child propagation.
///
/// This limit keeps malformed, extremely deep hierarchies from running away.
const MAX_PROPAGATION_DEPTH: usize = 50;

/// Whether a dependency type blocks its dependent while the target is open.
///
/// `parent-child` is absent on purpose: an open parent does not block its
/// children, it only passes its own blocked state down.
fn blocks_directly(dep_type: &DependencyType) -> bool {
    matches!(
        dep_type,
        DependencyType::Blocks | DependencyType::ConditionalBlocks | DependencyType::WaitsFor
    )
}

/// Compute the set of issues currently blocked by open blockers.
///
/// Dependencies on issues missing from the collection are ignored, and closed
/// issues never appear in the result.
#[must_use]
pub fn compute_blocked_issue_ids(issues: &[Issue]) -> BTreeSet<IssueId> {
    let mut graph: DiGraph<&IssueId, &DependencyType> = DiGraph::new();
    let mut node_map: HashMap<&IssueId, NodeIndex> = HashMap::new();
    let by_id: HashMap<&IssueId, &Issue> = issues.iter().map(|issue| (&issue.id, issue)).collect();

    for issue in issues {
        node_map
            .entry(&issue.id)
            .or_insert_with(|| graph.add_node(&issue.id));
    }

    for issue in issues {
        for dep in &issue.dependencies {
            let (Some(&from), Some(&to)) = (
                node_map.get(&dep.issue_id),
                node_map.get(&dep.depends_on_id),
            ) else {
                continue;
            };
            graph.add_edge(from, to, &dep.dep_type);
        }
    }

    let is_open = |id: &IssueId| by_id.get(id).is_some_and(|issue| !issue.is_closed());
    let mut blocked: BTreeSet<IssueId> = BTreeSet::new();

    // Phase 1: directly blocked issues
    for (id, &node) in &node_map {
        if !is_open(*id) {
            continue;
        }
        let has_open_blocker = graph.edges(node).any(|edge| {
            blocks_directly(edge.weight()) && is_open(graph[edge.target()])
        });
        if has_open_blocker {
            blocked.insert((*id).clone());
        }
    }

    // Phase 2: propagate through parent-child relationships
    let mut to_process: VecDeque<(NodeIndex, usize)> = blocked
        .iter()
        .filter_map(|id| node_map.get(id).map(|&node| (node, 0)))
        .collect();

    while let Some((node, depth)) = to_process.pop_front() {
        if depth >= MAX_PROPAGATION_DEPTH {
            continue;
        }

        for edge in graph.edges_directed(node, Direction::Incoming) {
            if *edge.weight() != &DependencyType::ParentChild {
                continue;
            }
            let child_id = graph[edge.source()];
            if is_open(child_id) && blocked.insert(child_id.clone()) {
                to_process.push_back((edge.source(), depth + 1));
            }
        }
    }

    tracing::debug!(
        issues = issues.len(),
        blocked = blocked.len(),
        "Computed live blocked issues"
    );

    blocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IssueStatus;

    fn ids(values: &[&str]) -> BTreeSet<IssueId> {
        values.iter().map(|v| IssueId::new(*v)).collect()
    }

    #[test]
    fn test_open_blocker_blocks_dependent() {
        let issues = vec![
            Issue::new("a", "A"),
            Issue::new("b", "B").depends_on("a", DependencyType::Blocks),
        ];
        assert_eq!(compute_blocked_issue_ids(&issues), ids(&["b"]));
    }

    #[test]
    fn test_closed_blocker_does_not_block() {
        let issues = vec![
            Issue::new("a", "A").with_status(IssueStatus::Closed),
            Issue::new("b", "B").depends_on("a", DependencyType::Blocks),
        ];
        assert!(compute_blocked_issue_ids(&issues).is_empty());
    }

    #[test]
    fn test_closed_dependent_is_never_blocked() {
        let issues = vec![
            Issue::new("a", "A"),
            Issue::new("b", "B")
                .with_status(IssueStatus::Closed)
                .depends_on("a", DependencyType::WaitsFor),
        ];
        assert!(compute_blocked_issue_ids(&issues).is_empty());
    }

    #[test]
    fn test_informational_and_missing_dependencies_are_ignored() {
        let issues = vec![
            Issue::new("a", "A"),
            Issue::new("b", "B")
                .depends_on("a", DependencyType::Related)
                .depends_on("gone", DependencyType::Blocks),
        ];
        assert!(compute_blocked_issue_ids(&issues).is_empty());
    }

    #[test]
    fn test_open_parent_alone_does_not_block_child() {
        let issues = vec![
            Issue::new("epic", "Epic"),
            Issue::new("task", "Task").depends_on("epic", DependencyType::ParentChild),
        ];
        assert!(compute_blocked_issue_ids(&issues).is_empty());
    }

    #[test]
    fn test_blocked_parent_propagates_to_descendants() {
        let issues = vec![
            Issue::new("blocker", "Blocker"),
            Issue::new("epic", "Epic").depends_on("blocker", DependencyType::ConditionalBlocks),
            Issue::new("task", "Task").depends_on("epic", DependencyType::ParentChild),
            Issue::new("subtask", "Subtask").depends_on("task", DependencyType::ParentChild),
            Issue::new("done", "Done")
                .with_status(IssueStatus::Closed)
                .depends_on("epic", DependencyType::ParentChild),
        ];
        assert_eq!(
            compute_blocked_issue_ids(&issues),
            ids(&["epic", "subtask", "task"])
        );
    }

    #[test]
    fn test_blocking_cycle_terminates() {
        let issues = vec![
            Issue::new("a", "A").depends_on("b", DependencyType::Blocks),
            Issue::new("b", "B").depends_on("a", DependencyType::Blocks),
        ];
        assert_eq!(compute_blocked_issue_ids(&issues), ids(&["a", "b"]));
    }
}
