//! Property tests for the graph builder and blocking analyzer.
//!
//! Random issue collections may contain cycles, self loops, parallel edges
//! and dependencies on missing issues.

use blockgraph::blockers::compute_blocked_issue_ids;
use blockgraph::domain::{DependencyType, Issue, IssueId, IssueStatus};
use blockgraph::graph::{
    build_dependency_graph, compute_all_blocked_counts, get_blocked_chain_with_depth,
    BuildOptions,
};
use proptest::prelude::*;

const MAX_ISSUES: usize = 10;

fn arb_dep_type() -> impl Strategy<Value = DependencyType> {
    prop_oneof![
        Just(DependencyType::Blocks),
        Just(DependencyType::ParentChild),
        Just(DependencyType::WaitsFor),
        Just(DependencyType::Related),
        Just(DependencyType::DiscoveredFrom),
        Just(DependencyType::from("tracks")),
    ]
}

fn arb_status() -> impl Strategy<Value = Option<IssueStatus>> {
    prop_oneof![
        Just(Some(IssueStatus::Open)),
        Just(Some(IssueStatus::InProgress)),
        Just(Some(IssueStatus::Closed)),
        Just(Some(IssueStatus::Deferred)),
        Just(None),
    ]
}

/// Issues `i0..iN` with dependencies as index pairs. Targets may point one
/// past the end, which names a missing issue.
fn arb_issues() -> impl Strategy<Value = Vec<Issue>> {
    (1..=MAX_ISSUES).prop_flat_map(|n| {
        (
            prop::collection::vec(arb_status(), n),
            prop::collection::vec((0..n, 0..=n, arb_dep_type()), 0..n * 3),
        )
            .prop_map(move |(statuses, deps)| {
                let mut issues: Vec<Issue> = statuses
                    .into_iter()
                    .enumerate()
                    .map(|(i, status)| Issue::new(format!("i{i}"), format!("Issue {i}")).with_status(status))
                    .collect();
                for (from, to, dep_type) in deps {
                    let target = if to == n { "missing".to_string() } else { format!("i{to}") };
                    let updated = issues[from].clone().depends_on(target, dep_type);
                    issues[from] = updated;
                }
                issues
            })
    })
}

fn ids_of(issues: &[Issue]) -> Vec<IssueId> {
    issues.iter().map(|issue| issue.id.clone()).collect()
}

proptest! {
    #[test]
    fn build_is_deterministic(issues in arb_issues(), orphans in any::<bool>()) {
        let options = BuildOptions::default()
            .with_orphan_edges(orphans)
            .with_blocked_issue_ids(compute_blocked_issue_ids(&issues));

        let first = build_dependency_graph(&issues, &options);
        let second = build_dependency_graph(&issues, &options);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn blocked_counts_are_bounded(issues in arb_issues()) {
        let graph = build_dependency_graph(&issues, &BuildOptions::default());
        let counts = compute_all_blocked_counts(&ids_of(&issues), &graph.edges);

        prop_assert_eq!(counts.len(), issues.len());
        for count in counts.values() {
            prop_assert!(*count < issues.len());
        }
    }

    #[test]
    fn deep_enough_chain_agrees_with_counts(issues in arb_issues()) {
        let graph = build_dependency_graph(&issues, &BuildOptions::default());
        let node_ids = ids_of(&issues);
        let counts = compute_all_blocked_counts(&node_ids, &graph.edges);

        for id in &node_ids {
            let chain = get_blocked_chain_with_depth(id, &graph.edges, issues.len());
            prop_assert!(!chain.truncated);
            prop_assert!(!chain.blockers.contains(id));
            prop_assert!(!chain.blocked_by.contains(id));
            prop_assert_eq!(chain.blocked_count, chain.blocked_by.len());
            prop_assert_eq!(chain.blocked_count, counts[id]);
        }
    }

    #[test]
    fn chains_are_mirror_images(issues in arb_issues()) {
        let graph = build_dependency_graph(&issues, &BuildOptions::default());
        let node_ids = ids_of(&issues);
        let depth = issues.len();

        for x in &node_ids {
            let chain = get_blocked_chain_with_depth(x, &graph.edges, depth);
            for y in &chain.blocked_by {
                let other = get_blocked_chain_with_depth(y, &graph.edges, depth);
                prop_assert!(other.blockers.contains(x));
            }
        }
    }

    #[test]
    fn non_blocking_edges_do_not_change_counts(issues in arb_issues()) {
        let all = build_dependency_graph(&issues, &BuildOptions::default());
        let blocking_only = build_dependency_graph(
            &issues,
            &BuildOptions::default().with_types(
                DependencyType::KNOWN.into_iter().filter(DependencyType::is_blocking),
            ),
        );

        for (left, right) in all.nodes.iter().zip(&blocking_only.nodes) {
            prop_assert_eq!(left.id.as_str(), right.id.as_str());
            prop_assert_eq!(left.data.blocked_count, right.data.blocked_count);
        }
    }

    #[test]
    fn ghosts_match_missing_targets(issues in arb_issues()) {
        let graph = build_dependency_graph(&issues, &BuildOptions::default().with_orphan_edges(true));

        prop_assert_eq!(graph.ghost_nodes().count(), graph.missing_target_ids.len());
        prop_assert_eq!(graph.real_nodes().count(), issues.len());
        for ghost in graph.ghost_nodes() {
            prop_assert_eq!(ghost.data.blocked_count, 0);
            prop_assert!(!ghost.data.is_ready);
        }
    }

    #[test]
    fn closed_issues_are_never_live_blocked(issues in arb_issues()) {
        let blocked = compute_blocked_issue_ids(&issues);
        for issue in &issues {
            if issue.is_closed() {
                prop_assert!(!blocked.contains(&issue.id));
            }
        }
    }
}
