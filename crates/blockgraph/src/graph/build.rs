//! Graph construction from an issue collection.

use super::{
    compute_all_blocked_counts, edge_id_for, node_id_for, BuildOptions, DependencyGraph, EdgeData,
    GraphEdge, GraphNode, NodeData, Position, GHOST_TITLE_PREFIX,
};
use crate::domain::{Dependency, Issue, IssueId, MAX_PRIORITY};
use crate::readiness::compute_is_ready;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// A dependency that passed the type and target filters.
struct RetainedDependency<'a> {
    dependency: &'a Dependency,
    is_orphan: bool,
}

/// Build the renderable dependency graph for `issues`.
///
/// # Algorithm
///
/// 1. Collect the IDs present in the collection
/// 2. Keep each dependency that passes the type filter and whose target is
///    present (or, with `include_orphan_edges`, is missing)
/// 3. Count outgoing/incoming dependencies and emit one edge per kept dependency
/// 4. Compute transitive blocked counts over edges between real issues only
/// 5. Emit one node per issue, then one ghost node per missing target
///
/// Never fails: dangling references, self-loops and cycles are all accepted.
#[must_use]
pub fn build_dependency_graph(issues: &[Issue], options: &BuildOptions) -> DependencyGraph {
    let present: HashSet<&IssueId> = issues.iter().map(|issue| &issue.id).collect();

    // First pass: decide which dependencies survive the filters
    let retained: Vec<RetainedDependency<'_>> = issues
        .iter()
        .flat_map(|issue| issue.dependencies.iter())
        .filter(|dep| options.accepts_type(&dep.dep_type))
        .filter_map(|dep| {
            let is_orphan = !present.contains(&dep.depends_on_id);
            if is_orphan && !options.include_orphan_edges {
                return None;
            }
            Some(RetainedDependency {
                dependency: dep,
                is_orphan,
            })
        })
        .collect();

    // Second pass: degrees, edges and missing targets
    let mut dependency_counts: HashMap<&IssueId, usize> = HashMap::new();
    let mut dependent_counts: HashMap<&IssueId, usize> = HashMap::new();
    let mut missing_targets: Vec<&IssueId> = Vec::new();
    let mut missing_seen: HashSet<&IssueId> = HashSet::new();
    let mut edges = Vec::with_capacity(retained.len());
    let mut blocking_dependencies = 0;
    let mut orphan_edge_count = 0;

    for RetainedDependency {
        dependency,
        is_orphan,
    } in &retained
    {
        *dependency_counts.entry(&dependency.issue_id).or_default() += 1;
        *dependent_counts.entry(&dependency.depends_on_id).or_default() += 1;

        let is_blocking = dependency.dep_type.is_blocking();
        if is_blocking {
            blocking_dependencies += 1;
        }
        if *is_orphan {
            orphan_edge_count += 1;
            if missing_seen.insert(&dependency.depends_on_id) {
                missing_targets.push(&dependency.depends_on_id);
            }
        }

        edges.push(GraphEdge {
            id: edge_id_for(
                &dependency.issue_id,
                &dependency.depends_on_id,
                &dependency.dep_type,
            ),
            source: node_id_for(&dependency.issue_id),
            target: node_id_for(&dependency.depends_on_id),
            data: Some(EdgeData {
                dep_type: dependency.dep_type.clone(),
                is_blocking,
                source_issue_id: dependency.issue_id.clone(),
                target_issue_id: dependency.depends_on_id.clone(),
            }),
        });
    }

    // Ghost nodes stand for unknown state: keep them out of the analysis
    let real_ids: Vec<IssueId> = issues.iter().map(|issue| issue.id.clone()).collect();
    let real_edges: Vec<GraphEdge> = retained
        .iter()
        .zip(&edges)
        .filter(|(retained, _)| !retained.is_orphan)
        .map(|(_, edge)| edge.clone())
        .collect();
    let blocked_counts = compute_all_blocked_counts(&real_ids, &real_edges);

    let blocked_issue_ids = options.blocked_issue_ids.as_ref();
    let mut nodes = Vec::with_capacity(issues.len() + missing_targets.len());
    let mut node_ids = BTreeMap::new();

    for issue in issues {
        let node_id = node_id_for(&issue.id);
        let blocked_count = blocked_counts.get(&issue.id).copied().unwrap_or(0);
        let is_externally_blocked = blocked_issue_ids.is_some_and(|ids| ids.contains(&issue.id));

        node_ids.insert(issue.id.clone(), node_id.clone());
        nodes.push(GraphNode {
            id: node_id,
            position: Position::default(),
            data: NodeData {
                issue: issue.clone(),
                dependency_count: dependency_counts.get(&issue.id).copied().unwrap_or(0),
                dependent_count: dependent_counts.get(&issue.id).copied().unwrap_or(0),
                is_ready: compute_is_ready(&issue.id, issue.status, blocked_issue_ids),
                blocked_count,
                is_root_blocker: blocked_count > 0 && !is_externally_blocked,
                is_closed: issue.is_closed(),
                is_ghost: false,
            },
        });
    }

    for missing in &missing_targets {
        let node_id = node_id_for(missing);
        node_ids.insert((*missing).clone(), node_id.clone());
        nodes.push(GraphNode {
            id: node_id,
            position: Position::default(),
            data: NodeData {
                issue: ghost_issue(missing),
                dependency_count: 0,
                dependent_count: dependent_counts.get(missing).copied().unwrap_or(0),
                is_ready: false,
                blocked_count: 0,
                is_root_blocker: false,
                is_closed: false,
                is_ghost: true,
            },
        });
    }

    tracing::debug!(
        issues = issues.len(),
        edges = edges.len(),
        blocking = blocking_dependencies,
        orphans = orphan_edge_count,
        ghosts = missing_targets.len(),
        "Built dependency graph"
    );

    DependencyGraph {
        nodes,
        edges,
        node_ids,
        total_dependencies: retained.len(),
        blocking_dependencies,
        orphan_edge_count,
        missing_target_ids: missing_targets.into_iter().cloned().collect::<BTreeSet<_>>(),
    }
}

/// Placeholder issue for a dependency target missing from the collection.
fn ghost_issue(id: &IssueId) -> Issue {
    Issue {
        id: id.clone(),
        title: format!("{GHOST_TITLE_PREFIX}{id}"),
        priority: MAX_PRIORITY,
        status: None,
        dependencies: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyType, IssueStatus};

    fn node<'a>(graph: &'a DependencyGraph, id: &str) -> &'a GraphNode {
        graph
            .node(&IssueId::new(id))
            .unwrap_or_else(|| panic!("missing node {id}"))
    }

    #[test]
    fn test_empty_collection() {
        let graph = build_dependency_graph(&[], &BuildOptions::default());
        assert!(graph.is_empty());
        assert!(graph.edges.is_empty());
        assert!(graph.node_ids.is_empty());
        assert_eq!(graph.total_dependencies, 0);
        assert_eq!(graph.blocking_dependencies, 0);
        assert_eq!(graph.orphan_edge_count, 0);
        assert!(graph.missing_target_ids.is_empty());
    }

    #[test]
    fn test_counts_degrees_and_edge_ids() {
        let issues = vec![
            Issue::new("a", "A"),
            Issue::new("b", "B").depends_on("a", DependencyType::Blocks),
            Issue::new("c", "C")
                .depends_on("a", DependencyType::Blocks)
                .depends_on("b", DependencyType::Related),
        ];
        let graph = build_dependency_graph(&issues, &BuildOptions::default());

        assert_eq!(graph.edges.len(), 3);
        assert_eq!(graph.total_dependencies, 3);
        assert_eq!(graph.blocking_dependencies, 2);

        let a = node(&graph, "a");
        assert_eq!(a.id, "node-a");
        assert_eq!(a.data.dependent_count, 2);
        assert_eq!(a.data.dependency_count, 0);
        assert_eq!(a.data.blocked_count, 2);
        assert!(a.data.is_root_blocker);

        let c = node(&graph, "c");
        assert_eq!(c.data.dependency_count, 2);
        assert_eq!(c.data.blocked_count, 0);

        let ids: Vec<&str> = graph.edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["edge-1:b-1:a-blocks", "edge-1:c-1:a-blocks", "edge-1:c-1:b-related"]
        );
    }

    #[test]
    fn test_same_pair_different_types_are_separate_edges() {
        let issues = vec![
            Issue::new("a", "A"),
            Issue::new("b", "B")
                .depends_on("a", DependencyType::Blocks)
                .depends_on("a", DependencyType::Related),
        ];
        let graph = build_dependency_graph(&issues, &BuildOptions::default());

        assert_eq!(graph.edges.len(), 2);
        assert_eq!(node(&graph, "a").data.dependent_count, 2);
        assert_eq!(node(&graph, "a").data.blocked_count, 1);
    }

    #[test]
    fn test_self_loop_is_kept() {
        let issues = vec![Issue::new("a", "A").depends_on("a", DependencyType::Blocks)];
        let graph = build_dependency_graph(&issues, &BuildOptions::default());

        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].source, graph.edges[0].target);
        let a = node(&graph, "a");
        assert_eq!(a.data.dependency_count, 1);
        assert_eq!(a.data.dependent_count, 1);
        assert_eq!(a.data.blocked_count, 0);
    }

    #[test]
    fn test_orphans_dropped_by_default() {
        let issues = vec![Issue::new("a", "A").depends_on("x", DependencyType::Blocks)];
        let graph = build_dependency_graph(&issues, &BuildOptions::default());

        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
        assert_eq!(graph.orphan_edge_count, 0);
        assert!(graph.missing_target_ids.is_empty());
    }

    #[test]
    fn test_orphans_become_ghost_nodes() {
        let issues = vec![
            Issue::new("a", "A").depends_on("x", DependencyType::Blocks),
            Issue::new("b", "B")
                .depends_on("x", DependencyType::Related)
                .depends_on("a", DependencyType::Blocks),
        ];
        let options = BuildOptions::default().with_orphan_edges(true);
        let graph = build_dependency_graph(&issues, &options);

        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.orphan_edge_count, 2);
        assert_eq!(
            graph.missing_target_ids,
            BTreeSet::from([IssueId::new("x")])
        );

        let ghost = node(&graph, "x");
        assert_eq!(ghost.id, "node-x");
        assert!(ghost.data.is_ghost);
        assert_eq!(ghost.data.issue.title, "Missing: x");
        assert_eq!(ghost.data.issue.priority, MAX_PRIORITY);
        assert_eq!(ghost.data.dependent_count, 2);
        assert_eq!(ghost.data.dependency_count, 0);
        assert_eq!(ghost.data.blocked_count, 0);
        assert!(!ghost.data.is_ready);
        assert!(!ghost.data.is_root_blocker);

        // The ghost blocks "a" structurally, but never counts as a blocker
        assert_eq!(node(&graph, "a").data.blocked_count, 1);
        assert_eq!(graph.ghost_nodes().count(), 1);
        assert_eq!(graph.real_nodes().count(), 2);
    }

    #[test]
    fn test_readiness_closed_and_root_blocker_flags() {
        let issues = vec![
            Issue::new("a", "A").with_status(IssueStatus::Closed),
            Issue::new("b", "B").depends_on("a", DependencyType::Blocks),
            Issue::new("c", "C").depends_on("b", DependencyType::Blocks),
            Issue::new("d", "D").with_status(IssueStatus::Deferred),
        ];
        let options = BuildOptions::default().with_blocked_issue_ids([IssueId::new("c")]);
        let graph = build_dependency_graph(&issues, &options);

        let a = node(&graph, "a");
        assert!(a.data.is_closed);
        assert!(!a.data.is_ready);
        assert!(a.data.is_root_blocker);

        let b = node(&graph, "b");
        assert!(b.data.is_ready);
        assert!(b.data.is_root_blocker);

        let c = node(&graph, "c");
        assert!(!c.data.is_ready);
        assert!(!c.data.is_root_blocker);

        assert!(!node(&graph, "d").data.is_ready);
        assert_eq!(graph.ready_nodes().count(), 1);
    }

    #[test]
    fn test_externally_blocked_node_is_not_root_blocker() {
        let issues = vec![
            Issue::new("a", "A"),
            Issue::new("b", "B").depends_on("a", DependencyType::Blocks),
        ];
        let options = BuildOptions::default().with_blocked_issue_ids([IssueId::new("a")]);
        let graph = build_dependency_graph(&issues, &options);

        let a = node(&graph, "a");
        assert_eq!(a.data.blocked_count, 1);
        assert!(!a.data.is_root_blocker);
    }

    #[test]
    fn test_nodes_start_at_placeholder_position() {
        let issues = vec![Issue::new("a", "A")];
        let graph = build_dependency_graph(&issues, &BuildOptions::default());
        assert_eq!(graph.nodes[0].position, Position::default());
    }
}
