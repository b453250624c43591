//! Transitive blocking analysis using petgraph.
//!
//! This module answers two questions over a list of graph edges:
//! - How many distinct issues does each issue transitively block?
//! - What is the full upstream/downstream blocking chain of one issue?
//!
//! Only blocking edges take part; see [`GraphEdge::blocking_pair`]. Both
//! questions are answered by a breadth-first walk over an explicit queue with
//! a visited set that is checked before a node is enqueued, so cycles of any
//! length terminate.

use super::GraphEdge;
use crate::domain::{DependencyType, IssueId};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Default maximum depth for blocking chain traversal.
///
/// Chains longer than this are cut off and reported through
/// [`BlockedChain::truncated`].
pub const DEFAULT_MAX_CHAIN_DEPTH: usize = 20;

/// Full blocking chain of one issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedChain {
    /// Issues that directly or indirectly block this issue (upstream)
    pub blockers: BTreeSet<IssueId>,
    /// Issues this issue directly or indirectly blocks (downstream)
    pub blocked_by: BTreeSet<IssueId>,
    /// Size of `blocked_by`
    pub blocked_count: usize,
    /// Set when the depth limit stopped a walk that still had unvisited issues
    pub truncated: bool,
}

/// Blocking edges indexed for traversal.
///
/// Edge direction matches the rendered graph: blocked issue -> blocker.
struct BlockingIndex {
    graph: DiGraph<IssueId, DependencyType>,
    node_map: HashMap<IssueId, NodeIndex>,
}

impl BlockingIndex {
    fn from_edges(edges: &[GraphEdge]) -> Self {
        let mut index = Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        };

        for edge in edges {
            let Some(data) = edge.data.as_ref().filter(|data| data.is_blocking) else {
                continue;
            };
            let blocked = index.node(&data.source_issue_id);
            let blocker = index.node(&data.target_issue_id);
            index.graph.add_edge(blocked, blocker, data.dep_type.clone());
        }

        index
    }

    fn node(&mut self, id: &IssueId) -> NodeIndex {
        if let Some(&node) = self.node_map.get(id) {
            return node;
        }
        let node = self.graph.add_node(id.clone());
        self.node_map.insert(id.clone(), node);
        node
    }

    /// Breadth-first walk from `start` in `direction`.
    ///
    /// `Direction::Incoming` walks downstream (blocker -> blocked),
    /// `Direction::Outgoing` walks upstream (blocked -> blocker).
    /// Nodes further than `max_depth` hops away are not reached.
    fn walk(&self, start: &IssueId, direction: Direction, max_depth: Option<usize>) -> Walk {
        let mut walk = Walk::default();
        let Some(&start_node) = self.node_map.get(start) else {
            return walk;
        };

        let mut visited = HashSet::from([start_node]);
        let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::from([(start_node, 0)]);

        while let Some((node, depth)) = queue.pop_front() {
            if max_depth.is_some_and(|max| depth >= max) {
                if self
                    .neighbors(node, direction)
                    .any(|next| !visited.contains(&next))
                {
                    walk.truncated = true;
                }
                continue;
            }

            for next in self.neighbors(node, direction) {
                if visited.insert(next) {
                    walk.reached.insert(self.graph[next].clone());
                    queue.push_back((next, depth + 1));
                }
            }
        }

        walk
    }

    fn neighbors(&self, node: NodeIndex, direction: Direction) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph
            .edges_directed(node, direction)
            .map(move |edge| match direction {
                Direction::Outgoing => edge.target(),
                Direction::Incoming => edge.source(),
            })
    }
}

#[derive(Debug, Default)]
struct Walk {
    reached: BTreeSet<IssueId>,
    truncated: bool,
}

/// Count, for every ID in `node_ids`, how many distinct other issues it
/// transitively blocks.
///
/// IDs that do not appear on any blocking edge map to 0. The walk is bounded
/// only by the visited set, so the count is exact for chains of any length.
#[must_use]
pub fn compute_all_blocked_counts(node_ids: &[IssueId], edges: &[GraphEdge]) -> HashMap<IssueId, usize> {
    let index = BlockingIndex::from_edges(edges);

    let counts: HashMap<IssueId, usize> = node_ids
        .iter()
        .map(|id| {
            let count = index.walk(id, Direction::Incoming, None).reached.len();
            (id.clone(), count)
        })
        .collect();

    tracing::trace!(
        nodes = node_ids.len(),
        blocking_edges = index.graph.edge_count(),
        "Computed transitive blocked counts"
    );

    counts
}

/// Compute the blocking chain of `issue_id` with the default depth limit.
///
/// See [`get_blocked_chain_with_depth`].
#[must_use]
pub fn get_blocked_chain(issue_id: &IssueId, edges: &[GraphEdge]) -> BlockedChain {
    get_blocked_chain_with_depth(issue_id, edges, DEFAULT_MAX_CHAIN_DEPTH)
}

/// Compute the upstream blockers and downstream blocked issues of `issue_id`.
///
/// The two walks run in opposite directions with independent visited sets,
/// each seeded with `issue_id`, so the issue itself never appears in either
/// set even when it sits on a cycle. Walks stop extending a branch after
/// `max_depth` hops; [`BlockedChain::truncated`] records whether that cut
/// anything off.
#[must_use]
pub fn get_blocked_chain_with_depth(
    issue_id: &IssueId,
    edges: &[GraphEdge],
    max_depth: usize,
) -> BlockedChain {
    let index = BlockingIndex::from_edges(edges);

    let upstream = index.walk(issue_id, Direction::Outgoing, Some(max_depth));
    let downstream = index.walk(issue_id, Direction::Incoming, Some(max_depth));

    if upstream.truncated || downstream.truncated {
        tracing::debug!(
            issue = %issue_id,
            max_depth,
            "Blocking chain truncated at depth limit"
        );
    }

    BlockedChain {
        blocked_count: downstream.reached.len(),
        blockers: upstream.reached,
        blocked_by: downstream.reached,
        truncated: upstream.truncated || downstream.truncated,
    }
}
