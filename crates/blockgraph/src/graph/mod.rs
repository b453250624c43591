//! Renderable dependency graph and transitive blocking analysis.
//!
//! - [`build_dependency_graph`] turns an issue collection into nodes, edges and
//!   per-node aggregate counts, adding ghost nodes for dangling references
//!   when asked to.
//! - [`compute_all_blocked_counts`] and [`get_blocked_chain`] answer "how many
//!   issues does X block" and "what is the full blocking chain of X".
//!
//! Everything here is a pure function of its inputs. The graph is rebuilt from
//! scratch on every call; callers that want to skip redundant rebuilds can
//! wrap these functions with [`crate::memo`].
//!
//! # Edge Direction Reminder
//!
//! Edges point from **dependent -> dependency**: an edge's source is the
//! blocked (downstream) issue and its target is the blocker (upstream) issue,
//! matching `Dependency::issue_id` / `Dependency::depends_on_id`.

mod analysis;
mod build;

pub use analysis::{
    compute_all_blocked_counts, get_blocked_chain, get_blocked_chain_with_depth, BlockedChain,
    DEFAULT_MAX_CHAIN_DEPTH,
};
pub use build::build_dependency_graph;

use crate::domain::{DependencyType, Issue, IssueId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Prefix that namespaces issue IDs into node IDs.
pub const NODE_ID_PREFIX: &str = "node-";

/// Prefix of deterministic edge IDs.
pub const EDGE_ID_PREFIX: &str = "edge-";

/// Title prefix given to ghost nodes.
pub const GHOST_TITLE_PREFIX: &str = "Missing: ";

/// Derive the node ID for an issue.
#[must_use]
pub fn node_id_for(issue_id: &IssueId) -> String {
    format!("{NODE_ID_PREFIX}{issue_id}")
}

/// Derive the deterministic edge ID for a dependency.
///
/// The type is part of the ID: the same issue pair may carry several
/// dependencies of different types, each of which is its own edge.
///
/// Issue IDs may contain any character, so each one is prefixed with its
/// byte length (`edge-4:bd-1-3:bd2-blocks`). Two distinct dependencies never
/// share an ID.
#[must_use]
pub fn edge_id_for(issue_id: &IssueId, depends_on_id: &IssueId, dep_type: &DependencyType) -> String {
    format!(
        "{EDGE_ID_PREFIX}{}:{issue_id}-{}:{depends_on_id}-{dep_type}",
        issue_id.as_str().len(),
        depends_on_id.as_str().len(),
    )
}

/// Options controlling which dependencies end up in the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Allow-list of dependency types.
    ///
    /// `None` keeps every dependency, `Some` of an empty set keeps none, and a
    /// non-empty set keeps only the listed types.
    pub include_dependency_types: Option<BTreeSet<DependencyType>>,

    /// Issues currently blocked by open blockers, computed outside the graph
    /// (see [`crate::blockers::compute_blocked_issue_ids`]).
    pub blocked_issue_ids: Option<BTreeSet<IssueId>>,

    /// Keep dependencies whose target is not in the issue collection and
    /// create a ghost node for each missing target.
    pub include_orphan_edges: bool,
}

impl BuildOptions {
    /// Restrict the graph to the given dependency types
    #[must_use]
    pub fn with_types(mut self, types: impl IntoIterator<Item = DependencyType>) -> Self {
        self.include_dependency_types = Some(types.into_iter().collect());
        self
    }

    /// Supply the live blocked set
    #[must_use]
    pub fn with_blocked_issue_ids(mut self, ids: impl IntoIterator<Item = IssueId>) -> Self {
        self.blocked_issue_ids = Some(ids.into_iter().collect());
        self
    }

    /// Keep orphan edges and emit ghost nodes
    #[must_use]
    pub fn with_orphan_edges(mut self, include: bool) -> Self {
        self.include_orphan_edges = include;
        self
    }

    /// Whether a dependency of this type passes the type filter.
    #[must_use]
    pub fn accepts_type(&self, dep_type: &DependencyType) -> bool {
        match &self.include_dependency_types {
            None => true,
            Some(types) => types.contains(dep_type),
        }
    }
}

/// Placeholder coordinates; layout is assigned by an external collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

/// Per-node payload read by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    /// The issue this node represents (synthesized for ghost nodes)
    pub issue: Issue,
    /// Retained edges where this node is the dependent side
    pub dependency_count: usize,
    /// Retained edges where this node is the blocker side
    pub dependent_count: usize,
    /// Whether the issue can be worked on now
    pub is_ready: bool,
    /// Number of distinct nodes this node transitively blocks
    pub blocked_count: usize,
    /// Blocks at least one node and is not itself blocked
    pub is_root_blocker: bool,
    /// Whether the issue is closed
    pub is_closed: bool,
    /// Placeholder for a dependency target missing from the collection
    pub is_ghost: bool,
}

/// A node in the rendered graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Node ID (`node-<issue id>`)
    pub id: String,
    /// Placeholder position
    pub position: Position,
    /// Node payload
    pub data: NodeData,
}

impl GraphNode {
    /// The issue ID behind this node
    #[must_use]
    pub fn issue_id(&self) -> &IssueId {
        &self.data.issue.id
    }
}

/// Classification payload of an edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    /// Dependency type
    pub dep_type: DependencyType,
    /// Whether the dependency type blocks work
    pub is_blocking: bool,
    /// The dependent (blocked) issue
    pub source_issue_id: IssueId,
    /// The depended-upon (blocker) issue
    pub target_issue_id: IssueId,
}

/// An edge in the rendered graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Deterministic edge ID
    pub id: String,
    /// Node ID of the dependent issue
    pub source: String,
    /// Node ID of the blocker issue
    pub target: String,
    /// Classification payload. Edges without one never block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<EdgeData>,
}

impl GraphEdge {
    /// Whether this edge takes part in blocking analysis.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.data.as_ref().is_some_and(|data| data.is_blocking)
    }

    /// The `(blocked, blocker)` issue pair of a blocking edge.
    ///
    /// Returns `None` for non-blocking edges and edges without a payload.
    #[must_use]
    pub fn blocking_pair(&self) -> Option<(&IssueId, &IssueId)> {
        self.data
            .as_ref()
            .filter(|data| data.is_blocking)
            .map(|data| (&data.source_issue_id, &data.target_issue_id))
    }
}

/// Node dimensions handed to the external layout collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeDimensions {
    /// Node width
    pub width: f64,
    /// Node height
    pub height: f64,
}

/// The minimal input a hierarchical layout needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutInput {
    /// `(node id, dimensions)` for every node
    pub nodes: Vec<(String, NodeDimensions)>,
    /// `(source node id, target node id)` for every edge
    pub edges: Vec<(String, String)>,
}

/// Output of [`build_dependency_graph`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyGraph {
    /// One node per input issue, followed by ghost nodes
    pub nodes: Vec<GraphNode>,
    /// One edge per retained dependency
    pub edges: Vec<GraphEdge>,
    /// Issue ID to node ID, ghost nodes included
    pub node_ids: BTreeMap<IssueId, String>,
    /// Number of retained dependencies
    pub total_dependencies: usize,
    /// Number of retained dependencies whose type blocks
    pub blocking_dependencies: usize,
    /// Number of retained dependencies pointing at a missing issue
    pub orphan_edge_count: usize,
    /// Targets referenced by retained orphan edges
    pub missing_target_ids: BTreeSet<IssueId>,
}

impl DependencyGraph {
    /// Look up the node of an issue
    #[must_use]
    pub fn node(&self, issue_id: &IssueId) -> Option<&GraphNode> {
        let node_id = self.node_ids.get(issue_id)?;
        self.nodes.iter().find(|node| &node.id == node_id)
    }

    /// Nodes backed by an issue of the collection
    pub fn real_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|node| !node.data.is_ghost)
    }

    /// Placeholder nodes for missing targets
    pub fn ghost_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|node| node.data.is_ghost)
    }

    /// Real nodes that are ready to work on
    pub fn ready_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.real_nodes().filter(|node| node.data.is_ready)
    }

    /// Whether the graph holds no nodes at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes and edges in the shape the layout collaborator expects.
    #[must_use]
    pub fn layout_input(&self, dimensions: NodeDimensions) -> LayoutInput {
        LayoutInput {
            nodes: self
                .nodes
                .iter()
                .map(|node| (node.id.clone(), dimensions))
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|edge| (edge.source.clone(), edge.target.clone()))
                .collect(),
        }
    }
}
