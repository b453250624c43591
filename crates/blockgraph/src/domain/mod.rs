//! Domain types for dependency graphs.
//!
//! This module contains the issue and dependency records the graph builder
//! consumes. They mirror the JSONL records written by the issue board, so
//! unknown fields in the source data are ignored on deserialization.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum priority value (highest priority)
pub const MIN_PRIORITY: u8 = 0;

/// Maximum priority value (lowest priority, "backlog")
pub const MAX_PRIORITY: u8 = 4;

/// Priority assigned to issues that do not carry one
pub const DEFAULT_PRIORITY: u8 = 2;

/// Unique identifier for an issue
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IssueId(pub String);

impl IssueId {
    /// Create a new issue ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the ID as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for IssueId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for IssueId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Represents an issue on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Unique identifier for the issue
    pub id: IssueId,

    /// Issue title
    #[serde(default)]
    pub title: String,

    /// Priority level (0 = highest, 4 = lowest)
    #[serde(default = "default_priority")]
    pub priority: u8,

    /// Current status; `None` when the source record carries no status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<IssueStatus>,

    /// Dependencies this issue has on other issues
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,
}

fn default_priority() -> u8 {
    DEFAULT_PRIORITY
}

impl Issue {
    /// Create an open issue with default priority and no dependencies
    pub fn new(id: impl Into<IssueId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            priority: DEFAULT_PRIORITY,
            status: Some(IssueStatus::Open),
            dependencies: Vec::new(),
        }
    }

    /// Set the status
    #[must_use]
    pub fn with_status(mut self, status: impl Into<Option<IssueStatus>>) -> Self {
        self.status = status.into();
        self
    }

    /// Set the priority
    #[must_use]
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Add a dependency on `depends_on_id` of the given type
    #[must_use]
    pub fn depends_on(mut self, depends_on_id: impl Into<IssueId>, dep_type: DependencyType) -> Self {
        self.dependencies.push(Dependency {
            issue_id: self.id.clone(),
            depends_on_id: depends_on_id.into(),
            dep_type,
        });
        self
    }

    /// Whether the issue is closed
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status == Some(IssueStatus::Closed)
    }
}

/// Status of an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// Issue is open
    Open,

    /// Issue is currently being worked on
    InProgress,

    /// Issue is waiting for review
    Review,

    /// Issue is marked as blocked
    Blocked,

    /// Issue has been completed
    Closed,

    /// Issue has been postponed
    Deferred,
}

impl IssueStatus {
    /// The wire name of the status
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Review => "review",
            Self::Blocked => "blocked",
            Self::Closed => "closed",
            Self::Deferred => "deferred",
        }
    }

    /// Closed and deferred issues are never ready, whatever blocks them
    #[must_use]
    pub fn is_terminal_or_paused(self) -> bool {
        matches!(self, Self::Closed | Self::Deferred)
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dependency between issues.
///
/// The direction is always "`issue_id` depends on `depends_on_id`":
/// `depends_on_id` is upstream (the blocker), `issue_id` is downstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    /// ID of the issue that has the dependency
    pub issue_id: IssueId,

    /// ID of the issue being depended upon
    pub depends_on_id: IssueId,

    /// Type of dependency
    #[serde(rename = "type")]
    pub dep_type: DependencyType,
}

/// Type of dependency relationship.
///
/// Tags outside the known set are preserved verbatim in [`DependencyType::Custom`]
/// so they survive a round trip and still show up in the rendered graph.
/// A [`CustomTag`] can only be obtained through `DependencyType::from`, so a
/// known tag always maps to its own variant and never to `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DependencyType {
    /// Hard blocker - prevents work
    Blocks,

    /// Hierarchical - epic to task
    ParentChild,

    /// Blocks unless the blocker fails
    ConditionalBlocks,

    /// Gate on spawned work
    WaitsFor,

    /// Soft link - informational
    Related,

    /// Found during work
    DiscoveredFrom,

    /// Conversation thread link
    RepliesTo,

    /// Loose reference
    RelatesTo,

    /// Marks a duplicate
    Duplicates,

    /// Replaces an older issue
    Supersedes,

    /// Any tag not in the known set
    Custom(CustomTag),
}

/// A dependency tag outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CustomTag(String);

impl CustomTag {
    /// The tag as written in the source data
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl DependencyType {
    /// Every known (non-custom) dependency type, blocking types first
    pub const KNOWN: [DependencyType; 10] = [
        DependencyType::Blocks,
        DependencyType::ParentChild,
        DependencyType::ConditionalBlocks,
        DependencyType::WaitsFor,
        DependencyType::Related,
        DependencyType::DiscoveredFrom,
        DependencyType::RepliesTo,
        DependencyType::RelatesTo,
        DependencyType::Duplicates,
        DependencyType::Supersedes,
    ];

    /// The wire tag of the dependency type
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Blocks => "blocks",
            Self::ParentChild => "parent-child",
            Self::ConditionalBlocks => "conditional-blocks",
            Self::WaitsFor => "waits-for",
            Self::Related => "related",
            Self::DiscoveredFrom => "discovered-from",
            Self::RepliesTo => "replies-to",
            Self::RelatesTo => "relates-to",
            Self::Duplicates => "duplicates",
            Self::Supersedes => "supersedes",
            Self::Custom(tag) => tag.as_str(),
        }
    }

    /// Whether this dependency type blocks work. See [`crate::classify::is_blocking`].
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        crate::classify::is_blocking(self)
    }
}

impl From<&str> for DependencyType {
    fn from(tag: &str) -> Self {
        match tag {
            "blocks" => Self::Blocks,
            "parent-child" => Self::ParentChild,
            "conditional-blocks" => Self::ConditionalBlocks,
            "waits-for" => Self::WaitsFor,
            "related" => Self::Related,
            "discovered-from" => Self::DiscoveredFrom,
            "replies-to" => Self::RepliesTo,
            "relates-to" => Self::RelatesTo,
            "duplicates" => Self::Duplicates,
            "supersedes" => Self::Supersedes,
            other => Self::Custom(CustomTag(other.to_string())),
        }
    }
}

impl From<String> for DependencyType {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<DependencyType> for String {
    fn from(dep_type: DependencyType) -> Self {
        match dep_type {
            DependencyType::Custom(tag) => tag.0,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
