//! Issue sources feeding the graph builder.
//!
//! An [`IssueSource`] supplies the issue collection. The JSONL source reads
//! one JSON issue per line and keeps going past bad lines, reporting them as
//! [`LoadWarning`]s instead of failing the whole load.
//!
//! # Example
//!
//! ```no_run
//! use blockgraph::source::{IssueSource, JsonlIssueSource};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let source = JsonlIssueSource::new("issues.jsonl");
//!     let loaded = source.load().await?;
//!     for warning in &loaded.warnings {
//!         eprintln!("warning: {warning}");
//!     }
//!     println!("{} issues", loaded.issues.len());
//!     Ok(())
//! }
//! ```

use crate::domain::{Issue, IssueId, MAX_PRIORITY, MIN_PRIORITY};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// A non-fatal problem found while loading issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// A line contained JSON that could not be parsed as an issue.
    ///
    /// **Effect**: The line is skipped; no issue is created from it.
    MalformedJson {
        /// The 1-based line number
        line_number: usize,
        /// The parse error
        error: String,
    },

    /// An issue ID appeared more than once.
    ///
    /// **Effect**: The first record wins; later records are skipped.
    DuplicateId {
        /// The 1-based line number of the skipped record
        line_number: usize,
        /// The repeated ID
        issue_id: IssueId,
    },

    /// An issue carried a priority outside `MIN_PRIORITY..=MAX_PRIORITY`.
    ///
    /// **Effect**: The issue is kept with its priority lowered to `MAX_PRIORITY`.
    PriorityOutOfRange {
        /// The 1-based line number
        line_number: usize,
        /// The issue carrying the priority
        issue_id: IssueId,
        /// The priority as written
        priority: u8,
    },
}

impl LoadWarning {
    /// Returns the line number associated with this warning.
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::MalformedJson { line_number, .. }
            | Self::DuplicateId { line_number, .. }
            | Self::PriorityOutOfRange { line_number, .. } => *line_number,
        }
    }

    /// Returns a static string identifying the warning kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedJson { .. } => "malformed_json",
            Self::DuplicateId { .. } => "duplicate_id",
            Self::PriorityOutOfRange { .. } => "priority_out_of_range",
        }
    }
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedJson { line_number, error } => {
                write!(f, "line {line_number}: malformed JSON: {error}")
            }
            Self::DuplicateId {
                line_number,
                issue_id,
            } => write!(f, "line {line_number}: duplicate issue ID {issue_id}, skipped"),
            Self::PriorityOutOfRange {
                line_number,
                issue_id,
                priority,
            } => write!(
                f,
                "line {line_number}: issue {issue_id} has priority {priority} outside \
                 {MIN_PRIORITY}-{MAX_PRIORITY}, using {MAX_PRIORITY}"
            ),
        }
    }
}

/// Issues loaded from a source, with any warnings raised on the way.
#[derive(Debug, Clone, Default)]
pub struct LoadedIssues {
    /// Issues in source order
    pub issues: Vec<Issue>,
    /// Non-fatal problems, in source order
    pub warnings: Vec<LoadWarning>,
}

/// A supplier of the issue collection.
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Load the full issue collection.
    ///
    /// # Errors
    ///
    /// Returns an error only when the source as a whole is unreadable;
    /// problems with individual records are reported as warnings.
    async fn load(&self) -> Result<LoadedIssues>;
}

/// Issues stored in a JSON Lines file.
#[derive(Debug, Clone)]
pub struct JsonlIssueSource {
    path: PathBuf,
}

impl JsonlIssueSource {
    /// Create a source reading from `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this source reads from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl IssueSource for JsonlIssueSource {
    async fn load(&self) -> Result<LoadedIssues> {
        let file = File::open(&self.path).await?;
        let loaded = read_issues(file).await?;

        tracing::debug!(
            path = %self.path.display(),
            issues = loaded.issues.len(),
            warnings = loaded.warnings.len(),
            "Loaded issues"
        );

        Ok(loaded)
    }
}

/// Read issues from any async reader holding JSON Lines.
///
/// Blank lines are skipped silently. An out-of-range priority is lowered to
/// `MAX_PRIORITY` and reported.
///
/// # Errors
///
/// Returns `Error::Io` if reading fails.
pub async fn read_issues<R: AsyncRead + Unpin>(reader: R) -> Result<LoadedIssues> {
    let mut lines = BufReader::new(reader).lines();
    let mut loaded = LoadedIssues::default();
    let mut seen: HashSet<IssueId> = HashSet::new();
    let mut line_number = 0;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let warning = match serde_json::from_str::<Issue>(trimmed) {
            Ok(issue) if seen.contains(&issue.id) => LoadWarning::DuplicateId {
                line_number,
                issue_id: issue.id,
            },
            Ok(mut issue) => {
                if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&issue.priority) {
                    record(
                        &mut loaded,
                        LoadWarning::PriorityOutOfRange {
                            line_number,
                            issue_id: issue.id.clone(),
                            priority: issue.priority,
                        },
                    );
                    issue.priority = MAX_PRIORITY;
                }
                seen.insert(issue.id.clone());
                loaded.issues.push(issue);
                continue;
            }
            Err(e) => LoadWarning::MalformedJson {
                line_number,
                error: e.to_string(),
            },
        };

        record(&mut loaded, warning);
    }

    Ok(loaded)
}

fn record(loaded: &mut LoadedIssues, warning: LoadWarning) {
    tracing::warn!(line = warning.line_number(), kind = warning.kind(), "{warning}");
    loaded.warnings.push(warning);
}

/// Issues held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryIssueSource {
    issues: Vec<Issue>,
}

impl MemoryIssueSource {
    /// Create a source over the given issues
    #[must_use]
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }
}

#[async_trait]
impl IssueSource for MemoryIssueSource {
    async fn load(&self) -> Result<LoadedIssues> {
        Ok(LoadedIssues {
            issues: self.issues.clone(),
            warnings: Vec::new(),
        })
    }
}
