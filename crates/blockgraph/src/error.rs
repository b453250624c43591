//! Error types for blockgraph.
//!
//! The graph builder and analyzer never fail; these errors come from the
//! layers around them (loading issues, reading configuration).

use crate::domain::IssueId;
use std::io;
use thiserror::Error;

/// The error type for blockgraph operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Issue not found in the loaded collection.
    #[error("Issue not found: {0}")]
    IssueNotFound(IssueId),
}

/// A specialized Result type for blockgraph operations.
pub type Result<T> = std::result::Result<T, Error>;
