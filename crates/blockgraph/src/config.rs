//! Configuration management for blockgraph.
//!
//! Configuration lives in a YAML file. Every key is optional; missing keys
//! take the defaults below.
//!
//! ```yaml
//! max-chain-depth: 20
//! include-orphan-edges: false
//! node-width: 260
//! node-height: 90
//! memo-capacity: 16
//! ```

use crate::error::{Error, Result};
use crate::graph::{NodeDimensions, DEFAULT_MAX_CHAIN_DEPTH};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Default node width handed to the layout collaborator
pub const DEFAULT_NODE_WIDTH: f64 = 260.0;

/// Default node height handed to the layout collaborator
pub const DEFAULT_NODE_HEIGHT: f64 = 90.0;

/// Default number of cached results per memo
pub const DEFAULT_MEMO_CAPACITY: usize = 16;

/// Name of the configuration file looked up next to the issue file
pub const CONFIG_FILE_NAME: &str = "blockgraph.yaml";

/// Configuration for graph building and analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GraphConfig {
    /// Maximum number of hops a blocking chain walk follows
    pub max_chain_depth: usize,

    /// Keep dependencies on missing issues and show them as ghost nodes
    pub include_orphan_edges: bool,

    /// Node width for layout
    pub node_width: f64,

    /// Node height for layout
    pub node_height: f64,

    /// Number of results each memo keeps
    pub memo_capacity: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_chain_depth: DEFAULT_MAX_CHAIN_DEPTH,
            include_orphan_edges: false,
            node_width: DEFAULT_NODE_WIDTH,
            node_height: DEFAULT_NODE_HEIGHT,
            memo_capacity: DEFAULT_MEMO_CAPACITY,
        }
    }
}

impl GraphConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and `Error::Config` if it
    /// is not valid YAML or fails [`GraphConfig::validate`].
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config = Self::from_yaml(&content)?;
        tracing::debug!(path = %path.display(), ?config, "Loaded configuration");
        Ok(config)
    }

    /// Load configuration from `path` if it exists, defaults otherwise
    ///
    /// # Errors
    ///
    /// Same as [`GraphConfig::load`] once the file exists.
    pub async fn load_or_default(path: &Path) -> Result<Self> {
        if fs::try_exists(path).await? {
            Self::load(path).await
        } else {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse configuration from a YAML string
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` on invalid YAML or invalid values.
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty file deserializes to YAML null rather than an empty mapping
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that all values are usable
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.max_chain_depth == 0 {
            return Err(Error::Config(
                "max-chain-depth must be at least 1".to_string(),
            ));
        }

        if self.memo_capacity == 0 {
            return Err(Error::Config("memo-capacity must be at least 1".to_string()));
        }

        if !(self.node_width > 0.0 && self.node_height > 0.0) {
            return Err(Error::Config(format!(
                "node dimensions must be positive, got {}x{}",
                self.node_width, self.node_height
            )));
        }

        Ok(())
    }

    /// Node dimensions for the layout collaborator
    #[must_use]
    pub fn node_dimensions(&self) -> NodeDimensions {
        NodeDimensions {
            width: self.node_width,
            height: self.node_height,
        }
    }
}
