//! Application context for CLI command execution.
//!
//! This module provides the `App` struct that loads the issue collection and
//! configuration once and gives commands memoized access to the graph.
//!
//! # Example
//!
//! ```no_run
//! use blockgraph::app::App;
//! use blockgraph::graph::BuildOptions;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let mut app = App::load(Path::new("issues.jsonl"), None).await?;
//!     let graph = app.graph(&BuildOptions::default());
//!     println!("{} nodes", graph.nodes.len());
//!     Ok(())
//! }
//! ```

use crate::blockers::compute_blocked_issue_ids;
use crate::config::{GraphConfig, CONFIG_FILE_NAME};
use crate::domain::{Issue, IssueId};
use crate::error::{Error, Result};
use crate::graph::{BlockedChain, BuildOptions, DependencyGraph};
use crate::memo::GraphMemo;
use crate::source::{IssueSource, JsonlIssueSource, LoadWarning};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Application context for CLI operations.
#[derive(Debug)]
pub struct App {
    issues: Vec<Issue>,
    warnings: Vec<LoadWarning>,
    config: GraphConfig,
    memo: GraphMemo,
}

impl App {
    /// Load issues from `issue_file` and configuration from `config_file`.
    ///
    /// Without an explicit configuration file, `blockgraph.yaml` next to the
    /// issue file is used when present, and defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The issue file cannot be read
    /// - An explicit configuration file is missing or invalid
    pub async fn load(issue_file: &Path, config_file: Option<&Path>) -> Result<Self> {
        let config = match config_file {
            Some(path) => GraphConfig::load(path).await?,
            None => GraphConfig::load_or_default(&default_config_path(issue_file)).await?,
        };

        Self::from_source(&JsonlIssueSource::new(issue_file), config).await
    }

    /// Build an App from any issue source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be loaded or the configuration is invalid.
    pub async fn from_source(source: &dyn IssueSource, config: GraphConfig) -> Result<Self> {
        config.validate()?;
        let loaded = source.load().await?;

        tracing::debug!(
            issues = loaded.issues.len(),
            warnings = loaded.warnings.len(),
            "Application context ready"
        );

        Ok(Self {
            issues: loaded.issues,
            warnings: loaded.warnings,
            memo: GraphMemo::new(&config),
            config,
        })
    }

    /// The loaded issues, in source order
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Warnings raised while loading
    #[must_use]
    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Issues blocked by an open blocker, computed from the collection.
    #[must_use]
    pub fn live_blocked_ids(&self) -> BTreeSet<IssueId> {
        compute_blocked_issue_ids(&self.issues)
    }

    /// Build options seeded from the configuration
    #[must_use]
    pub fn default_options(&self) -> BuildOptions {
        BuildOptions::default().with_orphan_edges(self.config.include_orphan_edges)
    }

    /// Build (or reuse) the graph for `options`.
    pub fn graph(&mut self, options: &BuildOptions) -> Arc<DependencyGraph> {
        self.memo.graph(&self.issues, options)
    }

    /// Blocking chain of `issue_id` over the full graph.
    ///
    /// `max_depth` overrides the configured depth limit.
    ///
    /// # Errors
    ///
    /// Returns `Error::IssueNotFound` if no loaded issue has that ID.
    pub fn chain(
        &mut self,
        issue_id: &IssueId,
        max_depth: Option<usize>,
    ) -> Result<(Arc<DependencyGraph>, Arc<BlockedChain>)> {
        if !self.issues.iter().any(|issue| &issue.id == issue_id) {
            return Err(Error::IssueNotFound(issue_id.clone()));
        }

        let options = self.default_options();
        let graph = self.graph(&options);
        let max_depth = max_depth.unwrap_or(self.config.max_chain_depth);
        let chain = self.memo.blocked_chain_with_depth(issue_id, &graph.edges, max_depth);
        Ok((graph, chain))
    }
}

fn default_config_path(issue_file: &Path) -> PathBuf {
    issue_file
        .parent()
        .map_or_else(|| PathBuf::from(CONFIG_FILE_NAME), |dir| dir.join(CONFIG_FILE_NAME))
}
