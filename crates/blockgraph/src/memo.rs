//! Caller-side memoization of graph results.
//!
//! The builder and analyzer keep no state between calls, so their results
//! can be cached by whoever calls them. This module is that cache: results are
//! keyed by a [`Fingerprint`], the SHA-256 of the canonical JSON encoding of
//! every input the result depends on.
//!
//! # Invalidation
//!
//! - A graph is reused only when the issues (in order) and all build options
//!   are identical. `None` and `Some(empty)` type filters hash differently.
//! - Blocked counts are keyed by `(node ids, edges)`.
//! - A blocking chain is keyed by `(issue id, edges, max depth)`.
//!
//! Any change to any input produces a new fingerprint and a recomputation.
//! Each memo holds a bounded number of results and evicts the least recently
//! used one when full.

use crate::config::GraphConfig;
use crate::domain::{Issue, IssueId};
use crate::error::Result;
use crate::graph::{
    build_dependency_graph, compute_all_blocked_counts, get_blocked_chain_with_depth,
    BlockedChain, BuildOptions, DependencyGraph, GraphEdge,
};
use lru::LruCache;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// SHA-256 of the canonical encoding of a set of inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Fingerprint any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if the value cannot be serialized.
    pub fn of<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let encoded = serde_json::to_vec(value)?;
        Ok(Self(Sha256::digest(&encoded).into()))
    }

    /// Fingerprint of the graph builder inputs
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if the inputs cannot be serialized.
    pub fn of_graph_inputs(issues: &[Issue], options: &BuildOptions) -> Result<Self> {
        Self::of(&("graph", issues, options))
    }

    /// Fingerprint of the blocked counts inputs
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if the inputs cannot be serialized.
    pub fn of_counts_inputs(node_ids: &[IssueId], edges: &[GraphEdge]) -> Result<Self> {
        Self::of(&("counts", node_ids, edges))
    }

    /// Fingerprint of the blocking chain inputs
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if the inputs cannot be serialized.
    pub fn of_chain_inputs(issue_id: &IssueId, edges: &[GraphEdge], max_depth: usize) -> Result<Self> {
        Self::of(&("chain", issue_id, edges, max_depth))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Hit and miss counters of a memo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that had to compute
    pub misses: u64,
}

/// A bounded fingerprint-keyed LRU cache.
#[derive(Debug)]
pub struct Memo<T> {
    entries: LruCache<Fingerprint, Arc<T>>,
    stats: MemoStats,
}

impl<T> Memo<T> {
    /// Create a memo keeping at most `capacity` results
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            stats: MemoStats::default(),
        }
    }

    /// Return the cached result for `key`, computing and caching it on a miss.
    ///
    /// A hit marks the entry as most recently used.
    pub fn get_or_compute(&mut self, key: Fingerprint, compute: impl FnOnce() -> T) -> Arc<T> {
        if let Some(value) = self.entries.get(&key) {
            self.stats.hits += 1;
            tracing::trace!(%key, "Memo hit");
            return Arc::clone(value);
        }

        self.stats.misses += 1;
        tracing::trace!(%key, "Memo miss");

        let value = Arc::new(compute());
        self.entries.put(key, Arc::clone(&value));
        value
    }

    /// Maximum number of cached results
    #[must_use]
    pub fn capacity(&self) -> NonZeroUsize {
        self.entries.cap()
    }

    /// Number of cached results
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hit and miss counters
    #[must_use]
    pub fn stats(&self) -> MemoStats {
        self.stats
    }

    /// Drop every cached result
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Memoized front end to the graph builder and analyzer.
#[derive(Debug)]
pub struct GraphMemo {
    graphs: Memo<DependencyGraph>,
    counts: Memo<HashMap<IssueId, usize>>,
    chains: Memo<BlockedChain>,
    max_chain_depth: usize,
}

impl GraphMemo {
    /// Create a memo sized and bounded by `config`
    #[must_use]
    pub fn new(config: &GraphConfig) -> Self {
        // `GraphConfig::validate` rejects a zero capacity
        let capacity = NonZeroUsize::new(config.memo_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            graphs: Memo::new(capacity),
            counts: Memo::new(capacity),
            chains: Memo::new(capacity),
            max_chain_depth: config.max_chain_depth,
        }
    }

    /// Build (or reuse) the graph for `issues` and `options`.
    pub fn graph(&mut self, issues: &[Issue], options: &BuildOptions) -> Arc<DependencyGraph> {
        let compute = || build_dependency_graph(issues, options);
        match Fingerprint::of_graph_inputs(issues, options) {
            Ok(key) => self.graphs.get_or_compute(key, compute),
            Err(e) => uncached("graph", &e, compute),
        }
    }

    /// Compute (or reuse) transitive blocked counts.
    pub fn blocked_counts(
        &mut self,
        node_ids: &[IssueId],
        edges: &[GraphEdge],
    ) -> Arc<HashMap<IssueId, usize>> {
        let compute = || compute_all_blocked_counts(node_ids, edges);
        match Fingerprint::of_counts_inputs(node_ids, edges) {
            Ok(key) => self.counts.get_or_compute(key, compute),
            Err(e) => uncached("counts", &e, compute),
        }
    }

    /// Compute (or reuse) the blocking chain of `issue_id` with the configured depth.
    pub fn blocked_chain(&mut self, issue_id: &IssueId, edges: &[GraphEdge]) -> Arc<BlockedChain> {
        self.blocked_chain_with_depth(issue_id, edges, self.max_chain_depth)
    }

    /// Compute (or reuse) the blocking chain of `issue_id` walking at most `max_depth` hops.
    pub fn blocked_chain_with_depth(
        &mut self,
        issue_id: &IssueId,
        edges: &[GraphEdge],
        max_depth: usize,
    ) -> Arc<BlockedChain> {
        let compute = || get_blocked_chain_with_depth(issue_id, edges, max_depth);
        match Fingerprint::of_chain_inputs(issue_id, edges, max_depth) {
            Ok(key) => self.chains.get_or_compute(key, compute),
            Err(e) => uncached("chain", &e, compute),
        }
    }

    /// Counters of the graph memo
    #[must_use]
    pub fn graph_stats(&self) -> MemoStats {
        self.graphs.stats()
    }

    /// Counters of the counts memo
    #[must_use]
    pub fn counts_stats(&self) -> MemoStats {
        self.counts.stats()
    }

    /// Counters of the chain memo
    #[must_use]
    pub fn chain_stats(&self) -> MemoStats {
        self.chains.stats()
    }
}

fn uncached<T>(what: &str, error: &crate::error::Error, compute: impl FnOnce() -> T) -> Arc<T> {
    tracing::warn!(what, %error, "Could not fingerprint inputs, computing without cache");
    Arc::new(compute())
}
