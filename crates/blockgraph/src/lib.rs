//! Blockgraph - dependency graph analysis for issue trackers.
//!
//! This crate turns a flat collection of issues and their typed dependencies
//! into a renderable directed graph annotated with blocking analysis:
//! transitive blocked counts, blocking chains, root blockers and readiness.
//! It ships both a library and a read-only CLI inspector.
//!
//! The core ([`graph`], [`classify`], [`readiness`]) is pure and synchronous.
//! The outer layers ([`source`], [`config`], [`memo`], [`app`]) load input,
//! read configuration and cache results between calls.

#![forbid(unsafe_code)]

// Core graph model and analysis
pub mod blockers;
pub mod classify;
pub mod domain;
pub mod graph;
pub mod readiness;

// Loading, configuration and caching
pub mod config;
pub mod error;
pub mod memo;
pub mod source;

// Public CLI module (needed by binary)
pub mod app;
pub mod cli;

// Text and JSON rendering for the CLI
pub mod output;
