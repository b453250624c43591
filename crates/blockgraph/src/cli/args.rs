//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use clap::Parser;

use super::validators::{validate_dependency_type, validate_issue_id};
use crate::domain::DependencyType;

/// Arguments for the `graph` command
#[derive(Parser, Debug, Clone, Default)]
pub struct GraphArgs {
    /// Only include dependencies of these types (comma-separated)
    ///
    /// Known types: blocks, parent-child, conditional-blocks, waits-for,
    /// related, discovered-from, replies-to, relates-to, duplicates,
    /// supersedes. Any other tag is matched verbatim.
    #[arg(long, value_delimiter = ',', value_parser = validate_dependency_type, conflicts_with = "no_types")]
    pub types: Vec<DependencyType>,

    /// Include no dependencies at all (nodes only)
    #[arg(long)]
    pub no_types: bool,

    /// Keep dependencies on missing issues and show them as ghost nodes
    #[arg(long)]
    pub orphans: bool,

    /// Ignore live blockers when computing readiness
    #[arg(long)]
    pub no_live_blockers: bool,

    /// Print the layout input (sized nodes and edge endpoints) as JSON
    #[arg(long)]
    pub layout: bool,
}

/// Arguments for the `chain` command
#[derive(Parser, Debug, Clone)]
pub struct ChainArgs {
    /// Issue whose blocking chain to show
    #[arg(value_parser = validate_issue_id)]
    pub issue_id: String,

    /// Maximum number of hops to follow in each direction
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_depth: Option<u32>,
}

/// Arguments for the `top` command
#[derive(Parser, Debug, Clone)]
pub struct TopArgs {
    /// Maximum number of blockers to display
    #[arg(short = 'n', long, default_value = "10")]
    pub limit: usize,
}

/// Arguments for the `ready` command
#[derive(Parser, Debug, Clone)]
pub struct ReadyArgs {
    /// Maximum number of issues to display
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}
