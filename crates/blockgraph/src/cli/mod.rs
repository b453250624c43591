//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for blockgraph using
//! clap's derive API. The CLI is read-only: it loads an issue file, builds
//! the dependency graph and reports on it.
//!
//! # Commands
//!
//! - `graph`: Summarize the dependency graph, node by node
//! - `chain`: Show what blocks an issue and what it blocks
//! - `top`: List the issues blocking the most other issues
//! - `ready`: List issues ready to work on
//!
//! # Global Flags
//!
//! - `--file`: Issue file to read (default `issues.jsonl`)
//! - `--config`: Configuration file (default `blockgraph.yaml` next to the issue file)
//! - `--json`: Output in JSON format (applies to all commands)
//!
//! # Example
//!
//! ```bash
//! blockgraph --file .beads/issues.jsonl graph --types blocks,parent-child
//! blockgraph chain bd-42 --max-depth 5
//! blockgraph --json top --limit 3
//! ```

mod args;
mod execute;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{ChainArgs, GraphArgs, ReadyArgs, TopArgs};
pub use validators::{validate_dependency_type, validate_issue_id};

/// Blockgraph - dependency graph inspector for issue trackers
///
/// Reads a JSONL issue file and reports on the dependency graph between
/// issues: blockers, blocking chains and what is ready to work on.
#[derive(Parser, Debug)]
#[command(name = "blockgraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Issue file in JSON Lines format
    #[arg(short, long, global = true, default_value = "issues.jsonl")]
    pub file: PathBuf,

    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Summarize the dependency graph
    ///
    /// Lists every node with its readiness, blocked count and degree.
    /// Dependencies on missing issues appear as ghost nodes with --orphans.
    Graph(GraphArgs),

    /// Show the blocking chain of an issue
    ///
    /// Lists the issues transitively blocking it and the issues it
    /// transitively blocks.
    Chain(ChainArgs),

    /// List the issues blocking the most other issues
    Top(TopArgs),

    /// List issues ready to work on
    ///
    /// An issue is ready when it is not closed or deferred and no open
    /// issue blocks it.
    Ready(ReadyArgs),
}

impl Cli {
    /// Parse command-line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parse arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns a clap error when the arguments are invalid.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the parsed command
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails, the issue is unknown, or output fails.
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        let Some(command) = &self.command else {
            println!("Blockgraph dependency graph inspector");
            println!("Use --help for more information");
            return Ok(());
        };

        let mut app = App::load(&self.file, self.config.as_deref()).await?;

        match command {
            Commands::Graph(args) => execute::execute_graph(&mut app, args, output_mode),
            Commands::Chain(args) => execute::execute_chain(&mut app, args, output_mode),
            Commands::Top(args) => execute::execute_top(&mut app, args, output_mode),
            Commands::Ready(args) => execute::execute_ready(&mut app, args, output_mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DependencyType;

    #[test]
    fn test_parse_no_command() {
        let cli = Cli::try_parse_from(["blockgraph"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
        assert_eq!(cli.file, PathBuf::from("issues.jsonl"));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "blockgraph",
            "ready",
            "--json",
            "--file",
            "data/issues.jsonl",
            "--config",
            "bg.yaml",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.file, PathBuf::from("data/issues.jsonl"));
        assert_eq!(cli.config, Some(PathBuf::from("bg.yaml")));
    }

    #[test]
    fn test_parse_graph_default() {
        let cli = Cli::try_parse_from(["blockgraph", "graph"]).unwrap();
        match cli.command {
            Some(Commands::Graph(args)) => {
                assert!(args.types.is_empty());
                assert!(!args.no_types);
                assert!(!args.orphans);
                assert!(!args.no_live_blockers);
                assert!(!args.layout);
            }
            _ => panic!("Expected Graph command"),
        }
    }

    #[test]
    fn test_parse_graph_with_types() {
        let cli = Cli::try_parse_from([
            "blockgraph",
            "graph",
            "--types",
            "blocks,parent-child,tracks",
            "--orphans",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Graph(args)) => {
                assert_eq!(
                    args.types,
                    vec![
                        DependencyType::Blocks,
                        DependencyType::ParentChild,
                        DependencyType::from("tracks"),
                    ]
                );
                assert!(args.orphans);
            }
            _ => panic!("Expected Graph command"),
        }
    }

    #[test]
    fn test_parse_graph_types_conflict_with_no_types() {
        let result = Cli::try_parse_from(["blockgraph", "graph", "--types", "blocks", "--no-types"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_chain() {
        let cli = Cli::try_parse_from(["blockgraph", "chain", "bd-1", "--max-depth", "5"]).unwrap();
        match cli.command {
            Some(Commands::Chain(args)) => {
                assert_eq!(args.issue_id, "bd-1");
                assert_eq!(args.max_depth, Some(5));
            }
            _ => panic!("Expected Chain command"),
        }
    }

    #[test]
    fn test_parse_chain_rejects_zero_depth() {
        let result = Cli::try_parse_from(["blockgraph", "chain", "bd-1", "--max-depth", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_chain_requires_id() {
        assert!(Cli::try_parse_from(["blockgraph", "chain"]).is_err());
    }

    #[test]
    fn test_parse_top_limit() {
        let cli = Cli::try_parse_from(["blockgraph", "top", "-n", "3"]).unwrap();
        match cli.command {
            Some(Commands::Top(args)) => assert_eq!(args.limit, 3),
            _ => panic!("Expected Top command"),
        }

        let cli = Cli::try_parse_from(["blockgraph", "top"]).unwrap();
        match cli.command {
            Some(Commands::Top(args)) => assert_eq!(args.limit, 10),
            _ => panic!("Expected Top command"),
        }
    }

    #[test]
    fn test_parse_ready() {
        let cli = Cli::try_parse_from(["blockgraph", "ready", "--limit", "2"]).unwrap();
        match cli.command {
            Some(Commands::Ready(args)) => assert_eq!(args.limit, Some(2)),
            _ => panic!("Expected Ready command"),
        }
    }
}
