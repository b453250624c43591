//! Output formatting for CLI commands.
//!
//! Every command prints either human-readable text or JSON for programmatic
//! use. Text rendering goes through writer-generic functions so it can be
//! tested without a terminal.
//!
//! Submodules:
//! - [`color`]: Color and styling helpers (semantic colors, icons)

pub(crate) mod color;

use crate::domain::{Issue, IssueId};
use crate::graph::{BlockedChain, DependencyGraph, GraphNode};
use serde::Serialize;
use std::env;
use std::io::{self, Write};

use color::{
    arrow, bold, colored_state_icon, colorize_id, colorize_priority, colorize_status, dimmed,
    NodeState,
};

// ============================================================================
// Output Configuration
// ============================================================================

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const DEFAULT_MAX_CONTENT_WIDTH: usize = 100;

/// Configuration for output formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Maximum content width for text wrapping.
    pub max_width: usize,
    /// Whether to use ASCII-only icons instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new `OutputConfig` with explicit values.
    #[must_use]
    pub fn new(max_width: usize, use_ascii: bool, use_colors: bool) -> Self {
        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `BLOCKGRAPH_MAX_WIDTH`: Maximum content width (default: 100)
    /// - `BLOCKGRAPH_ASCII`: Set to "1" or "true" for ASCII-only icons
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `BLOCKGRAPH_COLOR`: Set to "0" or "false" to disable colors
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let max_width = match lookup("BLOCKGRAPH_MAX_WIDTH") {
            Some(s) if !s.is_empty() => match s.parse() {
                Ok(width) if width > 0 => width,
                _ => {
                    tracing::warn!(
                        env_var = "BLOCKGRAPH_MAX_WIDTH",
                        value = %s,
                        default = DEFAULT_MAX_CONTENT_WIDTH,
                        "Invalid value, using default"
                    );
                    DEFAULT_MAX_CONTENT_WIDTH
                }
            },
            _ => DEFAULT_MAX_CONTENT_WIDTH,
        };

        let use_ascii = match lookup("BLOCKGRAPH_ASCII") {
            Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Some(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Some(v) => {
                tracing::warn!(
                    env_var = "BLOCKGRAPH_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            None => false,
        };

        // NO_COLOR wins over BLOCKGRAPH_COLOR (https://no-color.org/)
        let use_colors = lookup("NO_COLOR").is_none()
            && lookup("BLOCKGRAPH_COLOR")
                .is_none_or(|v| v != "0" && !v.eq_ignore_ascii_case("false"));

        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    /// Width available for content on the current terminal.
    fn content_width(&self) -> usize {
        terminal_width().min(self.max_width)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_CONTENT_WIDTH,
            use_ascii: false,
            use_colors: true,
        }
    }
}

/// Get the current terminal width, falling back to default if detection fails.
fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map_or(usize::from(DEFAULT_TERMINAL_WIDTH), |(w, _)| usize::from(w.0))
}

/// Wrap text to the given width, never below a readable minimum.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    textwrap::wrap(text, width.max(20))
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

// ============================================================================
// JSON shapes
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChainJson<'a> {
    issue_id: &'a IssueId,
    #[serde(flatten)]
    chain: &'a BlockedChain,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BlockerJson<'a> {
    id: &'a IssueId,
    title: &'a str,
    priority: u8,
    blocked_count: usize,
    is_root_blocker: bool,
}

impl<'a> From<&'a GraphNode> for BlockerJson<'a> {
    fn from(node: &'a GraphNode) -> Self {
        Self {
            id: &node.data.issue.id,
            title: &node.data.issue.title,
            priority: node.data.issue.priority,
            blocked_count: node.data.blocked_count,
            is_root_blocker: node.data.is_root_blocker,
        }
    }
}

// ============================================================================
// Public Dispatch Functions
// ============================================================================

/// Print the whole graph in the specified format
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_graph(graph: &DependencyGraph, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            let width = config.content_width();
            write_graph_text(&mut io::stdout().lock(), graph, &config, width)
        }
        OutputMode::Json => print_json(graph),
    }
}

/// Print the blocking chain of one issue
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_chain(
    issue_id: &IssueId,
    chain: &BlockedChain,
    graph: &DependencyGraph,
    mode: OutputMode,
) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            write_chain_text(&mut io::stdout().lock(), issue_id, chain, graph, &config)
        }
        OutputMode::Json => print_json(&ChainJson { issue_id, chain }),
    }
}

/// Print the issues that block the most other issues
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_top_blockers(nodes: &[&GraphNode], mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            let width = config.content_width();
            write_top_text(&mut io::stdout().lock(), nodes, &config, width)
        }
        OutputMode::Json => {
            let entries: Vec<BlockerJson<'_>> = nodes.iter().map(|n| BlockerJson::from(*n)).collect();
            print_json(&entries)
        }
    }
}

/// Print the issues that are ready to work on
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_ready(nodes: &[&GraphNode], mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            let width = config.content_width();
            write_ready_text(&mut io::stdout().lock(), nodes, &config, width)
        }
        OutputMode::Json => {
            let issues: Vec<&Issue> = nodes.iter().map(|n| &n.data.issue).collect();
            print_json(&issues)
        }
    }
}

/// Print a JSON-formatted result for any serializable value
///
/// # Errors
///
/// Returns an error if serialization or writing to stdout fails.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(io::stdout().lock(), "{json}")
}

// ============================================================================
// Text Formatting
// ============================================================================

fn write_node_line<W: Write>(
    w: &mut W,
    prefix: &str,
    node: &GraphNode,
    config: &OutputConfig,
    width: usize,
) -> io::Result<()> {
    let issue = &node.data.issue;
    let head = format!(
        "{prefix}{} {}  {}  {}",
        colored_state_icon(NodeState::of(&node.data), config),
        colorize_id(issue.id.as_str(), config),
        colorize_priority(issue.priority, config),
        colorize_status(issue.status, config),
    );

    let mut title_lines = wrap_text(&issue.title, width.saturating_sub(prefix.len() + 4)).into_iter();
    match title_lines.next() {
        Some(first) => writeln!(w, "{head}  {first}")?,
        None => writeln!(w, "{head}")?,
    }
    for line in title_lines {
        writeln!(w, "{prefix}    {line}")?;
    }
    Ok(())
}

fn write_graph_text<W: Write>(
    w: &mut W,
    graph: &DependencyGraph,
    config: &OutputConfig,
    width: usize,
) -> io::Result<()> {
    if graph.is_empty() {
        writeln!(w, "No issues found.")?;
        return Ok(());
    }

    let ghosts = graph.ghost_nodes().count();
    writeln!(
        w,
        "{} {} issue(s), {} missing, {} edge(s)",
        bold("Dependency graph:", config),
        graph.nodes.len() - ghosts,
        ghosts,
        graph.edges.len()
    )?;
    writeln!(
        w,
        "  {} {} total, {} blocking, {} orphan",
        dimmed("Dependencies:", config),
        graph.total_dependencies,
        graph.blocking_dependencies,
        graph.orphan_edge_count
    )?;
    if !graph.missing_target_ids.is_empty() {
        let missing: Vec<&str> = graph.missing_target_ids.iter().map(IssueId::as_str).collect();
        writeln!(w, "  {} {}", dimmed("Missing:", config), missing.join(", "))?;
    }

    writeln!(w)?;
    for node in &graph.nodes {
        write_node_line(w, "  ", node, config, width)?;
        if !node.data.is_ghost {
            writeln!(
                w,
                "      {}",
                dimmed(
                    &format!(
                        "blocks {}, depends on {}, needed by {}",
                        node.data.blocked_count,
                        node.data.dependency_count,
                        node.data.dependent_count
                    ),
                    config
                )
            )?;
        }
    }

    Ok(())
}

fn write_id_list<W: Write>(
    w: &mut W,
    label: &str,
    ids: &std::collections::BTreeSet<IssueId>,
    graph: &DependencyGraph,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(w, "  {} ({})", bold(label, config), ids.len())?;
    for id in ids {
        let title = graph
            .node(id)
            .map_or("", |node| node.data.issue.title.as_str());
        writeln!(w, "    {} {}", colorize_id(id.as_str(), config), title)?;
    }
    Ok(())
}

fn write_chain_text<W: Write>(
    w: &mut W,
    issue_id: &IssueId,
    chain: &BlockedChain,
    graph: &DependencyGraph,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "{} {}",
        bold("Blocking chain for", config),
        colorize_id(issue_id.as_str(), config)
    )?;
    write_id_list(w, &format!("Waiting on {}", arrow(config)), &chain.blockers, graph, config)?;
    write_id_list(w, &format!("Blocks {}", arrow(config)), &chain.blocked_by, graph, config)?;
    writeln!(
        w,
        "  {} {}",
        dimmed("Blocked count:", config),
        chain.blocked_count
    )?;
    if chain.truncated {
        writeln!(
            w,
            "  {}",
            dimmed("(chain truncated at the depth limit)", config)
        )?;
    }
    Ok(())
}

fn write_top_text<W: Write>(
    w: &mut W,
    nodes: &[&GraphNode],
    config: &OutputConfig,
    width: usize,
) -> io::Result<()> {
    if nodes.is_empty() {
        writeln!(w, "No blocking issues found.")?;
        return Ok(());
    }

    writeln!(w, "{}", bold("Top blockers:", config))?;
    for (rank, node) in nodes.iter().enumerate() {
        let prefix = format!("  {:>2}. blocks {:<3} ", rank + 1, node.data.blocked_count);
        write_node_line(w, &prefix, node, config, width)?;
    }
    Ok(())
}

fn write_ready_text<W: Write>(
    w: &mut W,
    nodes: &[&GraphNode],
    config: &OutputConfig,
    width: usize,
) -> io::Result<()> {
    if nodes.is_empty() {
        writeln!(w, "No ready issues.")?;
        return Ok(());
    }

    writeln!(w, "{} ({})", bold("Ready to work on", config), nodes.len())?;
    for node in nodes {
        write_node_line(w, "  ", node, config, width)?;
    }
    Ok(())
}
