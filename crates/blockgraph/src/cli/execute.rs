//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands.

use anyhow::Result;

use super::args::{ChainArgs, GraphArgs, ReadyArgs, TopArgs};
use crate::app::App;
use crate::domain::IssueId;
use crate::graph::{BuildOptions, DependencyGraph, GraphNode, LayoutInput};
use crate::output::{self, OutputMode};

/// Build options for the `graph` command
pub(crate) fn graph_options(app: &App, args: &GraphArgs) -> BuildOptions {
    let mut options = app.default_options();

    if args.no_types {
        options = options.with_types(Vec::new());
    } else if !args.types.is_empty() {
        options = options.with_types(args.types.iter().cloned());
    }

    if args.orphans {
        options = options.with_orphan_edges(true);
    }

    if !args.no_live_blockers {
        options = options.with_blocked_issue_ids(app.live_blocked_ids());
    }

    options
}

/// Layout input of `graph` sized by the configured node dimensions
pub(crate) fn graph_layout(app: &App, graph: &DependencyGraph) -> LayoutInput {
    graph.layout_input(app.config().node_dimensions())
}

/// Execute the graph command
pub fn execute_graph(app: &mut App, args: &GraphArgs, output_mode: OutputMode) -> Result<()> {
    let options = graph_options(app, args);
    let graph = app.graph(&options);
    if args.layout {
        output::print_json(&graph_layout(app, &graph))?;
    } else {
        output::print_graph(&graph, output_mode)?;
    }
    Ok(())
}

/// Execute the chain command
pub fn execute_chain(app: &mut App, args: &ChainArgs, output_mode: OutputMode) -> Result<()> {
    let issue_id = IssueId::new(args.issue_id.as_str());
    let max_depth = args.max_depth.map(|depth| depth as usize);
    let (graph, chain) = app.chain(&issue_id, max_depth)?;
    output::print_chain(&issue_id, &chain, &graph, output_mode)?;
    Ok(())
}

/// Real nodes that block at least one issue, most blocking first
pub(crate) fn top_blockers(graph: &DependencyGraph, limit: usize) -> Vec<&GraphNode> {
    let mut nodes: Vec<&GraphNode> = graph
        .real_nodes()
        .filter(|node| node.data.blocked_count > 0)
        .collect();
    nodes.sort_by(|a, b| {
        b.data
            .blocked_count
            .cmp(&a.data.blocked_count)
            .then_with(|| a.issue_id().cmp(b.issue_id()))
    });
    nodes.truncate(limit);
    nodes
}

/// Execute the top command
pub fn execute_top(app: &mut App, args: &TopArgs, output_mode: OutputMode) -> Result<()> {
    let options = app.default_options();
    let graph = app.graph(&options);
    output::print_top_blockers(&top_blockers(&graph, args.limit), output_mode)?;
    Ok(())
}

/// Ready real nodes ordered by priority, then ID
pub(crate) fn ready_issues(graph: &DependencyGraph, limit: Option<usize>) -> Vec<&GraphNode> {
    let mut nodes: Vec<&GraphNode> = graph.ready_nodes().collect();
    nodes.sort_by(|a, b| {
        a.data
            .issue
            .priority
            .cmp(&b.data.issue.priority)
            .then_with(|| a.issue_id().cmp(b.issue_id()))
    });
    if let Some(limit) = limit {
        nodes.truncate(limit);
    }
    nodes
}

/// Execute the ready command
pub fn execute_ready(app: &mut App, args: &ReadyArgs, output_mode: OutputMode) -> Result<()> {
    let options = app
        .default_options()
        .with_blocked_issue_ids(app.live_blocked_ids());
    let graph = app.graph(&options);
    output::print_ready(&ready_issues(&graph, args.limit), output_mode)?;
    Ok(())
}
