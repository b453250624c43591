//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Done:        green   (closed issues)
//!   - Ready:       white   (ready to work on)
//!   - Blocked:     red     (blocked issues, P0 priority)
//!   - Root:        yellow  (root blockers, P1 priority)
//!   - Reference:   cyan    (issue IDs)
//!   - Missing:     magenta (ghost nodes)
//!   - Muted:       dimmed  (field labels, counts)

use crate::domain::IssueStatus;
use crate::graph::NodeData;
use colored::Colorize;

use super::OutputConfig;

/// Visual state of a node, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeState {
    Ghost,
    Closed,
    RootBlocker,
    Ready,
    Blocked,
}

impl NodeState {
    pub(crate) fn of(data: &NodeData) -> Self {
        if data.is_ghost {
            Self::Ghost
        } else if data.is_closed {
            Self::Closed
        } else if data.is_root_blocker {
            Self::RootBlocker
        } else if data.is_ready {
            Self::Ready
        } else {
            Self::Blocked
        }
    }
}

/// Apply bold style to text (for section headers).
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

/// Apply dimmed style to text (for labels/field names).
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Colorize an issue or node ID (cyan).
pub(crate) fn colorize_id(id: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return id.to_string();
    }
    id.cyan().to_string()
}

/// Apply color to priority text based on priority level.
pub(crate) fn colorize_priority(priority: u8, config: &OutputConfig) -> String {
    let text = format!("P{priority}");
    if !config.use_colors {
        return text;
    }
    match priority {
        0 => text.red().bold().to_string(),
        1 => text.yellow().to_string(),
        _ => text.to_string(),
    }
}

/// Status text, `-` when the issue carries none.
pub(crate) fn colorize_status(status: Option<IssueStatus>, config: &OutputConfig) -> String {
    let Some(status) = status else {
        return dimmed("-", config);
    };
    let text = status.to_string();
    if !config.use_colors {
        return text;
    }
    match status {
        IssueStatus::Closed => text.green().to_string(),
        IssueStatus::InProgress | IssueStatus::Review => text.yellow().to_string(),
        IssueStatus::Blocked => text.red().to_string(),
        IssueStatus::Deferred => text.dimmed().to_string(),
        IssueStatus::Open => text.white().to_string(),
    }
}

/// Get a colored state icon for a node, with ASCII fallback support.
pub(crate) fn colored_state_icon(state: NodeState, config: &OutputConfig) -> String {
    let icon = if config.use_ascii {
        match state {
            NodeState::Ghost => "?",
            NodeState::Closed => "+",
            NodeState::RootBlocker => "*",
            NodeState::Ready => "o",
            NodeState::Blocked => "x",
        }
    } else {
        match state {
            NodeState::Ghost => "◌",
            NodeState::Closed => "✓",
            NodeState::RootBlocker => "◆",
            NodeState::Ready => "○",
            NodeState::Blocked => "✗",
        }
    };

    if !config.use_colors {
        return icon.to_string();
    }

    match state {
        NodeState::Ghost => icon.magenta().to_string(),
        NodeState::Closed => icon.green().to_string(),
        NodeState::RootBlocker => icon.yellow().bold().to_string(),
        NodeState::Ready => icon.white().to_string(),
        NodeState::Blocked => icon.red().to_string(),
    }
}

/// Arrow used between a chain's sections.
pub(crate) fn arrow(config: &OutputConfig) -> &'static str {
    if config.use_ascii { "->" } else { "→" }
}
