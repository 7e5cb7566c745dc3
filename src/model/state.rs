use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FlowError;

/// Execution state reported by the server for a single node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    #[default]
    Unknown,
    Complete,
    Queued,
    Aborted,
    Submitted,
    Active,
    Suspended,
}

impl NodeState {
    pub const ALL: [NodeState; 7] = [
        NodeState::Unknown,
        NodeState::Complete,
        NodeState::Queued,
        NodeState::Aborted,
        NodeState::Submitted,
        NodeState::Active,
        NodeState::Suspended,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeState::Unknown => "unknown",
            NodeState::Complete => "complete",
            NodeState::Queued => "queued",
            NodeState::Aborted => "aborted",
            NodeState::Submitted => "submitted",
            NodeState::Active => "active",
            NodeState::Suspended => "suspended",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            NodeState::Unknown => "⚪",
            NodeState::Complete => "🟢",
            NodeState::Queued => "🔵",
            NodeState::Aborted => "🔴",
            NodeState::Submitted => "🟡",
            NodeState::Active => "🔥",
            NodeState::Suspended => "🟠",
        }
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeState {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        NodeState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| FlowError::Validation(format!("unknown node state '{}'", s)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Suite,
    Family,
    Task,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Suite => "suite",
            NodeKind::Family => "family",
            NodeKind::Task => "task",
        }
    }
}

/// Run status of the server itself, shown in the status bar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerState {
    #[default]
    Running,
    Halted,
    Shutdown,
}

impl ServerState {
    pub fn label(self) -> &'static str {
        match self {
            ServerState::Running => "RUNNING",
            ServerState::Halted => "HALTED",
            ServerState::Shutdown => "SHUTDOWN",
        }
    }
}
