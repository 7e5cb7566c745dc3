use thiserror::Error;

use crate::model::NodePath;
use crate::remote::ArtifactKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// A user-visible toast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    /// Server unreachable or speaking something we cannot parse.
    #[error("failed to {operation}: {message}")]
    Connectivity { operation: String, message: String },

    /// A file kind does not exist for a node (e.g. the task never ran).
    #[error("{kind} not available for {path}: {message}")]
    ArtifactNotFound {
        path: NodePath,
        kind: ArtifactKind,
        message: String,
    },

    /// The server rejected a control or alter call.
    #[error("failed to {action} {path}: {message}")]
    Command {
        path: NodePath,
        action: String,
        message: String,
    },

    /// Malformed local input; no remote call was made.
    #[error("{0}")]
    Validation(String),

    /// The node is not in the latest snapshot.
    #[error("Node not found")]
    NodeNotFound(NodePath),

    /// Well-formed input that local policy refuses; no remote call was made.
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unexpected(String),
}

impl FlowError {
    pub fn connectivity(operation: &str, message: impl Into<String>) -> Self {
        FlowError::Connectivity {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    pub fn command(path: &NodePath, action: &str, message: impl Into<String>) -> Self {
        FlowError::Command {
            path: path.clone(),
            action: action.to_string(),
            message: message.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            FlowError::Validation(_) => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// `false` only for the catch-all variant.
    pub fn is_expected(&self) -> bool {
        !matches!(self, FlowError::Unexpected(_))
    }

    /// Toast for an error that reached a job boundary. `label` names the job
    /// ("Refresh", "Command", ...).
    pub fn notification(&self, label: &str) -> Notification {
        match self {
            FlowError::Connectivity { .. }
            | FlowError::ArtifactNotFound { .. }
            | FlowError::Command { .. } => Notification::error(format!("{} Error: {}", label, self)),
            FlowError::Validation(msg) => Notification::warning(msg.clone()),
            FlowError::NodeNotFound(_) => Notification::error(self.to_string()),
            FlowError::Forbidden(msg) => Notification::error(msg.clone()),
            FlowError::Unexpected(msg) => Notification::error(format!("Unexpected Error: {}", msg)),
        }
    }
}
