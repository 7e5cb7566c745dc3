use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::FlowError;
use crate::model::{NodePath, TreeSnapshot};

mod demo;
mod http_client;
mod memory;
mod types;

pub use self::demo::demo_seed;
pub use self::http_client::HttpWorkflowClient;
pub use self::memory::{MemoryClient, MemoryWorkflow, NO_SUCH_NODE, WorkflowSeed};
pub use self::types::{AlterKind, AlterRequest, ErrorBody};

/// Text resources the server keeps per task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Output,
    Script,
    Job,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [ArtifactKind::Output, ArtifactKind::Script, ArtifactKind::Job];

    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Output => "output",
            ArtifactKind::Script => "script",
            ArtifactKind::Job => "job",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ArtifactKind::Output => "Output",
            ArtifactKind::Script => "Script",
            ArtifactKind::Job => "Job",
        }
    }

    pub fn index(self) -> usize {
        match self {
            ArtifactKind::Output => 0,
            ArtifactKind::Script => 1,
            ArtifactKind::Job => 2,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtifactKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| FlowError::Validation(format!("unknown file kind '{}'", s)))
    }
}

/// Control verbs; each maps to exactly one server endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandVerb {
    Suspend,
    Resume,
    Kill,
    ForceComplete,
    Requeue,
}

impl CommandVerb {
    pub const ALL: [CommandVerb; 5] = [
        CommandVerb::Suspend,
        CommandVerb::Resume,
        CommandVerb::Kill,
        CommandVerb::ForceComplete,
        CommandVerb::Requeue,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CommandVerb::Suspend => "suspend",
            CommandVerb::Resume => "resume",
            CommandVerb::Kill => "kill",
            CommandVerb::ForceComplete => "force_complete",
            CommandVerb::Requeue => "requeue",
        }
    }

    /// Human phrasing used in toasts ("Force complete: /s/t").
    pub fn title(self) -> &'static str {
        match self {
            CommandVerb::Suspend => "Suspend",
            CommandVerb::Resume => "Resume",
            CommandVerb::Kill => "Kill",
            CommandVerb::ForceComplete => "Force complete",
            CommandVerb::Requeue => "Requeue",
        }
    }
}

impl fmt::Display for CommandVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandVerb {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandVerb::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| FlowError::Validation(format!("unknown command '{}'", s)))
    }
}

/// Attribute edits accepted by `alter`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Alteration {
    AddVariable { name: String, value: String },
    DeleteVariable { name: String },
    /// Replace a named attribute; `script` replaces the task script.
    Change { name: String, value: String },
}

impl Alteration {
    pub fn name(&self) -> &str {
        match self {
            Alteration::AddVariable { name, .. }
            | Alteration::DeleteVariable { name }
            | Alteration::Change { name, .. } => name,
        }
    }

    pub fn action(&self) -> String {
        match self {
            Alteration::AddVariable { name, .. } => format!("set variable {}", name),
            Alteration::DeleteVariable { name } => format!("delete variable {}", name),
            Alteration::Change { name, .. } => format!("change {}", name),
        }
    }
}

/// Everything the dashboard needs from a workflow server.
///
/// All methods block; callers run them on background workers only.
pub trait WorkflowClient: Send + Sync {
    /// `host:port` (or another label) for the status bar.
    fn endpoint(&self) -> String;

    fn ping(&self) -> Result<(), FlowError>;

    /// Pull the latest definitions into the client's local working copy.
    fn sync(&self) -> Result<(), FlowError>;

    /// Snapshot of the local working copy as of the last `sync`.
    fn fetch_definitions(&self) -> Result<TreeSnapshot, FlowError>;

    fn fetch_file(&self, path: &NodePath, kind: ArtifactKind) -> Result<String, FlowError>;

    fn mutate(&self, path: &NodePath, verb: CommandVerb) -> Result<(), FlowError>;

    fn alter(&self, path: &NodePath, alteration: &Alteration) -> Result<(), FlowError>;
}

/// Owned, thread-safe client handle passed to every job.
pub type SharedClient = Arc<dyn WorkflowClient>;
