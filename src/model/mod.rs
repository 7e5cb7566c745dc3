mod config;
mod definitions;
mod path;
mod snapshot;
mod state;

pub use self::config::{
    ClientConfig, DEFAULT_EDITOR, DEFAULT_HOST, DEFAULT_LIVE_INTERVAL, DEFAULT_PORT, ENV_EDITOR,
    ENV_HOST, ENV_PORT,
};
pub use self::definitions::{Definitions, NodeDef};
pub use self::path::NodePath;
pub use self::snapshot::{NodeId, NodeRecord, TreeSnapshot, Variable};
pub use self::state::{NodeKind, NodeState, ServerState};
