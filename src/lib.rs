pub mod artifacts;
pub mod dispatch;
pub mod editor;
pub mod error;
pub mod filter;
pub mod inspect;
pub mod logging;
pub mod model;
pub mod monitor;
pub mod remote;
pub mod search;
pub mod tree;
pub mod tui;
mod tui_shell;
pub mod variables;
