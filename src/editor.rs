//! Synchronous round trip through the user's external editor.
//!
//! The caller must have released the terminal before calling
//! [`edit_text`]; the editor owns the tty until it exits.

use std::io::Write;
use std::path::Path;
use std::process::Command;

use crate::error::FlowError;
use crate::model::NodePath;

const ACTION: &str = "edit script";

/// Open `original` in `editor` and return the edited text, or `None` when
/// the file came back unchanged. The temp file is removed on every path.
pub fn edit_text(
    editor: &str,
    node: &NodePath,
    original: &str,
) -> Result<Option<String>, FlowError> {
    let fail = |msg: String| FlowError::command(node, ACTION, msg);

    let mut file = tempfile::Builder::new()
        .prefix("flowtop-")
        .suffix(".ecf")
        .tempfile()
        .map_err(|err| fail(format!("create temp file: {}", err)))?;
    file.write_all(original.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|err| fail(format!("write temp file: {}", err)))?;

    launch_editor(editor, file.path()).map_err(fail)?;

    let edited = std::fs::read_to_string(file.path())
        .map_err(|err| fail(format!("read temp file: {}", err)))?;
    tracing::debug!(path = %file.path().display(), changed = edited != original, "editor closed");
    Ok((edited != original).then_some(edited))
}

fn launch_editor(command: &str, path: &Path) -> Result<(), String> {
    let path_text = path.to_string_lossy();
    if path_text.starts_with('-') {
        return Err("invalid editor temp path".to_string());
    }
    let status = Command::new("sh")
        .arg("-c")
        .arg(format!("{} {}", command, shell_single_quote(&path_text)))
        .status()
        .map_err(|err| format!("failed to run editor `{}`: {}", command, err))?;
    if !status.success() {
        return Err(format!("editor `{}` exited with {}", command, status));
    }
    Ok(())
}

fn shell_single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

#[cfg(test)]
#[path = "tests/editor_tests.rs"]
mod tests;
