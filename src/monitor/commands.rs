use crate::dispatch::{JobName, UiState};
use crate::editor;
use crate::error::{FlowError, Notification};
use crate::model::NodePath;
use crate::remote::{Alteration, ArtifactKind, CommandVerb};

use super::{Confirm, Monitor};

/// Script fetched for editing, waiting for the UI loop to hand the
/// terminal to the editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingEdit {
    pub path: NodePath,
    pub original: String,
}

impl Monitor {
    /// Run `verb` on the selected node; a successful call is followed by
    /// exactly one refresh.
    pub fn command(&mut self, verb: CommandVerb) {
        if let Some(path) = self.selected_or_warn() {
            self.command_on(path, verb);
        }
    }

    pub fn command_on(&mut self, path: NodePath, verb: CommandVerb) {
        let client = self.client.clone();
        self.dispatcher.run(JobName::Command, move |ctx| {
            client.mutate(&path, verb)?;
            tracing::info!(%path, verb = verb.as_str(), "command applied");
            ctx.post(move |d| {
                d.notify(Notification::info(format!("{}: {}", verb.title(), path)));
                d.refresh_requested = true;
            });
            Ok(())
        });
    }

    /// Fetch the selected node's script. The edit itself happens on the UI
    /// loop once [`take_pending_edit`](Self::take_pending_edit) returns it.
    pub fn begin_edit_script(&mut self) {
        let Some(path) = self.selected_or_warn() else {
            return;
        };
        let client = self.client.clone();
        self.dispatcher.run(JobName::EditScript, move |ctx| {
            let original = client.fetch_file(&path, ArtifactKind::Script)?;
            ctx.post(move |d| d.pending_edit = Some(PendingEdit { path, original }));
            Ok(())
        });
    }

    pub fn take_pending_edit(&mut self) -> Option<PendingEdit> {
        self.dashboard.pending_edit.take()
    }

    /// Run the external editor on the UI thread. The caller must have
    /// released the terminal first.
    pub fn run_editor(&mut self, edit: PendingEdit) {
        let result = editor::edit_text(&self.editor, &edit.path, &edit.original);
        self.complete_edit(edit, result);
    }

    /// Push an edited script back and ask whether to requeue.
    pub fn complete_edit(&mut self, edit: PendingEdit, result: Result<Option<String>, FlowError>) {
        let text = match result {
            Ok(Some(text)) => text,
            Ok(None) => {
                self.notify(Notification::info("No changes detected"));
                return;
            }
            Err(err) => {
                self.notify(err.notification(JobName::EditScript.label()));
                return;
            }
        };
        let client = self.client.clone();
        let path = edit.path;
        self.dispatcher.run(JobName::EditScript, move |ctx| {
            let change = Alteration::Change {
                name: "script".to_string(),
                value: text,
            };
            client.alter(&path, &change)?;
            ctx.post(move |d| {
                d.notify(Notification::info("Script updated on server"));
                d.confirm = Some(Confirm::Requeue(path));
            });
            Ok(())
        });
    }

    /// Ask before requeueing the selected node.
    pub fn ask_requeue(&mut self) {
        if let Some(path) = self.selected_or_warn() {
            self.dashboard.confirm = Some(Confirm::Requeue(path));
        }
    }

    /// Answer the pending confirmation.
    pub fn resolve_confirm(&mut self, accepted: bool) {
        match self.dashboard.confirm.take() {
            Some(Confirm::Requeue(path)) if accepted => self.command_on(path, CommandVerb::Requeue),
            Some(_) | None => {}
        }
    }
}
