use std::time::Instant;

use crate::artifacts::{ArtifactCache, Pane};
use crate::dispatch::{JobName, UiState};
use crate::error::{FlowError, Notification};
use crate::remote::ArtifactKind;

use super::{Connection, Monitor};

impl Monitor {
    /// Fetch all three artifacts of the selected node. Each kind is fetched
    /// on its own; a missing one only affects its pane.
    pub fn load_node(&mut self) {
        let Some(path) = self.selected_or_warn() else {
            return;
        };
        self.notify(Notification::info(format!("Loading files for {}...", path)));
        let client = self.client.clone();
        self.dispatcher.run(JobName::LoadNode, move |ctx| {
            let mut first_failure: Option<FlowError> = None;
            let panes = ArtifactKind::ALL.map(|kind| {
                let result = client.fetch_file(&path, kind);
                if let Err(err) = &result {
                    if !matches!(err, FlowError::ArtifactNotFound { .. }) && first_failure.is_none() {
                        first_failure = Some(err.clone());
                    }
                }
                Pane::from_fetch(kind, result)
            });
            let loaded = ArtifactCache::loaded(path.clone(), panes);
            ctx.post(move |d| {
                if d.tree.selected_path() != Some(&path) {
                    tracing::debug!(%path, "selection moved during load, dropping");
                    return;
                }
                d.artifacts = loaded;
                d.last_tail = None;
            });
            // Missing files stay inline; anything else is also toasted.
            match first_failure {
                Some(err) => Err(err),
                None => Ok(()),
            }
        });
    }

    pub fn set_active_view(&mut self, kind: ArtifactKind) {
        self.dashboard.active_view = kind;
    }

    pub fn toggle_live(&mut self, now: Instant) {
        let live = !self.dashboard.live;
        self.dashboard.live = live;
        if live {
            self.dashboard.active_view = ArtifactKind::Output;
            self.ticker.enable(now);
        } else {
            self.ticker.disable();
        }
        let state = if live { "ON" } else { "OFF" };
        self.notify(Notification::info(format!("Live Log: {}", state)));
    }

    /// Start a live-tail fetch if one is due. Skipped while the previous
    /// fetch is still in flight.
    pub fn tick(&mut self, now: Instant) {
        if !self.ticker.due(now) {
            return;
        }
        let d = &self.dashboard;
        if !d.live || d.active_view != ArtifactKind::Output || d.connection != Connection::Connected
        {
            return;
        }
        let Some(path) = d.tree.selected_path().cloned() else {
            return;
        };
        let client = self.client.clone();
        self.dispatcher.run_if_idle(JobName::LiveTail, move |ctx| {
            let text = match client.fetch_file(&path, ArtifactKind::Output) {
                Ok(text) => text,
                Err(FlowError::ArtifactNotFound { .. }) => return Ok(()),
                Err(err) => return Err(err),
            };
            ctx.post(move |d| {
                let outcome = d.artifacts.apply_tail(&path, text);
                tracing::trace!(%path, ?outcome, "live tail");
                d.last_tail = Some(outcome);
            });
            Ok(())
        });
    }

    /// Count occurrences of `query` in the active pane.
    pub fn search_content(&mut self, query: &str) -> usize {
        if query.is_empty() {
            return 0;
        }
        let kind = self.dashboard.active_view;
        let count = self.dashboard.artifacts.count_matches(kind, query);
        let notification = if count == 0 {
            Notification::warning(format!("No matches for '{}' in {}", query, kind))
        } else {
            Notification::info(format!("Found {} matches for '{}' in {}", count, query, kind))
        };
        self.dashboard.notify(notification);
        count
    }
}
