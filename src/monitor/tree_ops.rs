use crate::dispatch::{JobName, UiState};
use crate::error::{FlowError, Notification};
use crate::filter::StateFilter;
use crate::inspect::WhyReport;
use crate::model::NodePath;
use crate::search::{SearchMode, find_and_select};

use super::{CONNECTION_FAILED_LABEL, Connection, Monitor};

impl Monitor {
    /// Ping the server, then refresh. A failed ping leaves the server row
    /// marked as a connection failure and never starts live ticks.
    pub fn connect(&mut self) {
        let client = self.client.clone();
        self.dispatcher.run(JobName::Connect, move |ctx| {
            match client.ping() {
                Ok(()) => {
                    let endpoint = client.endpoint();
                    tracing::info!(%endpoint, "connected");
                    ctx.post(move |d| {
                        d.connection = Connection::Connected;
                        d.status.endpoint = Some(endpoint);
                        d.refresh_requested = true;
                    });
                }
                Err(err) => {
                    tracing::warn!(error = %err, "connection failed");
                    ctx.post(move |d| {
                        d.connection = Connection::Failed;
                        d.status.endpoint = None;
                        d.tree.set_root_label(CONNECTION_FAILED_LABEL);
                        d.notify(Notification::error(format!("Connection Failed: {}", err)));
                    });
                }
            }
            Ok(())
        });
    }

    /// Sync and fetch definitions in the background, then replace the tree.
    /// On failure the displayed tree stays as it was.
    pub fn refresh(&mut self) {
        let client = self.client.clone();
        self.dispatcher.run(JobName::Refresh, move |ctx| {
            client.sync()?;
            let snapshot = client.fetch_definitions()?;
            tracing::debug!(nodes = snapshot.len(), "definitions fetched");
            ctx.post(move |d| {
                d.install_snapshot(snapshot);
                d.notify(Notification::info("Tree Refreshed"));
            });
            Ok(())
        });
    }

    /// Step to the next state filter and rebuild from the held snapshot.
    pub fn cycle_filter(&mut self) {
        let next = self.dashboard.filter.next();
        self.set_filter(next);
        self.notify(Notification::info(format!("Filter: {}", next)));
    }

    pub fn set_filter(&mut self, filter: StateFilter) {
        self.dashboard.filter = filter;
        self.dashboard.rebuild_tree();
    }

    pub fn move_down(&mut self) {
        self.dashboard.tree.move_down();
        self.dashboard.selection_changed();
    }

    pub fn move_up(&mut self) {
        self.dashboard.tree.move_up();
        self.dashboard.selection_changed();
    }

    pub fn toggle_collapse(&mut self) {
        self.dashboard.tree.toggle_collapse();
    }

    pub fn select_path(&mut self, path: &NodePath) -> bool {
        let found = self.dashboard.tree.select_path(path);
        self.dashboard.selection_changed();
        found
    }

    /// Jump to the first match of `query` as it is being typed. A miss
    /// warns like a submit does; an empty query is silent.
    pub fn search_typed(&mut self, query: &str) -> bool {
        let found = find_and_select(&mut self.dashboard.tree, query, SearchMode::Incremental);
        if found {
            self.dashboard.selection_changed();
        } else if !query.trim().is_empty() {
            self.notify(Notification::warning(format!("No match found for '{}'", query)));
        }
        found
    }

    /// Advance to the next match after the current row, wrapping around.
    pub fn search_submit(&mut self, query: &str) -> bool {
        if query.trim().is_empty() {
            return false;
        }
        let found = find_and_select(&mut self.dashboard.tree, query, SearchMode::Advance);
        if found {
            self.dashboard.selection_changed();
        } else {
            self.notify(Notification::warning(format!("No match found for '{}'", query)));
        }
        found
    }

    /// State report for the selected node from the held snapshot.
    pub fn why(&mut self) -> Option<WhyReport> {
        let path = self.selected_or_warn()?;
        let report = match self.dashboard.snapshot() {
            Some(snapshot) => WhyReport::explain(snapshot, &path),
            None => Err(FlowError::NodeNotFound(path)),
        };
        match report {
            Ok(report) => Some(report),
            Err(err) => {
                self.notify(err.notification("Why"));
                None
            }
        }
    }
}
