//! UI-thread state and the commands that drive it.
//!
//! [`Dashboard`] is only ever touched on the UI thread, either directly by a
//! [`Monitor`] command or by a closure a background job posted through the
//! dispatcher. [`Monitor`] owns the client handle and starts every job.

use std::sync::Arc;
use std::time::{Duration, Instant};

use time::OffsetDateTime;

use crate::artifacts::{ArtifactCache, TailOutcome};
use crate::dispatch::{Dispatcher, Ticker, UiState};
use crate::error::{Notification, Severity};
use crate::filter::StateFilter;
use crate::model::{ClientConfig, NodePath, ServerState, TreeSnapshot};
use crate::remote::{ArtifactKind, SharedClient};
use crate::tree::DisplayTree;
use crate::variables::VariableSet;

mod commands;
mod content;
mod tree_ops;
mod variable_ops;

pub use self::commands::PendingEdit;

/// Label shown on the server row when the first ping fails.
pub const CONNECTION_FAILED_LABEL: &str = "Connection Failed (Check Host/Port)";

const MAX_NOTIFICATIONS: usize = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connection {
    Connecting,
    Connected,
    Failed,
}

/// Values shown in the status bar.
#[derive(Clone, Debug, Default)]
pub struct StatusInfo {
    pub endpoint: Option<String>,
    pub server_state: Option<ServerState>,
    pub last_sync: Option<OffsetDateTime>,
}

impl StatusInfo {
    pub fn endpoint_label(&self) -> &str {
        self.endpoint.as_deref().unwrap_or("Disconnected")
    }

    pub fn server_label(&self) -> &'static str {
        self.server_state.map(ServerState::label).unwrap_or("Unknown")
    }

    pub fn last_sync_label(&self) -> String {
        match self.last_sync {
            Some(at) => format!("{:02}:{:02}:{:02}", at.hour(), at.minute(), at.second()),
            None => "Never".to_string(),
        }
    }
}

/// Confirmation the UI must ask before acting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Confirm {
    Requeue(NodePath),
}

impl Confirm {
    pub fn prompt(&self) -> String {
        match self {
            Confirm::Requeue(path) => format!("Re-queue {} now?", path),
        }
    }
}

pub struct Dashboard {
    root_label: String,
    snapshot: Option<Arc<TreeSnapshot>>,
    tree: DisplayTree,
    filter: StateFilter,
    artifacts: ArtifactCache,
    active_view: ArtifactKind,
    live: bool,
    last_tail: Option<TailOutcome>,
    variables: Option<VariableSet>,
    status: StatusInfo,
    connection: Connection,
    notifications: Vec<Notification>,
    notified: u64,
    confirm: Option<Confirm>,
    pending_edit: Option<PendingEdit>,
    refresh_requested: bool,
    tree_generation: u64,
}

impl UiState for Dashboard {
    fn notify(&mut self, notification: Notification) {
        match notification.severity {
            Severity::Info => tracing::info!(message = %notification.message, "notify"),
            Severity::Warning => tracing::warn!(message = %notification.message, "notify"),
            Severity::Error => tracing::error!(message = %notification.message, "notify"),
        }
        if self.notifications.len() == MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
        self.notifications.push(notification);
        self.notified += 1;
    }
}

impl Dashboard {
    fn new(root_label: String) -> Self {
        Self {
            tree: DisplayTree::placeholder(&root_label),
            root_label,
            snapshot: None,
            filter: StateFilter::All,
            artifacts: ArtifactCache::new(),
            active_view: ArtifactKind::Output,
            live: false,
            last_tail: None,
            variables: None,
            status: StatusInfo::default(),
            connection: Connection::Connecting,
            notifications: Vec::new(),
            notified: 0,
            confirm: None,
            pending_edit: None,
            refresh_requested: false,
            tree_generation: 0,
        }
    }

    pub fn tree(&self) -> &DisplayTree {
        &self.tree
    }

    pub fn snapshot(&self) -> Option<&TreeSnapshot> {
        self.snapshot.as_deref()
    }

    pub fn filter(&self) -> StateFilter {
        self.filter
    }

    pub fn artifacts(&self) -> &ArtifactCache {
        &self.artifacts
    }

    pub fn active_view(&self) -> ArtifactKind {
        self.active_view
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn last_tail(&self) -> Option<&TailOutcome> {
        self.last_tail.as_ref()
    }

    pub fn variables(&self) -> Option<&VariableSet> {
        self.variables.as_ref()
    }

    pub fn status(&self) -> &StatusInfo {
        &self.status
    }

    pub fn connection(&self) -> Connection {
        self.connection
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    /// Total notifications raised so far, including ones already evicted.
    pub fn notified(&self) -> u64 {
        self.notified
    }

    pub fn confirm(&self) -> Option<&Confirm> {
        self.confirm.as_ref()
    }

    /// Number of display trees installed from a refresh.
    pub fn tree_generation(&self) -> u64 {
        self.tree_generation
    }

    pub fn selected_path(&self) -> Option<&NodePath> {
        self.tree.selected_path()
    }

    /// Drop cached artifacts that belong to a node other than the selected
    /// one.
    fn selection_changed(&mut self) {
        let selected = self.tree.selected_path().cloned();
        if self.artifacts.scope_to(selected.as_ref()) {
            self.last_tail = None;
        }
    }

    fn rebuild_tree(&mut self) {
        if let Some(snapshot) = self.snapshot.as_deref() {
            self.tree =
                DisplayTree::build(snapshot, self.filter, &self.root_label, Some(&self.tree));
        }
        self.selection_changed();
    }

    /// Install a freshly fetched snapshot as one whole-tree replacement.
    fn install_snapshot(&mut self, snapshot: TreeSnapshot) {
        self.status.server_state = Some(snapshot.server_state());
        self.status.last_sync =
            Some(OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc()));
        self.snapshot = Some(Arc::new(snapshot));
        self.rebuild_tree();
        self.tree_generation += 1;
        tracing::debug!(
            rows = self.tree.rows().len(),
            generation = self.tree_generation,
            "tree installed"
        );
    }
}

/// Owns the client handle, the dispatcher and the dashboard; every UI-facing
/// command lives here.
pub struct Monitor {
    client: SharedClient,
    editor: String,
    dispatcher: Dispatcher<Dashboard>,
    dashboard: Dashboard,
    ticker: Ticker,
}

impl Monitor {
    pub fn new(client: SharedClient, config: &ClientConfig) -> Self {
        let endpoint = client.endpoint();
        Self {
            dashboard: Dashboard::new(endpoint),
            client,
            editor: config.editor.clone(),
            dispatcher: Dispatcher::new(),
            ticker: Ticker::new(config.live_interval),
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn editor(&self) -> &str {
        &self.editor
    }

    pub fn is_busy(&self) -> bool {
        !self.dispatcher.is_idle()
    }

    fn notify(&mut self, notification: Notification) {
        self.dashboard.notify(notification);
    }

    fn selected_or_warn(&mut self) -> Option<NodePath> {
        let selected = self.dashboard.selected_path().cloned();
        if selected.is_none() {
            self.notify(Notification::warning("No node selected"));
        }
        selected
    }

    /// Apply posted results, then start whatever they asked for and any
    /// due live-tail tick. Call once per UI loop iteration.
    pub fn pump(&mut self, now: Instant) -> usize {
        let applied = self.dispatcher.drain(&mut self.dashboard);
        self.follow_up();
        self.tick(now);
        applied
    }

    /// Start jobs requested by applied results. Returns `true` if one started.
    fn follow_up(&mut self) -> bool {
        if std::mem::take(&mut self.dashboard.refresh_requested) {
            self.refresh();
            return true;
        }
        false
    }

    /// Block until every current job, and every job their results asked
    /// for, has finished.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !self.dispatcher.wait_idle(&mut self.dashboard, remaining) {
                return false;
            }
            if !self.follow_up() {
                return true;
            }
        }
    }

    /// Like [`wait_idle`](Self::wait_idle) but also waits for superseded
    /// workers to exit.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !self.dispatcher.settle(&mut self.dashboard, remaining) {
                return false;
            }
            if !self.follow_up() {
                return true;
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/monitor_tests.rs"]
mod tests;
