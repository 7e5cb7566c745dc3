use crate::dispatch::{JobContext, JobName, UiState};
use crate::error::{FlowError, Notification};
use crate::model::NodePath;
use crate::remote::{Alteration, SharedClient};
use crate::variables::{VariableSet, submit_request};

use super::{Dashboard, Monitor};

impl Monitor {
    /// Load variables of the selected node from a fresh sync.
    pub fn open_variables(&mut self) {
        if let Some(path) = self.selected_or_warn() {
            self.load_variables(path);
        }
    }

    pub fn load_variables(&mut self, path: NodePath) {
        let client = self.client.clone();
        self.dispatcher.run(JobName::Variables, move |ctx| {
            reload(&client, &path, ctx)
        });
    }

    pub fn close_variables(&mut self) {
        self.dashboard.variables = None;
    }

    /// Add or update `name=value` on the open node. Malformed input never
    /// reaches the server.
    pub fn submit_variable(&mut self, input: &str) {
        let Some(path) = self.variables_path() else {
            return;
        };
        let input = input.to_string();
        let client = self.client.clone();
        self.dispatcher.run(JobName::Variables, move |ctx| {
            let alteration = submit_request(&input)?;
            alter_and_reload(&client, &path, &alteration, ctx)
        });
    }

    /// Delete an own variable of the open node. Inherited-only names are
    /// refused without a server call.
    pub fn delete_variable(&mut self, name: &str) {
        let Some(set) = self.dashboard.variables.clone() else {
            self.notify(Notification::warning("No node selected"));
            return;
        };
        let name = name.to_string();
        let client = self.client.clone();
        self.dispatcher.run(JobName::Variables, move |ctx| {
            let alteration = set.delete_request(&name)?;
            alter_and_reload(&client, set.path(), &alteration, ctx)
        });
    }

    fn variables_path(&mut self) -> Option<NodePath> {
        let path = self.dashboard.variables.as_ref().map(|set| set.path().clone());
        if path.is_none() {
            self.notify(Notification::warning("No node selected"));
        }
        path
    }
}

fn alter_and_reload(
    client: &SharedClient,
    path: &NodePath,
    alteration: &Alteration,
    ctx: &JobContext<Dashboard>,
) -> Result<(), FlowError> {
    client.alter(path, alteration)?;
    tracing::info!(%path, action = %alteration.action(), "variables altered");
    let message = match alteration {
        Alteration::DeleteVariable { name } => format!("Deleted {}", name),
        other => format!("Set {}", other.name()),
    };
    ctx.post(move |d| d.notify(Notification::info(message)));
    reload(client, path, ctx)
}

fn reload(
    client: &SharedClient,
    path: &NodePath,
    ctx: &JobContext<Dashboard>,
) -> Result<(), FlowError> {
    client.sync()?;
    let snapshot = client.fetch_definitions()?;
    let set = VariableSet::load_for(&snapshot, path)?;
    ctx.post(move |d| d.variables = Some(set));
    Ok(())
}
