use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::error::FlowError;
use crate::model::{
    Definitions, NodeDef, NodeKind, NodePath, NodeState, TreeSnapshot, Variable,
};

use super::{Alteration, ArtifactKind, CommandVerb, WorkflowClient};

/// Command error detail for a path that names no node.
pub const NO_SUCH_NODE: &str = "no such node";

/// Seed file accepted by `flowtop-server --defs`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WorkflowSeed {
    #[serde(flatten)]
    pub definitions: Definitions,
    #[serde(default)]
    pub files: HashMap<NodePath, HashMap<ArtifactKind, String>>,
}

/// Authoritative workflow state with the server's command semantics.
///
/// Backs both the development server and the in-process demo client.
#[derive(Clone, Debug, Default)]
pub struct MemoryWorkflow {
    defs: Definitions,
    files: HashMap<NodePath, HashMap<ArtifactKind, String>>,
    // State a node had before `suspend`, restored by `resume`.
    suspended_from: HashMap<NodePath, NodeState>,
}

impl MemoryWorkflow {
    pub fn new(seed: WorkflowSeed) -> Result<Self, FlowError> {
        // Reject seeds that would not survive snapshot validation.
        TreeSnapshot::from_definitions(&seed.definitions)?;
        Ok(Self {
            defs: seed.definitions,
            files: seed.files,
            suspended_from: HashMap::new(),
        })
    }

    pub fn definitions(&self) -> &Definitions {
        &self.defs
    }

    fn node_mut(&mut self, path: &NodePath, action: &str) -> Result<&mut NodeDef, FlowError> {
        self.defs
            .find_mut(path)
            .ok_or_else(|| FlowError::command(path, action, NO_SUCH_NODE))
    }

    pub fn file(&self, path: &NodePath, kind: ArtifactKind) -> Result<String, FlowError> {
        self.files
            .get(path)
            .and_then(|by_kind| by_kind.get(&kind))
            .cloned()
            .ok_or_else(|| FlowError::ArtifactNotFound {
                path: path.clone(),
                kind,
                message: format!("no {} file", kind),
            })
    }

    pub fn set_file(&mut self, path: &NodePath, kind: ArtifactKind, text: impl Into<String>) {
        self.files
            .entry(path.clone())
            .or_default()
            .insert(kind, text.into());
    }

    pub fn append_output(&mut self, path: &NodePath, line: &str) {
        let out = self
            .files
            .entry(path.clone())
            .or_default()
            .entry(ArtifactKind::Output)
            .or_default();
        out.push_str(line);
        out.push('\n');
    }

    pub fn apply(&mut self, path: &NodePath, verb: CommandVerb) -> Result<(), FlowError> {
        let action = verb.as_str();
        match verb {
            CommandVerb::Suspend => {
                let node = self.node_mut(path, action)?;
                if node.state != NodeState::Suspended {
                    let prior = node.state;
                    node.state = NodeState::Suspended;
                    self.suspended_from.insert(path.clone(), prior);
                }
            }
            CommandVerb::Resume => {
                let prior = self
                    .suspended_from
                    .get(path)
                    .copied()
                    .unwrap_or(NodeState::Queued);
                let node = self.node_mut(path, action)?;
                if node.state != NodeState::Suspended {
                    return Err(FlowError::command(path, action, "node is not suspended"));
                }
                node.state = prior;
                self.suspended_from.remove(path);
            }
            CommandVerb::Kill => {
                let node = self.node_mut(path, action)?;
                match node.state {
                    NodeState::Active | NodeState::Submitted => node.state = NodeState::Aborted,
                    other => {
                        return Err(FlowError::command(
                            path,
                            action,
                            format!("cannot kill a node that is {}", other),
                        ));
                    }
                }
            }
            CommandVerb::ForceComplete => self.set_subtree(path, action, NodeState::Complete)?,
            CommandVerb::Requeue => self.set_subtree(path, action, NodeState::Queued)?,
        }
        tracing::debug!(path = %path, verb = action, "applied command");
        Ok(())
    }

    fn set_subtree(
        &mut self,
        path: &NodePath,
        action: &str,
        state: NodeState,
    ) -> Result<(), FlowError> {
        self.node_mut(path, action)?
            .for_each_mut(&mut |node: &mut NodeDef| node.state = state);
        self.suspended_from
            .retain(|p, _| p != path && !path.is_ancestor_of(p));
        Ok(())
    }

    pub fn alter(&mut self, path: &NodePath, alteration: &Alteration) -> Result<(), FlowError> {
        let action = alteration.action();
        match alteration {
            Alteration::AddVariable { name, value } => {
                let node = self.node_mut(path, &action)?;
                match node.variables.iter_mut().find(|v| &v.name == name) {
                    Some(existing) => existing.value = value.clone(),
                    None => node.variables.push(Variable {
                        name: name.clone(),
                        value: value.clone(),
                    }),
                }
            }
            Alteration::DeleteVariable { name } => {
                let node = self.node_mut(path, &action)?;
                let before = node.variables.len();
                node.variables.retain(|v| &v.name != name);
                if node.variables.len() == before {
                    return Err(FlowError::command(
                        path,
                        &action,
                        format!("variable {} is not defined here", name),
                    ));
                }
            }
            Alteration::Change { name, value } if name == "script" => {
                self.node_mut(path, &action)?;
                self.set_file(path, ArtifactKind::Script, value.clone());
            }
            Alteration::Change { name, value } => {
                let node = self.node_mut(path, &action)?;
                match name.as_str() {
                    "trigger" => node.trigger = Some(value.clone()),
                    "complete" => node.complete = Some(value.clone()),
                    _ => match node.variables.iter_mut().find(|v| &v.name == name) {
                        Some(existing) => existing.value = value.clone(),
                        None => {
                            return Err(FlowError::command(
                                path,
                                &action,
                                format!("unknown attribute {}", name),
                            ));
                        }
                    },
                }
            }
        }
        Ok(())
    }

    /// Append one line to the output of every active task. Returns how many
    /// logs grew.
    pub fn grow_active_logs(&mut self, tick: u64) -> usize {
        let mut active = Vec::new();
        for suite in &self.defs.suites {
            collect_active(suite, NodePath::suite(&suite.name), &mut active);
        }
        for path in &active {
            self.append_output(path, &format!("[tick {}] {} still running", tick, path.name()));
        }
        active.len()
    }
}

fn collect_active(node: &NodeDef, path: NodePath, out: &mut Vec<NodePath>) {
    if node.kind == NodeKind::Task && node.state == NodeState::Active {
        out.push(path.clone());
    }
    for child in &node.children {
        collect_active(child, path.child(&child.name), out);
    }
}

/// In-process [`WorkflowClient`] over a [`MemoryWorkflow`].
pub struct MemoryClient {
    label: String,
    workflow: Mutex<MemoryWorkflow>,
    working_copy: Mutex<Option<Definitions>>,
}

impl MemoryClient {
    pub fn new(label: impl Into<String>, workflow: MemoryWorkflow) -> Self {
        Self {
            label: label.into(),
            workflow: Mutex::new(workflow),
            working_copy: Mutex::new(None),
        }
    }

    pub fn demo() -> Result<Self, FlowError> {
        Ok(Self::new("demo", MemoryWorkflow::new(super::demo_seed())?))
    }

    /// Direct access to the server-side state, e.g. to grow a log.
    pub fn workflow(&self) -> MutexGuard<'_, MemoryWorkflow> {
        self.workflow
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl WorkflowClient for MemoryClient {
    fn endpoint(&self) -> String {
        self.label.clone()
    }

    fn ping(&self) -> Result<(), FlowError> {
        Ok(())
    }

    fn sync(&self) -> Result<(), FlowError> {
        let defs = self.workflow().definitions().clone();
        *self
            .working_copy
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(defs);
        Ok(())
    }

    fn fetch_definitions(&self) -> Result<TreeSnapshot, FlowError> {
        let guard = self
            .working_copy
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match guard.as_ref() {
            Some(defs) => TreeSnapshot::from_definitions(defs),
            None => Err(FlowError::connectivity(
                "fetch definitions",
                "no local copy yet (sync first)",
            )),
        }
    }

    fn fetch_file(&self, path: &NodePath, kind: ArtifactKind) -> Result<String, FlowError> {
        self.workflow().file(path, kind)
    }

    fn mutate(&self, path: &NodePath, verb: CommandVerb) -> Result<(), FlowError> {
        self.workflow().apply(path, verb)
    }

    fn alter(&self, path: &NodePath, alteration: &Alteration) -> Result<(), FlowError> {
        self.workflow().alter(path, alteration)
    }
}

#[cfg(test)]
#[path = "../tests/remote/memory_tests.rs"]
mod tests;
