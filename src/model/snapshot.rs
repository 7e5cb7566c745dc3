use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::FlowError;

use super::{Definitions, NodeDef, NodeKind, NodePath, NodeState, ServerState};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub value: String,
}

/// Index of a node inside one [`TreeSnapshot`]; meaningless across snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Clone, Debug)]
pub struct NodeRecord {
    pub path: NodePath,
    pub kind: NodeKind,
    pub state: NodeState,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub variables: Vec<Variable>,
    pub trigger: Option<String>,
    pub complete: Option<String>,
}

impl NodeRecord {
    pub fn name(&self) -> &str {
        self.path.name()
    }
}

/// Immutable arena built from one fetch of the definition graph.
///
/// Suites are roots; children are stored in declaration order. Parent links
/// are plain indices and only used for variable inheritance and inspection.
#[derive(Clone, Debug, Default)]
pub struct TreeSnapshot {
    nodes: Vec<NodeRecord>,
    roots: Vec<NodeId>,
    index: HashMap<NodePath, NodeId>,
    server_state: ServerState,
}

impl TreeSnapshot {
    pub fn from_definitions(defs: &Definitions) -> Result<Self, FlowError> {
        let mut snapshot = TreeSnapshot {
            server_state: defs.server_state,
            ..TreeSnapshot::default()
        };
        for suite in &defs.suites {
            validate_name(&suite.name)?;
            let id = snapshot.insert(suite, NodePath::suite(&suite.name), None)?;
            snapshot.roots.push(id);
        }
        Ok(snapshot)
    }

    fn insert(
        &mut self,
        def: &NodeDef,
        path: NodePath,
        parent: Option<NodeId>,
    ) -> Result<NodeId, FlowError> {
        if self.index.contains_key(&path) {
            return Err(FlowError::Connectivity {
                operation: "fetch definitions".to_string(),
                message: format!("duplicate node path {}", path),
            });
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeRecord {
            path: path.clone(),
            kind: def.kind,
            state: def.state,
            parent,
            children: Vec::with_capacity(def.children.len()),
            variables: def.variables.clone(),
            trigger: def.trigger.clone(),
            complete: def.complete.clone(),
        });
        self.index.insert(path.clone(), id);

        for child in &def.children {
            validate_name(&child.name)?;
            let child_id = self.insert(child, path.child(&child.name), Some(id))?;
            self.nodes[id.0].children.push(child_id);
        }
        Ok(id)
    }

    pub fn server_state(&self) -> ServerState {
        self.server_state
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &NodeRecord {
        &self.nodes[id.0]
    }

    pub fn find(&self, path: &NodePath) -> Option<NodeId> {
        self.index.get(path).copied()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Parent first, then grandparent, up to the suite.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.nodes[id.0].parent, move |p| self.nodes[p.0].parent)
    }

    /// Every node below `id` (excluding `id`) in pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn validate_name(name: &str) -> Result<(), FlowError> {
    if name.is_empty() || name.contains('/') {
        return Err(FlowError::Connectivity {
            operation: "fetch definitions".to_string(),
            message: format!("invalid node name '{}'", name),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/model/snapshot_tests.rs"]
mod tests;
