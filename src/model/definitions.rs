use serde::{Deserialize, Serialize};

use super::{NodeKind, NodeState, ServerState, Variable};

/// Wire form of the server's definition graph, as returned by `GET /defs`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definitions {
    #[serde(default)]
    pub server_state: ServerState,
    #[serde(default)]
    pub suites: Vec<NodeDef>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDef {
    pub name: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub state: NodeState,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete: Option<String>,
    #[serde(default)]
    pub children: Vec<NodeDef>,
}

impl NodeDef {
    pub fn new(name: impl Into<String>, kind: NodeKind, state: NodeState) -> Self {
        Self {
            name: name.into(),
            kind,
            state,
            variables: Vec::new(),
            trigger: None,
            complete: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<NodeDef>) -> Self {
        self.children = children;
        self
    }

    pub fn with_variable(mut self, name: &str, value: &str) -> Self {
        self.variables.push(Variable {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn with_trigger(mut self, expr: &str) -> Self {
        self.trigger = Some(expr.to_string());
        self
    }

    /// Resolves `segments` (path without the suite prefix) below this node.
    pub fn descend_mut<'a>(
        &mut self,
        mut segments: impl Iterator<Item = &'a str>,
    ) -> Option<&mut NodeDef> {
        match segments.next() {
            None => Some(self),
            Some(seg) => self
                .children
                .iter_mut()
                .find(|c| c.name == seg)?
                .descend_mut(segments),
        }
    }

    pub fn for_each_mut(&mut self, f: &mut impl FnMut(&mut NodeDef)) {
        f(self);
        for child in &mut self.children {
            child.for_each_mut(f);
        }
    }
}

impl Definitions {
    pub fn find_mut(&mut self, path: &super::NodePath) -> Option<&mut NodeDef> {
        let mut segments = path.segments();
        let suite = segments.next()?;
        self.suites
            .iter_mut()
            .find(|s| s.name == suite)?
            .descend_mut(segments)
    }
}
