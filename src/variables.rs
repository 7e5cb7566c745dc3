//! Own and inherited variables of one node, and the edit rules over them.

use crate::error::FlowError;
use crate::model::{NodePath, TreeSnapshot};
use crate::remote::Alteration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    Own,
    Inherited,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableEntry {
    pub name: String,
    pub value: String,
    pub origin: Origin,
    /// Node the variable is declared on.
    pub source: NodePath,
}

/// Variables visible at one node, own tier first.
///
/// A name appears at most once per tier but may appear in both when the node
/// overrides an ancestor's value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableSet {
    path: NodePath,
    own: Vec<VariableEntry>,
    inherited: Vec<VariableEntry>,
}

impl VariableSet {
    pub fn load_for(snapshot: &TreeSnapshot, path: &NodePath) -> Result<Self, FlowError> {
        let id = snapshot
            .find(path)
            .ok_or_else(|| FlowError::NodeNotFound(path.clone()))?;
        let node = snapshot.node(id);
        let own = node
            .variables
            .iter()
            .map(|v| VariableEntry {
                name: v.name.clone(),
                value: v.value.clone(),
                origin: Origin::Own,
                source: path.clone(),
            })
            .collect();

        // Nearest ancestor wins when several declare the same name.
        let mut inherited: Vec<VariableEntry> = Vec::new();
        for ancestor in snapshot.ancestors(id) {
            let record = snapshot.node(ancestor);
            for var in &record.variables {
                if inherited.iter().any(|e| e.name == var.name) {
                    continue;
                }
                inherited.push(VariableEntry {
                    name: var.name.clone(),
                    value: var.value.clone(),
                    origin: Origin::Inherited,
                    source: record.path.clone(),
                });
            }
        }

        Ok(Self {
            path: path.clone(),
            own,
            inherited,
        })
    }

    pub fn path(&self) -> &NodePath {
        &self.path
    }

    pub fn own(&self) -> &[VariableEntry] {
        &self.own
    }

    pub fn inherited(&self) -> &[VariableEntry] {
        &self.inherited
    }

    pub fn entries(&self) -> impl Iterator<Item = &VariableEntry> {
        self.own.iter().chain(self.inherited.iter())
    }

    pub fn len(&self) -> usize {
        self.own.len() + self.inherited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Alteration that deletes `name` from this node. Inherited-only names
    /// are refused.
    pub fn delete_request(&self, name: &str) -> Result<Alteration, FlowError> {
        if self.own.iter().any(|e| e.name == name) {
            return Ok(Alteration::DeleteVariable {
                name: name.to_string(),
            });
        }
        if self.inherited.iter().any(|e| e.name == name) {
            return Err(FlowError::Forbidden(
                "Cannot delete inherited variables".to_string(),
            ));
        }
        Err(FlowError::Validation(format!(
            "Variable '{}' is not defined on {}",
            name, self.path
        )))
    }
}

/// Split `name=value` on the first `=`; both sides are trimmed and the name
/// must not be empty.
pub fn parse_assignment(input: &str) -> Result<(String, String), FlowError> {
    match input.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(FlowError::Validation(
            "Use name=value format to add".to_string(),
        )),
    }
}

/// Alteration that adds or updates a variable on the node's own tier.
pub fn submit_request(input: &str) -> Result<Alteration, FlowError> {
    let (name, value) = parse_assignment(input)?;
    Ok(Alteration::AddVariable { name, value })
}

#[cfg(test)]
#[path = "tests/variables_tests.rs"]
mod tests;
