//! "Why is this node in this state" report, computed from the held snapshot.

use crate::error::FlowError;
use crate::model::{NodeKind, NodePath, NodeState, TreeSnapshot};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WhyReport {
    pub path: NodePath,
    pub kind: NodeKind,
    pub state: NodeState,
    pub trigger: Option<String>,
    pub complete: Option<String>,
    /// Suspended ancestors, nearest first.
    pub suspended_ancestors: Vec<NodePath>,
    /// Descendant count per state, only states that occur, in
    /// [`NodeState::ALL`] order.
    pub descendant_states: Vec<(NodeState, usize)>,
}

impl WhyReport {
    pub fn explain(snapshot: &TreeSnapshot, path: &NodePath) -> Result<Self, FlowError> {
        let id = snapshot
            .find(path)
            .ok_or_else(|| FlowError::NodeNotFound(path.clone()))?;
        let node = snapshot.node(id);

        let suspended_ancestors = snapshot
            .ancestors(id)
            .map(|a| snapshot.node(a))
            .filter(|a| a.state == NodeState::Suspended)
            .map(|a| a.path.clone())
            .collect();

        let mut counts = [0usize; NodeState::ALL.len()];
        for child in snapshot.descendants(id) {
            let state = snapshot.node(child).state;
            if let Some(slot) = NodeState::ALL.iter().position(|s| *s == state) {
                counts[slot] += 1;
            }
        }
        let descendant_states = NodeState::ALL
            .into_iter()
            .zip(counts)
            .filter(|(_, n)| *n > 0)
            .collect();

        Ok(Self {
            path: path.clone(),
            kind: node.kind,
            state: node.state,
            trigger: node.trigger.clone(),
            complete: node.complete.clone(),
            suspended_ancestors,
            descendant_states,
        })
    }

    /// Plain-text reasons, most relevant first.
    pub fn reasons(&self) -> Vec<String> {
        let mut out = Vec::new();
        for ancestor in &self.suspended_ancestors {
            out.push(format!("Held: ancestor {} is suspended", ancestor));
        }
        match self.state {
            NodeState::Suspended => out.push("Node is suspended; resume it to continue".to_string()),
            NodeState::Aborted => {
                out.push("Task aborted; requeue or force complete to continue".to_string())
            }
            NodeState::Active => out.push("Job is running".to_string()),
            NodeState::Submitted => out.push("Job submitted, waiting for it to start".to_string()),
            NodeState::Complete => out.push("Node is complete".to_string()),
            NodeState::Queued => match &self.trigger {
                Some(expr) => out.push(format!("Waiting for trigger: {}", expr)),
                None if self.suspended_ancestors.is_empty() => {
                    out.push("Queued with no trigger; waiting for the scheduler".to_string())
                }
                None => {}
            },
            NodeState::Unknown => out.push("State is unknown to the server".to_string()),
        }
        for (state, n) in &self.descendant_states {
            if matches!(state, NodeState::Aborted | NodeState::Suspended) {
                out.push(format!("{} {} below", n, state));
            }
        }
        out
    }

    /// Full report as display lines.
    pub fn lines(&self) -> Vec<String> {
        let mut out = vec![
            format!("Node:     {}", self.path),
            format!("Kind:     {}", self.kind.as_str()),
            format!("State:    {} {}", self.state.glyph(), self.state),
            format!("Trigger:  {}", self.trigger.as_deref().unwrap_or("-")),
            format!("Complete: {}", self.complete.as_deref().unwrap_or("-")),
        ];
        if !self.descendant_states.is_empty() {
            let summary: Vec<String> = self
                .descendant_states
                .iter()
                .map(|(state, n)| format!("{} {}", n, state))
                .collect();
            out.push(format!("Below:    {}", summary.join(", ")));
        }
        out.push(String::new());
        out.extend(self.reasons().into_iter().map(|r| format!("- {}", r)));
        out
    }
}

#[cfg(test)]
#[path = "tests/inspect_tests.rs"]
mod tests;
