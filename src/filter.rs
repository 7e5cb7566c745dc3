use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::FlowError;
use crate::model::{NodeId, NodeState, TreeSnapshot};

/// Which states the tree is narrowed to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StateFilter {
    #[default]
    All,
    Only(NodeState),
}

/// Order the filter key steps through.
pub const FILTER_CYCLE: [StateFilter; 7] = [
    StateFilter::All,
    StateFilter::Only(NodeState::Aborted),
    StateFilter::Only(NodeState::Active),
    StateFilter::Only(NodeState::Suspended),
    StateFilter::Only(NodeState::Queued),
    StateFilter::Only(NodeState::Submitted),
    StateFilter::Only(NodeState::Complete),
];

impl StateFilter {
    pub fn next(self) -> Self {
        let pos = FILTER_CYCLE.iter().position(|f| *f == self).unwrap_or(0);
        FILTER_CYCLE[(pos + 1) % FILTER_CYCLE.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            StateFilter::All => "all",
            StateFilter::Only(state) => state.as_str(),
        }
    }

    fn matches(self, state: NodeState) -> bool {
        match self {
            StateFilter::All => true,
            StateFilter::Only(wanted) => wanted == state,
        }
    }
}

impl fmt::Display for StateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StateFilter {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" | "none" => Ok(StateFilter::All),
            other => other.parse().map(StateFilter::Only),
        }
    }
}

/// Whether `id` stays visible under `filter`: its own state matches, or any
/// node in its subtree does. Walks children only.
pub fn should_show(snapshot: &TreeSnapshot, id: NodeId, filter: StateFilter) -> bool {
    if filter == StateFilter::All {
        return true;
    }
    filter.matches(snapshot.node(id).state)
        || snapshot
            .children(id)
            .iter()
            .any(|child| should_show(snapshot, *child, filter))
}

/// Every visible node of the snapshot, computed bottom-up in one pass.
pub fn visible_nodes(snapshot: &TreeSnapshot, filter: StateFilter) -> HashSet<NodeId> {
    let mut out = HashSet::with_capacity(snapshot.len());
    for root in snapshot.roots() {
        fold_visible(snapshot, *root, filter, &mut out);
    }
    out
}

fn fold_visible(
    snapshot: &TreeSnapshot,
    id: NodeId,
    filter: StateFilter,
    out: &mut HashSet<NodeId>,
) -> bool {
    // No short-circuit: every child subtree must be folded to record its
    // own visible nodes.
    let mut any_child = false;
    for child in snapshot.children(id) {
        any_child |= fold_visible(snapshot, *child, filter, out);
    }
    let visible = any_child || filter.matches(snapshot.node(id).state);
    if visible {
        out.insert(id);
    }
    visible
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod tests;
