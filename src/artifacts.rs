//! Per-node cache of the output, script and job texts.

use crate::error::FlowError;
use crate::model::NodePath;
use crate::remote::ArtifactKind;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Pane {
    /// Nothing fetched yet for the current node.
    #[default]
    Empty,
    Text(String),
    /// Inline message shown in place of the text.
    Unavailable(String),
}

impl Pane {
    pub fn text(&self) -> Option<&str> {
        match self {
            Pane::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Pane for one fetch result. Missing files are expected and never
    /// escalate past the pane.
    pub fn from_fetch(kind: ArtifactKind, result: Result<String, FlowError>) -> Self {
        match result {
            Ok(text) => Pane::Text(text),
            Err(FlowError::ArtifactNotFound { .. }) => Pane::Unavailable(missing_message(kind)),
            Err(err) => Pane::Unavailable(format!("{} not available: {}", kind.title(), err)),
        }
    }
}

pub fn missing_message(kind: ArtifactKind) -> String {
    match kind {
        ArtifactKind::Output => "Output not found (has the task run yet?)".to_string(),
        other => format!("{} not available.", other.title()),
    }
}

/// What a live-tail fetch did to the output pane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TailOutcome {
    /// Cached text was a prefix of the new text; carries only the new suffix.
    Appended(String),
    Replaced,
    Unchanged,
    /// Fetched for a node that is no longer the cache owner.
    Stale,
}

/// Cached artifact texts for exactly one node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArtifactCache {
    owner: Option<NodePath>,
    panes: [Pane; 3],
}

impl ArtifactCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fully loaded cache for `path`, one pane per kind in [`ArtifactKind::ALL`]
    /// order.
    pub fn loaded(path: NodePath, panes: [Pane; 3]) -> Self {
        Self {
            owner: Some(path),
            panes,
        }
    }

    pub fn owner(&self) -> Option<&NodePath> {
        self.owner.as_ref()
    }

    pub fn pane(&self, kind: ArtifactKind) -> &Pane {
        &self.panes[kind.index()]
    }

    pub fn text(&self, kind: ArtifactKind) -> Option<&str> {
        self.pane(kind).text()
    }

    /// Clear everything unless the cache already belongs to `path`.
    /// Returns `true` when it was cleared.
    pub fn scope_to(&mut self, path: Option<&NodePath>) -> bool {
        if self.owner.as_ref() == path {
            return false;
        }
        *self = Self {
            owner: path.cloned(),
            panes: Default::default(),
        };
        true
    }

    /// Apply a freshly fetched output log for `path`.
    ///
    /// Appends when the cached text is a strict prefix of `fetched`;
    /// anything else (rotation, truncation, nothing cached) replaces.
    pub fn apply_tail(&mut self, path: &NodePath, fetched: String) -> TailOutcome {
        if self.owner.as_ref() != Some(path) {
            return TailOutcome::Stale;
        }
        let slot = &mut self.panes[ArtifactKind::Output.index()];
        let prefix_len = match &*slot {
            Pane::Text(cached) if *cached == fetched => return TailOutcome::Unchanged,
            Pane::Text(cached) if !cached.is_empty() && fetched.starts_with(cached.as_str()) => {
                Some(cached.len())
            }
            _ => None,
        };
        let outcome = match prefix_len {
            Some(len) => TailOutcome::Appended(fetched[len..].to_string()),
            None => TailOutcome::Replaced,
        };
        *slot = Pane::Text(fetched);
        outcome
    }

    /// Case-sensitive occurrence count of `query` in the pane's text.
    pub fn count_matches(&self, kind: ArtifactKind, query: &str) -> usize {
        match self.text(kind) {
            Some(text) if !query.is_empty() => text.matches(query).count(),
            _ => 0,
        }
    }
}

#[cfg(test)]
#[path = "tests/artifacts_tests.rs"]
mod tests;
