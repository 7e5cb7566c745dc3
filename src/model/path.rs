use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FlowError;

/// Absolute, slash-separated address of a node (`/suite/family/task`).
///
/// Paths are the join key between successive snapshots, so two snapshots that
/// both contain `/s/f` refer to the same logical node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodePath(String);

impl NodePath {
    pub fn parse(raw: &str) -> Result<Self, FlowError> {
        let trimmed = raw.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Err(FlowError::Validation(format!(
                "node path must be absolute: '{}'",
                raw
            )));
        };
        if rest.is_empty() || rest.split('/').any(|seg| seg.is_empty()) {
            return Err(FlowError::Validation(format!(
                "node path has an empty segment: '{}'",
                raw
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Path of a top-level suite.
    pub fn suite(name: &str) -> Self {
        Self(format!("/{}", name))
    }

    pub fn child(&self, name: &str) -> Self {
        Self(format!("{}/{}", self.0, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last segment.
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').skip(1)
    }

    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    pub fn parent(&self) -> Option<NodePath> {
        let idx = self.0.rfind('/')?;
        if idx == 0 {
            return None;
        }
        Some(Self(self.0[..idx].to_string()))
    }

    pub fn is_ancestor_of(&self, other: &NodePath) -> bool {
        other.0.len() > self.0.len()
            && other.0.starts_with(&self.0)
            && other.0.as_bytes()[self.0.len()] == b'/'
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NodePath {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NodePath {
    type Error = FlowError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NodePath> for String {
    fn from(value: NodePath) -> Self {
        value.0
    }
}

#[cfg(test)]
#[path = "../tests/model/path_tests.rs"]
mod tests;
