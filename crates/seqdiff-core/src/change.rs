//! Change representation for diff operations

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of change a component records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    /// Content was added
    Insert,
    /// Content was removed
    Delete,
    /// Content is unchanged (context)
    Equal,
}

impl ChangeKind {
    /// Tuple encoding used by [`crate::convert::changes_to_tuples`]:
    /// `1` for insertions, `-1` for deletions, `0` for unchanged content.
    pub fn sign(self) -> i8 {
        match self {
            ChangeKind::Insert => 1,
            ChangeKind::Delete => -1,
            ChangeKind::Equal => 0,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ComponentError {
    #[error("Component cannot be both added and removed")]
    AddedAndRemoved,
}

/// A maximal run of tokens sharing one change classification.
///
/// Serialized as `{ "value": .., "added": true }`, `{ "value": .., "removed": true }`
/// or `{ "value": .. }` for unchanged runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ComponentRepr", try_from = "ComponentRepr")]
pub struct Component {
    /// The joined token text
    pub value: String,
    /// The kind of change
    pub kind: ChangeKind,
}

impl Component {
    pub fn new(kind: ChangeKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn insert(value: impl Into<String>) -> Self {
        Self::new(ChangeKind::Insert, value)
    }

    pub fn delete(value: impl Into<String>) -> Self {
        Self::new(ChangeKind::Delete, value)
    }

    pub fn equal(value: impl Into<String>) -> Self {
        Self::new(ChangeKind::Equal, value)
    }

    pub fn added(&self) -> bool {
        self.kind == ChangeKind::Insert
    }

    pub fn removed(&self) -> bool {
        self.kind == ChangeKind::Delete
    }

    /// Check if this is an actual change (not just context)
    pub fn is_change(&self) -> bool {
        self.kind != ChangeKind::Equal
    }
}

#[derive(Serialize, Deserialize)]
struct ComponentRepr {
    value: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    added: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    removed: bool,
}

impl From<Component> for ComponentRepr {
    fn from(component: Component) -> Self {
        Self {
            added: component.added(),
            removed: component.removed(),
            value: component.value,
        }
    }
}

impl TryFrom<ComponentRepr> for Component {
    type Error = ComponentError;

    fn try_from(repr: ComponentRepr) -> Result<Self, Self::Error> {
        let kind = match (repr.added, repr.removed) {
            (true, true) => return Err(ComponentError::AddedAndRemoved),
            (true, false) => ChangeKind::Insert,
            (false, true) => ChangeKind::Delete,
            (false, false) => ChangeKind::Equal,
        };
        Ok(Component::new(kind, repr.value))
    }
}

/// An ordered list of components transforming one text into another.
pub type EditScript = Vec<Component>;

/// Reconstruct the new text: every component that was not removed.
pub fn new_text(script: &[Component]) -> String {
    script
        .iter()
        .filter(|c| !c.removed())
        .map(|c| c.value.as_str())
        .collect()
}

/// Reconstruct the old text: every component that was not added.
pub fn old_text(script: &[Component]) -> String {
    script
        .iter()
        .filter(|c| !c.added())
        .map(|c| c.value.as_str())
        .collect()
}

/// Insertion and deletion totals for a diff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    /// Number of inserted units (tokens or lines)
    pub insertions: usize,
    /// Number of deleted units (tokens or lines)
    pub deletions: usize,
}

impl DiffStats {
    /// Check whether the diff contains no changes at all
    pub fn is_empty(&self) -> bool {
        self.insertions == 0 && self.deletions == 0
    }
}
