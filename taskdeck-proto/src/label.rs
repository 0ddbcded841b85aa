//! Labels and the set-membership toggle used by label pickers.

use serde::{Deserialize, Serialize};

/// Service-assigned label identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelId(i32);

impl LabelId {
    /// Wraps a raw identifier as returned by the service.
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier used in request paths and bodies.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for LabelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for LabelId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A label as stored by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Unique identifier, assigned by the service.
    pub id: LabelId,
    /// Display name.
    pub name: String,
}

impl Label {
    /// Creates a label value; the id must come from the service.
    pub fn new(id: LabelId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Body of `POST /label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLabelPayload {
    /// Name of the label to create.
    pub name: String,
}

impl NewLabelPayload {
    /// Creates a payload for the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Whether the name is empty once surrounding whitespace is removed.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }
}

/// Adds `candidate` to `selected` if no element shares its id, otherwise
/// removes the element with that id.
///
/// Membership is decided by id alone, so a stale copy of a renamed label
/// still toggles the original entry. Relative order of the remaining
/// elements is preserved and new elements are appended.
#[must_use]
pub fn toggle(selected: &[Label], candidate: &Label) -> Vec<Label> {
    let mut next = selected.to_vec();
    toggle_in_place(&mut next, candidate);
    next
}

/// In-place form of [`toggle`].
pub fn toggle_in_place(selected: &mut Vec<Label>, candidate: &Label) {
    if selected.iter().any(|label| label.id == candidate.id) {
        selected.retain(|label| label.id != candidate.id);
    } else {
        selected.push(candidate.clone());
    }
}

/// Applies [`toggle`] once for each candidate, in order.
///
/// Repeating a candidate cancels it out, the same way clicking a checkbox
/// twice does.
#[must_use]
pub fn toggle_all<'a>(
    selected: &[Label],
    candidates: impl IntoIterator<Item = &'a Label>,
) -> Vec<Label> {
    let mut next = selected.to_vec();
    for candidate in candidates {
        toggle_in_place(&mut next, candidate);
    }
    next
}
