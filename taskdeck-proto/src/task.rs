//! Tasks and the request bodies used to create and patch them.

use serde::{Deserialize, Serialize};

use crate::label::{Label, LabelId};

/// Service-assigned task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i32);

impl TaskId {
    /// Wraps a raw identifier as returned by the service.
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier used in request paths.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A task as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, assigned by the service.
    pub id: TaskId,
    /// Task text.
    pub text: String,
    /// Completion flag (`false` on creation).
    pub completed: bool,
    /// Attached labels, in the order the service returned them.
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl Task {
    /// Creates an uncompleted task with no labels.
    pub fn new(id: TaskId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            labels: Vec::new(),
        }
    }

    /// Returns a copy of this task carrying `labels`.
    #[must_use]
    pub fn with_labels(mut self, labels: Vec<Label>) -> Self {
        self.labels = labels;
        self
    }

    /// Whether a label with `id` is attached.
    #[must_use]
    pub fn has_label(&self, id: LabelId) -> bool {
        self.labels.iter().any(|label| label.id == id)
    }

    /// Ids of the attached labels, in order.
    #[must_use]
    pub fn label_ids(&self) -> Vec<LabelId> {
        self.labels.iter().map(|label| label.id).collect()
    }
}

/// Body of `POST /task`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTaskPayload {
    /// Text of the new task.
    pub text: String,
    /// Labels to attach at creation time.
    pub labels: Vec<LabelId>,
}

impl NewTaskPayload {
    /// Creates a payload with explicit label ids.
    pub fn new(text: impl Into<String>, labels: Vec<LabelId>) -> Self {
        Self {
            text: text.into(),
            labels,
        }
    }

    /// Creates a payload from a label picker selection.
    pub fn from_selection(text: impl Into<String>, selection: &[Label]) -> Self {
        Self::new(text, selection.iter().map(|label| label.id).collect())
    }

    /// Whether the text is empty once surrounding whitespace is removed.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Partial patch sent as the body of `PATCH /task/{id}`.
///
/// Only the fields that are `Some` are serialized. The id addresses the
/// request and never appears in the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateTaskPayload {
    /// Task being patched.
    #[serde(skip)]
    pub id: TaskId,
    /// Replacement text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Replacement completion flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    /// Replacement label set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<LabelId>>,
}

impl UpdateTaskPayload {
    /// An empty patch for `id`.
    #[must_use]
    pub const fn new(id: TaskId) -> Self {
        Self {
            id,
            text: None,
            completed: None,
            labels: None,
        }
    }

    /// Sets the replacement text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the replacement completion flag.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Sets the replacement label set.
    #[must_use]
    pub fn with_labels(mut self, labels: Vec<LabelId>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Patch flipping the completion checkbox of `task`.
    ///
    /// The current label ids ride along so the service keeps them.
    #[must_use]
    pub fn toggle_completed(task: &Task) -> Self {
        Self::new(task.id)
            .with_completed(!task.completed)
            .with_labels(task.label_ids())
    }

    /// Patch submitted when an edit dialog closes: new text and label
    /// selection, current completion flag.
    #[must_use]
    pub fn edit(task: &Task, text: impl Into<String>, selection: &[Label]) -> Self {
        Self::new(task.id)
            .with_text(text)
            .with_completed(task.completed)
            .with_labels(selection.iter().map(|label| label.id).collect())
    }

    /// Whether the patch carries no fields at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none() && self.labels.is_none()
    }
}
