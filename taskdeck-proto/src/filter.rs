//! Label filter projection over a task collection.

use crate::label::{Label, LabelId};
use crate::task::Task;

/// The active label filter: one label id, or none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LabelFilter(Option<LabelId>);

impl LabelFilter {
    /// No filter; every task is visible.
    pub const NONE: Self = Self(None);

    /// Filter on `id`.
    #[must_use]
    pub const fn only(id: LabelId) -> Self {
        Self(Some(id))
    }

    /// Filter from a side-nav selection, where `None` clears the filter.
    #[must_use]
    pub fn from_selection(label: Option<&Label>) -> Self {
        Self(label.map(|label| label.id))
    }

    /// The filtered label id, if any.
    #[must_use]
    pub const fn label_id(self) -> Option<LabelId> {
        self.0
    }

    /// Whether `task` passes this filter.
    #[must_use]
    pub fn matches(self, task: &Task) -> bool {
        self.0.is_none_or(|id| task.has_label(id))
    }
}

impl From<Option<LabelId>> for LabelFilter {
    fn from(id: Option<LabelId>) -> Self {
        Self(id)
    }
}

/// Tasks visible under `filter`, in collection order.
///
/// With no filter this is the whole collection; otherwise it is the tasks
/// that carry the filtered label.
pub fn visible_tasks(tasks: &[Task], filter: LabelFilter) -> impl Iterator<Item = &Task> {
    tasks.iter().filter(move |task| filter.matches(task))
}
