//! Presentation layer: intents going in, text coming out.
//!
//! The renderer only reads an [`AppView`]; it never talks to the service.
//! User actions are expressed as [`Intent`] values and handed to
//! [`Controller::dispatch`](crate::controller::Controller::dispatch).

pub mod sidebar;
pub mod task_panel;

use std::io::{self, Write};

use taskdeck_proto::label::{Label, LabelId, NewLabelPayload};
use taskdeck_proto::task::{NewTaskPayload, TaskId, UpdateTaskPayload};

use crate::store::AppView;

/// A user action emitted by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// New task form submitted.
    Submit(NewTaskPayload),
    /// Completion checkbox flipped or edit dialog closed.
    Update(UpdateTaskPayload),
    /// Delete button on a task.
    Delete(TaskId),
    /// Label picked in the side list, or `None` for "all".
    SelectLabel(Option<Label>),
    /// New label form submitted.
    SubmitNewLabel(NewLabelPayload),
    /// Delete button on a label.
    DeleteLabel(LabelId),
}

impl Intent {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Submit(_) => "submit",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
            Self::SelectLabel(_) => "select_label",
            Self::SubmitNewLabel(_) => "submit_new_label",
            Self::DeleteLabel(_) => "delete_label",
        }
    }
}

/// Render the label list followed by the visible tasks.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn render(view: &AppView, out: &mut impl Write) -> io::Result<()> {
    sidebar::render(view, out)?;
    writeln!(out)?;
    task_panel::render(view, out)
}
