//! Command-line front end.
//!
//! Each subcommand is translated into exactly one [`Intent`] against the
//! freshly loaded [`AppView`]. Lookups that fail (unknown task id, unknown
//! label) are reported as [`UsageError`]s before anything is sent.

use taskdeck_proto::label::{Label, LabelId, NewLabelPayload, toggle_all};
use taskdeck_proto::task::{NewTaskPayload, Task, TaskId, UpdateTaskPayload};

use crate::store::AppView;
use crate::ui::Intent;

/// Errors in user input that are detected without contacting the service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    /// No task has the given id.
    #[error("no task with id {0}")]
    UnknownTask(TaskId),
    /// No label matches the given name or id.
    #[error("no label named or numbered {0:?}")]
    UnknownLabel(String),
}

/// Subcommands.
#[derive(clap::Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show labels and tasks, optionally only tasks carrying a label.
    List {
        /// Label name or id to filter on.
        #[arg(short, long)]
        label: Option<String>,
    },
    /// Create a task.
    Add {
        /// Task text.
        text: String,
        /// Label name or id to attach; repeating a label cancels it.
        #[arg(short, long = "label")]
        labels: Vec<String>,
    },
    /// Flip a task between done and not done.
    Toggle {
        /// Task id.
        id: TaskId,
    },
    /// Change a task's text or labels.
    Edit {
        /// Task id.
        id: TaskId,
        /// Replacement text.
        #[arg(short, long)]
        text: Option<String>,
        /// Label name or id to toggle on the task.
        #[arg(short, long = "label")]
        labels: Vec<String>,
    },
    /// Delete a task.
    Rm {
        /// Task id.
        id: TaskId,
    },
    /// Manage labels.
    #[command(subcommand)]
    Label(LabelCommand),
}

/// `label` subcommands.
#[derive(clap::Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum LabelCommand {
    /// Create a label.
    Add {
        /// Label name.
        name: String,
    },
    /// Delete a label.
    Rm {
        /// Label id.
        id: LabelId,
    },
}

impl Default for Command {
    fn default() -> Self {
        Self::List { label: None }
    }
}

/// Translate `command` into the intent it stands for.
///
/// # Errors
///
/// Returns [`UsageError`] when a referenced task or label is not in `view`.
pub fn intent_for(command: &Command, view: &AppView) -> Result<Intent, UsageError> {
    match command {
        Command::List { label } => {
            let label = label
                .as_deref()
                .map(|key| find_label(view, key).cloned())
                .transpose()?;
            Ok(Intent::SelectLabel(label))
        }
        Command::Add { text, labels } => {
            let picked = find_labels(view, labels)?;
            let selection = toggle_all(&[], picked);
            Ok(Intent::Submit(NewTaskPayload::from_selection(
                text.as_str(),
                &selection,
            )))
        }
        Command::Toggle { id } => {
            let task = find_task(view, *id)?;
            Ok(Intent::Update(UpdateTaskPayload::toggle_completed(task)))
        }
        Command::Edit { id, text, labels } => {
            let task = find_task(view, *id)?;
            let picked = find_labels(view, labels)?;
            let selection = toggle_all(&task.labels, picked);
            let text = text.clone().unwrap_or_else(|| task.text.clone());
            Ok(Intent::Update(UpdateTaskPayload::edit(task, text, &selection)))
        }
        Command::Rm { id } => {
            find_task(view, *id)?;
            Ok(Intent::Delete(*id))
        }
        Command::Label(LabelCommand::Add { name }) => {
            Ok(Intent::SubmitNewLabel(NewLabelPayload::new(name.as_str())))
        }
        Command::Label(LabelCommand::Rm { id }) => {
            if view.label(*id).is_none() {
                return Err(UsageError::UnknownLabel(id.to_string()));
            }
            Ok(Intent::DeleteLabel(*id))
        }
    }
}

fn find_task(view: &AppView, id: TaskId) -> Result<&Task, UsageError> {
    view.task(id).ok_or(UsageError::UnknownTask(id))
}

/// Matches a label by exact name first, then by id.
fn find_label<'a>(view: &'a AppView, key: &str) -> Result<&'a Label, UsageError> {
    if let Some(label) = view.labels.iter().find(|label| label.name == key) {
        return Ok(label);
    }
    key.parse::<LabelId>()
        .ok()
        .and_then(|id| view.label(id))
        .ok_or_else(|| UsageError::UnknownLabel(key.to_string()))
}

fn find_labels<'a>(view: &'a AppView, keys: &[String]) -> Result<Vec<&'a Label>, UsageError> {
    keys.iter().map(|key| find_label(view, key)).collect()
}
