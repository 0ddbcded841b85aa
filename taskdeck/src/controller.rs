//! Application state controller.
//!
//! [`Controller`] owns the [`Store`] and is the only writer to it. Every
//! mutating operation performs its remote call first and touches the store
//! only after the call succeeds, so a failed action leaves the view exactly
//! as it was.
//!
//! How a collection is brought back in line with the service after a
//! successful mutation is decided by [`SyncMode`], and the same mode applies
//! to tasks and labels alike. Under `Refetch` the read token is taken only
//! once the mutation has succeeded; under `Patch` the patch token is taken
//! before the call, so overlapping edits resolve in the order they were made.

use parking_lot::Mutex;
use taskdeck_proto::filter::LabelFilter;
use taskdeck_proto::label::{Label, LabelId, NewLabelPayload};
use taskdeck_proto::task::{NewTaskPayload, Task, TaskId, UpdateTaskPayload};

use crate::remote::{LabelApi, RequestError, TaskApi};
use crate::store::{AppView, Resource, Store, Token};
use crate::ui::Intent;

/// How a collection is refreshed after a successful mutation.
///
/// `Refetch` matches the task contract (mutate, then one list call);
/// `Patch` matches the label contract (apply the returned entity or the
/// removal, no list call). Either mode therefore reproduces only one of the
/// two original refresh behaviors.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Re-read the whole collection with one list call.
    #[default]
    Refetch,
    /// Apply the returned entity, or the removal, locally.
    Patch,
}

impl std::fmt::Display for SyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Refetch => write!(f, "refetch"),
            Self::Patch => write!(f, "patch"),
        }
    }
}

/// Result of dispatching an [`Intent`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    /// The intent was carried out.
    Applied,
    /// The intent was dropped before any remote call.
    Ignored(IgnoreReason),
}

/// Why an intent was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Task text was empty or whitespace.
    BlankText,
    /// Label name was empty or whitespace.
    BlankName,
    /// A label with the same name already exists.
    DuplicateLabel,
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankText => write!(f, "task text is empty"),
            Self::BlankName => write!(f, "label name is empty"),
            Self::DuplicateLabel => write!(f, "a label with that name already exists"),
        }
    }
}

/// Holds tasks, labels and the filter, and runs every mutate-then-refresh
/// sequence against the remote service.
///
/// All operations take `&self`: independent actions may be awaited
/// concurrently. The store lock is only held between awaits.
pub struct Controller<A> {
    api: A,
    store: Mutex<Store>,
    mode: SyncMode,
}

impl<A> Controller<A>
where
    A: TaskApi + LabelApi,
{
    /// Creates a controller with an empty store and [`SyncMode::Refetch`].
    pub fn new(api: A) -> Self {
        Self {
            api,
            store: Mutex::new(Store::new()),
            mode: SyncMode::default(),
        }
    }

    /// Sets the refresh strategy.
    #[must_use]
    pub const fn with_sync_mode(mut self, mode: SyncMode) -> Self {
        self.mode = mode;
        self
    }

    /// The refresh strategy in use.
    pub const fn sync_mode(&self) -> SyncMode {
        self.mode
    }

    /// The remote service handle.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Token for a local patch, taken before the remote call. `None` when
    /// the mode refetches instead.
    fn patch_token(&self, resource: Resource) -> Option<Token> {
        match self.mode {
            SyncMode::Patch => Some(self.store.lock().begin(resource)),
            SyncMode::Refetch => None,
        }
    }

    /// Initial load: tasks, then labels.
    ///
    /// # Errors
    ///
    /// Returns the first [`RequestError`]; collections read before the
    /// failure stay loaded.
    pub async fn load(&self) -> Result<(), RequestError> {
        self.refresh_tasks().await?;
        self.refresh_labels().await?;
        tracing::debug!("initial state loaded");
        Ok(())
    }

    async fn refresh_tasks(&self) -> Result<(), RequestError> {
        let token = self.store.lock().begin_read(Resource::Tasks);
        let tasks = self.api.list_tasks().await?;
        self.store.lock().replace_tasks(token, tasks);
        Ok(())
    }

    async fn refresh_labels(&self) -> Result<(), RequestError> {
        let token = self.store.lock().begin_read(Resource::Labels);
        let labels = self.api.list_labels().await?;
        self.store.lock().replace_labels(token, labels);
        Ok(())
    }

    /// Creates a task unless its text is blank.
    ///
    /// Returns the service-assigned task, or `None` when nothing was sent.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the create or the refresh fails; the
    /// store is unchanged in that case.
    pub async fn submit_task(
        &self,
        payload: &NewTaskPayload,
    ) -> Result<Option<Task>, RequestError> {
        if payload.is_blank() {
            tracing::debug!("ignoring task with blank text");
            return Ok(None);
        }

        let patch = self.patch_token(Resource::Tasks);
        let task = self.api.create_task(payload).await?;
        match patch {
            Some(token) => {
                self.store.lock().upsert_task(token, task.clone());
            }
            None => self.refresh_tasks().await?,
        }
        Ok(Some(task))
    }

    /// Applies a partial patch to a task.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the update or the refresh fails.
    pub async fn update_task(&self, payload: &UpdateTaskPayload) -> Result<Task, RequestError> {
        let patch = self.patch_token(Resource::Tasks);
        let task = self.api.update_task(payload).await?;
        match patch {
            Some(token) => {
                self.store.lock().upsert_task(token, task.clone());
            }
            None => self.refresh_tasks().await?,
        }
        Ok(task)
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the delete or the refresh fails.
    pub async fn delete_task(&self, id: TaskId) -> Result<(), RequestError> {
        let patch = self.patch_token(Resource::Tasks);
        self.api.delete_task(id).await?;
        match patch {
            Some(token) => {
                self.store.lock().remove_task(token, id);
            }
            None => self.refresh_tasks().await?,
        }
        Ok(())
    }

    /// Filters the view on `label`, or clears the filter. Local only.
    pub fn select_label_filter(&self, label: Option<&Label>) {
        self.store
            .lock()
            .set_filter(LabelFilter::from_selection(label));
    }

    /// Creates a label unless its name is blank or already taken.
    ///
    /// Returns the service-assigned label, or `None` when nothing was sent.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the create or the refresh fails.
    pub async fn submit_label(
        &self,
        payload: &NewLabelPayload,
    ) -> Result<Option<Label>, RequestError> {
        self.submit_label_checked(payload)
            .await
            .map(|result| result.ok())
    }

    async fn submit_label_checked(
        &self,
        payload: &NewLabelPayload,
    ) -> Result<Result<Label, IgnoreReason>, RequestError> {
        if payload.is_blank() {
            tracing::debug!("ignoring label with blank name");
            return Ok(Err(IgnoreReason::BlankName));
        }
        if self.store.lock().has_label_named(&payload.name) {
            tracing::debug!(name = %payload.name, "label already exists");
            return Ok(Err(IgnoreReason::DuplicateLabel));
        }

        let patch = self.patch_token(Resource::Labels);
        let label = self.api.create_label(payload).await?;
        match patch {
            Some(token) => {
                self.store.lock().upsert_label(token, label.clone());
            }
            None => self.refresh_labels().await?,
        }
        Ok(Ok(label))
    }

    /// Deletes a label. Tasks referencing it are not rewritten locally.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the delete or the refresh fails.
    pub async fn delete_label(&self, id: LabelId) -> Result<(), RequestError> {
        let patch = self.patch_token(Resource::Labels);
        self.api.delete_label(id).await?;
        match patch {
            Some(token) => {
                self.store.lock().remove_label(token, id);
            }
            None => self.refresh_labels().await?,
        }
        Ok(())
    }

    /// Routes a presentation-layer intent to the matching operation.
    ///
    /// # Errors
    ///
    /// Propagates the [`RequestError`] of the underlying operation.
    pub async fn dispatch(&self, intent: Intent) -> Result<Outcome, RequestError> {
        tracing::debug!(intent = intent.name(), "dispatching intent");
        match intent {
            Intent::Submit(payload) => Ok(match self.submit_task(&payload).await? {
                Some(_) => Outcome::Applied,
                None => Outcome::Ignored(IgnoreReason::BlankText),
            }),
            Intent::Update(payload) => {
                self.update_task(&payload).await?;
                Ok(Outcome::Applied)
            }
            Intent::Delete(id) => {
                self.delete_task(id).await?;
                Ok(Outcome::Applied)
            }
            Intent::SelectLabel(label) => {
                self.select_label_filter(label.as_ref());
                Ok(Outcome::Applied)
            }
            Intent::SubmitNewLabel(payload) => {
                Ok(match self.submit_label_checked(&payload).await? {
                    Ok(_) => Outcome::Applied,
                    Err(reason) => Outcome::Ignored(reason),
                })
            }
            Intent::DeleteLabel(id) => {
                self.delete_label(id).await?;
                Ok(Outcome::Applied)
            }
        }
    }

    /// Tasks passing the active filter, recomputed on every call.
    pub fn visible_tasks(&self) -> Vec<Task> {
        self.store.lock().visible_tasks()
    }

    /// Snapshot of tasks, labels and filter for rendering.
    pub fn view(&self) -> AppView {
        self.store.lock().snapshot()
    }

    /// Every task currently held.
    pub fn tasks(&self) -> Vec<Task> {
        self.store.lock().tasks().to_vec()
    }

    /// Every label currently held.
    pub fn labels(&self) -> Vec<Label> {
        self.store.lock().labels().to_vec()
    }

    /// The active filter.
    pub fn filter(&self) -> LabelFilter {
        self.store.lock().filter()
    }
}
