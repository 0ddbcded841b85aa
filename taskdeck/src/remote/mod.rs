//! Remote clients for the task service.
//!
//! Defines the [`TaskApi`] and [`LabelApi`] traits the controller is written
//! against. Concrete implementations:
//! - [`task::TaskClient`] — `/task` collection over HTTP
//! - [`label::LabelClient`] — `/label` collection over HTTP
//! - [`RemoteClient`] — both of the above sharing one [`Endpoint`]

pub mod endpoint;
pub mod label;
pub mod task;

use std::fmt;
use std::future::Future;

use taskdeck_proto::label::{Label, LabelId, NewLabelPayload};
use taskdeck_proto::task::{NewTaskPayload, Task, TaskId, UpdateTaskPayload};

pub use endpoint::{Endpoint, EndpointError};
pub use label::LabelClient;
pub use task::TaskClient;

/// Which remote operation a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `GET /task`
    ListTasks,
    /// `POST /task`
    AddTask,
    /// `PATCH /task/{id}`
    UpdateTask,
    /// `DELETE /task/{id}`
    DeleteTask,
    /// `GET /label`
    ListLabels,
    /// `POST /label`
    AddLabel,
    /// `DELETE /label/{id}`
    DeleteLabel,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ListTasks => "get task",
            Self::AddTask => "add task",
            Self::UpdateTask => "update task",
            Self::DeleteTask => "delete task",
            Self::ListLabels => "get label",
            Self::AddLabel => "add label",
            Self::DeleteLabel => "delete label",
        };
        f.write_str(name)
    }
}

/// A remote call failed.
///
/// Transport failures, non-success statuses and undecodable bodies all
/// collapse into this one kind. `status` is set when the service answered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{op} request failed: {detail}")]
pub struct RequestError {
    /// The operation that failed.
    pub op: Operation,
    /// HTTP status, if a response arrived.
    pub status: Option<u16>,
    /// Human-readable cause.
    pub detail: String,
}

impl RequestError {
    /// Creates an error with no status attached.
    pub fn new(op: Operation, detail: impl Into<String>) -> Self {
        Self {
            op,
            status: None,
            detail: detail.into(),
        }
    }

    /// Creates an error for a response with a non-success status.
    pub fn from_status(op: Operation, status: u16, detail: impl Into<String>) -> Self {
        Self {
            op,
            status: Some(status),
            detail: detail.into(),
        }
    }
}

/// Async access to the `/task` collection.
///
/// Every method maps a non-success response to [`RequestError`].
pub trait TaskApi: Send + Sync {
    /// Fetch every task.
    fn list_tasks(&self) -> impl Future<Output = Result<Vec<Task>, RequestError>> + Send;

    /// Create a task; the service assigns its id.
    fn create_task(
        &self,
        payload: &NewTaskPayload,
    ) -> impl Future<Output = Result<Task, RequestError>> + Send;

    /// Apply a partial patch and return the updated task.
    fn update_task(
        &self,
        payload: &UpdateTaskPayload,
    ) -> impl Future<Output = Result<Task, RequestError>> + Send;

    /// Delete the task with `id`.
    fn delete_task(&self, id: TaskId) -> impl Future<Output = Result<(), RequestError>> + Send;
}

/// Async access to the `/label` collection.
pub trait LabelApi: Send + Sync {
    /// Fetch every label.
    fn list_labels(&self) -> impl Future<Output = Result<Vec<Label>, RequestError>> + Send;

    /// Create a label; the service assigns its id.
    fn create_label(
        &self,
        payload: &NewLabelPayload,
    ) -> impl Future<Output = Result<Label, RequestError>> + Send;

    /// Delete the label with `id`.
    fn delete_label(&self, id: LabelId) -> impl Future<Output = Result<(), RequestError>> + Send;
}

/// Task and label clients bound to the same service.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    tasks: TaskClient,
    labels: LabelClient,
}

impl RemoteClient {
    /// Creates both clients over a shared endpoint.
    #[must_use]
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            tasks: TaskClient::new(endpoint.clone()),
            labels: LabelClient::new(endpoint),
        }
    }

    /// The task collection client.
    #[must_use]
    pub const fn tasks(&self) -> &TaskClient {
        &self.tasks
    }

    /// The label collection client.
    #[must_use]
    pub const fn labels(&self) -> &LabelClient {
        &self.labels
    }
}

impl TaskApi for RemoteClient {
    async fn list_tasks(&self) -> Result<Vec<Task>, RequestError> {
        self.tasks.list().await
    }

    async fn create_task(&self, payload: &NewTaskPayload) -> Result<Task, RequestError> {
        self.tasks.create(payload).await
    }

    async fn update_task(&self, payload: &UpdateTaskPayload) -> Result<Task, RequestError> {
        self.tasks.update(payload).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), RequestError> {
        self.tasks.delete(id).await
    }
}

impl LabelApi for RemoteClient {
    async fn list_labels(&self) -> Result<Vec<Label>, RequestError> {
        self.labels.list().await
    }

    async fn create_label(&self, payload: &NewLabelPayload) -> Result<Label, RequestError> {
        self.labels.create(payload).await
    }

    async fn delete_label(&self, id: LabelId) -> Result<(), RequestError> {
        self.labels.delete(id).await
    }
}
