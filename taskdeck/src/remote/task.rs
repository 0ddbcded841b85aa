//! HTTP client for the `/task` collection.

use reqwest::Method;
use taskdeck_proto::task::{NewTaskPayload, Task, TaskId, UpdateTaskPayload};

use super::{Endpoint, Operation, RequestError};

/// Lists, creates, patches and deletes tasks.
#[derive(Debug, Clone)]
pub struct TaskClient {
    endpoint: Endpoint,
}

impl TaskClient {
    /// Creates a client over `endpoint`.
    #[must_use]
    pub const fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    /// `GET /task`
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] on transport failure, non-success status or
    /// an undecodable body.
    pub async fn list(&self) -> Result<Vec<Task>, RequestError> {
        self.endpoint.get(Operation::ListTasks, "task").await
    }

    /// `POST /task` with `{text, labels}`; returns the created task.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] on transport failure, non-success status or
    /// an undecodable body.
    pub async fn create(&self, payload: &NewTaskPayload) -> Result<Task, RequestError> {
        let task: Task = self
            .endpoint
            .send(Operation::AddTask, Method::POST, "task", payload)
            .await?;
        tracing::info!(id = %task.id, "task created");
        Ok(task)
    }

    /// `PATCH /task/{id}` with the present fields only.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] on transport failure, non-success status or
    /// an undecodable body.
    pub async fn update(&self, payload: &UpdateTaskPayload) -> Result<Task, RequestError> {
        let path = format!("task/{}", payload.id);
        let task: Task = self
            .endpoint
            .send(Operation::UpdateTask, Method::PATCH, &path, payload)
            .await?;
        tracing::info!(id = %task.id, "task updated");
        Ok(task)
    }

    /// `DELETE /task/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] on transport failure or non-success status.
    pub async fn delete(&self, id: TaskId) -> Result<(), RequestError> {
        self.endpoint
            .delete(Operation::DeleteTask, &format!("task/{id}"))
            .await?;
        tracing::info!(%id, "task deleted");
        Ok(())
    }
}
