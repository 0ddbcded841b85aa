//! HTTP client for the `/label` collection.

use reqwest::Method;
use taskdeck_proto::label::{Label, LabelId, NewLabelPayload};

use super::{Endpoint, Operation, RequestError};

/// Lists, creates and deletes labels.
#[derive(Debug, Clone)]
pub struct LabelClient {
    endpoint: Endpoint,
}

impl LabelClient {
    /// Creates a client over `endpoint`.
    #[must_use]
    pub const fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    /// `GET /label`
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] on transport failure, non-success status or
    /// an undecodable body.
    pub async fn list(&self) -> Result<Vec<Label>, RequestError> {
        self.endpoint.get(Operation::ListLabels, "label").await
    }

    /// `POST /label` with `{name}`; returns the created label.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] on transport failure, non-success status or
    /// an undecodable body.
    pub async fn create(&self, payload: &NewLabelPayload) -> Result<Label, RequestError> {
        let label: Label = self
            .endpoint
            .send(Operation::AddLabel, Method::POST, "label", payload)
            .await?;
        tracing::info!(id = %label.id, name = %label.name, "label created");
        Ok(label)
    }

    /// `DELETE /label/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] on transport failure or non-success status.
    pub async fn delete(&self, id: LabelId) -> Result<(), RequestError> {
        self.endpoint
            .delete(Operation::DeleteLabel, &format!("label/{id}"))
            .await?;
        tracing::info!(%id, "label deleted");
        Ok(())
    }
}
