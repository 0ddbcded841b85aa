//! Shared HTTP plumbing for the task and label clients.
//!
//! An [`Endpoint`] owns one `reqwest::Client` and the service base URL. It
//! sends JSON bodies, checks the response status, and decodes JSON
//! responses, turning every failure into a [`RequestError`] tagged with the
//! [`Operation`] that issued it.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::{Operation, RequestError};

/// Longest slice of an error body quoted in a [`RequestError`].
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Errors that can occur while building an [`Endpoint`].
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    /// The base URL cannot carry request paths.
    #[error("base URL cannot be used for requests: {0}")]
    UnusableBase(Url),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// A service base URL plus the HTTP client used to reach it.
#[derive(Debug, Clone)]
pub struct Endpoint {
    client: reqwest::Client,
    base: Url,
}

impl Endpoint {
    /// Creates an endpoint for `base`, with an optional per-request timeout.
    ///
    /// A base without a trailing slash is treated as a directory, so
    /// `http://host/api` resolves `task` to `http://host/api/task`.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::UnusableBase`] for URLs such as `mailto:`
    /// that cannot be joined with a path, or [`EndpointError::Client`] if
    /// the TLS backend fails to initialize.
    pub fn new(mut base: Url, timeout: Option<Duration>) -> Result<Self, EndpointError> {
        if base.cannot_be_a_base() {
            return Err(EndpointError::UnusableBase(base));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base,
        })
    }

    /// The normalized base URL.
    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// Resolves `path` (relative, e.g. `task/5`) against the base.
    fn url(&self, op: Operation, path: &str) -> Result<Url, RequestError> {
        self.base
            .join(path)
            .map_err(|e| RequestError::new(op, format!("invalid request path {path:?}: {e}")))
    }

    /// `GET path` and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        op: Operation,
        path: &str,
    ) -> Result<T, RequestError> {
        let url = self.url(op, path)?;
        let response = self
            .execute(op, Method::GET, self.client.get(url.clone()), &url)
            .await?;
        decode(op, response).await
    }

    /// Send `body` as JSON with `method` and decode the JSON response.
    pub(crate) async fn send<B, T>(
        &self,
        op: Operation,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, RequestError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(op, path)?;
        let request = self.client.request(method.clone(), url.clone()).json(body);
        let response = self.execute(op, method, request, &url).await?;
        decode(op, response).await
    }

    /// `DELETE path`, ignoring any response body.
    pub(crate) async fn delete(&self, op: Operation, path: &str) -> Result<(), RequestError> {
        let url = self.url(op, path)?;
        self.execute(op, Method::DELETE, self.client.delete(url.clone()), &url)
            .await?;
        Ok(())
    }

    /// Sends the request and rejects any non-success status.
    async fn execute(
        &self,
        op: Operation,
        method: Method,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<Response, RequestError> {
        tracing::debug!(%op, %method, path = url.path(), "sending request");

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%op, error = %e, "request did not complete");
            RequestError::new(op, e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = if body.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            format!("HTTP {status}: {}", truncate(body.trim()))
        };
        tracing::warn!(%op, status = status.as_u16(), "service rejected request");
        Err(RequestError::from_status(op, status.as_u16(), detail))
    }
}

/// Reads the body and decodes it as JSON.
async fn decode<T: DeserializeOwned>(op: Operation, response: Response) -> Result<T, RequestError> {
    let status = response.status().as_u16();
    let bytes = response.bytes().await.map_err(|e| {
        tracing::warn!(%op, error = %e, "failed to read response body");
        RequestError::from_status(op, status, e.to_string())
    })?;
    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::warn!(%op, error = %e, "response body is not the expected JSON");
        RequestError::from_status(op, status, format!("malformed response: {e}"))
    })
}

fn truncate(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body.to_string();
    }
    let mut cut: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    cut.push('\u{2026}');
    cut
}
