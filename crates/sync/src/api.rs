// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote API abstraction.
//!
//! Provides a trait-based client layer that enables:
//! - Real HTTP requests against the remote REST service for production
//! - Mock clients for unit testing
//!
//! The wire contract per entity collection:
//! - `POST /{collection}` with the entity payload, reply `{"id": ...}`
//! - `PUT /{collection}/{server_id}` with the payload, no required body
//! - `DELETE /{collection}/{server_id}`, no body

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use carelog_core::EntityKind;

/// Default bound on a single remote call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error type for remote API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request exceeded its timeout.
    #[error("request timed out")]
    Timeout,

    /// The request never reached the server.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The server replied with a non-2xx status.
    #[error("server returned status {code}")]
    Status {
        code: u16,
        /// Parsed `Retry-After` hint in seconds, when the server sent one.
        retry_after: Option<u64>,
    },

    /// The server replied 2xx but the body was unusable.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for remote API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Remote API trait for per-entity create/update/delete calls.
///
/// This trait abstracts over the actual HTTP client, allowing for easy
/// testing with mock implementations.
pub trait RemoteApi: Send + Sync {
    /// Create a remote resource; returns the server-assigned identifier.
    fn create(
        &self,
        kind: EntityKind,
        payload: &serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = ApiResult<String>> + Send + '_>>;

    /// Update an existing remote resource.
    fn update(
        &self,
        kind: EntityKind,
        server_id: &str,
        payload: &serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = ApiResult<()>> + Send + '_>>;

    /// Delete an existing remote resource.
    fn delete(
        &self,
        kind: EntityKind,
        server_id: &str,
    ) -> Pin<Box<dyn Future<Output = ApiResult<()>> + Send + '_>>;
}

/// HTTP implementation of [`RemoteApi`] using reqwest.
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Create a client for the given base URL with the default timeout.
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client with a custom per-request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Connect(format!("client init: {e}")))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(HttpApi { client, base_url })
    }

    fn collection_url(&self, kind: EntityKind) -> String {
        format!("{}/{}", self.base_url, kind.collection())
    }

    fn resource_url(&self, kind: EntityKind, server_id: &str) -> String {
        format!("{}/{}/{}", self.base_url, kind.collection(), server_id)
    }
}

impl RemoteApi for HttpApi {
    fn create(
        &self,
        kind: EntityKind,
        payload: &serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = ApiResult<String>> + Send + '_>> {
        let url = self.collection_url(kind);
        let body = payload.clone();
        Box::pin(async move {
            let response = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(request_error)?;
            let response = check_status(response)?;
            let reply: serde_json::Value = response
                .json()
                .await
                .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
            server_id_from(&reply)
        })
    }

    fn update(
        &self,
        kind: EntityKind,
        server_id: &str,
        payload: &serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = ApiResult<()>> + Send + '_>> {
        let url = self.resource_url(kind, server_id);
        let body = payload.clone();
        Box::pin(async move {
            let response = self
                .client
                .put(&url)
                .json(&body)
                .send()
                .await
                .map_err(request_error)?;
            check_status(response)?;
            Ok(())
        })
    }

    fn delete(
        &self,
        kind: EntityKind,
        server_id: &str,
    ) -> Pin<Box<dyn Future<Output = ApiResult<()>> + Send + '_>> {
        let url = self.resource_url(kind, server_id);
        Box::pin(async move {
            let response = self.client.delete(&url).send().await.map_err(request_error)?;
            check_status(response)?;
            Ok(())
        })
    }
}

fn request_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Connect(e.to_string())
    }
}

/// Map a non-2xx response to [`ApiError::Status`].
///
/// The `Retry-After` hint on 429 is parsed and logged but not enforced;
/// rate-limited items simply wait for the next drain pass.
fn check_status(response: reqwest::Response) -> ApiResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let retry_after = parse_retry_after(response.headers());
    if status.as_u16() == 429 {
        if let Some(secs) = retry_after {
            tracing::debug!("rate limited, server suggests retry after {secs}s");
        }
    }
    Err(ApiError::Status { code: status.as_u16(), retry_after })
}

fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Extract the server-assigned id from a create reply.
///
/// Servers return the id as a string or a number; both are accepted.
fn server_id_from(reply: &serde_json::Value) -> ApiResult<String> {
    match reply.get("id") {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(serde_json::Value::Number(n)) => Ok(n.to_string()),
        _ => Err(ApiError::InvalidResponse("create reply missing id".into())),
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
