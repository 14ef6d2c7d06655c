//! HTTP client for the back-office backend.
//!
//! Thin service calls: each builds a request, attaches the bearer token when
//! one is given, and decodes the JSON envelope. No retries happen here; the
//! query layer owns that policy.
//!
//! # API Reference
//!
//! - Base URL: `BACKOFFICE_API_URL` (default `http://localhost:8080`)
//! - Prefix: `/api/v1`
//! - Authentication: `Authorization: Bearer <token>`
//! - Errors: JSON body with `message` (or `error` on the upload endpoint)

mod online_transactions;
mod products;
mod session;

pub use online_transactions::*;

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::AdminConfig;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A mutation was attempted without a session token.
    #[error("Authentication token is missing")]
    MissingToken,

    /// Upload rejected locally because the file is not a spreadsheet.
    #[error("Please upload an Excel file (.xlsx or .xls)")]
    UnsupportedFileType(String),

    /// Local file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Response body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// HTTP status of a backend rejection, if this is one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Error body shape shared by backend endpoints.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    /// Decode an error body leniently. Anything that is not the expected
    /// JSON object yields an empty body.
    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<serde_json::Value>(bytes) {
            Ok(value @ serde_json::Value::Object(_)) => {
                serde_json::from_value(value).unwrap_or_default()
            }
            _ => Self::default(),
        }
    }

    /// Backend message (`message`, then `error`), else `fallback`.
    pub(crate) fn into_message(self, fallback: impl FnOnce() -> String) -> String {
        self.message
            .filter(|m| !m.is_empty())
            .or_else(|| self.error.filter(|m| !m.is_empty()))
            .unwrap_or_else(fallback)
    }
}

/// Back-office backend API client.
#[derive(Clone)]
pub struct BackofficeClient {
    inner: Arc<BackofficeClientInner>,
}

struct BackofficeClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl BackofficeClient {
    /// Create a new client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &AdminConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            inner: Arc::new(BackofficeClientInner {
                client,
                base_url: config.endpoint(""),
            }),
        })
    }

    /// Full URL of an API path, e.g. `endpoint("/products")`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Underlying HTTP client, shared with the draft holder.
    #[must_use]
    pub fn http(&self) -> reqwest::Client {
        self.inner.client.clone()
    }

    /// Execute a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        let request = self.inner.client.get(self.endpoint(path));
        let response = authorize(request, token)?.send().await?;
        Self::handle_response(response, None).await
    }

    /// Execute a GET request with query parameters. Unset parameters are
    /// left out of the query string.
    pub(crate) async fn get_with_query<T, Q>(
        &self,
        path: &str,
        query: &Q,
        token: Option<&SecretString>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let request = self.inner.client.get(self.endpoint(path)).query(query);
        let response = authorize(request, token)?.send().await?;
        Self::handle_response(response, None).await
    }

    /// Execute a POST request with a JSON body.
    pub(crate) async fn post<T, B>(
        &self,
        path: &str,
        body: &B,
        token: Option<&SecretString>,
        fallback: &str,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: serde::Serialize + Sync + ?Sized,
    {
        let request = self.inner.client.post(self.endpoint(path)).json(body);
        let response = authorize(request, token)?.send().await?;
        Self::handle_response(response, Some(fallback)).await
    }

    /// Execute a PUT request with a JSON body.
    pub(crate) async fn put<T, B>(
        &self,
        path: &str,
        body: &B,
        token: Option<&SecretString>,
        fallback: &str,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: serde::Serialize + Sync + ?Sized,
    {
        let request = self.inner.client.put(self.endpoint(path)).json(body);
        let response = authorize(request, token)?.send().await?;
        Self::handle_response(response, Some(fallback)).await
    }

    /// Execute a POST request with a multipart body.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        token: Option<&SecretString>,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let request = self.inner.client.post(self.endpoint(path)).multipart(form);
        let response = authorize(request, token)?.send().await?;
        Self::handle_response(response, Some(fallback)).await
    }

    /// Execute a DELETE request.
    pub(crate) async fn delete(
        &self,
        path: &str,
        token: Option<&SecretString>,
        fallback: &str,
    ) -> Result<(), ApiError> {
        let request = self.inner.client.delete(self.endpoint(path));
        let response = authorize(request, token)?.send().await?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(Self::parse_error(response, Some(fallback)).await)
    }

    /// Handle API response and parse JSON.
    ///
    /// An empty success body decodes as JSON `null`, so mutation endpoints
    /// that answer `204` work with `T = serde_json::Value`.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
        fallback: Option<&str>,
    ) -> Result<T, ApiError> {
        if !response.status().is_success() {
            return Err(Self::parse_error(response, fallback).await);
        }

        let bytes = response.bytes().await?;
        let parsed = if bytes.iter().all(u8::is_ascii_whitespace) {
            serde_json::from_value(serde_json::Value::Null)
        } else {
            serde_json::from_slice(&bytes)
        };
        parsed.map_err(|e| ApiError::Parse(format!("Failed to parse response: {e}")))
    }

    /// Parse error response from the backend.
    async fn parse_error(response: reqwest::Response, fallback: Option<&str>) -> ApiError {
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map(|b| ErrorBody::from_bytes(&b))
            .unwrap_or_default();

        let message = body.into_message(|| {
            fallback.map_or_else(|| format!("API error: {status}"), str::to_string)
        });

        tracing::debug!(status, %message, "Backend rejected request");
        ApiError::Api { status, message }
    }
}

impl std::fmt::Debug for BackofficeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackofficeClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Attach the bearer token, if any.
fn authorize(
    request: reqwest::RequestBuilder,
    token: Option<&SecretString>,
) -> Result<reqwest::RequestBuilder, ApiError> {
    let Some(token) = token else {
        return Ok(request);
    };
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
        .map_err(|e| ApiError::Parse(format!("Invalid token format: {e}")))?;
    value.set_sensitive(true);
    Ok(request.header(AUTHORIZATION, value))
}

/// Require a non-blank token for a mutation.
pub(crate) fn require_token(token: Option<&SecretString>) -> Result<&SecretString, ApiError> {
    token
        .filter(|t| !t.expose_secret().trim().is_empty())
        .ok_or(ApiError::MissingToken)
}
