//! REST API client for the Rubik backend.
//!
//! Issues GET/POST/PUT requests with an optional bearer token using
//! [`reqwest`], and folds every outcome into one shape: the decoded body,
//! or an [`ApiError`] saying whether the transport failed, the server
//! refused, or the body could not be read.

use std::time::Duration;

use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::RubikError;

/// Message used when a request never got a response
pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred";

/// Message used when an error response carries no `message` field
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

/// Errors from the REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (connection refused, DNS, TLS, timeout).
    #[error("Network error occurred: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    #[error("{message} (HTTP {status})")]
    Status {
        status: u16,
        message: String,
    },

    /// A 2xx body that is not the expected JSON shape.
    #[error("{0}")]
    Parse(String),

    /// The base URL cannot take path segments.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ApiError> for RubikError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Transport(_) => RubikError::Network(err.to_string()),
            ApiError::Status { status: 401, message } => RubikError::Session(message),
            ApiError::Status { .. } => RubikError::Network(err.to_string()),
            ApiError::Parse(msg) => RubikError::Parse(msg),
            ApiError::InvalidUrl(_) => RubikError::Config(err.to_string()),
        }
    }
}

/// HTTP client for one backend base URL.
///
/// Endpoints are given as path segments (`&["imovel", cep]`). Each segment
/// is percent-encoded on its own, so an email or CEP can never add a path
/// component or a query string.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `http://localhost:8080`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RubikError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RubikError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Self::with_client(client, base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
    ) -> Result<Self, RubikError> {
        let raw = base_url.into();
        let base_url = Url::parse(&raw)
            .map_err(|e| RubikError::Config(format!("Invalid API URL '{}': {}", raw, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(RubikError::Config(format!("Invalid API URL '{}'", raw)));
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL for an endpoint given as path segments
    pub fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        self.send::<T, ()>(Method::GET, segments, &[], None, token).await
    }

    /// GET with URL-encoded query parameters
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        self.send::<T, ()>(Method::GET, segments, query, None, token).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        self.send(Method::POST, segments, &[], Some(body), token).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        self.send(Method::PUT, segments, &[], Some(body), token).await
    }

    async fn send<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<&B>,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = self.url(segments)?;
        tracing::debug!(%method, %url, "sending request");

        let mut request = self.client.request(method.clone(), url.clone());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "request failed");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"));
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let result = interpret_response(status, is_json, &text);
        if let Err(e) = &result {
            tracing::warn!(%method, %url, error = %e, "request returned an error");
        }
        result
    }
}

/// Turn a status code and body into the decoded value or an [`ApiError`].
///
/// Error bodies contribute their `message` field when they are JSON and have
/// one. Success bodies that are not JSON are offered to `T` as a plain
/// string, and an empty success body decodes as `null` (so `()` works).
pub fn interpret_response<T: DeserializeOwned>(
    status: StatusCode,
    is_json: bool,
    body: &str,
) -> Result<T, ApiError> {
    if !status.is_success() {
        let message = if is_json {
            serde_json::from_str::<serde_json::Value>(body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        } else {
            None
        };
        return Err(ApiError::Status {
            status: status.as_u16(),
            message: message.unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
        });
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return serde_json::from_value(serde_json::Value::Null)
            .map_err(|e| ApiError::Parse(format!("empty response body: {}", e)));
    }

    match serde_json::from_str::<T>(trimmed) {
        Ok(value) => Ok(value),
        Err(e) if is_json => Err(ApiError::Parse(e.to_string())),
        Err(e) => serde_json::from_value(serde_json::Value::String(body.to_string()))
            .map_err(|_| ApiError::Parse(e.to_string())),
    }
}
