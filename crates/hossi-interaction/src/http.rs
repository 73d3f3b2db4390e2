//! HTTP client adapter.
//!
//! [`ApiClient`] is the only place requests are built. Before dispatch it
//! reads the credential from the session store and attaches it as a bearer
//! header. A 401 response publishes [`AuthEvent::Unauthorized`] exactly once
//! and then fails the call; listeners have run by the time the caller sees
//! the error. There are no retries.

use async_trait::async_trait;
use hossi_core::HossiError;
use hossi_core::event::{AuthEvent, AuthEventBus};
use hossi_core::session::SessionStore;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Failure of a single API call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HttpError {
    /// The request never produced a response (DNS, connect, TLS, reset).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered 401. The session has already been torn down.
    #[error("Unauthorized")]
    Unauthorized,

    /// Any other non-2xx answer, with the body as the server sent it.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: Value },

    /// The request body could not be serialized; nothing was sent.
    #[error("Failed to encode request body for {path}: {message}")]
    Encode { path: String, message: String },

    /// A 2xx answer whose body is not the expected JSON.
    #[error("Failed to decode response from {path}: {message}")]
    Decode { path: String, message: String },

    /// Rejected locally because the backend has no such endpoint.
    #[error("Operation not supported: {0}")]
    UnsupportedOperation(String),
}

impl HttpError {
    /// HTTP status of the failure, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Unauthorized => Some(401),
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server's own message (`msg` or `error` field), when present.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            HttpError::Status { body, .. } => body
                .get("msg")
                .or_else(|| body.get("error"))
                .and_then(Value::as_str)
                .or_else(|| body.as_str()),
            _ => None,
        }
    }
}

impl From<HttpError> for HossiError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Unauthorized => HossiError::Unauthorized,
            HttpError::Status { status, .. } => {
                let message = err
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| err.to_string());
                HossiError::http(Some(status), message)
            }
            other => HossiError::http(None, other.to_string()),
        }
    }
}

/// A fully built outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Looks up a header value, ignoring ASCII case in the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response as received from the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// The wire underneath [`ApiClient`].
///
/// Implementations send the request once and report transport failures as
/// [`HttpError::Transport`]. Status handling is the adapter's job.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, HttpError>;
}

/// HTTP client adapter bound to one backend.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    session: Arc<dyn SessionStore>,
    events: AuthEventBus,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        session: Arc<dyn SessionStore>,
        events: AuthEventBus,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
            session,
            events,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues one request against `path` (relative to the base URL).
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, HttpError> {
        let request = self.build_request(method, path, body);
        tracing::debug!("[ApiClient] {} {}", request.method, request.url);

        let response = self.transport.send(request).await.inspect_err(|e| {
            tracing::warn!("[ApiClient] {} failed: {}", path, e);
        })?;

        self.handle_response(path, response)
    }

    pub async fn get(&self, path: &str) -> Result<Value, HttpError> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Value, HttpError> {
        self.request(Method::POST, path, Some(body)).await
    }

    fn build_request(&self, method: Method, path: &str, body: Option<Value>) -> ApiRequest {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(credential) = self.session.credential() {
            headers.push(("Authorization".to_string(), credential.bearer()));
        }

        ApiRequest {
            method,
            url: self.url(path),
            headers,
            body,
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn handle_response(&self, path: &str, response: ApiResponse) -> Result<Value, HttpError> {
        let status = response.status;

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("[ApiClient] {} returned 401, session expired", path);
            self.events.publish(&AuthEvent::Unauthorized {
                path: path.to_string(),
            });
            return Err(HttpError::Unauthorized);
        }

        if !status.is_success() {
            let body = serde_json::from_str(&response.body)
                .unwrap_or_else(|_| Value::String(response.body.clone()));
            tracing::warn!("[ApiClient] {} returned {}", path, status);
            return Err(HttpError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&response.body).map_err(|e| HttpError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
