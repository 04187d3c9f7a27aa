//! Error types for the request wrapper

use crate::response::ServiceResponse;
use reqwest::Method;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use thiserror::Error;

/// Code carried by errors synthesized from a failed backend classification
pub const BACKEND_ERROR_CODE: &str = "BACKEND_ERROR";

/// Result type alias for request operations
pub type ApiResult<T> = Result<T, RequestError>;

/// Request errors
#[derive(Error, Debug)]
pub enum RequestError {
    /// Network-level failure
    #[error("HTTP request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The transport gave up waiting
    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// The status code was rejected by the status validator
    #[error("Request failed with status code {status}")]
    Status {
        /// HTTP status code
        status: u16,
        /// The rejected response
        response: Box<ServiceResponse>,
    },

    /// The cancellation handle of the call was triggered
    #[error("Request {request_id} was cancelled")]
    Cancelled {
        /// Identifier of the cancelled call
        request_id: String,
    },

    /// The backend reported failure and the failure hook did not recover
    #[error("the backend request error (code {backend_code}): {message}")]
    Backend {
        /// Code from the backend envelope
        backend_code: String,
        /// Message from the backend envelope
        message: String,
        /// The original response
        response: Box<ServiceResponse>,
    },

    /// The pre-request hook rejected the call
    #[error("Request hook failed: {0}")]
    Hook(String),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Query parameters could not be serialized
    #[error("Query serialization failed: {0}")]
    Query(#[from] serde_qs::Error),

    /// The response transform failed
    #[error("Response transform failed: {0}")]
    Transform(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for RequestError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Transport(error)
        }
    }
}

impl RequestError {
    /// Synthesize a backend error from a response that failed classification
    #[must_use]
    pub fn backend(response: ServiceResponse) -> Self {
        Self::Backend {
            backend_code: response.code().unwrap_or_default(),
            message: response.message().unwrap_or_default().to_string(),
            response: Box::new(response),
        }
    }

    /// Create a cancellation error
    pub fn cancelled(request_id: impl Into<String>) -> Self {
        Self::Cancelled {
            request_id: request_id.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a hook error
    pub fn hook(msg: impl Into<String>) -> Self {
        Self::Hook(msg.into())
    }

    /// Create a transform error
    pub fn transform(msg: impl Into<String>) -> Self {
        Self::Transform(msg.into())
    }

    /// Stable code for programmatic handling
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "ERR_NETWORK",
            Self::Timeout(_) => "ETIMEDOUT",
            Self::Status { .. } => "ERR_BAD_RESPONSE",
            Self::Cancelled { .. } => "ERR_CANCELED",
            Self::Backend { .. } => BACKEND_ERROR_CODE,
            Self::Hook(_) => "ERR_HOOK",
            Self::Json(_) => "ERR_JSON",
            Self::Query(_) => "ERR_QUERY",
            Self::Transform(_) => "ERR_TRANSFORM",
            Self::Config(_) => "ERR_CONFIG",
            Self::InvalidUrl(_) => "ERR_INVALID_URL",
        }
    }

    /// The response attached to the error, if one was received
    #[must_use]
    pub fn response(&self) -> Option<&ServiceResponse> {
        match self {
            Self::Status { response, .. } | Self::Backend { response, .. } => Some(response),
            _ => None,
        }
    }

    /// Envelope code of the attached response
    #[must_use]
    pub fn backend_code(&self) -> Option<String> {
        match self {
            Self::Backend { backend_code, .. } => Some(backend_code.clone()),
            _ => self.response().and_then(ServiceResponse::code),
        }
    }

    /// HTTP status of the attached response
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) | Self::Timeout(e) => e.status().map(|s| s.as_u16()),
            _ => self.response().map(|r| r.status),
        }
    }

    /// Check if this is a backend-classified failure
    #[must_use]
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend { .. })
    }

    /// Check if the call was cancelled
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Check if this error may be retried at the transport layer
    ///
    /// Network errors and timeouts are retried for every method, 5xx
    /// statuses only for idempotent methods.
    #[must_use]
    pub fn is_retryable(&self, method: &Method) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_request(),
            Self::Timeout(_) => true,
            Self::Status { status, .. } => *status >= 500 && is_idempotent(method),
            Self::Cancelled { .. }
            | Self::Backend { .. }
            | Self::Hook(_)
            | Self::Json(_)
            | Self::Query(_)
            | Self::Transform(_)
            | Self::Config(_)
            | Self::InvalidUrl(_) => false,
        }
    }
}

fn is_idempotent(method: &Method) -> bool {
    [Method::GET, Method::HEAD, Method::OPTIONS, Method::PUT, Method::DELETE].contains(method)
}

impl Serialize for RequestError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RequestError", 4)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.serialize_field("status", &self.status())?;
        state.serialize_field("backendCode", &self.backend_code())?;
        state.end()
    }
}
