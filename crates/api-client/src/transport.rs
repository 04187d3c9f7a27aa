//! Transport configuration
//!
//! Defaults: 10 second timeout, JSON content type, 2xx/304 status
//! validation, bracket-notation query strings and no retries. Builder
//! methods replace or extend one field at a time.

use crate::error::{ApiResult, RequestError};
use request_kit_core::retry::RetryConfig;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Predicate deciding whether an HTTP status is accepted
pub type StatusValidator = Arc<dyn Fn(u16) -> bool + Send + Sync>;

/// Serializer turning query parameters into a query string
pub type ParamsSerializer = Arc<dyn Fn(&Value) -> ApiResult<String> + Send + Sync>;

/// Check if an HTTP status counts as success: 2xx or 304
#[must_use]
pub fn is_http_success(status: u16) -> bool {
    (200..300).contains(&status) || status == 304
}

/// Serialize query parameters with nested objects in bracket notation
pub fn serialize_params(params: &Value) -> ApiResult<String> {
    match params {
        Value::Null => Ok(String::new()),
        _ => Ok(serde_qs::to_string(params)?),
    }
}

/// Transport settings for a request factory
#[derive(Clone)]
pub struct TransportConfig {
    /// Base URL requests are resolved against
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Default headers
    pub headers: HeaderMap,
    /// Status validation predicate
    pub validate_status: StatusValidator,
    /// Query parameter serializer
    pub params_serializer: ParamsSerializer,
    /// Retry configuration
    pub retry: RetryConfig,
}

impl Default for TransportConfig {
    fn default() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Self {
            base_url: String::new(),
            timeout: DEFAULT_TIMEOUT,
            headers,
            validate_status: Arc::new(is_http_success),
            params_serializer: Arc::new(serialize_params),
            retry: RetryConfig::default(),
        }
    }
}

impl fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("headers", &self.headers)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl TransportConfig {
    /// Default transport settings for `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to add or replace one default header
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Builder-style method to merge default headers
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Builder-style method to set the status validator
    #[must_use]
    pub fn with_validate_status(mut self, validate: impl Fn(u16) -> bool + Send + Sync + 'static) -> Self {
        self.validate_status = Arc::new(validate);
        self
    }

    /// Builder-style method to set the params serializer
    #[must_use]
    pub fn with_params_serializer(
        mut self,
        serializer: impl Fn(&Value) -> ApiResult<String> + Send + Sync + 'static,
    ) -> Self {
        self.params_serializer = Arc::new(serializer);
        self
    }

    /// Builder-style method to set retry config
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Check if `status` is accepted
    #[must_use]
    pub fn accepts_status(&self, status: u16) -> bool {
        (self.validate_status)(status)
    }

    /// Serialize query parameters with the configured serializer
    pub fn serialize_params(&self, params: &Value) -> ApiResult<String> {
        (self.params_serializer)(params)
    }

    /// Validate the configuration
    ///
    /// The base URL may be empty, absolute, or a local path such as a proxy
    /// pattern.
    pub fn validate(&self) -> ApiResult<()> {
        let url = self.base_url.as_str();
        let recognized = url.is_empty()
            || url.starts_with("http://")
            || url.starts_with("https://")
            || url.starts_with('/');
        if !recognized {
            return Err(RequestError::config("base_url must start with http://, https:// or /"));
        }

        if self.timeout.is_zero() {
            return Err(RequestError::config("timeout cannot be zero"));
        }

        Ok(())
    }

    /// Build the underlying HTTP client
    pub fn build_client(&self) -> ApiResult<Client> {
        Client::builder()
            .timeout(self.timeout)
            .default_headers(self.headers.clone())
            .build()
            .map_err(RequestError::from)
    }
}
