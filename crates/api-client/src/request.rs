//! Per-call request configuration

use crate::error::{ApiResult, RequestError};
use crate::response::ResponseType;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Configuration of a single call
///
/// Built by endpoint functions, possibly rewritten by
/// [`RequestHooks::on_request`](crate::hooks::RequestHooks::on_request),
/// then sent by [`CommonRequest`](crate::common::CommonRequest).
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// HTTP method
    pub method: Method,
    /// Path relative to the base URL, or an absolute URL
    pub url: String,
    /// Base URL overriding the transport's one
    pub base_url: Option<String>,
    /// Query parameters, serialized by the transport's params serializer
    pub params: Option<Value>,
    /// JSON body
    pub data: Option<Value>,
    /// Extra headers
    pub headers: HeaderMap,
    /// Declared response type
    pub response_type: ResponseType,
    /// Timeout overriding the transport's one
    pub timeout: Option<Duration>,
    /// Caller-supplied cancellation signal
    pub signal: Option<CancellationToken>,
    /// Identifier assigned when the call is issued
    pub request_id: Option<String>,
}

impl RequestConfig {
    /// Create a request for `method` and `url`
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            base_url: None,
            params: None,
            data: None,
            headers: HeaderMap::new(),
            response_type: ResponseType::Json,
            timeout: None,
            signal: None,
            request_id: None,
        }
    }

    /// GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// PUT request
    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    /// PATCH request
    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::PATCH, url)
    }

    /// DELETE request
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Set query parameters from any serializable value
    pub fn with_params<P: Serialize + ?Sized>(mut self, params: &P) -> ApiResult<Self> {
        self.params = Some(serde_json::to_value(params)?);
        Ok(self)
    }

    /// Set the JSON body from any serializable value
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> ApiResult<Self> {
        self.data = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Set the JSON body
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Override the base URL, e.g. to target an alternate service
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the declared response type
    #[must_use]
    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    /// Override the timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach a caller-owned cancellation signal
    ///
    /// Calls carrying their own signal are not tracked by the in-flight registry.
    #[must_use]
    pub fn with_signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Resolve the final URL against `default_base`, appending `query`
    pub fn resolve_url(&self, default_base: &str, query: Option<&str>) -> ApiResult<Url> {
        let mut url = if is_absolute(&self.url) {
            self.url.clone()
        } else {
            let base = self.base_url.as_deref().unwrap_or(default_base);
            join_url(base, &self.url)
        };

        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(query);
        }

        Url::parse(&url).map_err(|e| RequestError::InvalidUrl(format!("{url}: {e}")))
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}
