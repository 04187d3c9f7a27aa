//! Flat-response adapter
//!
//! Wraps [`CommonRequest`] so that every call resolves to a
//! [`FlatResponse`] instead of an `Err`.

use crate::common::CommonRequest;
use crate::error::ApiResult;
use crate::hooks::RequestHooks;
use crate::registry::InflightRegistry;
use crate::request::RequestConfig;
use crate::response::{FlatResponse, ResponseType, ServiceResponse};
use crate::transport::TransportConfig;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Request factory whose calls never fail, only report failure
///
/// `S` is a free-form state bag for caller-defined data, created empty.
pub struct FlatRequest<S = HashMap<String, Value>> {
    common: CommonRequest,
    state: Arc<RwLock<S>>,
}

impl<S> Clone for FlatRequest<S> {
    fn clone(&self) -> Self {
        Self {
            common: self.common.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: Default> FlatRequest<S> {
    /// Create an adapter over a new factory
    pub fn new(config: TransportConfig, hooks: impl RequestHooks + 'static) -> ApiResult<Self> {
        Ok(Self::from_common(CommonRequest::new(config, hooks)?))
    }

    /// Create an adapter over a new factory sharing `registry`
    pub fn with_registry(
        config: TransportConfig,
        hooks: impl RequestHooks + 'static,
        registry: InflightRegistry,
    ) -> ApiResult<Self> {
        Ok(Self::from_common(CommonRequest::with_registry(config, hooks, registry)?))
    }

    /// Wrap an existing factory
    #[must_use]
    pub fn from_common(common: CommonRequest) -> Self {
        Self {
            common,
            state: Arc::new(RwLock::new(S::default())),
        }
    }
}

impl<S> FlatRequest<S> {
    /// Issue a call and resolve to `{data, error}`
    ///
    /// JSON responses go through `transform_backend_response` before being
    /// deserialized into `T`; other response types deserialize the raw body.
    pub async fn request<T: DeserializeOwned>(&self, config: RequestConfig) -> FlatResponse<T> {
        match self.common.execute(config).await {
            Ok(response) => FlatResponse::from(self.extract::<T>(response)),
            Err(error) => FlatResponse::failure(error),
        }
    }

    /// Issue a call expecting a binary body
    pub async fn download(&self, config: RequestConfig) -> FlatResponse<Bytes> {
        let config = config.with_response_type(ResponseType::Bytes);
        match self.common.execute(config).await {
            Ok(response) => FlatResponse::success(response.body.into_bytes()),
            Err(error) => FlatResponse::failure(error),
        }
    }

    fn extract<T: DeserializeOwned>(&self, response: ServiceResponse) -> ApiResult<T> {
        let value = if response.response_type == ResponseType::Json {
            self.common.hooks().transform_backend_response(&response)?
        } else {
            response.body.into_value()
        };
        Ok(serde_json::from_value(value)?)
    }

    /// Cancel one call; no-op when the ID is unknown or already completed
    pub fn cancel_request(&self, request_id: &str) -> bool {
        self.common.cancel_request(request_id)
    }

    /// Cancel every tracked call
    pub fn cancel_all_request(&self) -> usize {
        self.common.cancel_all_request()
    }

    /// Caller-defined state
    #[must_use]
    pub fn state(&self) -> &RwLock<S> {
        &self.state
    }

    /// The wrapped factory
    #[must_use]
    pub fn common(&self) -> &CommonRequest {
        &self.common
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::DefaultHooks;

    #[test]
    fn test_state_starts_empty() {
        let request: FlatRequest = FlatRequest::new(TransportConfig::default(), DefaultHooks).unwrap();
        assert!(request.state().read().unwrap().is_empty());

        request
            .state()
            .write()
            .unwrap()
            .insert("refreshing".into(), Value::Bool(true));

        let clone = request.clone();
        assert_eq!(clone.state().read().unwrap().get("refreshing"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_cancel_without_calls_is_noop() {
        let request: FlatRequest = FlatRequest::new(TransportConfig::default(), DefaultHooks).unwrap();
        assert!(!request.cancel_request("unknown"));
        assert_eq!(request.cancel_all_request(), 0);
    }

    #[tokio::test]
    async fn test_invalid_url_is_flattened() {
        let request: FlatRequest = FlatRequest::new(TransportConfig::default(), DefaultHooks).unwrap();
        let result = request.request::<Value>(RequestConfig::get("/relative")).await;

        assert!(result.data.is_none());
        assert_eq!(result.error.map(|e| e.code()), Some("ERR_INVALID_URL"));
    }
}
