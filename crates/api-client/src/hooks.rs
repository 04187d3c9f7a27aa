//! Lifecycle hooks
//!
//! [`RequestHooks`] is the extension point of a request factory. Every method
//! has a default, so implementors override only what they need:
//!
//! | Hook | Default |
//! |------|---------|
//! | `on_request` | leave the config unchanged |
//! | `is_backend_success` | always `true` |
//! | `on_backend_fail` | [`BackendFailOutcome::NotRecovered`] |
//! | `transform_backend_response` | the whole JSON payload |
//! | `on_error` | nothing |

use crate::common::CommonRequest;
use crate::error::{ApiResult, RequestError};
use crate::request::RequestConfig;
use crate::response::ServiceResponse;
use async_trait::async_trait;
use serde_json::Value;

/// Result of the backend failure hook
#[derive(Debug, Clone)]
pub enum BackendFailOutcome {
    /// Replace the failed response with this one
    Recovered(ServiceResponse),
    /// Escalate into a backend error
    NotRecovered,
}

/// Hooks invoked around every call of a request factory
#[async_trait]
pub trait RequestHooks: Send + Sync {
    /// Adjust the call before it is sent
    async fn on_request(&self, _config: &mut RequestConfig) -> ApiResult<()> {
        Ok(())
    }

    /// Decide whether a JSON response is a backend success
    fn is_backend_success(&self, _response: &ServiceResponse) -> bool {
        true
    }

    /// Handle a backend failure, optionally recovering with a replacement
    ///
    /// `instance` is the factory that issued the call and may be used to
    /// re-issue it, e.g. after refreshing a token.
    async fn on_backend_fail(
        &self,
        _response: &ServiceResponse,
        _instance: &CommonRequest,
    ) -> BackendFailOutcome {
        BackendFailOutcome::NotRecovered
    }

    /// Extract the caller-relevant payload from a successful JSON response
    fn transform_backend_response(&self, response: &ServiceResponse) -> ApiResult<Value> {
        Ok(response.json().cloned().unwrap_or(Value::Null))
    }

    /// Observe a failure before it propagates
    async fn on_error(&self, _error: &RequestError) {}
}

/// Hooks with every default behaviour
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl RequestHooks for DefaultHooks {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_are_identity() {
        let hooks = DefaultHooks;
        let mut config = RequestConfig::get("/items");

        tokio_test::block_on(hooks.on_request(&mut config)).unwrap();
        assert_eq!(config.url, "/items");
        assert!(config.headers.is_empty());

        let response = ServiceResponse::from_json(200, json!({"code": "x", "data": 1}), config);
        assert!(hooks.is_backend_success(&response));
        assert_eq!(
            hooks.transform_backend_response(&response).unwrap(),
            json!({"code": "x", "data": 1})
        );
    }

    struct OnlySuccess;

    impl RequestHooks for OnlySuccess {
        fn is_backend_success(&self, response: &ServiceResponse) -> bool {
            response.code().as_deref() == Some("0000")
        }
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let hooks = OnlySuccess;
        let response = ServiceResponse::from_json(
            200,
            json!({"code": "4001", "data": null}),
            RequestConfig::get("/"),
        );

        assert!(!hooks.is_backend_success(&response));
        assert_eq!(
            hooks.transform_backend_response(&response).unwrap()["code"],
            "4001"
        );
        tokio_test::block_on(hooks.on_error(&RequestError::config("ignored")));
    }
}
