//! Preconfigured request for the backend service
//!
//! [`ServiceHooks`] implements the conventions of the `{code, msg, data}`
//! backend: success is `code == SERVICE_SUCCESS_CODE`, callers receive the
//! `data` field, and failures handled by the logout or token refresh flows
//! are not displayed.

use crate::base_url::get_service_base_url;
use crate::common::CommonRequest;
use crate::config::ServiceEnv;
use crate::error::{ApiResult, RequestError};
use crate::flat::FlatRequest;
use crate::hooks::{BackendFailOutcome, RequestHooks};
use crate::response::ServiceResponse;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

/// Hooks for the `{code, msg, data}` backend envelope
#[derive(Debug, Clone)]
pub struct ServiceHooks {
    success_code: String,
    modal_logout_codes: Vec<String>,
    expired_token_codes: Vec<String>,
}

impl ServiceHooks {
    /// Hooks for the given success code, without suppressed codes
    pub fn new(success_code: impl Into<String>) -> Self {
        Self {
            success_code: success_code.into(),
            modal_logout_codes: Vec::new(),
            expired_token_codes: Vec::new(),
        }
    }

    /// Hooks configured from the environment
    #[must_use]
    pub fn from_env(env: &ServiceEnv) -> Self {
        Self {
            success_code: env.success_code.clone(),
            modal_logout_codes: env.modal_logout_codes.clone(),
            expired_token_codes: env.expired_token_codes.clone(),
        }
    }

    /// Whether a failure should be shown to the user
    ///
    /// Backend codes handled by the modal logout or token refresh flows are not.
    #[must_use]
    pub fn should_display(&self, error: &RequestError) -> bool {
        let Some(code) = error.is_backend().then(|| error.backend_code()).flatten() else {
            return true;
        };

        !self.modal_logout_codes.contains(&code) && !self.expired_token_codes.contains(&code)
    }
}

#[async_trait]
impl RequestHooks for ServiceHooks {
    fn is_backend_success(&self, response: &ServiceResponse) -> bool {
        response.code().as_deref() == Some(self.success_code.as_str())
    }

    async fn on_backend_fail(
        &self,
        response: &ServiceResponse,
        _instance: &CommonRequest,
    ) -> BackendFailOutcome {
        warn!(
            request_id = %response.request_id,
            code = %response.code().unwrap_or_default(),
            "Backend request failed"
        );
        BackendFailOutcome::NotRecovered
    }

    fn transform_backend_response(&self, response: &ServiceResponse) -> ApiResult<Value> {
        Ok(response
            .json()
            .and_then(|body| body.get("data"))
            .cloned()
            .unwrap_or(Value::Null))
    }

    async fn on_error(&self, error: &RequestError) {
        if self.should_display(error) {
            warn!(
                code = error.code(),
                backend_code = %error.backend_code().unwrap_or_default(),
                backend_message = error
                    .response()
                    .and_then(ServiceResponse::message)
                    .unwrap_or_default(),
                "{error}"
            );
        } else {
            debug!(
                backend_code = %error.backend_code().unwrap_or_default(),
                "Error left to the logout or token refresh flow"
            );
        }
    }
}

/// Flat request bound to the primary backend
pub fn create_service_request(env: &ServiceEnv) -> ApiResult<FlatRequest> {
    let base = get_service_base_url(env, env.is_http_proxy());
    FlatRequest::new(env.transport_config(base.base_url), ServiceHooks::from_env(env))
}

/// Flat request bound to the alternate backend `key`
pub fn create_other_service_request(env: &ServiceEnv, key: &str) -> ApiResult<FlatRequest> {
    let base = get_service_base_url(env, env.is_http_proxy());
    let url = base
        .other_base_url
        .get(key)
        .cloned()
        .ok_or_else(|| RequestError::config(format!("no alternate service named '{key}'")))?;
    FlatRequest::new(env.transport_config(url), ServiceHooks::from_env(env))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestConfig;
    use serde_json::json;

    fn response(body: Value) -> ServiceResponse {
        ServiceResponse::from_json(200, body, RequestConfig::get("/"))
    }

    fn hooks() -> ServiceHooks {
        ServiceHooks {
            success_code: "0000".into(),
            modal_logout_codes: vec!["7777".into()],
            expired_token_codes: vec!["9999".into()],
        }
    }

    #[test]
    fn test_success_compares_code() {
        let hooks = hooks();
        assert!(hooks.is_backend_success(&response(json!({"code": "0000"}))));
        assert!(!hooks.is_backend_success(&response(json!({"code": "4001"}))));
        assert!(!hooks.is_backend_success(&response(json!({"msg": "no code"}))));
    }

    #[test]
    fn test_transform_extracts_data() {
        let body = json!({"code": "0000", "msg": "ok", "data": {"tokenValue": "abc"}});
        assert_eq!(
            hooks().transform_backend_response(&response(body)).unwrap(),
            json!({"tokenValue": "abc"})
        );
    }

    #[test]
    fn test_suppressed_codes_are_not_displayed() {
        let hooks = hooks();
        let error = |code: &str| RequestError::backend(response(json!({"code": code, "msg": "x"})));

        assert!(!hooks.should_display(&error("7777")));
        assert!(!hooks.should_display(&error("9999")));
        assert!(hooks.should_display(&error("4001")));
        assert!(hooks.should_display(&RequestError::config("other")));
    }

    #[test]
    fn test_other_service_requires_known_key() {
        let env = ServiceEnv::default()
            .with_base_url("https://api.example.com")
            .with_other_base_url("{demo: 'https://demo.example.com'}");

        let demo = create_other_service_request(&env, "demo").unwrap();
        assert_eq!(demo.common().base_url(), "https://demo.example.com");

        let missing = create_other_service_request(&env, "files");
        assert!(matches!(missing, Err(RequestError::Config(_))));
    }

    #[test]
    fn test_service_request_uses_proxy_in_development() {
        let env = ServiceEnv::default()
            .with_base_url("https://api.example.com")
            .with_proxy(crate::config::Environment::Development, true);

        let request = create_service_request(&env).unwrap();
        assert_eq!(request.common().base_url(), "http://localhost:9527/proxy-default");

        let env = env
            .with_other_base_url("{demo: 'https://demo.example.com'}")
            .with_proxy_origin("http://127.0.0.1:4000");
        let demo = create_other_service_request(&env, "demo").unwrap();
        assert_eq!(demo.common().base_url(), "http://127.0.0.1:4000/proxy-demo");
    }
}
