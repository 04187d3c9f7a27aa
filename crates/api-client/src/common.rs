//! Common request factory
//!
//! [`CommonRequest`] owns one HTTP client, the caller's hooks and an
//! in-flight registry. Every call goes through the same pipeline:
//!
//! 1. tag the call with a fresh `X-Request-Id`
//! 2. register a cancellation handle unless the caller brought a signal
//! 3. run `on_request`
//! 4. send with transport-level retry, racing the cancellation handle
//! 5. classify JSON responses with `is_backend_success` / `on_backend_fail`
//!
//! Every failure reaches `on_error` before it is returned.

use crate::error::{ApiResult, RequestError};
use crate::hooks::{BackendFailOutcome, RequestHooks};
use crate::registry::InflightRegistry;
use crate::request::RequestConfig;
use crate::response::{ResponseBody, ResponseType, ServiceResponse};
use crate::transport::TransportConfig;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
pub const REQUEST_ID_KEY: &str = "X-Request-Id";

/// Request factory with interception, retry and cancellation bookkeeping
#[derive(Clone)]
pub struct CommonRequest {
    inner: Client,
    config: Arc<TransportConfig>,
    hooks: Arc<dyn RequestHooks>,
    registry: InflightRegistry,
}

impl CommonRequest {
    /// Create a factory with its own registry
    pub fn new(config: TransportConfig, hooks: impl RequestHooks + 'static) -> ApiResult<Self> {
        Self::with_registry(config, hooks, InflightRegistry::new())
    }

    /// Create a factory sharing the given registry
    pub fn with_registry(
        config: TransportConfig,
        hooks: impl RequestHooks + 'static,
        registry: InflightRegistry,
    ) -> ApiResult<Self> {
        config.validate()?;
        let inner = config.build_client()?;

        Ok(Self {
            inner,
            config: Arc::new(config),
            hooks: Arc::new(hooks),
            registry,
        })
    }

    /// Get the transport configuration
    #[must_use]
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Get the hooks
    #[must_use]
    pub fn hooks(&self) -> &dyn RequestHooks {
        self.hooks.as_ref()
    }

    /// Get the in-flight registry
    #[must_use]
    pub fn registry(&self) -> &InflightRegistry {
        &self.registry
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Cancel one call; no-op when the ID is unknown or already completed
    pub fn cancel_request(&self, request_id: &str) -> bool {
        self.registry.cancel(request_id)
    }

    /// Cancel every tracked call
    pub fn cancel_all_request(&self) -> usize {
        self.registry.cancel_all()
    }

    /// Issue a call and return the classified response
    #[instrument(skip_all, fields(method = %config.method, url = %config.url, request_id))]
    pub async fn execute(&self, mut config: RequestConfig) -> ApiResult<ServiceResponse> {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let name = HeaderName::from_bytes(REQUEST_ID_KEY.as_bytes())
            .map_err(|e| RequestError::config(e.to_string()))?;
        let value =
            HeaderValue::from_str(&request_id).map_err(|e| RequestError::config(e.to_string()))?;
        config.headers.insert(name, value);
        config.request_id = Some(request_id.clone());

        let _inflight = if config.signal.is_none() {
            let guard = self.registry.track(&request_id);
            config.signal = Some(guard.token());
            Some(guard)
        } else {
            None
        };

        self.run(config, &request_id).await
    }

    async fn run(&self, mut config: RequestConfig, request_id: &str) -> ApiResult<ServiceResponse> {
        if let Err(error) = self.hooks.on_request(&mut config).await {
            return Err(self.fail(error).await);
        }

        match self.execute_with_retry(&config, request_id).await {
            Ok(response) => self.classify(response).await,
            Err(error) => Err(self.fail(error).await),
        }
    }

    async fn fail(&self, error: RequestError) -> RequestError {
        self.hooks.on_error(&error).await;
        error
    }

    /// Apply backend classification to JSON responses
    async fn classify(&self, response: ServiceResponse) -> ApiResult<ServiceResponse> {
        if response.response_type != ResponseType::Json || self.hooks.is_backend_success(&response) {
            return Ok(response);
        }

        match self.hooks.on_backend_fail(&response, self).await {
            BackendFailOutcome::Recovered(replacement) => {
                debug!(request_id = %response.request_id, "Backend failure recovered by hook");
                Ok(replacement)
            }
            BackendFailOutcome::NotRecovered => {
                let error = RequestError::backend(response);
                Err(self.fail(error).await)
            }
        }
    }

    /// Execute request with retry logic
    async fn execute_with_retry(&self, config: &RequestConfig, request_id: &str) -> ApiResult<ServiceResponse> {
        let retry_config = &self.config.retry;
        let max_attempts = retry_config.max_attempts();
        let signal = config.signal.clone().unwrap_or_default();
        let mut attempt = 0;

        loop {
            // Wait before retry (except first attempt)
            if attempt > 0 {
                let delay = retry_config.delay_for_attempt(attempt);
                debug!(
                    request_id = %request_id,
                    attempt = attempt,
                    delay_ms = delay.as_millis(),
                    "Retrying after delay"
                );
                tokio::select! {
                    biased;
                    () = signal.cancelled() => return Err(RequestError::cancelled(request_id)),
                    () = tokio::time::sleep(delay) => {}
                }
            }

            let start = Instant::now();
            let result = tokio::select! {
                biased;
                () = signal.cancelled() => Err(RequestError::cancelled(request_id)),
                result = self.execute_single_request(config, request_id) => result,
            };
            let elapsed = start.elapsed();

            match result {
                Ok(response) => {
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        status = response.status,
                        elapsed_ms = elapsed.as_millis(),
                        "Request succeeded"
                    );
                    return Ok(response);
                }
                Err(e) if e.is_retryable(&config.method) && attempt + 1 < max_attempts => {
                    warn!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        error = %e,
                        "Request failed, will retry"
                    );
                    attempt += 1;
                }
                Err(e) => {
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        error = %e,
                        "Request failed, not retrying"
                    );
                    return Err(e);
                }
            }
        }
    }

    /// Execute a single request without retry
    async fn execute_single_request(&self, config: &RequestConfig, request_id: &str) -> ApiResult<ServiceResponse> {
        let query = config
            .params
            .as_ref()
            .map(|params| self.config.serialize_params(params))
            .transpose()?;
        let url = config.resolve_url(&self.config.base_url, query.as_deref())?;

        let mut request = self
            .inner
            .request(config.method.clone(), url)
            .headers(config.headers.clone());

        if let Some(timeout) = config.timeout {
            request = request.timeout(timeout);
        }

        if let Some(ref data) = config.data {
            request = request.json(data);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let raw = response.bytes().await?;

        let service_response = ServiceResponse {
            status,
            headers,
            request_id: request_id.to_string(),
            response_type: config.response_type,
            body: ResponseBody::decode(config.response_type, raw),
            config: config.clone(),
        };

        if !self.config.accepts_status(status) {
            return Err(RequestError::Status {
                status,
                response: Box::new(service_response),
            });
        }

        Ok(service_response)
    }
}

impl std::fmt::Debug for CommonRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommonRequest")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
