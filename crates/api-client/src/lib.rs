//! Flat-response API client
//!
//! This crate wraps `reqwest` with the conventions of a `{code, msg, data}`
//! backend service.
//!
//! # Features
//!
//! - **Environment-based configuration**: primary and alternate base URLs, with
//!   development proxy patterns
//! - **Lifecycle hooks**: pre-request, success classification, failure recovery,
//!   response transform and error observation, each with a default
//! - **Retry**: transport-level retry with exponential backoff, off by default
//! - **Cancellation**: every call gets an `X-Request-Id` and a cancellation handle
//!   that can be triggered individually or all at once
//! - **Flat results**: calls resolve to `{data, error}` and never return `Err`
//!
//! # Example
//!
//! ```rust,no_run
//! use request_kit::prelude::*;
//! use serde_json::Value;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let env = ServiceEnv::from_env();
//!     let request = create_service_request(&env)?;
//!
//!     let result = request.request::<Value>(RequestConfig::get("/user/info")).await;
//!     match (result.data, result.error) {
//!         (Some(user), _) => println!("user: {user}"),
//!         (_, Some(error)) => eprintln!("failed: {error}"),
//!         _ => {}
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod base_url;
pub mod common;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod flat;
pub mod hooks;
pub mod registry;
pub mod request;
pub mod response;
pub mod service;
pub mod transport;

pub use common::{CommonRequest, REQUEST_ID_KEY};
pub use config::{Environment, ServiceEnv};
pub use error::{ApiResult, RequestError, BACKEND_ERROR_CODE};
pub use flat::FlatRequest;
pub use hooks::{BackendFailOutcome, DefaultHooks, RequestHooks};
pub use registry::{InflightGuard, InflightRegistry};
pub use request::RequestConfig;
pub use response::{BackendEnvelope, FlatResponse, ResponseBody, ResponseType, ServiceResponse};
pub use transport::TransportConfig;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::base_url::{get_service_base_url, ServiceBaseUrl, ServiceConfig};
    pub use crate::common::CommonRequest;
    pub use crate::config::{Environment, ServiceEnv};
    pub use crate::endpoints::AuthApi;
    pub use crate::error::{ApiResult, RequestError, BACKEND_ERROR_CODE};
    pub use crate::flat::FlatRequest;
    pub use crate::hooks::{BackendFailOutcome, DefaultHooks, RequestHooks};
    pub use crate::request::RequestConfig;
    pub use crate::response::{FlatResponse, ResponseType, ServiceResponse};
    pub use crate::service::{create_other_service_request, create_service_request, ServiceHooks};
    pub use crate::transport::TransportConfig;
}
