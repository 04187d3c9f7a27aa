//! Core utilities for request-kit
//!
//! This crate provides the pieces shared by the client, telemetry and CLI crates:
//!
//! - **Retry policy**: retry count with exponential backoff and jitter
//! - **Environment sources**: process environment or in-memory maps behind one trait
//!
//! # Example
//!
//! ```rust
//! use request_kit_core::{env::EnvSource, retry::RetryConfig};
//! use std::collections::HashMap;
//!
//! let mut vars = HashMap::new();
//! vars.insert("SERVICE_RETRIES".to_string(), "2".to_string());
//!
//! let retries = vars
//!     .non_empty("SERVICE_RETRIES")
//!     .and_then(|v| v.parse().ok())
//!     .unwrap_or(0);
//! assert_eq!(RetryConfig::with_retries(retries).max_attempts(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod env;
pub mod retry;

pub use env::{EnvSource, ProcessEnv};
pub use retry::RetryConfig;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::env::{split_list, EnvSource, ProcessEnv};
    pub use crate::retry::RetryConfig;
}
