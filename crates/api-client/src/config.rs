//! Service environment configuration
//!
//! Supports environment-based configuration with sensible defaults.

use crate::transport::{TransportConfig, DEFAULT_TIMEOUT};
use request_kit_core::env::{EnvSource, ProcessEnv};
use request_kit_core::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Primary backend base URL
pub const SERVICE_BASE_URL: &str = "SERVICE_BASE_URL";
/// JSON5 map of alternate service key to base URL
pub const OTHER_SERVICE_BASE_URL: &str = "OTHER_SERVICE_BASE_URL";
/// Backend success code
pub const SERVICE_SUCCESS_CODE: &str = "SERVICE_SUCCESS_CODE";
/// Codes handled by the modal logout flow
pub const SERVICE_MODAL_LOGOUT_CODES: &str = "SERVICE_MODAL_LOGOUT_CODES";
/// Codes handled by the token refresh flow
pub const SERVICE_EXPIRED_TOKEN_CODES: &str = "SERVICE_EXPIRED_TOKEN_CODES";
/// Development proxy switch (`Y`/`N`)
///
/// Not `HTTP_PROXY`, which reqwest reads as the system proxy.
pub const SERVICE_HTTP_PROXY: &str = "SERVICE_HTTP_PROXY";
/// Origin that relative proxy patterns are resolved against
pub const SERVICE_PROXY_ORIGIN: &str = "SERVICE_PROXY_ORIGIN";
/// Deployment environment
pub const REQUEST_KIT_ENV: &str = "REQUEST_KIT_ENV";
/// Timeout override in seconds
pub const SERVICE_TIMEOUT_SECS: &str = "SERVICE_TIMEOUT_SECS";
/// Transport retry count
pub const SERVICE_RETRIES: &str = "SERVICE_RETRIES";

/// Default backend success code
pub const DEFAULT_SUCCESS_CODE: &str = "0000";

/// Default origin of the development proxy server
pub const DEFAULT_PROXY_ORIGIN: &str = "http://localhost:9527";

/// Environment types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development; the only environment where proxying applies
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    #[default]
    Production,
}

impl Environment {
    /// Parse from an environment source
    pub fn from_source(source: &impl EnvSource) -> Self {
        match source
            .non_empty(REQUEST_KIT_ENV)
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "development" | "dev" | "local" => Self::Development,
            "staging" | "stage" => Self::Staging,
            _ => Self::Production,
        }
    }
}

/// Values read from the environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceEnv {
    /// Primary backend base URL
    pub base_url: String,
    /// Raw JSON5 string of alternate base URLs
    pub other_base_url: String,
    /// Backend success code
    pub success_code: String,
    /// Codes whose errors are left to the modal logout flow
    pub modal_logout_codes: Vec<String>,
    /// Codes whose errors are left to the token refresh flow
    pub expired_token_codes: Vec<String>,
    /// Whether the development proxy is requested
    pub http_proxy: bool,
    /// Origin of the development server that forwards proxy patterns
    pub proxy_origin: String,
    /// Current environment
    pub environment: Environment,
    /// Request timeout
    pub timeout: Duration,
    /// Transport retry count
    pub retries: u32,
}

impl Default for ServiceEnv {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            other_base_url: String::new(),
            success_code: DEFAULT_SUCCESS_CODE.to_string(),
            modal_logout_codes: Vec::new(),
            expired_token_codes: Vec::new(),
            http_proxy: false,
            proxy_origin: DEFAULT_PROXY_ORIGIN.to_string(),
            environment: Environment::default(),
            timeout: DEFAULT_TIMEOUT,
            retries: 0,
        }
    }
}

impl ServiceEnv {
    /// Read the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_source(&ProcessEnv)
    }

    /// Read any key-value source
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_source(source: &impl EnvSource) -> Self {
        let timeout = source
            .non_empty(SERVICE_TIMEOUT_SECS)
            .and_then(|s| s.parse().ok())
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);

        let retries = source
            .non_empty(SERVICE_RETRIES)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        Self {
            base_url: source.non_empty(SERVICE_BASE_URL).unwrap_or_default(),
            other_base_url: source.var(OTHER_SERVICE_BASE_URL).unwrap_or_default(),
            success_code: source
                .non_empty(SERVICE_SUCCESS_CODE)
                .unwrap_or_else(|| DEFAULT_SUCCESS_CODE.to_string()),
            modal_logout_codes: source.list(SERVICE_MODAL_LOGOUT_CODES),
            expired_token_codes: source.list(SERVICE_EXPIRED_TOKEN_CODES),
            http_proxy: source.flag(SERVICE_HTTP_PROXY),
            proxy_origin: source
                .non_empty(SERVICE_PROXY_ORIGIN)
                .unwrap_or_else(|| DEFAULT_PROXY_ORIGIN.to_string()),
            environment: Environment::from_source(source),
            timeout,
            retries,
        }
    }

    /// Whether base URLs should be replaced by proxy patterns
    ///
    /// Proxying only applies in development.
    #[must_use]
    pub fn is_http_proxy(&self) -> bool {
        self.environment == Environment::Development && self.http_proxy
    }

    /// Absolute form of `base_url`
    ///
    /// Relative proxy patterns such as `/proxy-default` are joined to the
    /// proxy origin; other URLs are returned unchanged.
    #[must_use]
    pub fn absolute_base_url(&self, base_url: &str) -> String {
        if base_url.starts_with('/') {
            format!("{}{}", self.proxy_origin.trim_end_matches('/'), base_url)
        } else {
            base_url.to_string()
        }
    }

    /// Transport settings for `base_url` using this environment's timeout and retries
    #[must_use]
    pub fn transport_config(&self, base_url: impl AsRef<str>) -> TransportConfig {
        TransportConfig::new(self.absolute_base_url(base_url.as_ref()))
            .with_timeout(self.timeout)
            .with_retry(RetryConfig::with_retries(self.retries))
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set the alternate base URL string
    #[must_use]
    pub fn with_other_base_url(mut self, raw: impl Into<String>) -> Self {
        self.other_base_url = raw.into();
        self
    }

    /// Builder-style method to set the success code
    #[must_use]
    pub fn with_success_code(mut self, code: impl Into<String>) -> Self {
        self.success_code = code.into();
        self
    }

    /// Builder-style method to enable the development proxy
    #[must_use]
    pub fn with_proxy(mut self, environment: Environment, enabled: bool) -> Self {
        self.environment = environment;
        self.http_proxy = enabled;
        self
    }

    /// Builder-style method to set the proxy origin
    #[must_use]
    pub fn with_proxy_origin(mut self, origin: impl Into<String>) -> Self {
        self.proxy_origin = origin.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let env = ServiceEnv::from_source(&source(&[]));
        assert_eq!(env.success_code, "0000");
        assert_eq!(env.timeout, Duration::from_secs(10));
        assert_eq!(env.retries, 0);
        assert_eq!(env.environment, Environment::Production);
        assert!(!env.is_http_proxy());
    }

    #[test]
    fn test_reads_all_keys() {
        let env = ServiceEnv::from_source(&source(&[
            (SERVICE_BASE_URL, "https://api.example.com"),
            (OTHER_SERVICE_BASE_URL, "{demo: 'https://demo.example.com'}"),
            (SERVICE_SUCCESS_CODE, "200"),
            (SERVICE_MODAL_LOGOUT_CODES, "7777,7778"),
            (SERVICE_EXPIRED_TOKEN_CODES, "9999"),
            (SERVICE_HTTP_PROXY, "Y"),
            (SERVICE_PROXY_ORIGIN, "http://127.0.0.1:3000"),
            (REQUEST_KIT_ENV, "dev"),
            (SERVICE_TIMEOUT_SECS, "5"),
            (SERVICE_RETRIES, "2"),
        ]));

        assert_eq!(env.base_url, "https://api.example.com");
        assert!(env.other_base_url.contains("demo"));
        assert_eq!(env.success_code, "200");
        assert_eq!(env.modal_logout_codes, vec!["7777", "7778"]);
        assert_eq!(env.expired_token_codes, vec!["9999"]);
        assert!(env.is_http_proxy());
        assert_eq!(env.proxy_origin, "http://127.0.0.1:3000");
        assert_eq!(env.timeout, Duration::from_secs(5));
        assert_eq!(env.retries, 2);
    }

    #[test]
    fn test_proxy_requires_development() {
        let env = ServiceEnv::default().with_proxy(Environment::Production, true);
        assert!(!env.is_http_proxy());

        let env = ServiceEnv::default().with_proxy(Environment::Development, true);
        assert!(env.is_http_proxy());
    }

    #[test]
    fn test_system_proxy_variable_is_not_the_flag() {
        let env = ServiceEnv::from_source(&source(&[
            ("HTTP_PROXY", "Y"),
            (REQUEST_KIT_ENV, "development"),
        ]));
        assert!(!env.http_proxy);
        assert!(!env.is_http_proxy());
    }

    #[test]
    fn test_proxy_patterns_resolve_against_origin() {
        let env = ServiceEnv::default().with_proxy_origin("http://localhost:8080/");
        assert_eq!(env.absolute_base_url("/proxy-default"), "http://localhost:8080/proxy-default");
        assert_eq!(env.absolute_base_url("https://api.example.com"), "https://api.example.com");
        assert_eq!(env.absolute_base_url(""), "");

        let config = env.transport_config("/proxy-demo");
        assert_eq!(config.base_url, "http://localhost:8080/proxy-demo");
        assert_eq!(ServiceEnv::default().absolute_base_url("/proxy-default"), "http://localhost:9527/proxy-default");
    }

    #[test]
    fn test_transport_config() {
        let env = ServiceEnv {
            timeout: Duration::from_secs(3),
            retries: 1,
            ..ServiceEnv::default()
        };
        let config = env.transport_config("https://api.example.com");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.retry.max_attempts(), 2);
    }
}
