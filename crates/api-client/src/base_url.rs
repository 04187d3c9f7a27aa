//! Backend base URL resolution
//!
//! Derives the primary base URL and the named alternates from a
//! [`ServiceEnv`]. Alternates are configured as a JSON5 object such as
//! `{ demo: 'https://demo.example.com' }`. In development with the proxy
//! enabled every URL is replaced by a local path (`/proxy-default`,
//! `/proxy-<key>`) that a dev server forwards.

use crate::config::ServiceEnv;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, error};

/// Proxy pattern of the primary service, or of the alternate `key`
#[must_use]
pub fn create_proxy_pattern(key: Option<&str>) -> String {
    match key {
        None => "/proxy-default".to_string(),
        Some(key) => format!("/proxy-{key}"),
    }
}

/// Base URL and proxy pattern of one backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfigItem {
    /// Backend base URL
    pub base_url: String,
    /// Proxy pattern of the backend
    pub proxy_pattern: String,
}

/// Alternate backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherServiceConfigItem {
    /// Alternate service key
    pub key: String,
    /// Backend base URL
    pub base_url: String,
    /// Proxy pattern of the backend
    pub proxy_pattern: String,
}

/// All configured backends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Primary backend base URL
    pub base_url: String,
    /// Primary proxy pattern
    pub proxy_pattern: String,
    /// Alternates, ordered by key
    pub other: Vec<OtherServiceConfigItem>,
}

impl ServiceConfig {
    /// Build the service config from the environment
    pub fn from_env(env: &ServiceEnv) -> Self {
        let other = parse_other_base_url(&env.other_base_url)
            .into_iter()
            .map(|(key, base_url)| OtherServiceConfigItem {
                proxy_pattern: create_proxy_pattern(Some(&key)),
                key,
                base_url,
            })
            .collect();

        Self {
            base_url: env.base_url.clone(),
            proxy_pattern: create_proxy_pattern(None),
            other,
        }
    }

    /// The primary backend
    #[must_use]
    pub fn primary(&self) -> ServiceConfigItem {
        ServiceConfigItem {
            base_url: self.base_url.clone(),
            proxy_pattern: self.proxy_pattern.clone(),
        }
    }
}

/// Parse the alternate base URL map; a malformed string yields no alternates
pub fn parse_other_base_url(raw: &str) -> BTreeMap<String, String> {
    if raw.trim().is_empty() {
        debug!("No alternate service base URLs configured");
        return BTreeMap::new();
    }

    match json5::from_str::<BTreeMap<String, String>>(raw) {
        Ok(other) => other,
        Err(e) => {
            error!(value = %raw, error = %e, "Alternate service base URL is not a valid JSON5 object");
            BTreeMap::new()
        }
    }
}

/// Resolved base URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceBaseUrl {
    /// Primary base URL
    pub base_url: String,
    /// Alternate base URLs by key
    pub other_base_url: BTreeMap<String, String>,
}

/// Resolve base URLs, substituting proxy patterns when `is_proxy` is set
pub fn get_service_base_url(env: &ServiceEnv, is_proxy: bool) -> ServiceBaseUrl {
    let ServiceConfig {
        base_url,
        proxy_pattern,
        other,
    } = ServiceConfig::from_env(env);

    let other_base_url = other
        .into_iter()
        .map(|item| {
            let url = if is_proxy { item.proxy_pattern } else { item.base_url };
            (item.key, url)
        })
        .collect();

    ServiceBaseUrl {
        base_url: if is_proxy { proxy_pattern } else { base_url },
        other_base_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(other: &str) -> ServiceEnv {
        ServiceEnv::default()
            .with_base_url("https://api.example.com")
            .with_other_base_url(other)
    }

    #[test]
    fn test_proxy_pattern() {
        assert_eq!(create_proxy_pattern(None), "/proxy-default");
        assert_eq!(create_proxy_pattern(Some("demo")), "/proxy-demo");
    }

    #[test]
    fn test_alternates_keep_configured_keys() {
        let resolved = get_service_base_url(
            &env("{demo: 'https://demo.example.com', \"files\": \"https://files.example.com\"}"),
            false,
        );

        assert_eq!(resolved.base_url, "https://api.example.com");
        let keys: Vec<&str> = resolved.other_base_url.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["demo", "files"]);
        assert_eq!(resolved.other_base_url["demo"], "https://demo.example.com");
    }

    #[test]
    fn test_malformed_alternates_are_empty() {
        for raw in ["{demo: ", "[1, 2]", "{demo: 42}", "not json"] {
            let resolved = get_service_base_url(&env(raw), false);
            assert!(resolved.other_base_url.is_empty(), "{raw}");
            assert_eq!(resolved.base_url, "https://api.example.com");
        }
    }

    #[test]
    fn test_missing_alternates_are_empty() {
        let config = ServiceConfig::from_env(&env(""));
        assert!(config.other.is_empty());
        assert_eq!(config.primary().proxy_pattern, "/proxy-default");
    }

    #[test]
    fn test_proxy_replaces_every_url() {
        let resolved = get_service_base_url(
            &env("{demo: 'https://demo.example.com', files: 'https://files.example.com'}"),
            true,
        );

        assert_eq!(resolved.base_url, "/proxy-default");
        assert_eq!(resolved.other_base_url["demo"], "/proxy-demo");
        assert_eq!(resolved.other_base_url["files"], "/proxy-files");
    }
}
