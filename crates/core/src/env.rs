//! Key-value environment sources
//!
//! Configuration is read through [`EnvSource`] so the process environment
//! and in-memory maps are interchangeable.

use std::collections::{BTreeMap, HashMap};

/// A read-only source of environment values
pub trait EnvSource {
    /// Raw value for `key`, if set
    fn var(&self, key: &str) -> Option<String>;

    /// Value for `key`, treating blank values as unset
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Boolean flag; accepts `Y`, `yes`, `true` and `1` in any case
    fn flag(&self, key: &str) -> bool {
        self.non_empty(key)
            .is_some_and(|value| matches!(value.to_lowercase().as_str(), "y" | "yes" | "true" | "1"))
    }

    /// Comma separated list with empty items dropped
    fn list(&self, key: &str) -> Vec<String> {
        self.var(key)
            .map(|value| split_list(&value))
            .unwrap_or_default()
    }
}

/// The environment of the running process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<S: EnvSource + ?Sized> EnvSource for &S {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }
}

/// Split a comma separated value into trimmed, non-empty items
#[must_use]
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_non_empty_skips_blank() {
        let env = source(&[("A", "  "), ("B", " x ")]);
        assert_eq!(env.non_empty("A"), None);
        assert_eq!(env.non_empty("B").as_deref(), Some("x"));
        assert_eq!(env.non_empty("C"), None);
    }

    #[test]
    fn test_flag_values() {
        let env = source(&[("Y", "Y"), ("N", "N"), ("T", "true"), ("ONE", "1")]);
        assert!(env.flag("Y"));
        assert!(!env.flag("N"));
        assert!(env.flag("T"));
        assert!(env.flag("ONE"));
        assert!(!env.flag("MISSING"));
    }

    #[test]
    fn test_list_drops_empty_items() {
        let env = source(&[("CODES", "8888, 8889,,")]);
        assert_eq!(env.list("CODES"), vec!["8888", "8889"]);
        assert!(env.list("MISSING").is_empty());
    }
}
