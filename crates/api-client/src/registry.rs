//! In-flight request registry
//!
//! Maps request IDs to cancellation handles. A registry is a cheap `Clone`
//! handle over shared state, so one registry can be injected into several
//! factories or kept by the caller for teardown.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Registry of cancellation handles for outstanding calls
#[derive(Debug, Clone, Default)]
pub struct InflightRegistry {
    handles: Arc<Mutex<HashMap<String, CancellationToken>>>,
}

impl InflightRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CancellationToken>> {
        self.handles.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a handle for `request_id` and register it
    pub fn register(&self, request_id: &str) -> CancellationToken {
        let token = CancellationToken::new();
        self.lock().insert(request_id.to_string(), token.clone());
        token
    }

    /// Register `request_id` for the lifetime of the returned guard
    ///
    /// The entry is removed when the guard drops, including when the
    /// future holding it is dropped before completion.
    pub fn track(&self, request_id: &str) -> InflightGuard {
        let token = self.register(request_id);
        InflightGuard {
            registry: self.clone(),
            request_id: request_id.to_string(),
            token,
        }
    }

    /// Cancel one call and forget it; returns false when the ID is unknown
    pub fn cancel(&self, request_id: &str) -> bool {
        let token = self.lock().remove(request_id);
        match token {
            Some(token) => {
                token.cancel();
                debug!(request_id = %request_id, "Request cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancel every registered call and clear the registry
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<CancellationToken> = self.lock().drain().map(|(_, token)| token).collect();
        for token in &drained {
            token.cancel();
        }
        debug!(count = drained.len(), "All requests cancelled");
        drained.len()
    }

    /// Forget a call without cancelling it
    pub fn remove(&self, request_id: &str) -> Option<CancellationToken> {
        self.lock().remove(request_id)
    }

    /// Check if `request_id` is registered
    #[must_use]
    pub fn contains(&self, request_id: &str) -> bool {
        self.lock().contains_key(request_id)
    }

    /// Registered request IDs
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    /// Number of registered calls
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if no call is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Registry entry owned by one call
#[derive(Debug)]
pub struct InflightGuard {
    registry: InflightRegistry,
    request_id: String,
    token: CancellationToken,
}

impl InflightGuard {
    /// Cancellation handle of the tracked call
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        self.registry.remove(&self.request_id);
    }
}
