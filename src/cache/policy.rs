//! Eviction Policy Module
//!
//! Default TTL and the refresh/pruning switches applied to a cache.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// == Eviction Policy ==
/// Default TTL plus independent behavior flags.
///
/// Flags can only be switched on. Once the policy is attached to a
/// [`CacheConfig`](crate::CacheConfig) it is shared by every entry of that cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvictionPolicy {
    default_ttl: Option<Duration>,
    refresh_on_get: bool,
    refresh_on_has: bool,
    active_pruning: bool,
}

impl EvictionPolicy {
    // == Constructor ==
    /// Creates a policy that gives every entry set without its own TTL a
    /// lifetime of `ttl`. Reads do not extend that lifetime unless
    /// [`refresh_on_get`](Self::refresh_on_get) or
    /// [`refresh_on_has`](Self::refresh_on_has) is enabled.
    pub fn new(ttl: Duration) -> Self {
        Self {
            default_ttl: Some(ttl),
            ..Self::default()
        }
    }

    /// Extends an entry's lifetime by the default TTL on every hit of `get`.
    pub fn refresh_on_get(mut self) -> Self {
        self.refresh_on_get = true;
        self
    }

    /// Extends an entry's lifetime by the default TTL on every hit of `has`.
    pub fn refresh_on_has(mut self) -> Self {
        self.refresh_on_has = true;
        self
    }

    /// Runs a background task that regularly sweeps expired entries.
    pub fn active_pruning(mut self) -> Self {
        self.active_pruning = true;
        self
    }

    // == Accessors ==
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    pub fn refreshes_on_get(&self) -> bool {
        self.refresh_on_get
    }

    pub fn refreshes_on_has(&self) -> bool {
        self.refresh_on_has
    }

    pub fn prunes_actively(&self) -> bool {
        self.active_pruning
    }
}
