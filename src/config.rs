//! Configuration Module
//!
//! Builder for the sizing and default eviction policy of a cache.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::EvictionPolicy;

/// Default initial allocation of the backing map.
pub const DEFAULT_CAPACITY_HINT: usize = 8;

/// Default interval between background pruning sweeps.
pub const DEFAULT_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Cache configuration parameters.
///
/// Built with the `with_*` methods before being handed to
/// [`Cache::new`](crate::Cache::new); it is read-only afterwards. No value is
/// validated: a `max_capacity` of zero simply makes every insert attempt an
/// eviction first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Initial allocation of the backing map
    pub capacity_hint: usize,
    /// Live entry count at which an insert evicts one entry first
    pub max_capacity: usize,
    /// Policy applied to entries set without their own TTL
    pub eviction_policy: EvictionPolicy,
    /// Interval between background sweeps when active pruning is enabled
    pub prune_interval: Duration,
}

impl CacheConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial allocation of the backing map.
    pub fn with_capacity_hint(mut self, size: usize) -> Self {
        self.capacity_hint = size;
        self
    }

    /// Sets the max capacity of the cache.
    ///
    /// Once reached, the entry expiring soonest is removed before an insert.
    /// If no entry has a TTL, the oldest entry is removed instead.
    pub fn with_max_capacity(mut self, size: usize) -> Self {
        self.max_capacity = size;
        self
    }

    /// Sets the default eviction policy.
    pub fn with_eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.eviction_policy = policy;
        self
    }

    /// Sets how often the background task sweeps expired entries.
    pub fn with_prune_interval(mut self, interval: Duration) -> Self {
        self.prune_interval = interval;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity_hint: DEFAULT_CAPACITY_HINT,
            max_capacity: usize::MAX,
            eviction_policy: EvictionPolicy::default(),
            prune_interval: DEFAULT_PRUNE_INTERVAL,
        }
    }
}
