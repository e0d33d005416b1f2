//! Cache Store Module
//!
//! Main cache engine: a mutex-guarded map with TTL expiration, capacity
//! eviction and optional background pruning.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cache::CacheEntry;
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_prune_task, Prune};

type Entries<K, V> = HashMap<K, CacheEntry<V>>;

// == Cache ==
/// Thread-safe key-value cache with per-entry TTL.
///
/// Every operation holds a single exclusive lock for its whole duration.
/// Expired entries are swept lazily by lookups that miss, by [`size`] and by
/// [`keys`], and periodically by a background task when the eviction policy
/// enables active pruning.
///
/// When the cache is full, an insert first evicts the entry expiring soonest,
/// or the oldest entry if none of them expire.
///
/// [`size`]: Cache::size
/// [`keys`]: Cache::keys
pub struct Cache<K, V> {
    shared: Arc<Shared<K, V>>,
    pruner: Option<Pruner>,
}

/// State reachable from both the cache handle and its pruning task.
struct Shared<K, V> {
    entries: Mutex<Entries<K, V>>,
    config: CacheConfig,
}

struct Pruner {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
{
    // == Constructor ==
    /// Creates a new cache from `config`.
    ///
    /// If the eviction policy enables active pruning, a background task is
    /// spawned on the current tokio runtime and runs until the cache is
    /// dropped or [`shutdown`](Self::shutdown) is called.
    ///
    /// # Errors
    /// Returns [`CacheError::RuntimeUnavailable`] if active pruning is enabled
    /// and this is not called from within a tokio runtime.
    pub fn new(config: CacheConfig) -> Result<Self> {
        let prunes = config.eviction_policy.prunes_actively();
        let interval = config.prune_interval;
        let shared = Arc::new(Shared::new(config));

        let pruner = if prunes {
            Handle::try_current().map_err(|_| CacheError::RuntimeUnavailable)?;
            let token = CancellationToken::new();
            let handle = spawn_prune_task(shared.clone(), interval, token.clone());
            Some(Pruner { token, handle })
        } else {
            None
        };

        Ok(Self { shared, pruner })
    }

    // == Set ==
    /// Stores a value under `key`, overwriting any previous entry.
    ///
    /// The entry expires after the policy's default TTL, or never if the
    /// policy has none.
    pub fn set(&self, key: K, value: V) {
        let ttl = self.shared.config.eviction_policy.default_ttl();
        self.insert(key, value, ttl);
    }

    /// Stores a value under `key` that expires after `ttl`, overriding the
    /// policy's default TTL.
    pub fn set_with_ttl(&self, key: K, value: V, ttl: Duration) {
        self.insert(key, value, Some(ttl));
    }

    fn insert(&self, key: K, value: V, ttl: Option<Duration>) {
        let now = Instant::now();
        let max_capacity = self.shared.config.max_capacity;
        let mut entries = self.shared.entries.lock();

        if entries.len() >= max_capacity {
            sweep(&mut entries, now);
            if entries.len() >= max_capacity {
                evict_one(&mut entries);
            }
        }

        entries.insert(key, CacheEntry::new(value, now, ttl));
    }

    // == Get ==
    /// Returns a copy of the value under `key`, or None if it is absent or
    /// expired.
    ///
    /// A hit extends the entry's lifetime when the policy refreshes on get.
    /// A miss sweeps every expired entry.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let refresh = self.shared.config.eviction_policy.refreshes_on_get();
        self.lookup(key, refresh, V::clone)
    }

    // == Has ==
    /// Returns true if a live entry exists under `key`.
    ///
    /// Same expiry and refresh rules as [`get`](Self::get), driven by the
    /// policy's refresh-on-has flag.
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let refresh = self.shared.config.eviction_policy.refreshes_on_has();
        self.lookup(key, refresh, |_| ()).is_some()
    }

    fn lookup<Q, R>(&self, key: &Q, refresh: bool, read: impl FnOnce(&V) -> R) -> Option<R>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = Instant::now();
        let default_ttl = self.shared.config.eviction_policy.default_ttl();
        let mut entries = self.shared.entries.lock();

        let hit = match entries.get_mut(key) {
            Some(entry) if !entry.is_expired(now) => {
                if refresh {
                    entry.refresh(now, default_ttl);
                }
                Some(read(&entry.value))
            }
            _ => None,
        };

        if hit.is_none() {
            sweep(&mut entries, now);
        }
        hit
    }

    // == Delete ==
    /// Removes the entry under `key` and returns its value, if any.
    ///
    /// The value is returned even if the entry had already expired.
    pub fn delete<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shared.entries.lock().remove(key).map(|entry| entry.value)
    }

    // == Size ==
    /// Returns the number of entries that have not expired.
    pub fn size(&self) -> usize {
        let mut entries = self.shared.entries.lock();
        sweep(&mut entries, Instant::now());
        entries.len()
    }

    /// Returns true if no live entry remains.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&self) {
        let capacity_hint = self.shared.config.capacity_hint;
        *self.shared.entries.lock() = HashMap::with_capacity(capacity_hint);
    }

    // == Keys ==
    /// Returns the keys of all entries that have not expired, in no
    /// particular order.
    pub fn keys(&self) -> Vec<K> {
        let mut entries = self.shared.entries.lock();
        sweep(&mut entries, Instant::now());
        entries.keys().cloned().collect()
    }

    // == Prune Expired ==
    /// Removes all expired entries now and returns how many were removed.
    pub fn prune_expired(&self) -> usize {
        self.shared.prune_expired()
    }
}

impl<K, V> Cache<K, V> {
    /// Returns the configuration the cache was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.shared.config
    }

    /// Returns true while the background pruning task is running.
    pub fn is_pruning(&self) -> bool {
        self.pruner
            .as_ref()
            .is_some_and(|pruner| !pruner.token.is_cancelled() && !pruner.handle.is_finished())
    }

    /// Stops the background pruning task, if any. The cache stays usable and
    /// keeps sweeping expired entries lazily.
    pub fn shutdown(&self) {
        if let Some(pruner) = &self.pruner {
            pruner.token.cancel();
        }
    }
}

impl<K, V> Default for Cache<K, V> {
    fn default() -> Self {
        Self {
            shared: Arc::new(Shared::new(CacheConfig::default())),
            pruner: None,
        }
    }
}

impl<K, V> Drop for Cache<K, V> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<K, V> Shared<K, V> {
    fn new(config: CacheConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::with_capacity(config.capacity_hint)),
            config,
        }
    }
}

impl<K, V> Prune for Shared<K, V>
where
    K: Eq + Hash + Send + 'static,
    V: Send + 'static,
{
    fn prune_expired(&self) -> usize {
        let mut entries = self.entries.lock();
        sweep(&mut entries, Instant::now())
    }
}

// == Store Algorithms ==
/// Removes entries expired as of `now`, returning how many were removed.
fn sweep<K, V>(entries: &mut Entries<K, V>, now: Instant) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired(now));
    before - entries.len()
}

/// Removes exactly one entry to make room for an insert.
///
/// Expiring entries are always chosen over non-expiring ones; within a group
/// the earliest timestamp loses. Ties go to whichever entry the map yields
/// first.
fn evict_one<K, V>(entries: &mut Entries<K, V>) -> bool
where
    K: Eq + Hash + Clone,
{
    let victim = entries
        .iter()
        .min_by_key(|(_, entry)| (!entry.has_expiration(), entry.stamp()))
        .map(|(key, _)| key.clone());

    match victim {
        Some(key) => {
            let evicted = entries.remove(&key);
            debug!(
                expiring = evicted.as_ref().is_some_and(|entry| entry.has_expiration()),
                remaining = entries.len(),
                "Evicted entry to stay within max capacity"
            );
            true
        }
        None => false,
    }
}
