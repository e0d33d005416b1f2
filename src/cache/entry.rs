//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A stored value and its timestamp.
///
/// For an expiring entry `stamp` is the instant it expires at. For a
/// non-expiring entry it is the time of creation or last refresh and is only
/// used to pick the oldest entry during capacity eviction.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    stamp: Instant,
    expires: bool,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry, expiring `ttl` after `now` if a TTL is given.
    ///
    /// A TTL too large to be represented as an instant yields an entry that
    /// never expires.
    pub fn new(value: V, now: Instant, ttl: Option<Duration>) -> Self {
        let deadline = ttl.and_then(|ttl| now.checked_add(ttl));

        Self {
            value,
            stamp: deadline.unwrap_or(now),
            expires: deadline.is_some(),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// An expiring entry is still live at exactly its expiry instant.
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires && self.stamp < now
    }

    /// Returns the expiry instant, or None if the entry never expires.
    #[cfg(test)]
    pub fn expires_at(&self) -> Option<Instant> {
        self.expires.then_some(self.stamp)
    }

    /// Creation or last refresh instant for expiring and non-expiring entries alike.
    pub(crate) fn stamp(&self) -> Instant {
        self.stamp
    }

    pub(crate) fn has_expiration(&self) -> bool {
        self.expires
    }

    // == Refresh ==
    /// Moves the timestamp to `now + ttl`, or to `now` without a TTL.
    ///
    /// Whatever lifetime the entry had left is discarded. Whether the entry
    /// expires at all does not change.
    pub fn refresh(&mut self, now: Instant, ttl: Option<Duration>) {
        self.stamp = ttl.and_then(|ttl| now.checked_add(ttl)).unwrap_or(now);
    }
}
