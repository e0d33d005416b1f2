//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and capacity eviction.
//!
//! Entries are internal to the cache:
//!
//! ```compile_fail
//! use ttl_cache::cache::CacheEntry;
//! ```

mod entry;
mod policy;
mod store;


// Re-export public types
pub(crate) use entry::CacheEntry;
pub use policy::EvictionPolicy;
pub use store::Cache;
