//! TTL Cache - an in-process generic key-value cache
//!
//! Provides per-entry TTL expiration, refresh-on-read policies, a capacity
//! bound with soonest-to-expire eviction and optional background pruning.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, EvictionPolicy};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
