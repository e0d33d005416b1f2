//! Error types for the cache
//!
//! Cache operations themselves never fail; absence is reported through
//! `Option`/`bool`. The only fallible step is constructing a cache that needs
//! a background task.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Active pruning was requested but there is no tokio runtime to host it
    #[error("Active pruning requires a running tokio runtime")]
    RuntimeUnavailable,
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
