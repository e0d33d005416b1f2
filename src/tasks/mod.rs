//! Background Tasks Module
//!
//! Contains background tasks that run periodically during a cache's lifetime.
//!
//! # Tasks
//! - Expiry pruning: Removes expired cache entries at a configured interval

mod prune;

pub use prune::{spawn_prune_task, Prune};
