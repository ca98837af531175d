//! Error types for the cache library
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use thiserror::Error;

// == Cache Error Enum ==
/// Configuration errors raised while constructing a cache or its sweeper.
///
/// Lookups and insertions never fail once a cache exists: a missing or
/// expired key is reported as `None`, not as an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// LRU capacity must be at least one entry
    #[error("Invalid capacity: {0} (must be positive)")]
    InvalidCapacity(usize),

    /// Sweep interval must be non-zero
    #[error("Invalid sweep interval: {0:?} (must be non-zero)")]
    InvalidInterval(Duration),
}

// == Result Type Alias ==
/// Convenience Result type for cache construction.
pub type Result<T> = std::result::Result<T, CacheError>;
