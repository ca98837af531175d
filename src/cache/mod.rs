//! Cache Module
//!
//! Provides an LRU-evicting cache and an absolute-TTL cache.

mod entry;
mod lru;
mod stats;
mod ttl;


use std::time::Duration;

// Re-export public types
pub use lru::LruCache;
pub use stats::CacheStats;
pub use ttl::TtlCache;

// == Public Constants ==
/// Longest lifetime accepted by [`TtlCache::put_with_ttl`] (about 100 years)
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);
