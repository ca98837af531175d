//! Mini Cache - In-process key-value caches
//!
//! Provides a fixed-capacity cache with LRU eviction and an unbounded cache
//! with absolute-TTL expiration, plus a cancellable background sweeper that
//! reclaims expired entries.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{CacheStats, LruCache, TtlCache};
pub use clock::{Clock, MockClock, SystemClock};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::{spawn_sweeper, spawn_sweeper_from_config, SweeperHandle};
