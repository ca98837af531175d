//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time snapshot of cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of lookups that returned a value
    pub hits: u64,
    /// Number of lookups that found nothing (missing or expired)
    pub misses: u64,
    /// Number of entries removed by the cache itself (capacity or expiry)
    pub evictions: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Counter ==
/// Lock-free counters shared by concurrent callers.
#[derive(Debug, Default)]
pub(crate) struct StatsCounter {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl StatsCounter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_evictions(&self, count: u64) {
        self.evictions.fetch_add(count, Ordering::Relaxed);
    }

    /// Builds a snapshot with the caller-supplied entry count.
    pub(crate) fn snapshot(&self, total_entries: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            total_entries,
        }
    }
}
