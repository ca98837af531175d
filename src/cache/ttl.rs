//! TTL Cache Module
//!
//! Unbounded cache whose entries carry an absolute expiration instant.
//!
//! Expired entries are invisible to `get` but keep their storage until
//! [`TtlCache::delete_expired`] reclaims them, either on demand or from the
//! background sweeper in [`crate::tasks`].

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

use crate::cache::entry::TtlEntry;
use crate::cache::stats::{CacheStats, StatsCounter};
use crate::cache::MAX_TTL;
use crate::clock::{Clock, SystemClock};

// == TTL Cache ==
/// Thread-safe cache with per-entry absolute expiry.
///
/// Storage is a sharded [`DashMap`], so callers touching unrelated keys do
/// not contend on a single lock. Every `put` stores a fresh entry tagged with
/// a unique generation; reclamation only removes an entry whose generation
/// still matches the one it observed as expired.
///
/// # Type Parameters
///
/// * `K` - Key type (must implement `Eq + Hash + Clone`)
/// * `V` - Value type (must implement `Clone`)
/// * `C` - Clock used to read "now" (defaults to `SystemClock`)
///
/// ```
/// use std::time::{Duration, Instant};
/// use mini_cache::TtlCache;
///
/// let cache = TtlCache::new();
/// cache.put("x", 1, Instant::now() + Duration::from_secs(3600));
/// cache.put("y", 2, Instant::now());
///
/// assert_eq!(cache.get("x"), Some(1));
/// assert_eq!(cache.get("y"), None);
/// assert_eq!(cache.delete_expired(), 1);
/// ```
#[derive(Debug)]
pub struct TtlCache<K, V, C = SystemClock>
where
    K: Eq + Hash,
{
    entries: DashMap<K, TtlEntry<V>>,
    clock: C,
    next_generation: AtomicU64,
    stats: StatsCounter,
}

impl<K, V> TtlCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty cache reading time from the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<K, V> Default for TtlCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> TtlCache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    /// Creates an empty cache reading time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            next_generation: AtomicU64::new(0),
            stats: StatsCounter::new(),
        }
    }

    // == Put ==
    /// Stores `value` under `key` until `expires_at`, replacing any previous
    /// entry wholesale.
    ///
    /// An instant in the past is accepted; the entry is then already expired.
    pub fn put(&self, key: K, value: V, expires_at: Instant) {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        self.entries
            .insert(key, TtlEntry::new(value, expires_at, generation));
    }

    /// Stores `value` under `key` for `ttl` from now, capped at [`MAX_TTL`].
    pub fn put_with_ttl(&self, key: K, value: V, ttl: Duration) {
        let expires_at = self.clock.now() + ttl.min(MAX_TTL);
        self.put(key, value, expires_at);
    }

    // == Get ==
    /// Returns the value for `key` if present and not yet expired.
    ///
    /// Never removes anything; expired entries wait for `delete_expired`.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        let value = self
            .entries
            .get(key)
            .and_then(|entry| (!entry.is_expired_at(now)).then(|| entry.value.clone()));

        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        value
    }

    /// Remaining lifetime of a live entry.
    pub fn time_to_live<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.remaining_at(now))
    }

    // == Remove ==
    /// Removes `key`, returning its value whether or not it had expired.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(key).map(|(_, entry)| entry.value)
    }

    // == Delete Expired ==
    /// Removes every entry expired as of the start of the scan and returns
    /// how many were removed.
    ///
    /// Candidates are collected first, then each is removed only if the
    /// stored entry is still the one seen as expired. An entry replaced by a
    /// concurrent `put` in between survives and is not counted.
    pub fn delete_expired(&self) -> usize {
        let now = self.clock.now();

        let expired: Vec<(K, u64)> = self
            .entries
            .iter()
            .filter(|item| item.value().is_expired_at(now))
            .map(|item| (item.key().clone(), item.value().generation))
            .collect();

        let removed = expired
            .into_iter()
            .filter(|(key, generation)| self.remove_generation(key, *generation))
            .count();

        if removed > 0 {
            self.stats.record_evictions(removed as u64);
            debug!(removed, remaining = self.entries.len(), "Reclaimed expired entries");
        }
        removed
    }

    /// Removes `key` only if its stored entry carries `generation`.
    fn remove_generation(&self, key: &K, generation: u64) -> bool {
        self.entries
            .remove_if(key, |_, entry| entry.generation == generation)
            .is_some()
    }

    /// Number of stored entries, including expired ones not yet reclaimed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Stats ==
    /// Returns current cache statistics. `evictions` counts reclaimed entries.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len())
    }
}
