//! LRU Cache Module
//!
//! Fixed-capacity cache that evicts the least recently used entry.
//!
//! Entries live in a dense arena (`Vec<Node>`) linked into a doubly-linked
//! recency list through `prev`/`next` indices. A `HashMap<K, usize>` maps each
//! key to its arena slot. The arena owns every entry; the index only stores
//! slot numbers, so every operation is a hash lookup plus a constant number
//! of relinks.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::mem;

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::stats::{CacheStats, StatsCounter};
use crate::config::Config;
use crate::error::{CacheError, Result};

/// Null link in the recency list.
const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    prev: usize,
    next: usize,
}

// == LRU State ==
/// Index and recency list, always mutated together under one lock.
///
/// Front (`head`) = most recently used, back (`tail`) = least recently used.
#[derive(Debug)]
struct LruState<K, V> {
    index: HashMap<K, usize>,
    nodes: Vec<Node<K, V>>,
    head: usize,
    tail: usize,
    capacity: usize,
}

impl<K, V> LruState<K, V>
where
    K: Hash + Eq + Clone,
{
    fn with_capacity(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            nodes: Vec::with_capacity(capacity),
            head: NIL,
            tail: NIL,
            capacity,
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);

        if prev != NIL {
            self.nodes[prev].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.nodes[next].prev = prev;
        } else {
            self.tail = prev;
        }

        self.nodes[idx].prev = NIL;
        self.nodes[idx].next = NIL;
    }

    fn push_front(&mut self, idx: usize) {
        self.nodes[idx].prev = NIL;
        self.nodes[idx].next = self.head;

        if self.head != NIL {
            self.nodes[self.head].prev = idx;
        } else {
            self.tail = idx;
        }
        self.head = idx;
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head != idx {
            self.unlink(idx);
            self.push_front(idx);
        }
    }

    /// Inserts or updates `key`, returning the entry evicted to make room.
    fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        // Update in place: capacity is never consulted
        if let Some(&idx) = self.index.get(&key) {
            self.nodes[idx].value = value;
            self.move_to_front(idx);
            return None;
        }

        if self.nodes.len() < self.capacity {
            let idx = self.nodes.len();
            self.nodes.push(Node {
                key: key.clone(),
                value,
                prev: NIL,
                next: NIL,
            });
            self.index.insert(key, idx);
            self.push_front(idx);
            return None;
        }

        // Full: recycle the tail slot for the new entry. capacity >= 1, so the
        // tail exists.
        let idx = self.tail;
        self.unlink(idx);
        let node = &mut self.nodes[idx];
        let evicted_key = mem::replace(&mut node.key, key.clone());
        let evicted_value = mem::replace(&mut node.value, value);
        self.index.remove(&evicted_key);
        self.index.insert(key, idx);
        self.push_front(idx);

        Some((evicted_key, evicted_value))
    }

    fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        Some(&self.nodes[idx].value)
    }

    fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        Some(&self.nodes[idx].value)
    }

    fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.index.remove(key)?;
        self.unlink(idx);

        let last = self.nodes.len() - 1;
        let node = self.nodes.swap_remove(idx);

        // The former last node now sits at `idx`; repoint its neighbours
        if idx != last {
            let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
            if prev != NIL {
                self.nodes[prev].next = idx;
            } else {
                self.head = idx;
            }
            if next != NIL {
                self.nodes[next].prev = idx;
            } else {
                self.tail = idx;
            }
            if let Some(slot) = self.index.get_mut::<K>(&self.nodes[idx].key) {
                *slot = idx;
            }
        }

        Some(node.value)
    }

    fn keys_by_recency(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.nodes.len());
        let mut cursor = self.head;
        while cursor != NIL {
            keys.push(self.nodes[cursor].key.clone());
            cursor = self.nodes[cursor].next;
        }
        keys
    }

    #[cfg(test)]
    fn assert_invariants(&self) {
        assert!(self.nodes.len() <= self.capacity, "arena exceeds capacity");
        assert_eq!(self.index.len(), self.nodes.len(), "index/arena size mismatch");

        let mut seen = 0;
        let mut prev = NIL;
        let mut cursor = self.head;
        while cursor != NIL {
            let node = &self.nodes[cursor];
            assert_eq!(node.prev, prev, "broken back link at slot {}", cursor);
            assert_eq!(self.index.get(&node.key), Some(&cursor), "stale index slot");
            prev = cursor;
            cursor = node.next;
            seen += 1;
        }
        assert_eq!(self.tail, prev, "tail is not the last reachable node");
        assert_eq!(seen, self.nodes.len(), "list does not cover the arena");
    }
}

// == LRU Cache ==
/// Thread-safe fixed-capacity LRU cache.
///
/// `get` counts as a use and reorders entries, so every operation takes the
/// same exclusive lock. Values are cloned out; store `Arc<T>` for large values.
///
/// ```
/// use mini_cache::LruCache;
///
/// let cache = LruCache::new(2).unwrap();
/// cache.put("a", 1);
/// cache.put("b", 2);
/// cache.get("a");
/// cache.put("c", 3);
///
/// assert_eq!(cache.get("a"), Some(1));
/// assert_eq!(cache.get("b"), None);
/// ```
#[derive(Debug)]
pub struct LruCache<K, V> {
    state: Mutex<LruState<K, V>>,
    capacity: usize,
    stats: StatsCounter,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        Ok(Self {
            state: Mutex::new(LruState::with_capacity(capacity)),
            capacity,
            stats: StatsCounter::new(),
        })
    }

    /// Creates a cache sized by `config.lru_capacity`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.lru_capacity)
    }

    // == Put ==
    /// Inserts or updates an entry and marks it most recently used.
    ///
    /// Updating an existing key never evicts. Inserting a new key into a full
    /// cache evicts the least recently used entry.
    pub fn put(&self, key: K, value: V) {
        let evicted = self.state.lock().put(key, value);

        // Dropped outside the lock
        if evicted.is_some() {
            self.stats.record_evictions(1);
            debug!(capacity = self.capacity, "Evicted least recently used entry");
        }
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = self.state.lock().get(key).cloned();
        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        value
    }

    // == Peek ==
    /// Returns the value for `key` without changing the recency order.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state.lock().peek(key).cloned()
    }

    // == Remove ==
    /// Removes `key`, returning its value if it was present.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state.lock().remove(key)
    }

    /// Keys ordered from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<K> {
        self.state.lock().keys_by_recency()
    }

    pub fn len(&self) -> usize {
        self.state.lock().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len())
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        self.state.lock().assert_invariants();
    }
}
