//! LRU layer over a store backend

use std::collections::VecDeque;

use pailstore::{Result, Store};
use tracing::debug;

use crate::cache::Cache;
use crate::stats::CacheStats;

/// Bounded cache that evicts the least recently used key
///
/// Keeps a recency list alongside the wrapped store, most recent first.
/// The listed keys track the stored keys, and the list never outgrows the
/// configured capacity across puts. The list is not persisted: wrapping a
/// reopened disk store starts with an empty list, and prior residents
/// re-enter it as they are touched.
pub struct LruCache<S: Store> {
    store: S,
    capacity: usize,
    order: VecDeque<String>,
    stats: CacheStats,
}

impl<S: Store> LruCache<S> {
    /// Wrap a store in an LRU layer bounded to `capacity` keys
    pub fn new(store: S, capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be greater than 0");

        Self {
            store,
            capacity,
            order: VecDeque::with_capacity(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Number of keys in the recency list
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the recency list is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Hit/miss counters
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Release the layer and hand back the wrapped store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Move `key` to the most recent position
    ///
    /// Also admits a key the list does not know yet, such as a store hit
    /// after a reopen.
    fn touch(&mut self, key: &str) {
        self.order.retain(|k| k != key);
        self.order.push_front(key.to_string());
    }

    /// Remove the least recently used key from the list and the store
    fn evict_lru(&mut self) -> Result<()> {
        if let Some(victim) = self.order.pop_back() {
            debug!(key = %victim, "evicting least recently used key");
            self.store.remove(&victim)?;
            self.stats.record_eviction();
        }
        Ok(())
    }
}

impl<S: Store> Cache for LruCache<S> {
    type Value = S::Value;

    fn get(&mut self, key: &str) -> Result<Option<S::Value>> {
        let value = self.store.get(key)?;
        if value.is_some() {
            self.touch(key);
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        Ok(value)
    }

    fn put(&mut self, key: &str, value: S::Value) -> Result<()> {
        let existed = self.store.contains(key)?;
        if existed {
            self.touch(key);
        } else {
            self.order.push_front(key.to_string());
        }

        // Evict only once the incoming key is at the front, so an insert
        // can never evict itself.
        if self.order.len() > self.capacity {
            self.evict_lru()?;
        }

        match self.store.put(key, value) {
            Ok(()) => {
                self.stats.record_insert();
                Ok(())
            }
            Err(e) => {
                // Keep the list matching the store when a new key is
                // rejected.
                if !existed {
                    self.order.retain(|k| k != key);
                }
                Err(e)
            }
        }
    }

    fn remove(&mut self, key: &str) -> Result<Option<S::Value>> {
        self.order.retain(|k| k != key);
        self.store.remove(key)
    }

    fn contains(&mut self, key: &str) -> Result<bool> {
        self.store.contains(key)
    }
}
