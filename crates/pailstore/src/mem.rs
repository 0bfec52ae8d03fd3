//! In-memory store backend

use std::collections::HashMap;

use ahash::RandomState;

use crate::error::Result;
use crate::store::Store;

/// Non-persistent store backed by a hash map
///
/// Implements the same contract as the disk store for configurations that
/// do not need their contents to outlive the process.
#[derive(Debug)]
pub struct MemStore<V> {
    map: HashMap<String, V, RandomState>,
}

impl<V> MemStore<V> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            map: HashMap::with_hasher(RandomState::new()),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<V> Default for MemStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Store for MemStore<V> {
    type Value = V;

    fn get(&mut self, key: &str) -> Result<Option<V>> {
        Ok(self.map.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: V) -> Result<()> {
        self.map.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<Option<V>> {
        Ok(self.map.remove(key))
    }

    fn contains(&mut self, key: &str) -> Result<bool> {
        Ok(self.map.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get() {
        let mut store = MemStore::new();

        store.put("a", 1).unwrap();
        assert_eq!(store.get("a").unwrap(), Some(1));
        assert_eq!(store.get("b").unwrap(), None);
    }

    #[test]
    fn test_overwrite() {
        let mut store = MemStore::new();

        store.put("a", 1).unwrap();
        store.put("a", 2).unwrap();

        assert_eq!(store.get("a").unwrap(), Some(2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut store = MemStore::new();

        store.put("a", 1).unwrap();
        assert_eq!(store.remove("a").unwrap(), Some(1));
        assert_eq!(store.remove("a").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_contains() {
        let mut store = MemStore::new();

        store.put("a", 1).unwrap();
        assert!(store.contains("a").unwrap());
        assert!(!store.contains("b").unwrap());
    }
}
