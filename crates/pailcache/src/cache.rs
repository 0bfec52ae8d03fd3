//! Cache abstraction and constructors

use std::path::Path;

use pailstore::{DiskStore, MemStore, Result, ValueCodec};

use crate::lru::LruCache;

/// Capability set exposed to cache callers
///
/// The same four operations as [`pailstore::Store`]; the cache layer adds
/// recency bookkeeping and a capacity bound on top.
pub trait Cache {
    /// Value type held by the cache
    type Value;

    /// Look up `key`, marking it most recently used on a hit
    fn get(&mut self, key: &str) -> Result<Option<Self::Value>>;

    /// Insert or replace `key`, evicting the least recently used key when
    /// the capacity would be exceeded
    fn put(&mut self, key: &str, value: Self::Value) -> Result<()>;

    /// Remove `key`, returning the value it held
    fn remove(&mut self, key: &str) -> Result<Option<Self::Value>>;

    /// Whether `key` is present; an existence check is not a use for
    /// recency purposes
    fn contains(&mut self, key: &str) -> Result<bool>;
}

/// Build a persistent cache named by `name`
///
/// Storage lands in `<name>.idx` and `<name>.dat` next to each other; the
/// codec decides how values are laid out inside records.
pub fn disk_cache<P, C>(name: P, capacity: usize, codec: C) -> Result<LruCache<DiskStore<C>>>
where
    P: AsRef<Path>,
    C: ValueCodec,
{
    let store = DiskStore::open(name, codec)?;
    Ok(LruCache::new(store, capacity))
}

/// Build a non-persistent cache over a fresh in-memory store
pub fn memory_cache<V: Clone>(capacity: usize) -> LruCache<MemStore<V>> {
    LruCache::new(MemStore::new(), capacity)
}
