//! # pailcache
//!
//! Bounded LRU cache over a [`pailstore`] backend.
//!
//! [`LruCache`] wraps any [`pailstore::Store`] and keeps a recency list of
//! the resident keys; an insert past the capacity evicts the least recently
//! used key from both the list and the store. [`disk_cache`] and
//! [`memory_cache`] build the two stock configurations.

#![warn(missing_docs)]

mod cache;
mod lru;
mod stats;

pub use cache::{disk_cache, memory_cache, Cache};
pub use lru::LruCache;
pub use stats::CacheStats;
