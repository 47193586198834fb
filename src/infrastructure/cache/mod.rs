//! Cache-aside storage for shorten results.
//!
//! Provides a [`CacheStore`] trait with two implementations:
//! - [`MemoryCache`] - In-process store with lazy expiry (default)
//! - [`RedisCache`] - Redis-backed store for sharing results across processes

mod memory_cache;
mod redis_cache;
mod service;

pub use memory_cache::{DEFAULT_MAX_ENTRIES, MemoryCache};
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheStore};
