//! Cache store trait and error types.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::domain::cache_key::CacheKey;
use crate::domain::entities::ShortenResult;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Key → shorten result store with per-entry expiry.
///
/// Holds both successful and degraded results. An entry is valid while less
/// than its TTL has elapsed since it was written; expired entries behave as
/// absent.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::MemoryCache`] - in-process store with lazy eviction
/// - [`crate::infrastructure::cache::RedisCache`] - shared store for multi-process deployments
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Looks up a result.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(result))` on a hit with a live entry
    /// - `Ok(None)` on a miss or an expired entry
    ///
    /// # Errors
    ///
    /// Implementations should log backend errors and report a miss instead.
    async fn get(&self, key: &CacheKey) -> CacheResult<Option<ShortenResult>>;

    /// Stores a result for `ttl`.
    ///
    /// # Errors
    ///
    /// Should not propagate errors to callers; a failed write only costs a
    /// later upstream call.
    async fn set(&self, key: &CacheKey, value: &ShortenResult, ttl: Duration) -> CacheResult<()>;

    /// Removes every entry owned by this store.
    async fn clear(&self) -> CacheResult<usize>;

    /// Number of stored entries, when the backend can report it cheaply.
    async fn len(&self) -> Option<usize>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Backend name for health output.
    fn backend(&self) -> &'static str;
}
