//! In-process cache with lazy expiry.

use async_trait::async_trait;
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use super::service::{CacheResult, CacheStore};
use crate::domain::cache_key::CacheKey;
use crate::domain::entities::ShortenResult;

/// Default upper bound on stored entries.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: ShortenResult,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) < self.ttl
    }
}

/// Concurrent in-memory cache.
///
/// There is no background sweeper: expired entries are removed when they are
/// looked up, and when an insert finds the store at capacity.
pub struct MemoryCache {
    entries: DashMap<CacheKey, CacheEntry>,
    max_entries: usize,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    /// Creates a cache holding at most `max_entries` results.
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Frees room for one insert: drops expired entries, then the oldest one.
    fn make_room(&self, now: Instant) {
        if self.entries.len() < self.max_entries {
            return;
        }

        self.entries.retain(|_, entry| entry.is_live(now));

        if self.entries.len() >= self.max_entries {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.created_at)
                .map(|entry| entry.key().clone());
            if let Some(key) = oldest {
                debug!("Cache EVICT (capacity): {}", key);
                self.entries.remove(&key);
            }
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &CacheKey) -> CacheResult<Option<ShortenResult>> {
        let now = Instant::now();

        let live = match self.entries.get(key) {
            Some(entry) if entry.is_live(now) => Some(entry.value.clone()),
            Some(_) => None,
            None => {
                debug!("Cache MISS: {}", key);
                return Ok(None);
            }
        };

        match live {
            Some(value) => {
                debug!("Cache HIT: {}", key);
                Ok(Some(value))
            }
            None => {
                self.entries.remove_if(key, |_, entry| !entry.is_live(now));
                debug!("Cache EXPIRED: {}", key);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &CacheKey, value: &ShortenResult, ttl: Duration) -> CacheResult<()> {
        let now = Instant::now();
        if !self.entries.contains_key(key) {
            self.make_room(now);
        }

        self.entries.insert(
            key.clone(),
            CacheEntry {
                value: value.clone(),
                created_at: now,
                ttl,
            },
        );
        debug!("Cache SET: {} (TTL: {}s)", key, ttl.as_secs());
        Ok(())
    }

    async fn clear(&self) -> CacheResult<usize> {
        let removed = self.entries.len();
        self.entries.clear();
        Ok(removed)
    }

    async fn len(&self) -> Option<usize> {
        Some(self.entries.len())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
