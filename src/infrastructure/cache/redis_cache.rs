//! Redis-backed cache store.

use super::service::{CacheError, CacheResult, CacheStore};
use crate::domain::cache_key::CacheKey;
use crate::domain::entities::ShortenResult;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info, warn};

/// Connection attempts made at startup before giving up.
const CONNECT_ATTEMPTS: usize = 3;

/// Redis cache store shared between gateway processes.
///
/// Values are JSON-encoded [`ShortenResult`]s stored with `SET EX`, so Redis
/// enforces the TTL. All operations are fail-open: errors are logged but
/// reported as misses.
pub struct RedisCache {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// Retries the connection with jittered exponential backoff.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let strategy = ExponentialBackoff::from_millis(100)
            .map(jitter)
            .take(CONNECT_ATTEMPTS - 1);

        let manager = Retry::spawn(strategy, || {
            let client = client.clone();
            async move {
                ConnectionManager::new(client).await.inspect_err(|e| {
                    warn!("Redis connection attempt failed: {}", e);
                })
            }
        })
        .await
        .map_err(|e| CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            key_prefix: "shorten:".to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, key: &CacheKey) -> String {
        format!("{}{}", self.key_prefix, key.digest())
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &CacheKey) -> CacheResult<Option<ShortenResult>> {
        let redis_key = self.build_key(key);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&redis_key).await {
            Ok(Some(raw)) => match serde_json::from_str::<ShortenResult>(&raw) {
                Ok(result) => {
                    debug!("Cache HIT: {}", key);
                    Ok(Some(result))
                }
                Err(e) => {
                    warn!("Discarding undecodable cache entry for {}: {}", key, e);
                    Ok(None)
                }
            },
            Ok(None) => {
                debug!("Cache MISS: {}", key);
                Ok(None)
            }
            Err(e) => {
                error!("Redis GET error for {}: {}", key, e);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &CacheKey, value: &ShortenResult, ttl: Duration) -> CacheResult<()> {
        let redis_key = self.build_key(key);
        let mut conn = self.client.clone();
        // SET EX rejects a zero TTL
        let ttl_seconds = ttl.as_secs().max(1);

        let payload = serde_json::to_string(value)
            .map_err(|e| CacheError::OperationError(format!("Failed to encode entry: {}", e)))?;

        match conn
            .set_ex::<_, _, ()>(&redis_key, payload, ttl_seconds)
            .await
        {
            Ok(_) => {
                debug!("Cache SET: {} (TTL: {}s)", key, ttl_seconds);
                Ok(())
            }
            Err(e) => {
                warn!("Redis SET error for {}: {}", key, e);
                Ok(())
            }
        }
    }

    async fn clear(&self) -> CacheResult<usize> {
        let mut conn = self.client.clone();
        let pattern = format!("{}*", self.key_prefix);

        // Admin-only operation; KEYS is acceptable for the expected key count.
        let keys: Vec<String> = conn
            .keys(&pattern)
            .await
            .map_err(|e| CacheError::OperationError(format!("Redis KEYS failed: {}", e)))?;

        if keys.is_empty() {
            return Ok(0);
        }

        let deleted: usize = conn
            .del(&keys)
            .await
            .map_err(|e| CacheError::OperationError(format!("Redis DEL failed: {}", e)))?;

        info!("Cleared {} cached results from Redis", deleted);
        Ok(deleted)
    }

    async fn len(&self) -> Option<usize> {
        None
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
