//! Rate-limited, cache-aside shortening client.
//!
//! [`ShortenerClient::shorten`] is the single point where every failure mode
//! of the provider converges into either a shortened result or a degraded
//! result carrying the long URL. It never returns an error.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::domain::alias_policy::AliasPolicy;
use crate::domain::cache_key::CacheKey;
use crate::domain::entities::{FailureReason, ShortenOptions, ShortenResult};
use crate::domain::rate_limiter::{RateLimitStatus, RateLimiter};
use crate::domain::upstream::{CreateLinkRequest, CreatedLink, ShortenProvider, UpstreamError};
use crate::infrastructure::cache::CacheStore;
use crate::utils::url_normalizer::normalize_url;

/// Default bound on a single provider call.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);
/// Default lifetime of cached successes.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
/// Default lifetime of cached degraded results.
pub const DEFAULT_FALLBACK_TTL: Duration = Duration::from_secs(15 * 60);

/// Tunables of the shortener client.
#[derive(Debug, Clone)]
pub struct ShortenerSettings {
    /// Short domain requested when the caller does not pick one.
    pub default_domain: String,
    pub upstream_timeout: Duration,
    pub cache_ttl: Duration,
    pub fallback_ttl: Duration,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self {
            default_domain: "tinyurl.com".to_string(),
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            fallback_ttl: DEFAULT_FALLBACK_TTL,
        }
    }
}

/// Most recent degraded outcome, for diagnostics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastFailure {
    pub reason: FailureReason,
    pub long_url: String,
    pub at: DateTime<Utc>,
}

/// Counters since process start.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStats {
    pub requests: u64,
    pub cache_hits: u64,
    pub upstream_calls: u64,
    pub shortened: u64,
    pub degraded: u64,
    pub rate_limited: u64,
    pub last_failure: Option<LastFailure>,
}

#[derive(Default)]
struct Counters {
    requests: AtomicU64,
    cache_hits: AtomicU64,
    upstream_calls: AtomicU64,
    shortened: AtomicU64,
    degraded: AtomicU64,
    rate_limited: AtomicU64,
    last_failure: Mutex<Option<LastFailure>>,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failure(&self, long_url: &str, reason: FailureReason) {
        Self::bump(&self.degraded);
        if reason == FailureReason::RateLimited {
            Self::bump(&self.rate_limited);
        }
        *self.last_failure.lock() = Some(LastFailure {
            reason,
            long_url: long_url.to_string(),
            at: Utc::now(),
        });
    }

    fn snapshot(&self) -> ClientStats {
        ClientStats {
            requests: self.requests.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            upstream_calls: self.upstream_calls.load(Ordering::Relaxed),
            shortened: self.shortened.load(Ordering::Relaxed),
            degraded: self.degraded.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            last_failure: self.last_failure.lock().clone(),
        }
    }
}

/// Gateway client in front of the shortening provider.
///
/// Owns the cache and rate limiter it uses; construct one per process and
/// share it through [`crate::state::AppState`].
///
/// # Request Flow
///
/// 1. Normalize the long URL and build a [`CacheKey`]
/// 2. Return a live cache entry if there is one (`from_cache = true`)
/// 3. Join an identical in-flight request, or become its leader
/// 4. Ask the [`RateLimiter`] for admission; a denial degrades immediately and is not cached
/// 5. Call the provider with a bounded timeout, retrying once on alias conflicts
/// 6. Cache the outcome (successes for `cache_ttl`, degraded results for `fallback_ttl`)
pub struct ShortenerClient {
    provider: Option<Arc<dyn ShortenProvider>>,
    cache: Arc<dyn CacheStore>,
    rate_limiter: Arc<RateLimiter>,
    alias_policy: AliasPolicy,
    settings: ShortenerSettings,
    in_flight: DashMap<CacheKey, Arc<OnceCell<ShortenResult>>>,
    counters: Counters,
}

impl ShortenerClient {
    /// Creates a client.
    ///
    /// `provider = None` runs the gateway as a pass-through that always
    /// answers with the long URL.
    pub fn new(
        provider: Option<Arc<dyn ShortenProvider>>,
        cache: Arc<dyn CacheStore>,
        rate_limiter: Arc<RateLimiter>,
        alias_policy: AliasPolicy,
        settings: ShortenerSettings,
    ) -> Self {
        match &provider {
            Some(p) => info!("Shortener provider: {}", p.name()),
            None => warn!("No shortener API key configured; running as pass-through"),
        }

        Self {
            provider,
            cache,
            rate_limiter,
            alias_policy,
            settings,
            in_flight: DashMap::new(),
            counters: Counters::default(),
        }
    }

    /// Shortens a long URL. Never fails.
    ///
    /// Degraded results carry the caller's `long_url`, unmodified, as
    /// `short_url`, so callers can display the returned URL unconditionally.
    /// Normalization only affects the cache key and the upstream request.
    pub async fn shorten(&self, long_url: &str, options: &ShortenOptions) -> ShortenResult {
        Counters::bump(&self.counters.requests);

        let normalized = match normalize_url(long_url) {
            Ok(url) => url,
            Err(e) => {
                debug!("Not shortening invalid URL {:?}: {}", long_url, e);
                return self.finish_degraded(long_url.to_string(), FailureReason::InvalidUrl);
            }
        };

        let key = CacheKey::new(normalized, options);

        if let Some(hit) = self.lookup(&key).await {
            Counters::bump(&self.counters.cache_hits);
            metrics::counter!("shortener_requests_total", "outcome" => "cache_hit").increment(1);
            return hit.cached().for_request(long_url);
        }

        let Some(provider) = self.provider.clone() else {
            return self.finish_degraded(long_url.to_string(), FailureReason::NotConfigured);
        };

        let cell = self
            .in_flight
            .entry(key.clone())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        let result = cell
            .get_or_init(|| self.shorten_uncached(&key, provider.as_ref()))
            .await
            .clone();

        self.in_flight
            .remove_if(&key, |_, existing| Arc::ptr_eq(existing, &cell));

        result.for_request(long_url)
    }

    /// Current rate-limit window snapshot.
    pub fn rate_limit_status(&self) -> RateLimitStatus {
        self.rate_limiter.status()
    }

    /// Counters since process start.
    pub fn stats(&self) -> ClientStats {
        self.counters.snapshot()
    }

    /// Whether a provider (API key) is configured.
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider_name(&self) -> Option<&'static str> {
        self.provider.as_ref().map(|p| p.name())
    }

    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    async fn lookup(&self, key: &CacheKey) -> Option<ShortenResult> {
        match self.cache.get(key).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!("Cache lookup failed for {}: {}", key, e);
                None
            }
        }
    }

    async fn store(&self, key: &CacheKey, result: &ShortenResult, ttl: Duration) {
        if let Err(e) = self.cache.set(key, result, ttl).await {
            warn!("Cache write failed for {}: {}", key, e);
        }
    }

    /// Rate-limited provider call with fallback; runs once per in-flight key.
    async fn shorten_uncached(&self, key: &CacheKey, provider: &dyn ShortenProvider) -> ShortenResult {
        let long_url = key.long_url().to_string();

        if !self.rate_limiter.try_acquire() {
            warn!("Rate limit reached; returning long URL for {}", long_url);
            return self.finish_degraded(long_url, FailureReason::RateLimited);
        }

        match self.create_with_retry(key, provider).await {
            Ok(link) => {
                info!("Shortened {} -> {}", long_url, link.short_url);
                let result = ShortenResult::shortened(long_url, link.short_url, link.alias);
                Counters::bump(&self.counters.shortened);
                metrics::counter!("shortener_requests_total", "outcome" => "shortened")
                    .increment(1);
                self.store(key, &result, self.settings.cache_ttl).await;
                result
            }
            Err(reason) => {
                let result = self.finish_degraded(long_url, reason);
                if reason.is_cacheable() {
                    self.store(key, &result, self.settings.fallback_ttl).await;
                }
                result
            }
        }
    }

    /// At most two provider calls.
    ///
    /// Without an explicit alias, the first call lets the provider generate
    /// one and an alias conflict is retried with the policy-derived alias.
    /// With an explicit alias, a conflict is retried with provider
    /// auto-generation. Any other failure ends the attempt immediately.
    async fn create_with_retry(
        &self,
        key: &CacheKey,
        provider: &dyn ShortenProvider,
    ) -> Result<CreatedLink, FailureReason> {
        let explicit_alias = key.alias().map(str::to_string);
        let request = CreateLinkRequest {
            url: key.long_url().to_string(),
            domain: key
                .domain()
                .unwrap_or(&self.settings.default_domain)
                .to_string(),
            alias: explicit_alias.clone(),
        };

        let conflict = match self.call_provider(provider, request.clone()).await {
            Ok(link) => return Ok(link),
            Err(UpstreamError::AliasConflict(message)) => message,
            Err(e) => {
                warn!("Shortening {} failed: {}", request.url, e);
                return Err(e.failure_reason());
            }
        };

        let retry_alias = match explicit_alias {
            Some(_) => None,
            None => match self.alias_policy.derive_alias(&request.url) {
                Some(alias) => Some(alias),
                None => {
                    warn!(
                        "Alias conflict for {} and no alias can be derived: {}",
                        request.url, conflict
                    );
                    return Err(FailureReason::AliasConflict);
                }
            },
        };

        debug!(
            "Alias conflict for {} ({}); retrying with alias {:?}",
            request.url, conflict, retry_alias
        );

        if !self.rate_limiter.try_acquire() {
            return Err(FailureReason::RateLimited);
        }

        let retry = CreateLinkRequest {
            alias: retry_alias,
            ..request
        };

        self.call_provider(provider, retry).await.map_err(|e| {
            warn!("Retry for {} failed: {}", key.long_url(), e);
            e.failure_reason()
        })
    }

    async fn call_provider(
        &self,
        provider: &dyn ShortenProvider,
        request: CreateLinkRequest,
    ) -> Result<CreatedLink, UpstreamError> {
        Counters::bump(&self.counters.upstream_calls);

        match tokio::time::timeout(self.settings.upstream_timeout, provider.create(request)).await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(UpstreamError::Timeout),
        }
    }

    fn finish_degraded(&self, long_url: String, reason: FailureReason) -> ShortenResult {
        self.counters.record_failure(&long_url, reason);
        metrics::counter!("shortener_requests_total", "outcome" => reason.as_str()).increment(1);
        ShortenResult::degraded(long_url, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::upstream::MockShortenProvider;
    use crate::infrastructure::cache::MemoryCache;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    const URL: &str = "https://example.com/blog/my-post";

    fn client_with(
        provider: Option<Arc<dyn ShortenProvider>>,
        max_requests: usize,
    ) -> (ShortenerClient, Arc<MemoryCache>, Arc<RateLimiter>) {
        let cache = Arc::new(MemoryCache::new());
        let limiter = Arc::new(RateLimiter::new(max_requests, Duration::from_secs(60)));
        let client = ShortenerClient::new(
            provider,
            cache.clone(),
            limiter.clone(),
            AliasPolicy::new("blog", "blog"),
            ShortenerSettings::default(),
        );
        (client, cache, limiter)
    }

    fn created(short: &str, alias: &str) -> CreatedLink {
        CreatedLink {
            short_url: short.to_string(),
            alias: Some(alias.to_string()),
        }
    }

    /// Provider that sleeps before answering, counting calls.
    struct SlowProvider {
        delay: Duration,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ShortenProvider for SlowProvider {
        async fn create(&self, request: CreateLinkRequest) -> Result<CreatedLink, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(CreatedLink {
                short_url: format!("https://tinyurl.com/{}", self.calls.load(Ordering::SeqCst)),
                alias: request.alias,
            })
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_is_cached_and_idempotent() {
        let mut mock = MockShortenProvider::new();
        mock.expect_create()
            .times(1)
            .returning(|_| Ok(created("https://tinyurl.com/abc", "abc")));
        mock.expect_name().return_const("mock");

        let (client, _, limiter) = client_with(Some(Arc::new(mock)), 10);

        let first = client.shorten(URL, &ShortenOptions::default()).await;
        let second = client.shorten(URL, &ShortenOptions::default()).await;

        assert!(first.succeeded);
        assert!(!first.from_cache);
        assert_eq!(first.short_url, "https://tinyurl.com/abc");

        assert!(second.from_cache);
        assert_eq!(second.short_url, first.short_url);
        assert_eq!(second.alias, first.alias);
        assert_eq!(limiter.status().requests_in_window, 1);

        let stats = client.stats();
        assert_eq!(stats.requests, 2);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.upstream_calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_lets_provider_generate_alias() {
        let mut mock = MockShortenProvider::new();
        mock.expect_create()
            .withf(|req| {
                req.alias.is_none() && req.domain == "tinyurl.com" && req.url == URL
            })
            .times(1)
            .returning(|_| Ok(created("https://tinyurl.com/x1", "x1")));
        mock.expect_name().return_const("mock");

        let (client, _, _) = client_with(Some(Arc::new(mock)), 10);
        let result = client.shorten(URL, &ShortenOptions::default()).await;

        assert!(result.succeeded);
        assert_eq!(result.alias.as_deref(), Some("x1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_result_is_not_cached() {
        let mut mock = MockShortenProvider::new();
        mock.expect_create().times(0);
        mock.expect_name().return_const("mock");

        let (client, cache, _) = client_with(Some(Arc::new(mock)), 0);
        let result = client.shorten(URL, &ShortenOptions::default()).await;

        assert!(!result.succeeded);
        assert_eq!(result.short_url, URL);
        assert_eq!(result.error_reason, Some(FailureReason::RateLimited));
        assert_eq!(cache.len().await, Some(0));
        assert_eq!(client.stats().rate_limited, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_alias_conflict_retries_with_derived_alias() {
        let mut mock = MockShortenProvider::new();
        mock.expect_create()
            .withf(|req| req.alias.is_none())
            .times(1)
            .returning(|_| Err(UpstreamError::AliasConflict("taken".into())));
        mock.expect_create()
            .withf(|req| req.alias.as_deref() == Some("blog-my-post"))
            .times(1)
            .returning(|_| Ok(created("https://tinyurl.com/blog-my-post", "blog-my-post")));
        mock.expect_name().return_const("mock");

        let (client, _, limiter) = client_with(Some(Arc::new(mock)), 10);
        let result = client.shorten(URL, &ShortenOptions::default()).await;

        assert!(result.succeeded);
        assert_eq!(result.alias.as_deref(), Some("blog-my-post"));
        assert_eq!(limiter.status().requests_in_window, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_alias_conflict_retries_with_auto_generation() {
        let mut mock = MockShortenProvider::new();
        mock.expect_create()
            .withf(|req| req.alias.as_deref() == Some("wanted"))
            .times(1)
            .returning(|_| Err(UpstreamError::AliasConflict("taken".into())));
        mock.expect_create()
            .withf(|req| req.alias.is_none())
            .times(1)
            .returning(|_| Ok(created("https://tinyurl.com/auto", "auto")));
        mock.expect_name().return_const("mock");

        let (client, _, _) = client_with(Some(Arc::new(mock)), 10);
        let options = ShortenOptions {
            domain: None,
            alias: Some("wanted".to_string()),
        };
        let result = client.shorten(URL, &options).await;

        assert!(result.succeeded);
        assert_eq!(result.short_url, "https://tinyurl.com/auto");
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_alias_conflict_degrades_and_is_cached() {
        let mut mock = MockShortenProvider::new();
        mock.expect_create()
            .times(2)
            .returning(|_| Err(UpstreamError::AliasConflict("taken".into())));
        mock.expect_name().return_const("mock");

        let (client, _, _) = client_with(Some(Arc::new(mock)), 10);
        let first = client.shorten(URL, &ShortenOptions::default()).await;
        let second = client.shorten(URL, &ShortenOptions::default()).await;

        assert_eq!(first.error_reason, Some(FailureReason::AliasConflict));
        assert_eq!(first.short_url, URL);
        assert!(second.from_cache);
        assert_eq!(second.error_reason, Some(FailureReason::AliasConflict));
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_failures_are_not_retried() {
        let mut mock = MockShortenProvider::new();
        mock.expect_create().times(1).returning(|_| {
            Err(UpstreamError::Rejected {
                code: 3,
                message: "Invalid URL".into(),
            })
        });
        mock.expect_name().return_const("mock");

        let (client, _, _) = client_with(Some(Arc::new(mock)), 10);
        let result = client.shorten(URL, &ShortenOptions::default()).await;

        assert!(!result.succeeded);
        assert_eq!(result.short_url, URL);
        assert_eq!(result.error_reason, Some(FailureReason::UpstreamRejected));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_fallback_is_cached() {
        let mut mock = MockShortenProvider::new();
        mock.expect_create()
            .times(1)
            .returning(|_| Err(UpstreamError::Unavailable("connection refused".into())));
        mock.expect_name().return_const("mock");

        let (client, _, limiter) = client_with(Some(Arc::new(mock)), 10);
        let first = client.shorten(URL, &ShortenOptions::default()).await;
        let second = client.shorten(URL, &ShortenOptions::default()).await;

        assert_eq!(first.error_reason, Some(FailureReason::UpstreamUnavailable));
        assert!(second.from_cache);
        assert_eq!(second.short_url, URL);
        assert_eq!(limiter.status().requests_in_window, 1);

        let last = client.stats().last_failure.unwrap();
        assert_eq!(last.reason, FailureReason::UpstreamUnavailable);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_expires_before_success_ttl() {
        let mut mock = MockShortenProvider::new();
        let calls = AtomicUsize::new(0);
        mock.expect_create().times(2).returning(move |_| {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(UpstreamError::Unavailable("down".into()))
            } else {
                Ok(created("https://tinyurl.com/back", "back"))
            }
        });
        mock.expect_name().return_const("mock");

        let (client, _, _) = client_with(Some(Arc::new(mock)), 10);

        let degraded = client.shorten(URL, &ShortenOptions::default()).await;
        assert!(!degraded.succeeded);

        tokio::time::advance(DEFAULT_FALLBACK_TTL + Duration::from_secs(1)).await;

        let recovered = client.shorten(URL, &ShortenOptions::default()).await;
        assert!(recovered.succeeded);
        assert!(!recovered.from_cache);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_degrades() {
        let provider = Arc::new(SlowProvider {
            delay: Duration::from_secs(30),
            calls: AtomicUsize::new(0),
        });

        let (client, _, _) = client_with(Some(provider.clone()), 10);
        let result = client.shorten(URL, &ShortenOptions::default()).await;

        assert!(!result.succeeded);
        assert_eq!(result.short_url, URL);
        assert_eq!(result.error_reason, Some(FailureReason::UpstreamTimeout));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_requests_share_one_upstream_call() {
        let provider = Arc::new(SlowProvider {
            delay: Duration::from_millis(500),
            calls: AtomicUsize::new(0),
        });

        let (client, _, limiter) = client_with(Some(provider.clone()), 10);
        let options = ShortenOptions::default();

        let (a, b, c) = tokio::join!(
            client.shorten(URL, &options),
            client.shorten(URL, &options),
            client.shorten(URL, &options),
        );

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(limiter.status().requests_in_window, 1);
        assert!(a.succeeded && b.succeeded && c.succeeded);
        assert_eq!(a.short_url, b.short_url);
        assert_eq!(b.short_url, c.short_url);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pass_through_without_provider() {
        let (client, cache, limiter) = client_with(None, 10);
        let result = client.shorten(URL, &ShortenOptions::default()).await;

        assert!(!client.is_configured());
        assert_eq!(result.short_url, URL);
        assert_eq!(result.error_reason, Some(FailureReason::NotConfigured));
        assert_eq!(limiter.status().requests_in_window, 0);
        assert_eq!(cache.len().await, Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_url_degrades_to_input() {
        let mut mock = MockShortenProvider::new();
        mock.expect_create().times(0);
        mock.expect_name().return_const("mock");

        let (client, _, _) = client_with(Some(Arc::new(mock)), 10);
        let result = client.shorten("mailto:me@example.com", &ShortenOptions::default()).await;

        assert_eq!(result.short_url, "mailto:me@example.com");
        assert_eq!(result.error_reason, Some(FailureReason::InvalidUrl));
    }

    #[tokio::test(start_paused = true)]
    async fn test_equivalent_urls_share_cache_entry() {
        let mut mock = MockShortenProvider::new();
        mock.expect_create()
            .times(1)
            .returning(|_| Ok(created("https://tinyurl.com/abc", "abc")));
        mock.expect_name().return_const("mock");

        let (client, _, _) = client_with(Some(Arc::new(mock)), 10);
        client.shorten(URL, &ShortenOptions::default()).await;
        let second = client
            .shorten(
                "https://EXAMPLE.com/blog/my-post?utm_source=newsletter#top",
                &ShortenOptions::default(),
            )
            .await;

        assert!(second.from_cache);
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_result_has_usable_url() {
        let mut mock = MockShortenProvider::new();
        mock.expect_create()
            .returning(|_| Err(UpstreamError::Timeout));
        mock.expect_name().return_const("mock");

        let (client, _, _) = client_with(Some(Arc::new(mock)), 3);

        for i in 0..6 {
            let url = format!("https://example.com/blog/post-{}", i);
            let result = client.shorten(&url, &ShortenOptions::default()).await;
            assert!(!result.short_url.is_empty());
            if !result.succeeded {
                assert_eq!(result.short_url, result.long_url);
                assert_eq!(result.short_url, url);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_degraded_result_returns_url_as_sent() {
        let (client, _, _) = client_with(None, 0);
        let sent = "https://example.com/blog/post?ref=partner42&page=2#comments";

        let result = client.shorten(sent, &ShortenOptions::default()).await;

        assert!(!result.succeeded);
        assert_eq!(result.short_url, sent);
        assert_eq!(result.long_url, sent);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_keeps_query_encoding() {
        let mut mock = MockShortenProvider::new();
        mock.expect_create().times(0);
        mock.expect_name().return_const("mock");

        let (client, _, _) = client_with(Some(Arc::new(mock)), 0);
        let sent = "https://example.com/search?q=a%20b&utm_source=x";

        let result = client.shorten(sent, &ShortenOptions::default()).await;

        assert_eq!(result.error_reason, Some(FailureReason::RateLimited));
        assert_eq!(result.short_url, sent);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_fallback_returns_each_callers_url() {
        let mut mock = MockShortenProvider::new();
        mock.expect_create()
            .times(1)
            .returning(|_| Err(UpstreamError::Unavailable("down".into())));
        mock.expect_name().return_const("mock");

        let (client, _, _) = client_with(Some(Arc::new(mock)), 10);
        let tracked = "https://example.com/blog/my-post?utm_source=newsletter#top";

        client.shorten(URL, &ShortenOptions::default()).await;
        let second = client.shorten(tracked, &ShortenOptions::default()).await;

        assert!(second.from_cache);
        assert_eq!(second.short_url, tracked);
    }
}
