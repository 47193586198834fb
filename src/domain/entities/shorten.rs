//! Shortening outcome and request options.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-supplied knobs for a single shorten request.
///
/// Both fields participate in the cache key, so two requests for the same URL
/// with different options are cached independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenOptions {
    /// Short domain to request from the provider (defaults to the configured one).
    #[serde(default)]
    pub domain: Option<String>,
    /// Explicit alias to request instead of provider auto-generation.
    #[serde(default)]
    pub alias: Option<String>,
}

/// Why a shorten attempt resolved to a degraded result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The upstream quota window was full; never cached.
    RateLimited,
    /// No API key configured; the gateway runs as a pass-through.
    NotConfigured,
    /// Every attempt was rejected because the alias was taken.
    AliasConflict,
    /// The provider answered with a non-zero, non-alias error code.
    UpstreamRejected,
    UpstreamTimeout,
    UpstreamUnavailable,
    /// The provider answered with a body we could not interpret.
    InvalidResponse,
    /// The long URL itself was not an absolute http(s) URL.
    InvalidUrl,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::RateLimited => "rate_limited",
            FailureReason::NotConfigured => "not_configured",
            FailureReason::AliasConflict => "alias_conflict",
            FailureReason::UpstreamRejected => "upstream_rejected",
            FailureReason::UpstreamTimeout => "upstream_timeout",
            FailureReason::UpstreamUnavailable => "upstream_unavailable",
            FailureReason::InvalidResponse => "invalid_response",
            FailureReason::InvalidUrl => "invalid_url",
        }
    }

    /// Transient denials are returned to the caller but never written to the cache.
    pub fn is_cacheable(&self) -> bool {
        !matches!(
            self,
            FailureReason::RateLimited | FailureReason::NotConfigured | FailureReason::InvalidUrl
        )
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one shorten request.
///
/// Constructed only through [`ShortenResult::shortened`] and [`ShortenResult::degraded`],
/// which keep the invariant that a failed result always carries the long URL as
/// its `short_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResult {
    pub long_url: String,
    pub short_url: String,
    pub alias: Option<String>,
    pub from_cache: bool,
    pub succeeded: bool,
    pub error_reason: Option<FailureReason>,
}

impl ShortenResult {
    /// A successful shortening.
    pub fn shortened(long_url: String, short_url: String, alias: Option<String>) -> Self {
        Self {
            long_url,
            short_url,
            alias,
            from_cache: false,
            succeeded: true,
            error_reason: None,
        }
    }

    /// A degraded result: the long URL stands in for the short one.
    pub fn degraded(long_url: String, reason: FailureReason) -> Self {
        Self {
            short_url: long_url.clone(),
            long_url,
            alias: None,
            from_cache: false,
            succeeded: false,
            error_reason: Some(reason),
        }
    }

    /// Marks a result as served from the cache.
    pub fn cached(mut self) -> Self {
        self.from_cache = true;
        self
    }

    /// Binds a result to the URL exactly as the caller sent it.
    ///
    /// Cached and shared results carry the normalized URL; a degraded result
    /// handed back to a caller must point at what that caller asked for.
    pub fn for_request(mut self, long_url: &str) -> Self {
        self.long_url = long_url.to_string();
        if !self.succeeded {
            self.short_url = long_url.to_string();
        }
        self
    }

    /// True when the returned URL differs from the long URL.
    pub fn is_shortened(&self) -> bool {
        self.succeeded && self.short_url != self.long_url
    }
}
