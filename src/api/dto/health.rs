//! DTOs for the health endpoint.

use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::application::services::ClientStats;
use crate::domain::rate_limiter::RateLimitStatus;

/// Health response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub rate_limit: RateLimitStatus,
    pub cache: CacheHealth,
    pub upstream: UpstreamHealth,
    pub stats: ClientStats,
    pub warnings: Vec<String>,
}

/// Cache backend status.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheHealth {
    pub backend: String,
    pub status: String,
    pub entries: Option<usize>,
}

/// Upstream provider status.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamHealth {
    pub configured: bool,
    pub provider: Option<String>,
}
