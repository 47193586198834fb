//! Handler for the health endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CacheHealth, HealthResponse, UpstreamHealth};
use crate::state::AppState;

/// Returns gateway health with rate-limit, cache and client diagnostics.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: cache reachable and upstream configured
/// - **503 Service Unavailable**: degraded (the gateway still answers
///   shorten requests with long URLs)
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "rateLimit": { "requestsInWindow": 0, "maxRequests": 10, "canMakeRequest": true, "nextResetInMs": 0 },
///   "cache": { "backend": "memory", "status": "ok", "entries": 12 },
///   "upstream": { "configured": true, "provider": "tinyurl" },
///   "stats": { "requests": 40, "cacheHits": 28, ... },
///   "warnings": []
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let client = &state.shortener;
    let mut warnings = Vec::new();

    let cache_ok = client.cache().health_check().await;
    if !cache_ok {
        warnings.push(format!("{} cache unreachable", client.cache().backend()));
    }

    let cache = CacheHealth {
        backend: client.cache().backend().to_string(),
        status: if cache_ok { "ok" } else { "error" }.to_string(),
        entries: client.cache().len().await,
    };

    if !client.is_configured() {
        warnings.push("No shortener API key configured; long URLs are returned".to_string());
    }

    let rate_limit = client.rate_limit_status();
    if !rate_limit.can_make_request {
        warnings.push(format!(
            "Rate limit reached; next slot in {}ms",
            rate_limit.next_reset_in_ms
        ));
    }

    let healthy = cache_ok && client.is_configured();

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        rate_limit,
        cache,
        upstream: UpstreamHealth {
            configured: client.is_configured(),
            provider: client.provider_name().map(str::to_string),
        },
        stats: client.stats(),
        warnings,
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
