//! Handler for cache administration.

use axum::{Json, extract::State};
use serde::Serialize;
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Result of a cache clear.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearCacheResponse {
    pub backend: &'static str,
    pub removed: usize,
}

/// Drops every cached result, successes and fallbacks alike.
///
/// # Endpoint
///
/// `DELETE /admin/cache` (Bearer admin token)
///
/// # Errors
///
/// Returns 500 Internal Server Error if the backing store fails.
pub async fn clear_cache_handler(
    State(state): State<AppState>,
) -> Result<Json<ClearCacheResponse>, AppError> {
    let cache = state.shortener.cache();

    let removed = cache.clear().await.map_err(|e| {
        tracing::error!("Cache clear failed: {}", e);
        AppError::internal("Failed to clear cache", json!({"backend": cache.backend()}))
    })?;

    tracing::info!("Cleared {} cached results", removed);

    Ok(Json(ClearCacheResponse {
        backend: cache.backend(),
        removed,
    }))
}
