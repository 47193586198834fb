//! API route configuration.

use crate::api::handlers::{
    bulk_handler, clear_cache_handler, health_handler, shorten_handler, webhook_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Public gateway routes.
///
/// # Endpoints
///
/// - `POST /shorten` - Short URL for a long URL or content slug
/// - `GET  /health`  - Gateway diagnostics
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/health", get(health_handler))
}

/// Content-source notifications, authenticated by the webhook secret inside
/// the handler.
///
/// # Endpoints
///
/// - `POST /webhook` - Content change notification
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/webhook", post(webhook_handler))
}

/// Admin routes, to be protected by [`crate::api::middleware::auth::admin_layer`].
///
/// # Endpoints
///
/// - `POST   /bulk`  - Run a batch over content items
/// - `DELETE /cache` - Clear cached results
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/bulk", post(bulk_handler))
        .route("/cache", delete(clear_cache_handler))
}
