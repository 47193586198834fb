//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST   /shorten`      - Shorten a URL or content slug (public)
//! - `GET    /health`       - Gateway diagnostics (public)
//! - `POST   /webhook`      - Content change notifications (shared secret)
//! - `POST   /admin/bulk`   - Batch run (admin Bearer token)
//! - `DELETE /admin/cache`  - Clear cache (admin Bearer token)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on public and admin routes
//!   (configurable for proxy deployments). `/webhook` has none: the content
//!   source redelivers rejected notifications, and the upstream quota is
//!   already guarded inside the shortener client.
//! - **Authentication** - Admin Bearer token on `/admin/*`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(api_router(state, behind_proxy))
}

/// All routes and middleware except path normalization.
pub fn api_router(state: AppState, behind_proxy: bool) -> Router {
    let public = rate_limit::apply(
        api::routes::public_routes(),
        rate_limit::PUBLIC,
        behind_proxy,
    );

    let admin = rate_limit::apply(
        api::routes::admin_routes().route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::admin_layer,
        )),
        rate_limit::SECURE,
        behind_proxy,
    );

    Router::new()
        .merge(public)
        .merge(api::routes::webhook_routes())
        .nest("/admin", admin)
        .with_state(state)
        .layer(tracing::layer())
}
