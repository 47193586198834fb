//! HTTP server initialization and runtime setup.
//!
//! Builds the cache, the upstream provider and the shortener client, then
//! runs the Axum server until a shutdown signal arrives.

use crate::application::services::{AuthService, ShortenerClient};
use crate::config::Config;
use crate::domain::upstream::ShortenProvider;
use crate::infrastructure::cache::{CacheStore, MemoryCache, RedisCache};
use crate::infrastructure::upstream::TinyUrlProvider;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Builds the application state from configuration.
///
/// Initializes:
/// - Redis cache (or the in-process cache when Redis is absent or unreachable)
/// - TinyURL provider (or pass-through mode without an API key)
/// - Shortener client, bulk orchestrator, webhook ingress
///
/// # Errors
///
/// Returns an error if the HTTP client or the content URL builder cannot be
/// created.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let cache: Arc<dyn CacheStore> = if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using in-process cache.", e);
                Arc::new(MemoryCache::with_capacity(config.cache_max_entries))
            }
        }
    } else {
        tracing::info!("Cache enabled (in-process)");
        Arc::new(MemoryCache::with_capacity(config.cache_max_entries))
    };

    let provider: Option<Arc<dyn ShortenProvider>> = match &config.shortener_api_key {
        Some(api_key) => {
            let provider = TinyUrlProvider::new(
                &config.shortener_api_url,
                api_key.clone(),
                // reqwest's own limit sits above the client's timeout
                Duration::from_millis(config.upstream_timeout_ms) + Duration::from_secs(1),
            )
            .context("Failed to build upstream HTTP client")?
            .with_alias_conflict_code(config.alias_conflict_code);
            Some(Arc::new(provider))
        }
        None => None,
    };

    let shortener = Arc::new(ShortenerClient::new(
        provider,
        cache,
        Arc::new(config.rate_limiter()),
        config.alias_policy(),
        config.shortener_settings(),
    ));

    let auth_service = AuthService::new(
        config.webhook_secret.as_deref(),
        config.admin_token.as_deref(),
    );
    if !auth_service.webhook_configured() {
        tracing::warn!("WEBHOOK_SECRET not set; webhook calls will be rejected");
    }
    if !auth_service.admin_configured() {
        tracing::warn!("ADMIN_TOKEN not set; admin routes will reject every call");
    }

    Ok(AppState::new(
        shortener,
        config.eligibility_validator(),
        config.content_urls()?,
        auth_service,
        config.bulk_delay(),
        config.webhook_content_types.clone(),
    ))
}

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - State construction fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config).await?;

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
