//! Inbound per-IP rate limiting.
//!
//! Separate from [`crate::domain::rate_limiter::RateLimiter`], which guards the
//! upstream quota. This layer keeps a single client from draining that quota
//! for everyone.

use axum::Router;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

use crate::state::AppState;

/// Bucket parameters for one group of routes.
#[derive(Debug, Clone, Copy)]
pub struct InboundLimit {
    pub per_second: u64,
    pub burst_size: u32,
}

/// Public endpoints: 2 requests per second, burst of 60.
pub const PUBLIC: InboundLimit = InboundLimit {
    per_second: 2,
    burst_size: 60,
};

/// Admin endpoints: 1 request per second, burst of 10.
pub const SECURE: InboundLimit = InboundLimit {
    per_second: 1,
    burst_size: 10,
};

/// Applies a per-IP token bucket to `router`.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// - `behind_proxy = false`: the socket peer address (requires the server to
///   run with `into_make_service_with_connect_info`)
/// - `behind_proxy = true`: `X-Forwarded-For` / `X-Real-IP` / `Forwarded`, then the peer
///   address; enable only behind a trusted reverse proxy
pub fn apply(router: Router<AppState>, limit: InboundLimit, behind_proxy: bool) -> Router<AppState> {
    if behind_proxy {
        let config = GovernorConfigBuilder::default()
            .per_second(limit.per_second)
            .burst_size(limit.burst_size)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .expect("non-zero rate limit parameters");
        router.layer(GovernorLayer::new(Arc::new(config)))
    } else {
        let config = GovernorConfigBuilder::default()
            .per_second(limit.per_second)
            .burst_size(limit.burst_size)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("non-zero rate limit parameters");
        router.layer(GovernorLayer::new(Arc::new(config)))
    }
}
