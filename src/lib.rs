//! # Link Gateway
//!
//! A link-shortening gateway for a content site, built with Axum. It turns
//! canonical content URLs into short links while shielding the site from a
//! quota-limited, occasionally unreliable shortening provider.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Rate limiter, alias policy, eligibility, provider port
//! - **Application Layer** ([`application`]) - Shortener client, batch runs, webhook ingress
//! - **Infrastructure Layer** ([`infrastructure`]) - Cache stores and the TinyURL client
//! - **API Layer** ([`api`]) - REST handlers, DTOs, and middleware
//!
//! ## Guarantees
//!
//! - Every shorten call yields a usable URL; on any failure it is the long URL
//! - Upstream calls stay within a sliding-window quota; denied calls never wait
//! - Results (including fallbacks) are cached, so repeats cost no quota
//! - Content published before the eligibility cutoff never gets a short link
//!
//! ## Quick Start
//!
//! ```bash
//! export SHORTENER_API_KEY="..."          # optional: without it URLs pass through
//! export BASE_CONTENT_URL="https://example.com"
//! export WEBHOOK_SECRET="..."
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        AuthService, BulkJob, BulkOptions, BulkOrchestrator, ShortenerClient, ShortenerSettings,
        WebhookIngress,
    };
    pub use crate::domain::alias_policy::AliasPolicy;
    pub use crate::domain::eligibility::{EligibilityResult, EligibilityValidator};
    pub use crate::domain::entities::{ContentItem, FailureReason, ShortenOptions, ShortenResult};
    pub use crate::domain::rate_limiter::RateLimiter;
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
