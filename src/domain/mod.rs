//! Domain layer: the gateway's pure policies and its ports.
//!
//! Nothing in this module performs I/O. Time-dependent pieces read the tokio
//! clock so tests can pause and advance it.
//!
//! # Architecture
//!
//! - [`entities`] - Content items, shorten results and options
//! - [`rate_limiter`] - Sliding-window admission control for the provider quota
//! - [`alias_policy`] - Human-readable alias derivation from canonical URLs
//! - [`eligibility`] - Cutoff-based eligibility of content items
//! - [`cache_key`] - Structured identity of a shorten request
//! - [`upstream`] - Provider trait implemented by the infrastructure layer
//!
//! # Request Flow
//!
//! 1. A webhook, batch run or interactive request checks [`eligibility`]
//! 2. [`crate::application::services::ShortenerClient`] builds a [`cache_key::CacheKey`]
//! 3. On a cache miss, [`rate_limiter::RateLimiter`] admits or denies the upstream call
//! 4. The [`upstream::ShortenProvider`] is called, retrying once with an
//!    [`alias_policy::AliasPolicy`] alias on alias conflicts

pub mod alias_policy;
pub mod cache_key;
pub mod eligibility;
pub mod entities;
pub mod rate_limiter;
pub mod upstream;
