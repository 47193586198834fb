//! Core domain entities.
//!
//! Plain data structures shared by every layer of the gateway.
//!
//! # Entity Types
//!
//! - [`ContentItem`] - Metadata of a content item that may receive a short link
//! - [`ShortenResult`] - Outcome of a shorten request (shortened or degraded)
//! - [`ShortenOptions`] - Per-request provider options, part of the cache key
//! - [`FailureReason`] - Closed set of reasons a result is degraded

pub mod content_item;
pub mod shorten;

pub use content_item::ContentItem;
pub use shorten::{FailureReason, ShortenOptions, ShortenResult};
