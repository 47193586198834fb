//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod bulk;
pub mod cache;
pub mod health;
pub mod shorten;
pub mod webhook;

pub use bulk::bulk_handler;
pub use cache::clear_cache_handler;
pub use health::health_handler;
pub use shorten::shorten_handler;
pub use webhook::webhook_handler;
