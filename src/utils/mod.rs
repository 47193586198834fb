//! URL helpers shared by the services and handlers.
//!
//! - [`url_normalizer`] - long-URL normalization for cache keys
//! - [`content_url`] - canonical content URLs from item identifiers

pub mod content_url;
pub mod url_normalizer;
