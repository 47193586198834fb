//! Shortening provider clients.

mod tinyurl;

pub use tinyurl::{DEFAULT_ALIAS_CONFLICT_CODE, TinyUrlProvider};
