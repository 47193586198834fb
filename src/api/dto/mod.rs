//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization (camelCase on the
//! wire) and validator for input validation.

pub mod bulk;
pub mod health;
pub mod shorten;
pub mod webhook;
