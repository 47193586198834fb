//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for caching and the upstream provider.
//!
//! # Modules
//!
//! - [`cache`] - Cache stores (in-memory and Redis)
//! - [`upstream`] - HTTP clients for shortening providers

pub mod cache;
pub mod upstream;
