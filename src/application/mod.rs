//! Application layer services.
//!
//! Services combine the domain pieces (rate limiter, cache, alias policy,
//! eligibility) into the operations the HTTP handlers and the CLI expose.
//!
//! # Available Services
//!
//! - [`services::shortener_client::ShortenerClient`] - cache-aside, rate-limited shortening
//! - [`services::bulk_orchestrator::BulkOrchestrator`] - paced batch runs
//! - [`services::webhook_service::WebhookIngress`] - content-change notifications
//! - [`services::auth_service::AuthService`] - webhook and admin secrets

pub mod services;
