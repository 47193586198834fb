//! Business logic services for the application layer.

pub mod auth_service;
pub mod bulk_orchestrator;
pub mod shortener_client;
pub mod webhook_service;

pub use auth_service::AuthService;
pub use bulk_orchestrator::{BulkJob, BulkOptions, BulkOrchestrator, BulkProgress};
pub use shortener_client::{ClientStats, ShortenerClient, ShortenerSettings};
pub use webhook_service::{WebhookEvent, WebhookEventKind, WebhookIngress, WebhookReport};
