//! Shared application state injected into every handler.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{
    AuthService, BulkOrchestrator, ShortenerClient, WebhookIngress,
};
use crate::domain::eligibility::EligibilityValidator;
use crate::utils::content_url::ContentUrlBuilder;

/// Application state. Cheap to clone; every service sits behind an `Arc`.
///
/// One [`ShortenerClient`] is shared by the shorten handler, the webhook
/// ingress and the bulk orchestrator, so all of them draw from the same
/// cache and the same upstream quota.
#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<ShortenerClient>,
    pub bulk: Arc<BulkOrchestrator>,
    pub webhook: Arc<WebhookIngress>,
    pub auth_service: Arc<AuthService>,
    pub eligibility: EligibilityValidator,
    pub content_urls: ContentUrlBuilder,
}

impl AppState {
    /// Wires the services around one shortener client.
    pub fn new(
        shortener: Arc<ShortenerClient>,
        eligibility: EligibilityValidator,
        content_urls: ContentUrlBuilder,
        auth_service: AuthService,
        bulk_delay: Duration,
        webhook_content_types: Vec<String>,
    ) -> Self {
        let bulk = BulkOrchestrator::new(
            shortener.clone(),
            eligibility.clone(),
            content_urls.clone(),
            bulk_delay,
        );

        let webhook = WebhookIngress::new(
            shortener.clone(),
            eligibility.clone(),
            content_urls.clone(),
            webhook_content_types,
        );

        Self {
            shortener,
            bulk: Arc::new(bulk),
            webhook: Arc::new(webhook),
            auth_service: Arc::new(auth_service),
            eligibility,
            content_urls,
        }
    }
}
