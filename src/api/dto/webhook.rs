//! DTOs for the webhook endpoint.

use serde::{Deserialize, Serialize};

use crate::application::services::WebhookReport;
use crate::domain::entities::ContentItem;

/// Query string of a webhook call.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookQuery {
    pub secret: Option<String>,
}

/// Notification body, read only after the secret has been verified.
///
/// The event name may also arrive in the `X-Webhook-Event` header; the body
/// field wins when both are present.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    #[serde(default, alias = "operation", alias = "type")]
    pub event: Option<String>,

    /// Absent on some delete notifications, which only carry ids.
    #[serde(default, alias = "item", alias = "content")]
    pub document: Option<ContentItem>,
}

/// Webhook response. Always `success: true` once authenticated.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub success: bool,
    pub message: String,
    pub data: WebhookReport,
}
