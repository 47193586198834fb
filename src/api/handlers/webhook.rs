//! Handler for content-change notifications.

use axum::{
    Json,
    body::Bytes,
    extract::{FromRequestParts, Query, State},
    http::{HeaderMap, request::Parts},
};
use axum_auth::AuthBearer;

use crate::api::dto::webhook::{WebhookPayload, WebhookQuery, WebhookResponse};
use crate::application::services::{WebhookEvent, WebhookEventKind};
use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the event name when the body does not.
pub const EVENT_HEADER: &str = "x-webhook-event";

/// Receives a content change and pre-warms its short link.
///
/// # Endpoint
///
/// `POST /webhook?secret=<secret>` or `Authorization: Bearer <secret>`
///
/// # Request Body
///
/// ```json
/// {
///   "event": "publish",
///   "document": {
///     "_id": "abc123",
///     "_type": "post",
///     "slug": { "current": "my-post" },
///     "title": "My post",
///     "publishedAt": "2025-10-01T09:00:00Z"
///   }
/// }
/// ```
///
/// Authenticated calls always answer 200; irrelevant events, ineligible items,
/// unreadable bodies and shortening failures are reported in `data`.
///
/// # Errors
///
/// Returns 401 Unauthorized when the secret is missing or wrong. The body is
/// not looked at before the secret is verified.
pub async fn webhook_handler(
    State(state): State<AppState>,
    WebhookSecret(secret): WebhookSecret,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, AppError> {
    state.auth_service.verify_webhook(secret.as_deref())?;

    let header_event = headers
        .get(EVENT_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let report = match serde_json::from_slice::<WebhookPayload>(&body) {
        Ok(payload) => {
            let kind =
                WebhookEventKind::parse(&payload.event.or(header_event).unwrap_or_default());

            match payload.document {
                Some(item) => state.webhook.handle(WebhookEvent { kind, item }).await,
                None => state.webhook.unreadable(&kind, "Notification has no document"),
            }
        }
        Err(e) => {
            let kind = WebhookEventKind::parse(header_event.as_deref().unwrap_or_default());
            state
                .webhook
                .unreadable(&kind, format!("Unreadable notification body: {}", e))
        }
    };

    Ok(Json(WebhookResponse {
        success: true,
        message: report.message.clone(),
        data: report,
    }))
}

/// Secret from the `Authorization: Bearer` header, else from `?secret=`.
pub struct WebhookSecret(pub Option<String>);

impl<S: Send + Sync> FromRequestParts<S> for WebhookSecret {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Ok(AuthBearer(token)) = AuthBearer::from_request_parts(parts, state).await {
            return Ok(Self(Some(token)));
        }

        let secret = Query::<WebhookQuery>::from_request_parts(parts, state)
            .await
            .ok()
            .and_then(|Query(q)| q.secret);

        Ok(Self(secret))
    }
}
