//! Content-change notifications that may trigger shortening.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::application::services::ShortenerClient;
use crate::domain::eligibility::{EligibilityResult, EligibilityValidator};
use crate::domain::entities::{ContentItem, ShortenOptions, ShortenResult};
use crate::utils::content_url::ContentUrlBuilder;

/// Kind of change reported by the content source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEventKind {
    Create,
    Update,
    Publish,
    Delete,
    Other(String),
}

impl WebhookEventKind {
    /// Parses the event name, accepting past-tense spellings.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "create" | "created" => Self::Create,
            "update" | "updated" => Self::Update,
            "publish" | "published" => Self::Publish,
            "delete" | "deleted" => Self::Delete,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for WebhookEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("create"),
            Self::Update => f.write_str("update"),
            Self::Publish => f.write_str("publish"),
            Self::Delete => f.write_str("delete"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// One authenticated notification.
#[derive(Debug, Clone)]
pub struct WebhookEvent {
    pub kind: WebhookEventKind,
    pub item: ContentItem,
}

/// What the ingress did with an event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookReport {
    pub event: String,
    pub relevant: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligibility: Option<EligibilityResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ShortenResult>,
    pub warnings: Vec<String>,
}

impl WebhookReport {
    fn ignored(event: &WebhookEventKind, message: impl Into<String>) -> Self {
        Self {
            event: event.to_string(),
            relevant: false,
            message: message.into(),
            eligibility: None,
            result: None,
            warnings: Vec::new(),
        }
    }
}

/// Receives content changes and pre-warms short links for eligible items.
///
/// Every outcome is a report, never an error: the content source treats a
/// non-2xx answer as a delivery failure and would retry, while shortening
/// problems are not something a retry of the notification can fix.
pub struct WebhookIngress {
    client: Arc<ShortenerClient>,
    validator: EligibilityValidator,
    urls: ContentUrlBuilder,
    content_types: Vec<String>,
}

impl WebhookIngress {
    /// Creates the ingress.
    ///
    /// An empty `content_types` list accepts every content type.
    pub fn new(
        client: Arc<ShortenerClient>,
        validator: EligibilityValidator,
        urls: ContentUrlBuilder,
        content_types: Vec<String>,
    ) -> Self {
        let content_types = content_types
            .into_iter()
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        Self {
            client,
            validator,
            urls,
            content_types,
        }
    }

    /// Relevant events: create, publish, and updates of published items,
    /// restricted to the configured content types.
    pub fn is_relevant(&self, event: &WebhookEvent) -> bool {
        let kind_matches = match event.kind {
            WebhookEventKind::Create | WebhookEventKind::Publish => true,
            WebhookEventKind::Update => event
                .item
                .published_at
                .as_deref()
                .is_some_and(|p| !p.trim().is_empty()),
            WebhookEventKind::Delete | WebhookEventKind::Other(_) => false,
        };

        kind_matches && self.accepts_content_type(event.item.content_type.as_deref())
    }

    fn accepts_content_type(&self, content_type: Option<&str>) -> bool {
        if self.content_types.is_empty() {
            return true;
        }
        content_type.is_some_and(|t| {
            let t = t.trim().to_ascii_lowercase();
            self.content_types.iter().any(|allowed| *allowed == t)
        })
    }

    /// Report for an authenticated notification whose body carries no usable
    /// item. Answered as handled so the source does not redeliver it.
    pub fn unreadable(&self, kind: &WebhookEventKind, warning: impl Into<String>) -> WebhookReport {
        let warning = warning.into();
        warn!("Unusable {} notification: {}", kind, warning);
        metrics::counter!("webhook_events_total", "outcome" => "unreadable").increment(1);

        WebhookReport {
            warnings: vec![warning],
            ..WebhookReport::ignored(kind, "Notification ignored")
        }
    }

    /// Processes an authenticated event.
    pub async fn handle(&self, event: WebhookEvent) -> WebhookReport {
        let key = event.item.report_key();

        if !self.is_relevant(&event) {
            debug!("Ignoring {} event for {}", event.kind, key);
            metrics::counter!("webhook_events_total", "outcome" => "ignored").increment(1);
            return WebhookReport::ignored(&event.kind, "Event ignored");
        }

        let eligibility = self.validator.validate(&event.item);
        if !eligibility.is_eligible {
            info!(
                "{} event for {}: not eligible ({})",
                event.kind,
                key,
                eligibility.reasons.join("; ")
            );
            metrics::counter!("webhook_events_total", "outcome" => "ineligible").increment(1);
            return WebhookReport {
                event: event.kind.to_string(),
                relevant: true,
                message: "Item not eligible for a short link".to_string(),
                eligibility: Some(eligibility),
                result: None,
                warnings: Vec::new(),
            };
        }

        let mut warnings = Vec::new();
        let result = match self.urls.canonical_url(event.item.identifier()) {
            Some(long_url) => {
                let result = self.client.shorten(&long_url, &ShortenOptions::default()).await;
                if let Some(reason) = result.error_reason {
                    warn!("Webhook shortening for {} degraded: {}", key, reason);
                    warnings.push(format!("Short link unavailable: {}", reason));
                }
                Some(result)
            }
            None => {
                warnings.push("Item has no identifier".to_string());
                None
            }
        };

        let outcome = if warnings.is_empty() { "shortened" } else { "warning" };
        metrics::counter!("webhook_events_total", "outcome" => outcome).increment(1);

        WebhookReport {
            event: event.kind.to_string(),
            relevant: true,
            message: if warnings.is_empty() {
                "Short link ready".to_string()
            } else {
                "Processed with warnings".to_string()
            },
            eligibility: Some(eligibility),
            result,
            warnings,
        }
    }
}
