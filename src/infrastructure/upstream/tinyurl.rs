//! TinyURL API client.
//!
//! `POST {api_url}/create` with a Bearer API key. The provider answers with an
//! envelope `{ code, data: { tiny_url, url, alias }, errors }` where `code == 0`
//! means success.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::upstream::{CreateLinkRequest, CreatedLink, ShortenProvider, UpstreamError};

/// Provider code reported when the requested alias is taken.
pub const DEFAULT_ALIAS_CONFLICT_CODE: i64 = 5;

#[derive(Debug, Serialize)]
struct CreateBody<'a> {
    url: &'a str,
    domain: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    alias: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    code: i64,
    // `[]` on errors, an object on success
    #[serde(default)]
    data: serde_json::Value,
    #[serde(default)]
    errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeData {
    tiny_url: Option<String>,
    #[serde(default)]
    alias: Option<String>,
}

/// HTTP client for the TinyURL API.
pub struct TinyUrlProvider {
    http: Client,
    api_url: String,
    api_key: String,
    alias_conflict_code: i64,
}

impl TinyUrlProvider {
    /// Builds the client.
    ///
    /// # Arguments
    ///
    /// - `api_url` - API base, e.g. `https://api.tinyurl.com`
    /// - `api_key` - Bearer token
    /// - `timeout` - per-request timeout enforced by the HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(api_url: &str, api_key: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            alias_conflict_code: DEFAULT_ALIAS_CONFLICT_CODE,
        })
    }

    /// Overrides the code treated as an alias conflict.
    pub fn with_alias_conflict_code(mut self, code: i64) -> Self {
        self.alias_conflict_code = code;
        self
    }
}

#[async_trait]
impl ShortenProvider for TinyUrlProvider {
    async fn create(&self, request: CreateLinkRequest) -> Result<CreatedLink, UpstreamError> {
        let endpoint = format!("{}/create", self.api_url);
        let body = CreateBody {
            url: &request.url,
            domain: &request.domain,
            alias: request.alias.as_deref(),
        };

        debug!(
            "POST {} url={} alias={:?}",
            endpoint, request.url, request.alias
        );

        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_transport_error)?;

        interpret_response(status, &text, self.alias_conflict_code)
    }

    fn name(&self) -> &'static str {
        "tinyurl"
    }
}

fn map_transport_error(e: reqwest::Error) -> UpstreamError {
    if e.is_timeout() {
        UpstreamError::Timeout
    } else {
        warn!("TinyURL transport error: {}", e);
        UpstreamError::Unavailable(e.to_string())
    }
}

/// Interprets a provider response body.
///
/// The envelope is authoritative whenever it parses, regardless of HTTP
/// status; the status only classifies bodies that are not an envelope.
fn interpret_response(
    status: StatusCode,
    body: &str,
    alias_conflict_code: i64,
) -> Result<CreatedLink, UpstreamError> {
    let envelope: Envelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS => {
            return Err(UpstreamError::Unavailable(format!("HTTP {}", status)));
        }
        Err(e) => {
            return Err(UpstreamError::InvalidResponse(format!(
                "HTTP {}: {}",
                status, e
            )));
        }
    };

    let message = envelope.errors.join("; ");

    if envelope.code == 0 {
        let data: EnvelopeData = serde_json::from_value(envelope.data).map_err(|e| {
            UpstreamError::InvalidResponse(format!("success response without data: {}", e))
        })?;
        let short_url = data
            .tiny_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                UpstreamError::InvalidResponse("success response without tiny_url".to_string())
            })?;

        return Ok(CreatedLink {
            short_url,
            alias: data.alias.filter(|a| !a.is_empty()),
        });
    }

    if envelope.code == alias_conflict_code || mentions_alias_conflict(&envelope.errors) {
        return Err(UpstreamError::AliasConflict(message));
    }

    Err(UpstreamError::Rejected {
        code: envelope.code,
        message,
    })
}

fn mentions_alias_conflict(errors: &[String]) -> bool {
    errors.iter().any(|e| {
        let e = e.to_ascii_lowercase();
        e.contains("alias")
            && (e.contains("not available") || e.contains("taken") || e.contains("already"))
    })
}
