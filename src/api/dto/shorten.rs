//! DTOs for the shorten endpoint.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::eligibility::EligibilityResult;
use crate::domain::entities::{FailureReason, ShortenOptions, ShortenResult};
use crate::domain::rate_limiter::RateLimitStatus;

/// Aliases the provider accepts.
static ALIAS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid alias regex"));

/// Shorten request.
///
/// Either `longUrl` is shortened as given, or `slug` is turned into the
/// canonical content URL and gated by eligibility first.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    #[validate(length(min = 1, max = 2048))]
    pub long_url: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub slug: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    pub published_at: Option<String>,

    pub created_at: Option<String>,

    /// Skips the eligibility gate for `slug` requests.
    #[serde(default)]
    pub force: bool,

    #[validate(nested)]
    pub options: Option<ShortenOptionsInput>,
}

/// Caller-supplied shorten options.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenOptionsInput {
    #[validate(length(min = 1, max = 253))]
    pub domain: Option<String>,

    #[validate(length(min = 5, max = 30))]
    #[validate(regex(path = "*ALIAS_REGEX"))]
    pub alias: Option<String>,
}

impl From<ShortenOptionsInput> for ShortenOptions {
    fn from(input: ShortenOptionsInput) -> Self {
        ShortenOptions {
            domain: input.domain,
            alias: input.alias,
        }
    }
}

/// Shorten response. `shortUrl` is always usable; it equals `longUrl`
/// whenever `isShortened` is false.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub success: bool,
    pub short_url: String,
    pub long_url: String,
    pub is_shortened: bool,
    pub alias: Option<String>,
    pub from_cache: bool,
    pub error_reason: Option<FailureReason>,
    pub eligibility: Option<EligibilityResult>,
    pub rate_limit_status: RateLimitStatus,
}

impl ShortenResponse {
    pub fn from_result(
        result: ShortenResult,
        eligibility: Option<EligibilityResult>,
        rate_limit_status: RateLimitStatus,
    ) -> Self {
        Self {
            success: result.succeeded,
            is_shortened: result.is_shortened(),
            short_url: result.short_url,
            long_url: result.long_url,
            alias: result.alias,
            from_cache: result.from_cache,
            error_reason: result.error_reason,
            eligibility,
            rate_limit_status,
        }
    }

    /// Response for an item that did not pass the eligibility gate.
    pub fn ineligible(
        long_url: String,
        eligibility: EligibilityResult,
        rate_limit_status: RateLimitStatus,
    ) -> Self {
        Self {
            success: false,
            short_url: long_url.clone(),
            long_url,
            is_shortened: false,
            alias: None,
            from_cache: false,
            error_reason: None,
            eligibility: Some(eligibility),
            rate_limit_status,
        }
    }
}
