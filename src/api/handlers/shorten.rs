//! Handler for the shorten endpoint.

use axum::{Json, extract::State};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::domain::entities::{ContentItem, ShortenOptions};
use crate::error::AppError;
use crate::state::AppState;

/// Returns a short URL for a long URL or a content slug.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "slug": "my-post",
///   "title": "My post",
///   "publishedAt": "2025-10-01T09:00:00Z",
///   "options": { "alias": "my-alias" }   // optional
/// }
/// ```
///
/// or `{ "longUrl": "https://example.com/blog/my-post" }`.
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "shortUrl": "https://tinyurl.com/blog-my-post",
///   "longUrl": "https://example.com/blog/my-post",
///   "isShortened": true,
///   "alias": "blog-my-post",
///   "fromCache": false,
///   "rateLimitStatus": { "requestsInWindow": 1, "maxRequests": 10, ... }
/// }
/// ```
///
/// Degraded and ineligible requests still answer 200 with the long URL as
/// `shortUrl`.
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails or neither `longUrl` nor
/// `slug` is given.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let options: ShortenOptions = payload.options.map(Into::into).unwrap_or_default();

    if let Some(long_url) = payload.long_url {
        let result = state.shortener.shorten(&long_url, &options).await;
        return Ok(Json(ShortenResponse::from_result(
            result,
            None,
            state.shortener.rate_limit_status(),
        )));
    }

    let Some(slug) = payload.slug else {
        return Err(AppError::bad_request(
            "Either longUrl or slug is required",
            json!({"fields": ["longUrl", "slug"]}),
        ));
    };

    let mut item = ContentItem::new(slug.clone(), slug, payload.title.unwrap_or_default());
    item.published_at = payload.published_at;
    item.created_at = payload.created_at;

    let long_url = state.content_urls.canonical_url(item.identifier()).ok_or_else(|| {
        AppError::bad_request("Slug must not be blank", json!({"field": "slug"}))
    })?;

    let eligibility = state.eligibility.validate_with(&item, payload.force);
    if !eligibility.is_eligible {
        return Ok(Json(ShortenResponse::ineligible(
            long_url,
            eligibility,
            state.shortener.rate_limit_status(),
        )));
    }

    let result = state.shortener.shorten(&long_url, &options).await;

    Ok(Json(ShortenResponse::from_result(
        result,
        Some(eligibility),
        state.shortener.rate_limit_status(),
    )))
}
