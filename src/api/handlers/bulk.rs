//! Handler for admin batch runs.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::bulk::BulkRequest;
use crate::application::services::BulkJob;
use crate::error::AppError;
use crate::state::AppState;

/// Runs a batch over the given content items and returns the report.
///
/// # Endpoint
///
/// `POST /admin/bulk` (Bearer admin token)
///
/// The request holds the connection for the whole run: with the default
/// pacing a 100-item batch takes about 15 seconds plus upstream latency.
///
/// # Request Body
///
/// ```json
/// {
///   "items": [{ "id": "1", "slug": "my-post", "title": "My post", "publishedAt": "..." }],
///   "includeIneligible": false,
///   "force": false
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for an empty or oversized batch.
pub async fn bulk_handler(
    State(state): State<AppState>,
    Json(payload): Json<BulkRequest>,
) -> Result<Json<BulkJob>, AppError> {
    payload.validate()?;

    let job = state
        .bulk
        .run_batch(&payload.items, payload.options())
        .await;

    Ok(Json(job))
}
