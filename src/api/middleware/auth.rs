//! Admin Bearer token middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::{error::AppError, state::AppState};

/// Guards the admin routes with the configured admin token.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <ADMIN_TOKEN>
/// ```
///
/// # Errors
///
/// Returns `401 Unauthorized` (with `WWW-Authenticate: Bearer`) if the header
/// is missing, the token does not match, or no admin token is configured.
///
/// # Example
///
/// ```rust,ignore
/// let admin = Router::new()
///     .route("/cache", delete(clear_cache_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::admin_layer));
/// ```
pub async fn admin_layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let token = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .ok()
        .map(|AuthBearer(token)| token);

    st.auth_service.verify_admin(token.as_deref())?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}
