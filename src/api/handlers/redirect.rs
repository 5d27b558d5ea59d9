//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL and counts the visit.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Answers `302 Found` with a `Location` header. The click is counted in the
/// cache before the response is sent; see
/// [`RedirectService`](crate::application::services::RedirectService) for the
/// cache-aside lookup and write-back rules.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 500 Internal Server Error if either store fails.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let resolved = state.redirect_service.resolve(&code).await?;
    debug!(code = %code, clicks = resolved.clicks, "Redirecting");

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, resolved.long_url)],
    )
        .into_response())
}
