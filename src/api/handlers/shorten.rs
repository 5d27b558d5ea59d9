//! Handler for link shortening endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::url_validation::ensure_web_url;

/// Creates (or returns the existing) short link for a long URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "longUrl": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// `201 Created`, also when the long URL was already shortened:
///
/// ```json
/// {
///   "code": "AbC1234",
///   "longUrl": "https://example.com/some/long/path",
///   "shortUrl": "https://s.example.com/AbC1234",
///   "clicks": 0
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for malformed JSON or a missing or non-http(s) URL.
/// Returns 500 Internal Server Error if the durable store fails.
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    ensure_web_url(&payload.long_url)?;

    let shortened = state.shorten_service.shorten(&payload.long_url).await?;
    let record = shortened.record;

    let response = ShortenResponse {
        short_url: state.short_url(&record.code),
        code: record.code,
        long_url: record.long_url,
        clicks: record.clicks,
    };

    Ok((StatusCode::CREATED, Json(response)))
}
