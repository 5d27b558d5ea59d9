//! Handler for link statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the current state of a short link.
///
/// # Endpoint
///
/// `GET /api/stats/{code}`
///
/// # Response
///
/// ```json
/// {
///   "code": "AbC1234",
///   "longUrl": "https://example.com/a",
///   "shortUrl": "https://s.example.com/AbC1234",
///   "clicks": 12,
///   "createdAt": "2025-01-01T00:00:00Z",
///   "updatedAt": "2025-01-01T00:10:00Z"
/// }
/// ```
///
/// Viewing stats does not count as a click.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let record = state.stats_service.stats(&code).await?;

    Ok(Json(StatsResponse {
        short_url: state.short_url(&record.code),
        code: record.code,
        long_url: record.long_url,
        clicks: record.clicks,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }))
}
