//! Handler for the Prometheus scrape endpoint.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;
use crate::telemetry::PROMETHEUS_CONTENT_TYPE;

/// Renders all recorded counters in Prometheus text format.
///
/// # Endpoint
///
/// `GET /metrics`
///
/// # Errors
///
/// Returns 404 Not Found when metrics are disabled (`METRICS_ENABLED=false`).
pub async fn metrics_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| AppError::not_found("Metrics not enabled", json!({})))?;

    Ok((
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        handle.render(),
    )
        .into_response())
}
