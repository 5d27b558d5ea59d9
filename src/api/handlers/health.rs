//! Handlers for liveness and readiness checks.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthResponse, ReadinessChecks, ReadinessResponse};
use crate::state::AppState;

/// Liveness check. Touches neither store.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// ```json
/// { "ok": true, "version": "0.1.0" }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check of both stores.
///
/// # Endpoint
///
/// `GET /ready`
///
/// # Response Codes
///
/// - **200 OK**: Database and cache reachable
/// - **503 Service Unavailable**: At least one store is down
pub async fn ready_handler(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    let (db_ok, cache_ok) = tokio::join!(
        state.repository.health_check(),
        state.cache.health_check()
    );

    let database = CheckStatus::from_check(db_ok, "Database unreachable");
    let cache = CheckStatus::from_check(cache_ok, "Cache unreachable");
    let ready = database.is_ok() && cache.is_ok();

    let response = ReadinessResponse {
        status: if ready { "ready" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: ReadinessChecks { database, cache },
    };

    if ready {
        Ok(Json(response))
    } else {
        tracing::warn!(database = db_ok, cache = cache_ok, "Readiness check failed");
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
