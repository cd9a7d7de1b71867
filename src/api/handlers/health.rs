//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected" },
///     "export_storage": { "status": "ok", "message": "Writable" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let (db_check, storage_check) = tokio::join!(check_database(&state), check_export_storage(&state));

    let all_healthy = db_check.is_ok() && storage_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: db_check,
            export_storage: storage_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match state.link_service.check_store().await {
        Ok(()) => CheckStatus::ok("Connected"),
        Err(e) => {
            tracing::error!("Health check: database unreachable: {}", e);
            CheckStatus::error("Database is not reachable")
        }
    }
}

async fn check_export_storage(state: &AppState) -> CheckStatus {
    if state.export_service.check_storage().await {
        CheckStatus::ok("Writable")
    } else {
        CheckStatus::error("Export directory is not available")
    }
}
