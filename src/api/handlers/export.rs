//! Handler for CSV export endpoint.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::api::dto::export::{ExportQueryParams, ExportResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Writes a CSV report of matching links and returns its download URL.
///
/// # Endpoint
///
/// `POST /api/links/exports?search=example`
///
/// # Response
///
/// ```json
/// { "report_url": "http://localhost:3000/exports/20260101T120000000Z-aB3x_Q-links.csv" }
/// ```
pub async fn export_links_handler(
    State(state): State<AppState>,
    params: Result<Query<ExportQueryParams>, QueryRejection>,
) -> Result<Json<ExportResponse>, AppError> {
    let Query(params) = params?;
    let report = state.export_service.export_links(params.search).await?;

    Ok(Json(ExportResponse {
        report_url: report.report_url,
    }))
}
