//! DTOs for the CSV export endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct ExportQueryParams {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub report_url: String,
}
