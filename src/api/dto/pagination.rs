//! Pagination, sorting and search query parameters.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::api::dto::link::LinkResponse;
use crate::application::services::ListLinksQuery;
use crate::domain::repositories::{SortDirection, SortField};

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

/// Query parameters of `GET /api/links`.
///
/// Pagination bounds are checked by the service, so out-of-range values
/// produce a `validation_error` response rather than a rejection here.
#[derive(Debug, Default, Deserialize)]
pub struct ListLinksParams {
    pub search: Option<String>,
    pub sort_by: Option<SortField>,
    pub sort_direction: Option<SortDirection>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl From<ListLinksParams> for ListLinksQuery {
    fn from(params: ListLinksParams) -> Self {
        Self {
            search: params.search,
            sort_by: params.sort_by,
            sort_direction: params.sort_direction,
            page: params.pagination.page,
            page_size: params.pagination.page_size,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: i64,
    pub total_pages: u32,
}

#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub pagination: PaginationMeta,
    pub items: Vec<LinkResponse>,
}
