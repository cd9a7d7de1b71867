//! Handlers for link management endpoints (create, list, resolve, delete).

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkResponse, ResolveResponse};
use crate::api::dto::pagination::{LinkListResponse, ListLinksParams, PaginationMeta};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "original_url": "https://example.com/very/long/path",
///   "slug": "promo"   // optional
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "slug": "promo",
///   "original_url": "https://example.com/very/long/path",
///   "short_url": "http://localhost:3000/promo",
///   "visits": 0,
///   "created_at": "2026-01-01T12:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the URL or slug is malformed.
/// Returns 409 Conflict if the slug is already taken.
pub async fn create_link_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let link = state
        .link_service
        .create_link(payload.original_url, payload.slug)
        .await?;

    let short_url = state.link_service.short_url(&link.slug);

    Ok((StatusCode::CREATED, Json(LinkResponse::new(link, short_url))))
}

/// Lists links with search, ordering and pagination.
///
/// # Endpoint
///
/// `GET /api/links?search=example&sort_by=visits&sort_direction=desc&page=1&page_size=20`
///
/// All parameters are optional. Without `sort_by`, newest links come first.
///
/// # Errors
///
/// Returns 400 Bad Request if `page` is 0 or `page_size` is outside 1..=100.
pub async fn list_links_handler(
    State(state): State<AppState>,
    params: Result<Query<ListLinksParams>, QueryRejection>,
) -> Result<Json<LinkListResponse>, AppError> {
    let Query(params) = params?;
    let page = state.link_service.list_links(params.into()).await?;

    let pagination = PaginationMeta {
        page: page.page,
        page_size: page.page_size,
        total_items: page.total,
        total_pages: page.total_pages(),
    };

    let items = page
        .items
        .into_iter()
        .map(|link| {
            let short_url = state.link_service.short_url(&link.slug);
            LinkResponse::new(link, short_url)
        })
        .collect();

    Ok(Json(LinkListResponse { pagination, items }))
}

/// Resolves a slug to its destination and counts the visit.
///
/// # Endpoint
///
/// `GET /api/links/{slug}`
///
/// # Errors
///
/// Returns 404 Not Found if the slug does not exist.
pub async fn resolve_link_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ResolveResponse>, AppError> {
    let original_url = state.link_service.resolve(&slug).await?;

    Ok(Json(ResolveResponse { original_url }))
}

/// Permanently deletes a link.
///
/// # Endpoint
///
/// `DELETE /api/links/{slug}`
///
/// # Errors
///
/// Returns 404 Not Found if the slug does not exist or was already deleted.
pub async fn delete_link_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_link(&slug).await?;

    Ok(StatusCode::NO_CONTENT)
}
