//! API route configuration.

use crate::api::handlers::{
    create_link_handler, delete_link_handler, export_links_handler, list_links_handler,
    resolve_link_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Link management routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST   /links`          - Create a short link
/// - `GET    /links`          - List links (search, sort, paginate)
/// - `POST   /links/exports`  - Export matching links to CSV
/// - `GET    /links/{slug}`   - Resolve a slug and count the visit
/// - `DELETE /links/{slug}`   - Permanently delete a link
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(create_link_handler).get(list_links_handler))
        .route("/links/exports", post(export_links_handler))
        .route(
            "/links/{slug}",
            get(resolve_link_handler).delete(delete_link_handler),
        )
}
