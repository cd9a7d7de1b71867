//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a slug to its original URL.
///
/// # Endpoint
///
/// `GET /{slug}`
///
/// The visit is counted before the redirect is sent.
///
/// # Errors
///
/// Returns 404 Not Found if the slug doesn't exist.
pub async fn redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let original_url = state.link_service.resolve(&slug).await?;
    debug!(slug, "Redirecting to {}", original_url);

    Ok(Redirect::temporary(&original_url))
}
