//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{slug}`      - Short link redirect
//! - `GET  /health`      - Health check: link store, export storage
//! - `/api/*`            - REST API for link management
//! - `/exports/*`        - Generated CSV reports
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Permissive, so browser front-ends on other origins can call the API
//! - **Path normalization** - Trailing slash handling

use std::path::Path;

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Builds the router with all routes and middleware, except path normalization.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `export_dir` - directory published under `/exports`
pub fn router(state: AppState, export_dir: &Path) -> Router {
    Router::new()
        .route("/{slug}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api::routes::link_routes())
        .nest_service("/exports", ServeDir::new(export_dir))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(tracing::layer())
}

/// Constructs the application service: [`router`] wrapped so that a trailing
/// slash never changes which route matches.
pub fn app_router(state: AppState, export_dir: &Path) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state, export_dir))
}
