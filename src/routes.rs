//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorten`, `POST /shorten/bulk` - Create short URLs
//! - `GET  /{code}`, `DELETE /{code}`       - Redirect / delete
//! - `GET  /stats/{code}`                   - Per-URL statistics
//! - `/api/*`                               - Listing, ranking, maintenance
//! - `GET  /health`                         - Health check: DB and cache
//!
//! Anything else answers `404` with the JSON error envelope.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Permissive, any origin
//! - **Timing** - `X-Response-Time` header on every response
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{timing, tracing};
use crate::error::AppError;
use crate::state::AppState;
use axum::http::Uri;
use axum::routing::get;
use axum::{Router, middleware};
use serde_json::json;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Routes and middleware without path normalization.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api::routes::management_routes())
        .merge(api::routes::url_routes())
        .fallback(not_found_handler)
        .with_state(state)
        .layer(middleware::from_fn(timing::layer))
        .layer(CorsLayer::permissive())
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
///
/// Trailing slashes are trimmed before routing, so `/stats/abc/` and
/// `/stats/abc` reach the same handler.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

async fn not_found_handler(uri: Uri) -> AppError {
    AppError::not_found("Route not found", json!({ "path": uri.path() }))
}
