//! API route configuration.

use crate::api::handlers::{
    bulk_shorten_handler, cleanup_handler, delete_url_handler, list_urls_handler,
    redirect_handler, shorten_handler, stats_handler, top_urls_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Shortening, redirect and per-code routes mounted at the root.
///
/// # Endpoints
///
/// - `POST   /shorten`        - Create a short URL
/// - `POST   /shorten/bulk`   - Create many short URLs
/// - `GET    /stats/{code}`   - Statistics for a short code
/// - `GET    /{code}`         - Redirect to the original URL
/// - `DELETE /{code}`         - Delete a short URL
pub fn url_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/shorten/bulk", post(bulk_shorten_handler))
        .route("/stats/{code}", get(stats_handler))
        .route("/{code}", get(redirect_handler).delete(delete_url_handler))
}

/// Management routes, nested under `/api`.
///
/// # Endpoints
///
/// - `GET  /urls`                 - Paginated listing, newest first
/// - `GET  /urls/top`             - Most clicked URLs
/// - `POST /maintenance/cleanup`  - Delete expired URLs
pub fn management_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", get(list_urls_handler))
        .route("/urls/top", get(top_urls_handler))
        .route("/maintenance/cleanup", post(cleanup_handler))
}
