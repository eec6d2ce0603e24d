//! Handlers for URL management: listing, ranking and deletion.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::dto::pagination::{ListParams, TopParams};
use crate::api::dto::stats::{MessageResponse, TopUrlsResponse, UrlListResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Lists short URLs, newest first unless `sortBy`/`order` say otherwise.
///
/// # Endpoint
///
/// `GET /api/urls?limit=10&offset=0&sortBy=clickCount&order=desc`
///
/// `sortBy` is one of `createdAt`, `clickCount`, `lastAccessedAt`.
///
/// # Response
///
/// ```json
/// {
///   "data": [ ... ],
///   "total": 42,
///   "perPage": 10,
///   "currentPage": 1,
///   "maxPages": 5
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if `limit` or `offset` is out of range.
pub async fn list_urls_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<UrlListResponse>, AppError> {
    let (limit, offset) = params.limit_offset();
    let (order_by, direction) = params.ordering();
    let page = state
        .url_service
        .list_urls_ordered(limit, offset, order_by, direction)
        .await?;

    Ok(Json(page.into()))
}

/// Lists the most clicked short URLs.
///
/// # Endpoint
///
/// `GET /api/urls/top?limit=10`
pub async fn top_urls_handler(
    State(state): State<AppState>,
    Query(params): Query<TopParams>,
) -> Result<Json<TopUrlsResponse>, AppError> {
    let urls = state.url_service.get_top_urls(params.limit()).await?;

    Ok(Json(TopUrlsResponse {
        urls: urls.into_iter().map(Into::into).collect(),
    }))
}

/// Deletes a short URL and evicts it from the cache.
///
/// # Endpoint
///
/// `DELETE /{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn delete_url_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.url_service.delete_url(&code).await?;

    Ok(Json(MessageResponse {
        message: "URL deleted successfully".to_string(),
    }))
}
