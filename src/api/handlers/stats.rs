//! Handler for per-URL statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::UrlStatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the stored record for a short code, including its click count.
///
/// # Endpoint
///
/// `GET /stats/{code}`
///
/// Expired records are still reported until cleanup removes them.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<UrlStatsResponse>, AppError> {
    let record = state.url_service.get_url_stats(&code).await?;

    Ok(Json(record.into()))
}
