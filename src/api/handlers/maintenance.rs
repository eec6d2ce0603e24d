//! Handler for maintenance tasks.

use axum::{Json, extract::State};

use crate::api::dto::stats::CleanupResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Deletes every expired short URL.
///
/// # Endpoint
///
/// `POST /api/maintenance/cleanup`
///
/// # Response
///
/// ```json
/// { "message": "Cleanup completed", "deletedCount": 3 }
/// ```
pub async fn cleanup_handler(
    State(state): State<AppState>,
) -> Result<Json<CleanupResponse>, AppError> {
    let deleted_count = state.url_service.cleanup_expired_urls().await?;

    Ok(Json(CleanupResponse {
        message: "Cleanup completed".to_string(),
        deleted_count,
    }))
}
