//! Handlers for the shortening endpoints.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::shorten::{BulkCreateRequest, BulkUrlResponse, CreateUrlRequest, UrlResponse};
use crate::api::extract::ValidatedJson;
use crate::application::services::CreateUrl;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path",
///   "customCode": "promo",   // optional
///   "expiresIn": 3600        // optional, seconds
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "shortUrl": "http://localhost:3000/promo",
///   "shortCode": "promo",
///   "originalUrl": "https://example.com/some/long/path",
///   "expiresAt": "2025-01-01T01:00:00Z",
///   "createdAt": "2025-01-01T00:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request for an invalid URL, custom code or expiry
/// - 409 Conflict if the short code is taken
/// - 415 Unsupported Media Type without a JSON content type
pub async fn shorten_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUrlRequest>,
) -> Result<(StatusCode, Json<UrlResponse>), AppError> {
    let created = state
        .url_service
        .create_short_url(CreateUrl {
            url: payload.url,
            custom_code: payload.custom_code,
            expires_in: payload.expires_in,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Creates short URLs for a batch of URLs.
///
/// # Endpoint
///
/// `POST /shorten/bulk`
///
/// # Request Body
///
/// ```json
/// { "urls": ["https://one.example.com", "https://two.example.com"] }
/// ```
///
/// Invalid URLs are dropped. `count` in the response is the number of short
/// URLs actually created.
///
/// # Errors
///
/// Returns 400 Bad Request if the batch is too large or holds no valid URL.
pub async fn bulk_shorten_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<BulkCreateRequest>,
) -> Result<(StatusCode, Json<BulkUrlResponse>), AppError> {
    let created = state.url_service.create_bulk_urls(payload.urls).await?;

    let response = BulkUrlResponse {
        count: created.count,
        urls: created.urls.into_iter().map(Into::into).collect(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}
