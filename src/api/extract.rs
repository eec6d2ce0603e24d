//! Request extractors.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::json;
use validator::Validate;

use crate::error::AppError;

/// JSON body that is deserialized and then validated with [`Validate`].
///
/// Rejections use the service error envelope:
///
/// - missing or wrong `Content-Type` -> `415 unsupported_media_type`
/// - malformed JSON or wrong field types -> `400 validation_error`
/// - failed field validation -> `400 validation_error` with field details
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_response)?;

        value
            .validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(Self(value))
    }
}

fn rejection_response(rejection: JsonRejection) -> Response {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Json(json!({
                "error": {
                    "code": "unsupported_media_type",
                    "message": "Content-Type must be application/json",
                    "details": {}
                }
            })),
        )
            .into_response(),
        other => AppError::bad_request(
            "Invalid JSON body",
            json!({ "reason": other.body_text() }),
        )
        .into_response(),
    }
}
