//! DTOs for the shortening endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::CreatedUrl;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrlRequest {
    /// The original URL (absolute http/https, checked again by the service).
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,

    /// Optional custom short code (1-10 alphanumeric characters).
    pub custom_code: Option<String>,

    /// Optional lifetime in seconds.
    #[validate(range(min = 1, message = "expiresIn must be a positive number of seconds"))]
    pub expires_in: Option<i64>,
}

/// Request to shorten many URLs at once.
///
/// The batch limit is enforced by the service, which knows the configured
/// maximum.
#[derive(Debug, Deserialize, Validate)]
pub struct BulkCreateRequest {
    pub urls: Vec<String>,
}

/// A created short URL.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlResponse {
    pub short_url: String,
    pub short_code: String,
    pub original_url: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<CreatedUrl> for UrlResponse {
    fn from(created: CreatedUrl) -> Self {
        Self {
            short_url: created.short_url,
            short_code: created.record.short_code,
            original_url: created.record.original_url,
            expires_at: created.record.expires_at,
            created_at: created.record.created_at,
        }
    }
}

/// Result of a bulk creation; `count` is the number of rows inserted.
#[derive(Debug, Serialize)]
pub struct BulkUrlResponse {
    pub count: usize,
    pub urls: Vec<UrlResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_camel_case() {
        let json = r#"{"url": "https://example.com", "customCode": "promo", "expiresIn": 60}"#;
        let req: CreateUrlRequest = serde_json::from_str(json).unwrap();

        assert_eq!(req.custom_code.as_deref(), Some("promo"));
        assert_eq!(req.expires_in, Some(60));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_request_rejects_non_positive_expiry() {
        let json = r#"{"url": "https://example.com", "expiresIn": 0}"#;
        let req: CreateUrlRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_request_rejects_overlong_url() {
        let req = CreateUrlRequest {
            url: format!("https://example.com/{}", "a".repeat(2048)),
            custom_code: None,
            expires_in: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_response_serializes_null_expiry() {
        let response = UrlResponse {
            short_url: "https://sho.rt/abc1234".to_string(),
            short_code: "abc1234".to_string(),
            original_url: "https://example.com".to_string(),
            expires_at: None,
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["shortCode"], "abc1234");
        assert!(value["expiresAt"].is_null());
        assert!(value.get("createdAt").is_some());
    }
}
