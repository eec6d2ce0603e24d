//! DTOs for per-URL statistics and listings.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::application::services::Paginated;
use crate::domain::entities::UrlRecord;

/// Full view of a stored record, including usage counters.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlStatsResponse {
    pub id: Uuid,
    pub short_code: String,
    pub original_url: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub last_accessed_at: Option<DateTime<Utc>>,
}

impl From<UrlRecord> for UrlStatsResponse {
    fn from(record: UrlRecord) -> Self {
        Self {
            id: record.id,
            short_code: record.short_code,
            original_url: record.original_url,
            click_count: record.click_count,
            created_at: record.created_at,
            expires_at: record.expires_at,
            last_accessed_at: record.last_accessed_at,
        }
    }
}

/// One page of records.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlListResponse {
    pub data: Vec<UrlStatsResponse>,
    pub total: i64,
    pub per_page: i64,
    pub current_page: i64,
    pub max_pages: i64,
}

impl From<Paginated<UrlRecord>> for UrlListResponse {
    fn from(page: Paginated<UrlRecord>) -> Self {
        Self {
            data: page.data.into_iter().map(Into::into).collect(),
            total: page.total,
            per_page: page.per_page,
            current_page: page.current_page,
            max_pages: page.max_pages,
        }
    }
}

/// Most clicked records.
#[derive(Debug, Serialize)]
pub struct TopUrlsResponse {
    pub urls: Vec<UrlStatsResponse>,
}

/// Plain confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponse {
    pub message: String,
    pub deleted_count: u64,
}
