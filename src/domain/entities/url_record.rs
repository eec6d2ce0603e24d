//! Short URL record, the single persisted entity.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A stored mapping from a short code to its destination.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlRecord {
    pub id: Uuid,
    pub short_code: String,
    pub original_url: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub last_accessed_at: Option<DateTime<Utc>>,
}

impl UrlRecord {
    /// Returns true if the record has an expiry that is not in the future.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e <= now)
    }

    /// Seconds until expiry, or `None` for records that never expire.
    ///
    /// Already expired records report zero.
    pub fn seconds_until_expiry(&self, now: DateTime<Utc>) -> Option<u64> {
        self.expires_at
            .map(|e| u64::try_from((e - now).num_seconds()).unwrap_or(0))
    }
}

/// Input data for inserting a record.
///
/// `click_count`, `created_at` and `last_accessed_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUrlRecord {
    pub id: Uuid,
    pub short_code: String,
    pub original_url: String,
    pub expires_at: Option<DateTime<Utc>>,
}
