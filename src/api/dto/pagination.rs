//! Query parameters for listing endpoints.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::repositories::{OrderField, SortDirection};

const DEFAULT_LIMIT: i64 = 10;

/// `?sortBy=` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    CreatedAt,
    ClickCount,
    LastAccessedAt,
}

impl From<SortBy> for OrderField {
    fn from(sort_by: SortBy) -> Self {
        match sort_by {
            SortBy::CreatedAt => OrderField::CreatedAt,
            SortBy::ClickCount => OrderField::ClickCount,
            SortBy::LastAccessedAt => OrderField::LastAccessedAt,
        }
    }
}

/// `?order=asc|desc`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl From<SortOrder> for SortDirection {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => SortDirection::Asc,
            SortOrder::Desc => SortDirection::Desc,
        }
    }
}

/// `?limit=&offset=&sortBy=&order=` for `GET /api/urls`.
///
/// Uses `serde_with` to parse numbers from query strings; range checks are
/// done by the service against the configured page size cap. Unknown sort
/// values are rejected while deserializing.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub offset: Option<i64>,

    #[serde(default)]
    pub sort_by: Option<SortBy>,

    #[serde(default)]
    pub order: Option<SortOrder>,
}

impl ListParams {
    /// Returns `(limit, offset)` with defaults applied.
    pub fn limit_offset(&self) -> (i64, i64) {
        (self.limit.unwrap_or(DEFAULT_LIMIT), self.offset.unwrap_or(0))
    }

    /// Returns the ordering, newest first unless overridden.
    pub fn ordering(&self) -> (OrderField, SortDirection) {
        (
            self.sort_by.map(Into::into).unwrap_or_default(),
            self.order.map(Into::into).unwrap_or_default(),
        )
    }
}

/// `?limit=` for `GET /api/urls/top`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct TopParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<i64>,
}

impl TopParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(ListParams::default().limit_offset(), (10, 0));
        assert_eq!(
            ListParams::default().ordering(),
            (OrderField::CreatedAt, SortDirection::Desc)
        );
        assert_eq!(TopParams::default().limit(), 10);
    }

    #[test]
    fn test_explicit_values() {
        let params = ListParams {
            limit: Some(25),
            offset: Some(50),
            sort_by: Some(SortBy::ClickCount),
            order: Some(SortOrder::Asc),
        };
        assert_eq!(params.limit_offset(), (25, 50));
        assert_eq!(
            params.ordering(),
            (OrderField::ClickCount, SortDirection::Asc)
        );
    }

    #[test]
    fn test_sort_values_deserialize() {
        let by: SortBy = serde_json::from_str("\"lastAccessedAt\"").unwrap();
        assert_eq!(by, SortBy::LastAccessedAt);
        let order: SortOrder = serde_json::from_str("\"desc\"").unwrap();
        assert_eq!(order, SortOrder::Desc);
        assert!(serde_json::from_str::<SortBy>("\"originalUrl\"").is_err());
    }
}
