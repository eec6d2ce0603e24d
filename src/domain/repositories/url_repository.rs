//! Repository trait for short URL records.

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Column used to order listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderField {
    #[default]
    CreatedAt,
    ClickCount,
    LastAccessedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Row predicate shared by listing and counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UrlFilter {
    #[default]
    All,
    /// Rows without an expiry or expiring in the future.
    Active,
    /// Rows whose expiry has passed.
    Expired,
}

/// Paginated listing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: i64,
    pub offset: i64,
    pub order_by: OrderField,
    pub direction: SortDirection,
    pub filter: UrlFilter,
}

impl ListQuery {
    /// Newest records first, no filter.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit,
            offset,
            order_by: OrderField::default(),
            direction: SortDirection::default(),
            filter: UrlFilter::default(),
        }
    }

    pub fn order_by(mut self, field: OrderField, direction: SortDirection) -> Self {
        self.order_by = field;
        self.direction = direction;
        self
    }

    pub fn with_filter(mut self, filter: UrlFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Persistence operations for [`UrlRecord`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts a record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code already exists.
    async fn create(&self, new_url: NewUrlRecord) -> Result<UrlRecord, AppError>;

    /// Inserts many records, silently skipping rows whose short code is
    /// already taken (including by an earlier row of the same batch).
    ///
    /// Returns exactly the rows that were inserted; its length is the
    /// inserted count.
    async fn create_many(&self, new_urls: Vec<NewUrlRecord>) -> Result<Vec<UrlRecord>, AppError>;

    /// Finds a record by short code, expired or not.
    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Finds a record by short code, excluding expired ones.
    async fn find_active_by_code(&self, code: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Atomically bumps `click_count` and stamps `last_accessed_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this code.
    async fn increment_click_count(&self, code: &str) -> Result<(), AppError>;

    /// Removes a record and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this code.
    async fn delete(&self, code: &str) -> Result<UrlRecord, AppError>;

    /// Lists records according to `query`.
    async fn find_many(&self, query: ListQuery) -> Result<Vec<UrlRecord>, AppError>;

    /// Counts records matching `filter`.
    async fn count(&self, filter: UrlFilter) -> Result<i64, AppError>;

    /// Deletes every record whose expiry has passed and returns how many.
    async fn delete_expired(&self) -> Result<u64, AppError>;

    /// Round-trips a trivial query to verify connectivity.
    async fn ping(&self) -> Result<(), AppError>;
}
