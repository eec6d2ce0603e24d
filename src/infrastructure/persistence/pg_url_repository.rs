//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::{ListQuery, OrderField, SortDirection, UrlFilter, UrlRepository};
use crate::error::AppError;

const RETURNING_COLUMNS: &str =
    "id, short_code, original_url, click_count, created_at, expires_at, last_accessed_at";

#[derive(sqlx::FromRow)]
struct UrlRow {
    id: Uuid,
    short_code: String,
    original_url: String,
    click_count: i64,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    last_accessed_at: Option<DateTime<Utc>>,
}

impl From<UrlRow> for UrlRecord {
    fn from(row: UrlRow) -> Self {
        Self {
            id: row.id,
            short_code: row.short_code,
            original_url: row.original_url,
            click_count: row.click_count,
            created_at: row.created_at,
            expires_at: row.expires_at,
            last_accessed_at: row.last_accessed_at,
        }
    }
}

fn filter_clause(filter: UrlFilter) -> &'static str {
    match filter {
        UrlFilter::All => "",
        UrlFilter::Active => " WHERE (expires_at IS NULL OR expires_at > NOW())",
        UrlFilter::Expired => " WHERE (expires_at IS NOT NULL AND expires_at <= NOW())",
    }
}

fn order_clause(field: OrderField, direction: SortDirection) -> String {
    let column = match field {
        OrderField::CreatedAt => "created_at",
        OrderField::ClickCount => "click_count",
        OrderField::LastAccessedAt => "last_accessed_at",
    };
    let direction = match direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };

    format!(" ORDER BY {column} {direction} NULLS LAST, id")
}

/// PostgreSQL repository for short URL records.
///
/// Dynamic parts of listing queries are chosen from closed enums, never from
/// caller-supplied strings; values are always bound.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn create(&self, new_url: NewUrlRecord) -> Result<UrlRecord, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            INSERT INTO urls (id, short_code, original_url, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, short_code, original_url, click_count, created_at, expires_at, last_accessed_at
            "#,
        )
        .bind(new_url.id)
        .bind(&new_url.short_code)
        .bind(&new_url.original_url)
        .bind(new_url.expires_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn create_many(&self, new_urls: Vec<NewUrlRecord>) -> Result<Vec<UrlRecord>, AppError> {
        if new_urls.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO urls (id, short_code, original_url, expires_at) ");

        builder.push_values(new_urls, |mut row, new_url| {
            row.push_bind(new_url.id)
                .push_bind(new_url.short_code)
                .push_bind(new_url.original_url)
                .push_bind(new_url.expires_at);
        });
        builder.push(" ON CONFLICT DO NOTHING RETURNING ");
        builder.push(RETURNING_COLUMNS);

        let rows = builder
            .build_query_as::<UrlRow>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(UrlRecord::from).collect())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT id, short_code, original_url, click_count, created_at, expires_at, last_accessed_at
            FROM urls
            WHERE short_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn find_active_by_code(&self, code: &str) -> Result<Option<UrlRecord>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT id, short_code, original_url, click_count, created_at, expires_at, last_accessed_at
            FROM urls
            WHERE short_code = $1
              AND (expires_at IS NULL OR expires_at > NOW())
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn increment_click_count(&self, code: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE urls
            SET click_count = click_count + 1,
                last_accessed_at = NOW()
            WHERE short_code = $1
            "#,
        )
        .bind(code)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "URL not found",
                json!({ "code": code }),
            ));
        }

        Ok(())
    }

    async fn delete(&self, code: &str) -> Result<UrlRecord, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            DELETE FROM urls
            WHERE short_code = $1
            RETURNING id, short_code, original_url, click_count, created_at, expires_at, last_accessed_at
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(UrlRecord::from)
            .ok_or_else(|| AppError::not_found("URL not found", json!({ "code": code })))
    }

    async fn find_many(&self, query: ListQuery) -> Result<Vec<UrlRecord>, AppError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        builder.push(RETURNING_COLUMNS);
        builder.push(" FROM urls");
        builder.push(filter_clause(query.filter));
        builder.push(order_clause(query.order_by, query.direction));
        builder.push(" LIMIT ");
        builder.push_bind(query.limit);
        builder.push(" OFFSET ");
        builder.push_bind(query.offset);

        let rows = builder
            .build_query_as::<UrlRow>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(UrlRecord::from).collect())
    }

    async fn count(&self, filter: UrlFilter) -> Result<i64, AppError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM urls");
        builder.push(filter_clause(filter));

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn delete_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM urls WHERE expires_at < NOW()")
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_clauses() {
        assert_eq!(filter_clause(UrlFilter::All), "");
        assert!(filter_clause(UrlFilter::Active).contains("expires_at > NOW()"));
        assert!(filter_clause(UrlFilter::Expired).contains("expires_at <= NOW()"));
    }

    #[test]
    fn test_order_clause() {
        assert_eq!(
            order_clause(OrderField::CreatedAt, SortDirection::Desc),
            " ORDER BY created_at DESC NULLS LAST, id"
        );
        assert_eq!(
            order_clause(OrderField::ClickCount, SortDirection::Asc),
            " ORDER BY click_count ASC NULLS LAST, id"
        );
    }
}
