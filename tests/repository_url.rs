mod common;

use chrono::{Duration, Utc};
use quicklink::AppError;
use quicklink::domain::entities::NewUrlRecord;
use quicklink::domain::repositories::{
    ListQuery, OrderField, SortDirection, UrlFilter, UrlRepository,
};
use quicklink::infrastructure::persistence::PgUrlRepository;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

fn new_url(code: &str, url: &str) -> NewUrlRecord {
    NewUrlRecord {
        id: Uuid::new_v4(),
        short_code: code.to_string(),
        original_url: url.to_string(),
        expires_at: None,
    }
}

#[sqlx::test]
async fn test_create_url(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    let record = repo
        .create(new_url("test123", "https://example.com"))
        .await
        .unwrap();

    assert_eq!(record.short_code, "test123");
    assert_eq!(record.original_url, "https://example.com");
    assert_eq!(record.click_count, 0);
    assert!(record.expires_at.is_none());
    assert!(record.last_accessed_at.is_none());
}

#[sqlx::test]
async fn test_create_duplicate_code_conflicts(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    repo.create(new_url("taken", "https://one.example.com"))
        .await
        .unwrap();
    let err = repo
        .create(new_url("taken", "https://two.example.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict { .. }));
    assert_eq!(err.to_string(), "Short code already exists");
}

#[sqlx::test]
async fn test_create_many_skips_duplicates(pool: PgPool) {
    common::create_test_url(&pool, "dup0001", "https://existing.example.com").await;
    let repo = PgUrlRepository::new(Arc::new(pool));

    let inserted = repo
        .create_many(vec![
            new_url("dup0001", "https://one.example.com"),
            new_url("new0001", "https://two.example.com"),
            new_url("new0001", "https://three.example.com"),
        ])
        .await
        .unwrap();

    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].short_code, "new0001");
    assert_eq!(inserted[0].original_url, "https://two.example.com");

    assert_eq!(repo.count(UrlFilter::All).await.unwrap(), 2);
}

#[sqlx::test]
async fn test_create_many_empty(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));
    assert!(repo.create_many(Vec::new()).await.unwrap().is_empty());
}

#[sqlx::test]
async fn test_find_by_code(pool: PgPool) {
    common::create_test_url(&pool, "abc123", "https://example.com").await;
    let repo = PgUrlRepository::new(Arc::new(pool));

    let found = repo.find_by_code("abc123").await.unwrap();
    assert_eq!(found.unwrap().original_url, "https://example.com");

    assert!(repo.find_by_code("notfound").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_find_active_excludes_expired(pool: PgPool) {
    common::create_expired_url(&pool, "expired", "https://old.example.com").await;
    common::create_expiring_url(&pool, "later", "https://new.example.com").await;
    let repo = PgUrlRepository::new(Arc::new(pool));

    assert!(repo.find_active_by_code("expired").await.unwrap().is_none());
    assert!(repo.find_active_by_code("later").await.unwrap().is_some());

    // Expired rows stay visible to plain lookups until cleanup.
    assert!(repo.find_by_code("expired").await.unwrap().is_some());
}

#[sqlx::test]
async fn test_increment_click_count(pool: PgPool) {
    common::create_test_url(&pool, "clicky", "https://example.com").await;
    let repo = PgUrlRepository::new(Arc::new(pool.clone()));

    repo.increment_click_count("clicky").await.unwrap();
    repo.increment_click_count("clicky").await.unwrap();

    let record = repo.find_by_code("clicky").await.unwrap().unwrap();
    assert_eq!(record.click_count, 2);
    assert!(record.last_accessed_at.is_some());
}

#[sqlx::test]
async fn test_increment_missing_code(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    let result = repo.increment_click_count("missing").await;
    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[sqlx::test]
async fn test_delete(pool: PgPool) {
    common::create_test_url(&pool, "bye", "https://example.com").await;
    let repo = PgUrlRepository::new(Arc::new(pool));

    let deleted = repo.delete("bye").await.unwrap();
    assert_eq!(deleted.short_code, "bye");

    assert!(repo.find_by_code("bye").await.unwrap().is_none());
    assert!(matches!(
        repo.delete("bye").await,
        Err(AppError::NotFound { .. })
    ));
}

#[sqlx::test]
async fn test_find_many_orders_and_paginates(pool: PgPool) {
    for (code, clicks) in [("a1", 5), ("b2", 50), ("c3", 0)] {
        common::create_test_url(&pool, code, "https://example.com").await;
        common::set_click_count(&pool, code, clicks).await;
    }
    let repo = PgUrlRepository::new(Arc::new(pool));

    let top = repo
        .find_many(ListQuery::new(2, 0).order_by(OrderField::ClickCount, SortDirection::Desc))
        .await
        .unwrap();
    let codes: Vec<_> = top.iter().map(|r| r.short_code.as_str()).collect();
    assert_eq!(codes, vec!["b2", "a1"]);

    let page = repo
        .find_many(ListQuery::new(2, 2).order_by(OrderField::ClickCount, SortDirection::Desc))
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].short_code, "c3");
}

#[sqlx::test]
async fn test_find_many_by_last_access_ascending(pool: PgPool) {
    for code in ["never", "first", "second"] {
        common::create_test_url(&pool, code, "https://example.com").await;
    }
    let repo = PgUrlRepository::new(Arc::new(pool));

    repo.increment_click_count("first").await.unwrap();
    repo.increment_click_count("second").await.unwrap();

    let records = repo
        .find_many(ListQuery::new(10, 0).order_by(OrderField::LastAccessedAt, SortDirection::Asc))
        .await
        .unwrap();
    let codes: Vec<_> = records.iter().map(|r| r.short_code.as_str()).collect();
    assert_eq!(codes, vec!["first", "second", "never"]);
}

#[sqlx::test]
async fn test_count_with_filters(pool: PgPool) {
    common::create_test_url(&pool, "forever", "https://example.com").await;
    common::create_expiring_url(&pool, "later", "https://example.com").await;
    common::create_expired_url(&pool, "gone", "https://example.com").await;
    let repo = PgUrlRepository::new(Arc::new(pool));

    assert_eq!(repo.count(UrlFilter::All).await.unwrap(), 3);
    assert_eq!(repo.count(UrlFilter::Active).await.unwrap(), 2);
    assert_eq!(repo.count(UrlFilter::Expired).await.unwrap(), 1);

    let expired = repo
        .find_many(ListQuery::new(10, 0).with_filter(UrlFilter::Expired))
        .await
        .unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].short_code, "gone");
}

#[sqlx::test]
async fn test_delete_expired(pool: PgPool) {
    common::create_test_url(&pool, "forever", "https://example.com").await;
    common::create_expiring_url(&pool, "later", "https://example.com").await;
    common::create_expired_url(&pool, "gone1", "https://example.com").await;
    common::create_expired_url(&pool, "gone2", "https://example.com").await;
    let repo = PgUrlRepository::new(Arc::new(pool));

    assert_eq!(repo.delete_expired().await.unwrap(), 2);
    assert_eq!(repo.delete_expired().await.unwrap(), 0);
    assert_eq!(repo.count(UrlFilter::All).await.unwrap(), 2);
}

#[sqlx::test]
async fn test_create_with_expiry_roundtrips(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));
    let expires_at = Utc::now() + Duration::hours(2);

    let record = repo
        .create(NewUrlRecord {
            expires_at: Some(expires_at),
            ..new_url("timed", "https://example.com")
        })
        .await
        .unwrap();

    let stored = record.expires_at.unwrap();
    assert!((stored - expires_at).num_milliseconds().abs() < 1);
}

#[sqlx::test]
async fn test_ping(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));
    assert!(repo.ping().await.is_ok());
}
