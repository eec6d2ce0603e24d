#![allow(dead_code)]

use quicklink::application::services::{ServiceSettings, UrlService};
use quicklink::infrastructure::cache::{CacheService, MemoryCache, NullCache};
use quicklink::infrastructure::persistence::PgUrlRepository;
use quicklink::state::AppState;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

pub const BASE_URL: &str = "https://sho.rt";

pub async fn create_test_url(pool: &PgPool, code: &str, url: &str) {
    sqlx::query("INSERT INTO urls (id, short_code, original_url) VALUES ($1, $2, $3)")
        .bind(Uuid::new_v4())
        .bind(code)
        .bind(url)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn create_expired_url(pool: &PgPool, code: &str, url: &str) {
    sqlx::query(
        "INSERT INTO urls (id, short_code, original_url, expires_at) \
         VALUES ($1, $2, $3, NOW() - INTERVAL '1 hour')",
    )
    .bind(Uuid::new_v4())
    .bind(code)
    .bind(url)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn create_expiring_url(pool: &PgPool, code: &str, url: &str) {
    sqlx::query(
        "INSERT INTO urls (id, short_code, original_url, expires_at) \
         VALUES ($1, $2, $3, NOW() + INTERVAL '1 hour')",
    )
    .bind(Uuid::new_v4())
    .bind(code)
    .bind(url)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn set_click_count(pool: &PgPool, code: &str, clicks: i64) {
    sqlx::query("UPDATE urls SET click_count = $2 WHERE short_code = $1")
        .bind(code)
        .bind(clicks)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn click_count(pool: &PgPool, code: &str) -> i64 {
    sqlx::query_scalar("SELECT click_count FROM urls WHERE short_code = $1")
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn test_settings() -> ServiceSettings {
    ServiceSettings {
        base_url: BASE_URL.to_string(),
        ..ServiceSettings::default()
    }
}

pub fn create_test_service(pool: PgPool, cache: Arc<dyn CacheService>) -> UrlService {
    let repository = Arc::new(PgUrlRepository::new(Arc::new(pool)));
    UrlService::new(repository, cache, test_settings())
}

/// State backed by the test database with caching disabled, so every
/// redirect goes through the store.
pub fn create_test_state(pool: PgPool) -> AppState {
    AppState::new(Arc::new(create_test_service(pool, Arc::new(NullCache::new()))))
}

pub fn create_cached_test_state(pool: PgPool) -> (AppState, Arc<MemoryCache>) {
    let cache = Arc::new(MemoryCache::new(1_000, 3_600));
    let service = create_test_service(pool, cache.clone());
    (AppState::new(Arc::new(service)), cache)
}
