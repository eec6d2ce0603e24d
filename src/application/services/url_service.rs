//! Short URL creation, resolution and maintenance.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::json;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::{ListQuery, OrderField, SortDirection, UrlFilter, UrlRepository};
use crate::error::AppError;
use crate::infrastructure::cache::{CacheEntry, CacheService};
use crate::utils::base62;
use crate::utils::url_validator::{is_reserved_code, is_valid_short_code, is_valid_url, sanitize};

/// Tunables for [`UrlService`], taken from [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Prefix of every short URL, e.g. `https://sho.rt`.
    pub base_url: String,
    /// Length of generated short codes.
    pub code_length: usize,
    /// Upper bound for a bulk creation request.
    pub max_bulk_urls: usize,
    /// Upper bound for `limit` in listings.
    pub max_page_size: i64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            code_length: 7,
            max_bulk_urls: 100,
            max_page_size: 100,
        }
    }
}

/// Input of [`UrlService::create_short_url`].
#[derive(Debug, Clone, Default)]
pub struct CreateUrl {
    pub url: String,
    pub custom_code: Option<String>,
    /// Lifetime in seconds, counted from now.
    pub expires_in: Option<i64>,
}

/// A freshly created mapping together with its public short URL.
#[derive(Debug, Clone)]
pub struct CreatedUrl {
    pub short_url: String,
    pub record: UrlRecord,
}

#[derive(Debug, Clone)]
pub struct BulkCreated {
    /// Rows actually inserted.
    pub count: usize,
    pub urls: Vec<CreatedUrl>,
}

/// One page of a listing.
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub per_page: i64,
    pub current_page: i64,
    pub max_pages: i64,
}

/// Orchestrates validation, code generation, persistence and caching.
///
/// The service is stateless; share it behind an `Arc`. The store is the
/// source of truth and enforces short code uniqueness. The cache is only
/// ever consulted or populated best-effort.
pub struct UrlService {
    repository: Arc<dyn UrlRepository>,
    cache: Arc<dyn CacheService>,
    settings: ServiceSettings,
}

impl UrlService {
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn CacheService>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            repository,
            cache,
            settings,
        }
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Creates a short URL.
    ///
    /// The short code is `custom_code` when given, otherwise derived from a
    /// fresh UUID with [`base62::encode`]. The mapping is written through to
    /// the cache once the store accepted it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - the URL is not an absolute http(s) URL
    /// - the custom code is malformed or reserved
    /// - `expires_in` is not a positive number of seconds
    ///
    /// Returns [`AppError::Conflict`] if the short code already exists.
    pub async fn create_short_url(&self, request: CreateUrl) -> Result<CreatedUrl, AppError> {
        let original_url = sanitize(&request.url);
        if !is_valid_url(original_url) {
            return Err(AppError::bad_request(
                "Invalid URL format",
                json!({ "url": request.url }),
            ));
        }

        if let Some(custom) = &request.custom_code {
            validate_custom_code(custom)?;
        }

        let expires_at = request.expires_in.map(expiry_from_now).transpose()?;

        let id = Uuid::new_v4();
        let short_code = match request.custom_code {
            Some(custom) => custom,
            None => base62::encode(&id, self.settings.code_length),
        };

        let new_url = NewUrlRecord {
            id,
            short_code,
            original_url: original_url.to_string(),
            expires_at,
        };

        let record = self.repository.create(new_url).await?;

        self.cache
            .set(
                &record.short_code,
                &record.original_url,
                cache_ttl_for(&record),
            )
            .await;

        info!(code = %record.short_code, "Short URL created");

        Ok(CreatedUrl {
            short_url: self.short_url(&record.short_code),
            record,
        })
    }

    /// Creates short URLs for many URLs at once.
    ///
    /// Invalid entries are dropped after trimming. Generated codes that
    /// collide with an existing row are skipped by the store, so `count`
    /// reports rows actually inserted and `urls` lists only those rows.
    /// Bulk entries never expire and never use custom codes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the batch exceeds the configured
    /// maximum (checked before anything is written) or contains no valid URL.
    pub async fn create_bulk_urls(&self, urls: Vec<String>) -> Result<BulkCreated, AppError> {
        let max = self.settings.max_bulk_urls;
        if urls.len() > max {
            return Err(AppError::bad_request(
                format!("Maximum {} URLs per batch", max),
                json!({ "provided": urls.len(), "max": max }),
            ));
        }

        let new_urls: Vec<NewUrlRecord> = urls
            .iter()
            .map(|u| sanitize(u))
            .filter(|u| is_valid_url(u))
            .map(|original_url| {
                let id = Uuid::new_v4();
                NewUrlRecord {
                    id,
                    short_code: base62::encode(&id, self.settings.code_length),
                    original_url: original_url.to_string(),
                    expires_at: None,
                }
            })
            .collect();

        if new_urls.is_empty() {
            return Err(AppError::bad_request(
                "No valid URLs provided",
                json!({ "provided": urls.len() }),
            ));
        }

        let requested = new_urls.len();
        let inserted = self.repository.create_many(new_urls).await?;

        if inserted.len() < requested {
            warn!(
                requested,
                inserted = inserted.len(),
                "Bulk insert skipped colliding short codes"
            );
        }

        let entries = inserted
            .iter()
            .map(|r| CacheEntry::new(&r.short_code, &r.original_url))
            .collect();
        self.cache.set_many(entries).await;

        let urls: Vec<CreatedUrl> = inserted
            .into_iter()
            .map(|record| CreatedUrl {
                short_url: self.short_url(&record.short_code),
                record,
            })
            .collect();

        info!(count = urls.len(), "Bulk short URLs created");

        Ok(BulkCreated {
            count: urls.len(),
            urls,
        })
    }

    /// Resolves a short code to its original URL and counts the click.
    ///
    /// # Cache-aside contract
    ///
    /// - **Cache hit**: the URL is returned immediately. The click count
    ///   update runs in a spawned task that is never awaited; its failure is
    ///   logged and dropped.
    /// - **Cache miss**: the store is queried for a non-expired record and
    ///   the click count update is awaited before returning. The cache is
    ///   then backfilled in a spawned task.
    ///
    /// The fast path favors latency, the slow path pays for consistency.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown, malformed or
    /// expired.
    pub async fn get_original_url(&self, code: &str) -> Result<String, AppError> {
        if !is_valid_short_code(code) {
            return Err(not_found_or_expired(code));
        }

        if let Some(url) = self.cache.get(code).await {
            metrics::counter!("url_cache_lookups_total", "result" => "hit").increment(1);
            debug!("Cache HIT for {}", code);
            self.spawn_click_increment(code);
            return Ok(url);
        }

        metrics::counter!("url_cache_lookups_total", "result" => "miss").increment(1);
        debug!("Cache MISS for {}", code);

        let record = self
            .repository
            .find_active_by_code(code)
            .await?
            .ok_or_else(|| not_found_or_expired(code))?;

        self.repository.increment_click_count(code).await?;

        self.spawn_cache_backfill(&record);

        Ok(record.original_url)
    }

    /// Returns the stored record, expired or not.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this code.
    pub async fn get_url_stats(&self, code: &str) -> Result<UrlRecord, AppError> {
        if !is_valid_short_code(code) {
            return Err(url_not_found(code));
        }

        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| url_not_found(code))
    }

    /// Deletes a mapping from the store, then evicts it from the cache.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this code.
    pub async fn delete_url(&self, code: &str) -> Result<(), AppError> {
        if !is_valid_short_code(code) {
            return Err(url_not_found(code));
        }

        let deleted = self.repository.delete(code).await?;
        self.cache.delete(code).await;

        info!(code = %deleted.short_code, "Short URL deleted");
        Ok(())
    }

    /// Lists records newest first.
    ///
    /// Page and total are fetched concurrently. `current_page` is
    /// `offset / limit + 1` and `max_pages` is `ceil(total / limit)`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `limit` is outside
    /// `1..=max_page_size` or `offset` is negative.
    pub async fn list_urls(&self, limit: i64, offset: i64) -> Result<Paginated<UrlRecord>, AppError> {
        self.list_urls_ordered(limit, offset, OrderField::default(), SortDirection::default())
            .await
    }

    /// Same as [`UrlService::list_urls`] with an explicit ordering.
    pub async fn list_urls_ordered(
        &self,
        limit: i64,
        offset: i64,
        order_by: OrderField,
        direction: SortDirection,
    ) -> Result<Paginated<UrlRecord>, AppError> {
        self.validate_limit(limit)?;
        if offset < 0 {
            return Err(AppError::bad_request(
                "Offset must not be negative",
                json!({ "offset": offset }),
            ));
        }

        let (data, total) = tokio::try_join!(
            self.repository
                .find_many(ListQuery::new(limit, offset).order_by(order_by, direction)),
            self.repository.count(UrlFilter::All)
        )?;

        Ok(Paginated {
            data,
            total,
            per_page: limit,
            current_page: offset / limit + 1,
            max_pages: (total + limit - 1) / limit,
        })
    }

    /// Returns the most clicked records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `limit` is outside `1..=max_page_size`.
    pub async fn get_top_urls(&self, limit: i64) -> Result<Vec<UrlRecord>, AppError> {
        self.validate_limit(limit)?;

        let query = ListQuery::new(limit, 0).order_by(OrderField::ClickCount, SortDirection::Desc);
        self.repository.find_many(query).await
    }

    /// Deletes every expired record and returns how many were removed.
    pub async fn cleanup_expired_urls(&self) -> Result<u64, AppError> {
        let deleted = self.repository.delete_expired().await?;
        info!(deleted, "Expired URLs cleaned up");
        Ok(deleted)
    }

    /// Verifies the store answers queries.
    pub async fn check_store(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    /// Reports whether the cache backend is reachable.
    pub async fn check_cache(&self) -> bool {
        self.cache.health_check().await
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), code)
    }

    fn validate_limit(&self, limit: i64) -> Result<(), AppError> {
        let max = self.settings.max_page_size;
        if !(1..=max).contains(&limit) {
            return Err(AppError::bad_request(
                format!("Limit must be between 1 and {}", max),
                json!({ "limit": limit }),
            ));
        }
        Ok(())
    }

    fn spawn_click_increment(&self, code: &str) {
        let repository = Arc::clone(&self.repository);
        let code = code.to_string();

        tokio::spawn(async move {
            if let Err(e) = repository.increment_click_count(&code).await {
                error!(error = %e, code, "Background click count update failed");
            }
        });
    }

    fn spawn_cache_backfill(&self, record: &UrlRecord) {
        let cache = Arc::clone(&self.cache);
        let code = record.short_code.clone();
        let url = record.original_url.clone();
        let ttl = cache_ttl_for(record);

        tokio::spawn(async move {
            cache.set(&code, &url, ttl).await;
        });
    }
}

fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if !is_valid_short_code(code) {
        return Err(AppError::bad_request(
            "Invalid custom code format",
            json!({ "code": code, "rule": "1-10 characters from [0-9A-Za-z]" }),
        ));
    }

    if is_reserved_code(code) {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}

fn expiry_from_now(seconds: i64) -> Result<DateTime<Utc>, AppError> {
    if seconds <= 0 {
        return Err(AppError::bad_request(
            "expiresIn must be a positive number of seconds",
            json!({ "expiresIn": seconds }),
        ));
    }

    TimeDelta::try_seconds(seconds)
        .and_then(|delta| Utc::now().checked_add_signed(delta))
        .ok_or_else(|| {
            AppError::bad_request("expiresIn is too large", json!({ "expiresIn": seconds }))
        })
}

/// Caps the cache TTL at the record's remaining lifetime so a cached entry
/// never resolves after its record expired.
fn cache_ttl_for(record: &UrlRecord) -> Option<u64> {
    record.seconds_until_expiry(Utc::now())
}

fn url_not_found(code: &str) -> AppError {
    AppError::not_found("URL not found", json!({ "code": code }))
}

fn not_found_or_expired(code: &str) -> AppError {
    AppError::not_found("URL not found or expired", json!({ "code": code }))
}
