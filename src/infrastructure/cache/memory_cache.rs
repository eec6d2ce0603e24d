//! In-process cache backed by `moka`.

use super::service::{CacheEntry, CacheService, effective_ttl};
use async_trait::async_trait;
use moka::future::Cache;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Clone)]
struct CachedUrl {
    original_url: String,
    expires_at: Instant,
}

/// Bounded, per-process cache used when no Redis is configured.
///
/// The whole cache shares `time_to_live = default TTL`; entries that were
/// stored with a shorter TTL also carry their own deadline, checked on read.
pub struct MemoryCache {
    entries: Cache<String, CachedUrl>,
    default_ttl: u64,
}

impl MemoryCache {
    /// Creates a cache holding at most `capacity` mappings.
    pub fn new(capacity: u64, default_ttl_seconds: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(Duration::from_secs(default_ttl_seconds.max(1)))
            .build();

        debug!(capacity, "Using in-process MemoryCache");

        Self {
            entries,
            default_ttl: default_ttl_seconds,
        }
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, short_code: &str) -> Option<String> {
        let cached = self.entries.get(short_code).await?;

        if cached.expires_at <= Instant::now() {
            self.entries.invalidate(short_code).await;
            return None;
        }

        Some(cached.original_url)
    }

    async fn set(&self, short_code: &str, original_url: &str, ttl_seconds: Option<u64>) {
        let Some(ttl) = effective_ttl(ttl_seconds, self.default_ttl) else {
            self.entries.invalidate(short_code).await;
            return;
        };

        let cached = CachedUrl {
            original_url: original_url.to_string(),
            expires_at: Instant::now() + Duration::from_secs(ttl),
        };
        self.entries.insert(short_code.to_string(), cached).await;
    }

    async fn set_many(&self, entries: Vec<CacheEntry>) {
        for entry in entries {
            self.set(&entry.short_code, &entry.original_url, entry.ttl_seconds)
                .await;
        }
    }

    async fn delete(&self, short_code: &str) {
        self.entries.invalidate(short_code).await;
    }

    async fn health_check(&self) -> bool {
        true
    }
}
