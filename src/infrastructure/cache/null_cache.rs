//! No-op cache implementation for disabled caching.

use super::service::{CacheEntry, CacheService};
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Every lookup is a miss, so every redirect is served from the store.
/// Selected with `CACHE_BACKEND=none`, and handy in tests that must observe
/// store traffic.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get(&self, _short_code: &str) -> Option<String> {
        None
    }

    async fn set(&self, _short_code: &str, _original_url: &str, _ttl_seconds: Option<u64>) {}

    async fn set_many(&self, _entries: Vec<CacheEntry>) {}

    async fn delete(&self, _short_code: &str) {}

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_cache_always_misses() {
        let cache = NullCache::new();
        cache.set("abc1234", "https://example.com", None).await;
        assert_eq!(cache.get("abc1234").await, None);
        assert!(cache.health_check().await);
    }
}
