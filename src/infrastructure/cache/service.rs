//! Cache service trait and shared types.

use async_trait::async_trait;
use std::time::Duration;

/// Errors raised inside cache backends.
///
/// These never cross the [`CacheService`] boundary: backends log them and
/// degrade to a miss or no-op. Only connection setup reports them.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),

    #[error("Cache operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// One mapping to store with [`CacheService::set_many`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub short_code: String,
    pub original_url: String,
    /// `None` applies the backend's default TTL.
    pub ttl_seconds: Option<u64>,
}

impl CacheEntry {
    pub fn new(short_code: impl Into<String>, original_url: impl Into<String>) -> Self {
        Self {
            short_code: short_code.into(),
            original_url: original_url.into(),
            ttl_seconds: None,
        }
    }
}

/// Best-effort cache of short code to original URL mappings.
///
/// Every method is infallible from the caller's point of view: backend
/// failures and timeouts are logged and behave like a miss (for reads) or a
/// no-op (for writes). The store stays the source of truth.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed, shared between instances
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process, per instance
/// - [`crate::infrastructure::cache::NullCache`] - Caching disabled
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached URL for a short code, `None` on miss or failure.
    async fn get(&self, short_code: &str) -> Option<String>;

    /// Caches a mapping. `ttl_seconds = None` uses the configured default;
    /// an explicit TTL never extends past that default.
    async fn set(&self, short_code: &str, original_url: &str, ttl_seconds: Option<u64>);

    /// Caches many mappings in one round trip where the backend allows it.
    async fn set_many(&self, entries: Vec<CacheEntry>);

    /// Removes a mapping.
    async fn delete(&self, short_code: &str);

    /// Reports whether the backend is reachable.
    async fn health_check(&self) -> bool;
}

/// Resolves the TTL to apply for an entry.
///
/// Returns `None` when the entry should not be cached at all (zero TTL).
pub(crate) fn effective_ttl(requested: Option<u64>, default_ttl: u64) -> Option<u64> {
    let ttl = requested.map_or(default_ttl, |t| t.min(default_ttl));
    (ttl > 0).then_some(ttl)
}
