//! Redis-backed cache implementation.

use super::service::{CacheEntry, CacheError, CacheResult, CacheService, effective_ttl};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, Pipeline, RedisResult, aio::ConnectionManager};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Full Redis key for a short code.
///
/// Every operation goes through here so reads, writes and deletes agree on
/// the key.
fn cache_key(prefix: &str, short_code: &str) -> String {
    format!("{}{}", prefix, short_code)
}

/// Runs a Redis command with an upper bound on its duration.
async fn bounded<T, F>(timeout: Duration, fut: F) -> CacheResult<T>
where
    F: Future<Output = RedisResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(CacheError::OperationError(e.to_string())),
        Err(_) => Err(CacheError::Timeout(timeout)),
    }
}

/// Builds one atomic `SETEX` pipeline for `entries`.
///
/// Entries whose TTL resolves to zero are left out; the second value is the
/// number of queued commands.
fn set_many_pipeline(prefix: &str, default_ttl: u64, entries: &[CacheEntry]) -> (Pipeline, usize) {
    let mut pipe = redis::pipe();
    pipe.atomic();

    let mut queued = 0usize;
    for entry in entries {
        if let Some(ttl) = effective_ttl(entry.ttl_seconds, default_ttl) {
            pipe.set_ex(cache_key(prefix, &entry.short_code), &entry.original_url, ttl)
                .ignore();
            queued += 1;
        }
    }

    (pipe, queued)
}

/// Redis cache implementation for fast URL lookups.
///
/// Uses `ConnectionManager` for connection reuse and automatic reconnects.
/// All operations are fail-open and bounded by `timeout`: errors are logged
/// but never propagate to callers.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
    key_prefix: String,
    timeout: Duration,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `default_ttl_seconds` - TTL applied when [`CacheService::set`] gets `None`
    /// - `key_prefix` - namespace prepended to every key (e.g., `"url:"`)
    /// - `timeout` - upper bound for connecting and for every command
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid or the
    /// connection cannot be established, and [`CacheError::Timeout`] if
    /// connecting or the PING takes longer than `timeout`.
    pub async fn connect(
        redis_url: &str,
        default_ttl_seconds: u64,
        key_prefix: &str,
        timeout: Duration,
    ) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = bounded(timeout, ConnectionManager::new(client))
            .await
            .map_err(|e| match e {
                CacheError::OperationError(e) => {
                    CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
                }
                other => other,
            })?;

        let cache = Self {
            client: manager,
            default_ttl: default_ttl_seconds,
            key_prefix: key_prefix.to_string(),
            timeout,
        };

        cache.ping().await?;
        info!("Connected to Redis");

        Ok(cache)
    }

    fn build_key(&self, short_code: &str) -> String {
        cache_key(&self.key_prefix, short_code)
    }

    async fn bounded<T, F>(&self, fut: F) -> CacheResult<T>
    where
        F: Future<Output = RedisResult<T>>,
    {
        bounded(self.timeout, fut).await
    }

    async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.client.clone();
        let cmd = redis::cmd("PING");
        self.bounded(cmd.query_async::<String>(&mut conn))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get(&self, short_code: &str) -> Option<String> {
        let key = self.build_key(short_code);
        let mut conn = self.client.clone();

        match self.bounded(conn.get::<_, Option<String>>(&key)).await {
            Ok(Some(url)) => {
                debug!("Cache HIT: {}", key);
                Some(url)
            }
            Ok(None) => {
                debug!("Cache MISS: {}", key);
                None
            }
            Err(e) => {
                warn!(error = %e, key, "Redis GET failed, treating as miss");
                None
            }
        }
    }

    async fn set(&self, short_code: &str, original_url: &str, ttl_seconds: Option<u64>) {
        let Some(ttl) = effective_ttl(ttl_seconds, self.default_ttl) else {
            self.delete(short_code).await;
            return;
        };

        let key = self.build_key(short_code);
        let mut conn = self.client.clone();

        match self
            .bounded(conn.set_ex::<_, _, ()>(&key, original_url, ttl))
            .await
        {
            Ok(()) => debug!("Cache SET: {} (TTL: {}s)", key, ttl),
            Err(e) => warn!(error = %e, key, "Redis SET failed"),
        }
    }

    async fn set_many(&self, entries: Vec<CacheEntry>) {
        let (pipe, queued) = set_many_pipeline(&self.key_prefix, self.default_ttl, &entries);

        if queued == 0 {
            return;
        }

        let mut conn = self.client.clone();
        match self.bounded(pipe.query_async::<()>(&mut conn)).await {
            Ok(()) => debug!("Cache SET MANY: {} entries", queued),
            Err(e) => warn!(error = %e, count = queued, "Redis pipelined SET failed"),
        }
    }

    async fn delete(&self, short_code: &str) {
        let key = self.build_key(short_code);
        let mut conn = self.client.clone();

        match self.bounded(conn.del::<_, i32>(&key)).await {
            Ok(deleted) => {
                if deleted > 0 {
                    debug!("Cache DEL: {}", key);
                }
            }
            Err(e) => warn!(error = %e, key, "Redis DEL failed"),
        }
    }

    async fn health_check(&self) -> bool {
        self.ping().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redis::{ErrorKind, RedisError};

    #[test]
    fn test_cache_key_uses_prefix() {
        assert_eq!(cache_key("url:", "abc1234"), "url:abc1234");
        assert_eq!(cache_key("", "abc1234"), "abc1234");
        assert_eq!(cache_key("tenant:url:", "x"), "tenant:url:x");
    }

    #[test]
    fn test_set_many_pipeline_prefixes_every_key() {
        let entries = vec![
            CacheEntry::new("promo", "https://example.com/a"),
            CacheEntry::new("sale", "https://example.com/b"),
        ];

        let (pipe, queued) = set_many_pipeline("url:", 60, &entries);
        let packed = String::from_utf8_lossy(&pipe.get_packed_pipeline()).into_owned();

        assert_eq!(queued, 2);
        assert!(packed.contains("url:promo"));
        assert!(packed.contains("url:sale"));
    }

    #[test]
    fn test_set_many_pipeline_skips_zero_ttl() {
        let mut expiring = CacheEntry::new("gone", "https://example.com");
        expiring.ttl_seconds = Some(0);
        let entries = vec![expiring, CacheEntry::new("kept", "https://example.com")];

        let (pipe, queued) = set_many_pipeline("url:", 60, &entries);
        let packed = String::from_utf8_lossy(&pipe.get_packed_pipeline()).into_owned();

        assert_eq!(queued, 1);
        assert!(packed.contains("url:kept"));
        assert!(!packed.contains("url:gone"));
    }

    #[tokio::test]
    async fn test_bounded_passes_value_through() {
        let result = bounded(Duration::from_millis(50), async { Ok::<_, RedisError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_bounded_maps_redis_error() {
        let result = bounded(Duration::from_millis(50), async {
            Err::<(), _>(RedisError::from((ErrorKind::Io, "connection reset")))
        })
        .await;

        assert!(matches!(result, Err(CacheError::OperationError(_))));
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let timeout = Duration::from_millis(20);
        let result = bounded(timeout, std::future::pending::<RedisResult<()>>()).await;

        match result {
            Err(CacheError::Timeout(after)) => assert_eq!(after, timeout),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        let result = RedisCache::connect("not-a-redis-url", 60, "url:", Duration::from_millis(100)).await;
        assert!(matches!(result, Err(CacheError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn test_connect_fails_when_unreachable() {
        let result = RedisCache::connect(
            "redis://127.0.0.1:1",
            60,
            "url:",
            Duration::from_millis(200),
        )
        .await;

        assert!(matches!(
            result,
            Err(CacheError::ConnectionError(_) | CacheError::Timeout(_))
        ));
    }
}
