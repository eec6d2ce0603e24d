//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache selection, and the Axum server
//! lifecycle including graceful shutdown.

use crate::application::services::UrlService;
use crate::config::{CacheBackend, Config};
use crate::infrastructure::cache::{CacheService, MemoryCache, NullCache, RedisCache};
use crate::infrastructure::persistence::PgUrlRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Cache backend (Redis, in-process, or disabled)
/// - Axum HTTP server
///
/// Returns once a shutdown signal was received, in-flight requests finished
/// and the pool was closed.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migrations fail
/// - `CACHE_BACKEND=redis` and Redis is unreachable
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let cache = build_cache(&config).await?;

    let repository = Arc::new(PgUrlRepository::new(Arc::new(pool.clone())));
    let url_service = Arc::new(UrlService::new(
        repository,
        cache,
        config.service_settings(),
    ));

    let state = AppState::new(url_service);

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Builds the pool from the `DB_*` settings.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Picks the cache implementation for `CACHE_BACKEND`.
///
/// `auto` prefers Redis and falls back to the in-process cache when Redis is
/// not configured or cannot be reached at startup.
async fn build_cache(config: &Config) -> Result<Arc<dyn CacheService>> {
    let memory = || -> Arc<dyn CacheService> {
        Arc::new(MemoryCache::new(
            config.cache_memory_capacity,
            config.cache_ttl_seconds,
        ))
    };

    let cache: Arc<dyn CacheService> = match (config.cache_backend, &config.redis_url) {
        (CacheBackend::None, _) => {
            tracing::info!("Cache disabled (NullCache)");
            Arc::new(NullCache::new())
        }
        (CacheBackend::Memory, _) | (CacheBackend::Auto, None) => {
            tracing::info!("Cache enabled (in-process)");
            memory()
        }
        (CacheBackend::Redis, None) => {
            anyhow::bail!("CACHE_BACKEND=redis requires REDIS_URL or REDIS_HOST")
        }
        (CacheBackend::Redis, Some(redis_url)) => {
            let redis = connect_redis(config, redis_url)
                .await
                .context("Failed to connect to Redis")?;
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        (CacheBackend::Auto, Some(redis_url)) => match connect_redis(config, redis_url).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using in-process cache.", e);
                memory()
            }
        },
    };

    Ok(cache)
}

async fn connect_redis(
    config: &Config,
    redis_url: &str,
) -> crate::infrastructure::cache::CacheResult<RedisCache> {
    RedisCache::connect(
        redis_url,
        config.cache_ttl_seconds,
        &config.cache_key_prefix,
        config.cache_timeout(),
    )
    .await
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
