//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, ClickCache, clicks_key, url_key};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, RedisError, aio::ConnectionManager};
use tracing::{debug, info, warn};

/// Redis cache for URL lookups and click counters.
///
/// Uses `ConnectionManager` for automatic reconnection. Unlike a fail-open
/// lookup cache, errors are returned to the caller: losing a counter update
/// silently would corrupt the click count.
pub struct RedisCache {
    client: ConnectionManager,
}

fn map_redis_error(operation: &str, code: &str, err: RedisError) -> CacheError {
    warn!(code = %code, error = %err, "Redis {} failed", operation);
    if err.is_io_error() || err.is_timeout() {
        CacheError::Connection(format!("{operation}: {err}"))
    } else {
        CacheError::Operation(format!("{operation}: {err}"))
    }
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Connection`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url)
            .map_err(|e| CacheError::Connection(format!("Failed to create Redis client: {e}")))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Connection(format!("Failed to connect to Redis: {e}")))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::Connection(format!("Redis PING failed: {e}")))?;

        info!("Connected to Redis");

        Ok(Self { client: manager })
    }
}

#[async_trait]
impl ClickCache for RedisCache {
    async fn get_long_url(&self, code: &str) -> CacheResult<Option<String>> {
        let mut conn = self.client.clone();

        let url = conn
            .get::<_, Option<String>>(url_key(code))
            .await
            .map_err(|e| map_redis_error("GET url", code, e))?;

        match &url {
            Some(_) => debug!(code = %code, "Cache HIT"),
            None => debug!(code = %code, "Cache MISS"),
        }

        Ok(url)
    }

    async fn set_long_url(&self, code: &str, long_url: &str) -> CacheResult<()> {
        let mut conn = self.client.clone();

        conn.set::<_, _, ()>(url_key(code), long_url)
            .await
            .map_err(|e| map_redis_error("SET url", code, e))?;

        debug!(code = %code, "Cache SET url");
        Ok(())
    }

    async fn increment_clicks(&self, code: &str) -> CacheResult<i64> {
        self.add_clicks(code, 1).await
    }

    async fn add_clicks(&self, code: &str, delta: i64) -> CacheResult<i64> {
        let mut conn = self.client.clone();

        conn.incr::<_, _, i64>(clicks_key(code), delta)
            .await
            .map_err(|e| map_redis_error("INCRBY clicks", code, e))
    }

    async fn get_clicks(&self, code: &str) -> CacheResult<Option<i64>> {
        let mut conn = self.client.clone();

        let raw = conn
            .get::<_, Option<String>>(clicks_key(code))
            .await
            .map_err(|e| map_redis_error("GET clicks", code, e))?;

        raw.map(|value| {
            value.parse::<i64>().map_err(|e| {
                CacheError::InvalidData(format!("clicks:{code} holds '{value}': {e}"))
            })
        })
        .transpose()
    }

    async fn set_clicks(&self, code: &str, clicks: i64) -> CacheResult<()> {
        let mut conn = self.client.clone();

        conn.set::<_, _, ()>(clicks_key(code), clicks)
            .await
            .map_err(|e| map_redis_error("SET clicks", code, e))
    }

    async fn evict(&self, code: &str) -> CacheResult<()> {
        let mut conn = self.client.clone();

        let deleted = conn
            .del::<_, i32>(vec![url_key(code), clicks_key(code)])
            .await
            .map_err(|e| map_redis_error("DEL", code, e))?;

        if deleted > 0 {
            debug!(code = %code, "Cache EVICT");
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
