//! Click cache trait and error types.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    Connection(String),
    #[error("cache operation error: {0}")]
    Operation(String),
    #[error("cache value is invalid: {0}")]
    InvalidData(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Fast, ephemeral key/value store in front of the durable store.
///
/// Holds two key families per code with independent lifetimes: the target URL
/// (`code:<code>`) and the click counter (`clicks:<code>`). Either may be
/// missing while the other is present, and any entry may vanish at any time;
/// the durable store stays the system of record.
///
/// [`ClickCache::increment_clicks`] is the only concurrency-control primitive
/// the service relies on: concurrent increments of the same counter must never
/// be lost.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process cache
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickCache: Send + Sync {
    /// Retrieves the cached target URL for a code.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the cache cannot be reached; a miss is `Ok(None)`.
    async fn get_long_url(&self, code: &str) -> CacheResult<Option<String>>;

    /// Stores the target URL for a code without expiry.
    ///
    /// Pure cache fill: safe to repeat.
    async fn set_long_url(&self, code: &str, long_url: &str) -> CacheResult<()>;

    /// Atomically increments the click counter and returns the new value.
    ///
    /// An absent counter is created at zero first, so the result is 1.
    async fn increment_clicks(&self, code: &str) -> CacheResult<i64>;

    /// Atomically adds `delta` to the click counter and returns the new value.
    async fn add_clicks(&self, code: &str, delta: i64) -> CacheResult<i64>;

    /// Reads the click counter without side effects.
    async fn get_clicks(&self, code: &str) -> CacheResult<Option<i64>>;

    /// Overwrites the click counter.
    async fn set_clicks(&self, code: &str, clicks: i64) -> CacheResult<()>;

    /// Drops both entries for a code.
    async fn evict(&self, code: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}

/// Key holding the target URL of `code`.
pub fn url_key(code: &str) -> String {
    format!("code:{code}")
}

/// Key holding the click counter of `code`, stored as a decimal integer string.
pub fn clicks_key(code: &str) -> String {
    format!("clicks:{code}")
}
