//! In-process cache implementation.

use super::service::{CacheResult, ClickCache};
use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

/// A cache kept in the process's own memory.
///
/// Used when no Redis is configured (single-node deployments) and as the
/// cache in tests. Counter updates go through DashMap's per-shard locks, so
/// concurrent increments of one code are serialized and none is lost.
/// Contents disappear with the process.
#[derive(Debug, Default)]
pub struct MemoryCache {
    urls: DashMap<String, String>,
    clicks: DashMap<String, i64>,
}

impl MemoryCache {
    /// Creates an empty MemoryCache instance.
    pub fn new() -> Self {
        debug!("Using in-process MemoryCache");
        Self::default()
    }

    /// Drops only the URL entry of a code, leaving its counter in place.
    pub fn evict_url(&self, code: &str) {
        self.urls.remove(code);
    }

    /// Drops only the counter of a code, leaving its URL entry in place.
    pub fn evict_clicks(&self, code: &str) {
        self.clicks.remove(code);
    }
}

#[async_trait]
impl ClickCache for MemoryCache {
    async fn get_long_url(&self, code: &str) -> CacheResult<Option<String>> {
        Ok(self.urls.get(code).map(|url| url.value().clone()))
    }

    async fn set_long_url(&self, code: &str, long_url: &str) -> CacheResult<()> {
        self.urls.insert(code.to_string(), long_url.to_string());
        Ok(())
    }

    async fn increment_clicks(&self, code: &str) -> CacheResult<i64> {
        self.add_clicks(code, 1).await
    }

    async fn add_clicks(&self, code: &str, delta: i64) -> CacheResult<i64> {
        let mut counter = self.clicks.entry(code.to_string()).or_insert(0);
        *counter += delta;
        Ok(*counter)
    }

    async fn get_clicks(&self, code: &str) -> CacheResult<Option<i64>> {
        Ok(self.clicks.get(code).map(|c| *c.value()))
    }

    async fn set_clicks(&self, code: &str, clicks: i64) -> CacheResult<()> {
        self.clicks.insert(code.to_string(), clicks);
        Ok(())
    }

    async fn evict(&self, code: &str) -> CacheResult<()> {
        self.urls.remove(code);
        self.clicks.remove(code);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
