//! Hot-path code resolution with write-back click counting.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::UrlRepository;
use crate::domain::write_back::WriteBackPolicy;
use crate::error::AppError;
use crate::infrastructure::cache::ClickCache;

/// Outcome of [`RedirectService::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub long_url: String,
    /// Click count after this visit, as held by the cache.
    pub clicks: i64,
}

/// Service resolving short codes for redirects.
///
/// # Request Flow
///
/// 1. Read `code:<code>` from the cache
/// 2. On miss, read the durable record and refill the cache
/// 3. Atomically increment `clicks:<code>`
/// 4. Seed a freshly created counter from the durable value (if enabled)
/// 5. Flush the count to the durable store when the policy says so
///
/// Errors from either store are returned as-is; nothing is retried.
pub struct RedirectService {
    repository: Arc<dyn UrlRepository>,
    cache: Arc<dyn ClickCache>,
    policy: WriteBackPolicy,
}

impl RedirectService {
    /// Creates a new redirect service.
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn ClickCache>,
        policy: WriteBackPolicy,
    ) -> Self {
        Self {
            repository,
            cache,
            policy,
        }
    }

    /// Resolves `code` to its long URL and records one visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if neither the cache nor the durable
    /// store knows the code.
    ///
    /// Returns [`AppError::Internal`] on store failures.
    pub async fn resolve(&self, code: &str) -> Result<Resolved, AppError> {
        let mut durable: Option<UrlRecord> = None;

        let long_url = match self.cache.get_long_url(code).await? {
            Some(url) => {
                metrics::counter!("shorty_cache_lookups_total", "outcome" => "hit").increment(1);
                url
            }
            None => {
                metrics::counter!("shorty_cache_lookups_total", "outcome" => "miss").increment(1);

                let record = self
                    .repository
                    .find_by_code(code)
                    .await?
                    .ok_or_else(|| AppError::not_found("Code not found", json!({ "code": code })))?;

                self.cache.set_long_url(code, &record.long_url).await?;
                debug!(code = %code, "Cache refilled from durable store");

                let url = record.long_url.clone();
                durable = Some(record);
                url
            }
        };

        let mut clicks = self.cache.increment_clicks(code).await?;

        if self.policy.should_seed(clicks) {
            clicks = match self.seed_counter(code, durable).await {
                Ok(seeded) => seeded,
                Err(e) => {
                    self.release_unseeded_click(code).await;
                    return Err(e);
                }
            };
        }

        if self.policy.should_flush(clicks) {
            self.repository.set_clicks(code, clicks).await?;
            metrics::counter!("shorty_clicks_flushed_total").increment(1);
            debug!(code = %code, clicks, "Click count flushed");
        }

        Ok(Resolved { long_url, clicks })
    }

    /// Writes the current cached counter of `code` to the durable store
    /// regardless of the flush cadence.
    ///
    /// Returns the flushed value, or `None` when the cache holds no counter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown codes and
    /// [`AppError::Internal`] on store failures.
    pub async fn flush_clicks(&self, code: &str) -> Result<Option<i64>, AppError> {
        if self.repository.find_by_code(code).await?.is_none() {
            return Err(AppError::not_found(
                "Code not found",
                json!({ "code": code }),
            ));
        }

        let Some(clicks) = self.cache.get_clicks(code).await? else {
            return Ok(None);
        };

        self.repository.set_clicks(code, clicks).await?;
        info!(code = %code, clicks, "Click count flushed on demand");

        Ok(Some(clicks))
    }

    /// Takes back the click of a request whose seeding failed, so the next
    /// request sees a fresh counter again and retries the seed.
    async fn release_unseeded_click(&self, code: &str) {
        if let Err(e) = self.cache.add_clicks(code, -1).await {
            warn!(code = %code, error = %e, "Failed to release unseeded click counter");
        }
    }

    /// Rebases a counter the cache has just created at 1 onto the durable
    /// value, keeping the cache counter at or above the durable one.
    ///
    /// Uses an atomic add rather than a set, so increments from concurrent
    /// redirects that raced this one are preserved.
    async fn seed_counter(&self, code: &str, durable: Option<UrlRecord>) -> Result<i64, AppError> {
        let durable_clicks = match durable {
            Some(record) => record.clicks,
            None => self
                .repository
                .find_by_code(code)
                .await?
                .map(|r| r.clicks)
                .unwrap_or(0),
        };

        if durable_clicks <= 0 {
            return Ok(1);
        }

        let seeded = self.cache.add_clicks(code, durable_clicks).await?;
        debug!(code = %code, durable_clicks, seeded, "Click counter seeded from durable store");

        Ok(seeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::StoreError;
    use crate::domain::repositories::MockUrlRepository;
    use crate::infrastructure::cache::{CacheError, MemoryCache, MockClickCache};
    use chrono::Utc;

    fn test_record(code: &str, clicks: i64) -> UrlRecord {
        let now = Utc::now();
        UrlRecord::new(
            code.to_string(),
            "https://example.com/target".to_string(),
            clicks,
            now,
            now,
        )
    }

    fn service(repo: MockUrlRepository, cache: MockClickCache) -> RedirectService {
        RedirectService::new(Arc::new(repo), Arc::new(cache), WriteBackPolicy::default())
    }

    #[tokio::test]
    async fn test_cache_hit_skips_durable_store() {
        let mut repo = MockUrlRepository::new();
        let mut cache = MockClickCache::new();

        cache
            .expect_get_long_url()
            .times(1)
            .returning(|_| Ok(Some("https://example.com/target".to_string())));
        cache.expect_increment_clicks().times(1).returning(|_| Ok(5));
        repo.expect_find_by_code().times(0);
        repo.expect_set_clicks().times(0);

        let resolved = service(repo, cache).resolve("abc1234").await.unwrap();

        assert_eq!(resolved.long_url, "https://example.com/target");
        assert_eq!(resolved.clicks, 5);
    }

    #[tokio::test]
    async fn test_cache_miss_refills_from_durable_store() {
        let mut repo = MockUrlRepository::new();
        let mut cache = MockClickCache::new();

        cache.expect_get_long_url().times(1).returning(|_| Ok(None));
        repo.expect_find_by_code()
            .withf(|code| code == "abc1234")
            .times(1)
            .returning(|code| Ok(Some(test_record(code, 0))));
        cache
            .expect_set_long_url()
            .withf(|code, url| code == "abc1234" && url == "https://example.com/target")
            .times(1)
            .returning(|_, _| Ok(()));
        cache.expect_increment_clicks().times(1).returning(|_| Ok(3));

        let resolved = service(repo, cache).resolve("abc1234").await.unwrap();

        assert_eq!(resolved.long_url, "https://example.com/target");
        assert_eq!(resolved.clicks, 3);
    }

    #[tokio::test]
    async fn test_unknown_code_is_not_found() {
        let mut repo = MockUrlRepository::new();
        let mut cache = MockClickCache::new();

        cache.expect_get_long_url().returning(|_| Ok(None));
        repo.expect_find_by_code().returning(|_| Ok(None));
        cache.expect_increment_clicks().times(0);
        cache.expect_set_long_url().times(0);

        let err = service(repo, cache).resolve("NOPE123").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_tenth_click_is_flushed() {
        let mut repo = MockUrlRepository::new();
        let mut cache = MockClickCache::new();

        cache
            .expect_get_long_url()
            .returning(|_| Ok(Some("https://example.com/target".to_string())));
        cache.expect_increment_clicks().returning(|_| Ok(10));
        repo.expect_set_clicks()
            .withf(|code, clicks| code == "abc1234" && *clicks == 10)
            .times(1)
            .returning(|_, _| Ok(()));

        let resolved = service(repo, cache).resolve("abc1234").await.unwrap();
        assert_eq!(resolved.clicks, 10);
    }

    #[tokio::test]
    async fn test_non_multiple_is_not_flushed() {
        let mut repo = MockUrlRepository::new();
        let mut cache = MockClickCache::new();

        cache
            .expect_get_long_url()
            .returning(|_| Ok(Some("https://example.com/target".to_string())));
        cache.expect_increment_clicks().returning(|_| Ok(9));
        repo.expect_set_clicks().times(0);

        service(repo, cache).resolve("abc1234").await.unwrap();
    }

    #[tokio::test]
    async fn test_fresh_counter_is_seeded_from_durable_value() {
        let mut repo = MockUrlRepository::new();
        let mut cache = MockClickCache::new();

        cache.expect_get_long_url().returning(|_| Ok(None));
        repo.expect_find_by_code()
            .times(1)
            .returning(|code| Ok(Some(test_record(code, 40))));
        cache.expect_set_long_url().returning(|_, _| Ok(()));
        cache.expect_increment_clicks().returning(|_| Ok(1));
        cache
            .expect_add_clicks()
            .withf(|code, delta| code == "abc1234" && *delta == 40)
            .times(1)
            .returning(|_, delta| Ok(1 + delta));
        repo.expect_set_clicks().times(0);

        let resolved = service(repo, cache).resolve("abc1234").await.unwrap();

        assert_eq!(resolved.clicks, 41);
    }

    #[tokio::test]
    async fn test_lost_counter_with_cached_url_is_seeded() {
        let mut repo = MockUrlRepository::new();
        let mut cache = MockClickCache::new();

        cache
            .expect_get_long_url()
            .returning(|_| Ok(Some("https://example.com/target".to_string())));
        cache.expect_increment_clicks().returning(|_| Ok(1));
        repo.expect_find_by_code()
            .times(1)
            .returning(|code| Ok(Some(test_record(code, 29))));
        cache.expect_add_clicks().returning(|_, delta| Ok(1 + delta));
        repo.expect_set_clicks()
            .withf(|_, clicks| *clicks == 30)
            .times(1)
            .returning(|_, _| Ok(()));

        let resolved = service(repo, cache).resolve("abc1234").await.unwrap();

        assert_eq!(resolved.clicks, 30);
    }

    #[tokio::test]
    async fn test_failed_seed_is_retried_by_next_redirect() {
        let mut repo = MockUrlRepository::new();
        let mut seq = mockall::Sequence::new();

        repo.expect_find_by_code()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(StoreError::Unavailable("pool timed out".to_string())));
        repo.expect_find_by_code()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|code| Ok(Some(test_record(code, 40))));
        repo.expect_set_clicks().times(0);

        let cache = Arc::new(MemoryCache::new());
        cache
            .set_long_url("abc1234", "https://example.com/target")
            .await
            .unwrap();

        let service = RedirectService::new(
            Arc::new(repo),
            cache.clone(),
            WriteBackPolicy::default(),
        );

        let err = service.resolve("abc1234").await.unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
        assert_eq!(cache.get_clicks("abc1234").await.unwrap(), Some(0));

        let resolved = service.resolve("abc1234").await.unwrap();
        assert_eq!(resolved.clicks, 41);
        assert_eq!(cache.get_clicks("abc1234").await.unwrap(), Some(41));
    }

    #[tokio::test]
    async fn test_failed_seed_add_releases_click() {
        let mut repo = MockUrlRepository::new();
        let mut cache = MockClickCache::new();

        cache
            .expect_get_long_url()
            .returning(|_| Ok(Some("https://example.com/target".to_string())));
        cache.expect_increment_clicks().returning(|_| Ok(1));
        repo.expect_find_by_code()
            .returning(|code| Ok(Some(test_record(code, 25))));
        cache
            .expect_add_clicks()
            .withf(|_, delta| *delta == 25)
            .times(1)
            .returning(|_, _| Err(CacheError::Operation("READONLY".to_string())));
        cache
            .expect_add_clicks()
            .withf(|_, delta| *delta == -1)
            .times(1)
            .returning(|_, _| Ok(0));

        let err = service(repo, cache).resolve("abc1234").await.unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_seeding_disabled_restarts_from_zero() {
        let mut repo = MockUrlRepository::new();
        let mut cache = MockClickCache::new();

        cache.expect_get_long_url().returning(|_| Ok(None));
        repo.expect_find_by_code()
            .times(1)
            .returning(|code| Ok(Some(test_record(code, 40))));
        cache.expect_set_long_url().returning(|_, _| Ok(()));
        cache.expect_increment_clicks().returning(|_| Ok(1));
        cache.expect_add_clicks().times(0);

        let service = RedirectService::new(
            Arc::new(repo),
            Arc::new(cache),
            WriteBackPolicy::new(10, false),
        );

        let resolved = service.resolve("abc1234").await.unwrap();
        assert_eq!(resolved.clicks, 1);
    }

    #[tokio::test]
    async fn test_cache_failure_is_surfaced() {
        let repo = MockUrlRepository::new();
        let mut cache = MockClickCache::new();

        cache
            .expect_get_long_url()
            .returning(|_| Err(CacheError::Connection("refused".to_string())));

        let err = service(repo, cache).resolve("abc1234").await.unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_flush_failure_is_surfaced() {
        let mut repo = MockUrlRepository::new();
        let mut cache = MockClickCache::new();

        cache
            .expect_get_long_url()
            .returning(|_| Ok(Some("https://example.com/target".to_string())));
        cache.expect_increment_clicks().returning(|_| Ok(20));
        repo.expect_set_clicks()
            .returning(|_, _| Err(StoreError::Unavailable("down".to_string())));

        let err = service(repo, cache).resolve("abc1234").await.unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_flush_clicks_writes_cached_value() {
        let mut repo = MockUrlRepository::new();
        let mut cache = MockClickCache::new();

        repo.expect_find_by_code()
            .returning(|code| Ok(Some(test_record(code, 10))));
        cache.expect_get_clicks().returning(|_| Ok(Some(17)));
        repo.expect_set_clicks()
            .withf(|_, clicks| *clicks == 17)
            .times(1)
            .returning(|_, _| Ok(()));

        let flushed = service(repo, cache).flush_clicks("abc1234").await.unwrap();
        assert_eq!(flushed, Some(17));
    }

    #[tokio::test]
    async fn test_flush_clicks_without_counter() {
        let mut repo = MockUrlRepository::new();
        let mut cache = MockClickCache::new();

        repo.expect_find_by_code()
            .returning(|code| Ok(Some(test_record(code, 10))));
        cache.expect_get_clicks().returning(|_| Ok(None));
        repo.expect_set_clicks().times(0);

        let flushed = service(repo, cache).flush_clicks("abc1234").await.unwrap();
        assert_eq!(flushed, None);
    }
}
