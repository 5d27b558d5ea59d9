//! Deduplicating short link creation.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::error::{DuplicateField, StoreError};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::infrastructure::cache::ClickCache;
use crate::utils::code_generator::CodeGenerator;

/// Default number of codes tried before giving up on a shorten request.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Outcome of [`ShortenService::shorten`].
#[derive(Debug, Clone, PartialEq)]
pub struct Shortened {
    pub record: UrlRecord,
    /// `false` when an existing record for the same long URL was returned.
    pub created: bool,
}

/// Service turning a long URL into a short code record.
///
/// Creation is idempotent per long URL: repeat calls return the record minted
/// by the first one. New records are written to the durable store first; the
/// cache is then filled on a best-effort basis.
pub struct ShortenService {
    repository: Arc<dyn UrlRepository>,
    cache: Arc<dyn ClickCache>,
    generator: Arc<dyn CodeGenerator>,
    max_attempts: usize,
}

impl ShortenService {
    /// Creates a new shorten service.
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn ClickCache>,
        generator: Arc<dyn CodeGenerator>,
        max_attempts: usize,
    ) -> Self {
        Self {
            repository,
            cache,
            generator,
            max_attempts,
        }
    }

    /// Returns the record for `long_url`, creating it on first sight.
    ///
    /// `long_url` must already be validated (see
    /// [`crate::utils::url_validation::ensure_web_url`]).
    ///
    /// # Code Generation
    ///
    /// Generated codes are not assumed unique. A code collision reported by
    /// the store triggers a new code, up to `max_attempts` tries. A long URL
    /// collision means a concurrent request created the record first; that
    /// record is returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store fails or every attempt
    /// collided.
    pub async fn shorten(&self, long_url: &str) -> Result<Shortened, AppError> {
        if let Some(existing) = self.repository.find_by_long_url(long_url).await? {
            debug!(code = %existing.code, "Long URL already shortened");
            return Ok(Shortened {
                record: existing,
                created: false,
            });
        }

        for attempt in 1..=self.max_attempts {
            let new_record = NewUrlRecord {
                code: self.generator.generate(),
                long_url: long_url.to_string(),
            };

            match self.repository.create(new_record).await {
                Ok(record) => {
                    self.populate_cache(&record).await;
                    metrics::counter!("shorty_links_created_total").increment(1);
                    info!(code = %record.code, attempt, "Short link created");

                    return Ok(Shortened {
                        record,
                        created: true,
                    });
                }
                Err(StoreError::DuplicateKey(DuplicateField::Code)) => {
                    warn!(attempt, "Generated code already taken, regenerating");
                }
                Err(StoreError::DuplicateKey(DuplicateField::LongUrl)) => {
                    debug!("Concurrent shorten created the record first");
                    return self.existing_after_race(long_url).await;
                }
                Err(e) => return Err(e.into()),
            }
        }

        error!(
            attempts = self.max_attempts,
            "Could not find an unused short code"
        );
        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    /// Re-reads the record created by the request that won a creation race.
    async fn existing_after_race(&self, long_url: &str) -> Result<Shortened, AppError> {
        let record = self
            .repository
            .find_by_long_url(long_url)
            .await?
            .ok_or_else(|| {
                AppError::internal(
                    "Record vanished after duplicate key",
                    json!({ "long_url": long_url }),
                )
            })?;

        Ok(Shortened {
            record,
            created: false,
        })
    }

    /// Fills `code:<code>` and zeroes `clicks:<code>`.
    ///
    /// Failures are only logged: the durable record is valid on its own and
    /// the first redirect refills the cache.
    async fn populate_cache(&self, record: &UrlRecord) {
        if let Err(e) = self
            .cache
            .set_long_url(&record.code, &record.long_url)
            .await
        {
            warn!(code = %record.code, error = %e, "Failed to cache new link");
        }

        if let Err(e) = self.cache.set_clicks(&record.code, 0).await {
            warn!(code = %record.code, error = %e, "Failed to initialize click counter");
        }
    }
}
