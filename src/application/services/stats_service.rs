//! Record statistics with the cached click counter overlaid.

use std::sync::Arc;

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::infrastructure::cache::ClickCache;
use serde_json::json;

/// Service returning the current state of a record.
///
/// The durable record may lag the cached counter by up to one flush interval,
/// so the cached counter is overlaid when present. Read-only.
pub struct StatsService {
    repository: Arc<dyn UrlRepository>,
    cache: Arc<dyn ClickCache>,
}

impl StatsService {
    /// Creates a new statistics service.
    pub fn new(repository: Arc<dyn UrlRepository>, cache: Arc<dyn ClickCache>) -> Self {
        Self { repository, cache }
    }

    /// Retrieves the record for `code` with the freshest known click count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record matches the code.
    /// Returns [`AppError::Internal`] on store failures.
    pub async fn stats(&self, code: &str) -> Result<UrlRecord, AppError> {
        let (record, cached) = self.click_views(code).await?;
        Ok(record.with_cached_clicks(cached))
    }

    /// Returns the durable and cached counters side by side.
    ///
    /// # Errors
    ///
    /// See [`Self::stats`].
    pub async fn click_views(&self, code: &str) -> Result<(UrlRecord, Option<i64>), AppError> {
        let record = self
            .repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Code not found", json!({ "code": code })))?;

        let cached = self.cache.get_clicks(code).await?;

        Ok((record, cached))
    }
}
