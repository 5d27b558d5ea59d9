//! Repository trait for the durable URL record store.

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::error::StoreError;
use async_trait::async_trait;

/// Authoritative, persistent mapping of code to [`UrlRecord`].
///
/// The store is append-only apart from the click counter: there are no
/// deletes and no updates of `code` or `long_url`.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryUrlRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Finds the record created for `long_url`, if any.
    ///
    /// Used to deduplicate shorten requests.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on store failures.
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlRecord>, StoreError>;

    /// Finds a record by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on store failures.
    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, StoreError>;

    /// Inserts a new record with `clicks = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateKey`] naming the violated constraint if
    /// `code` or `long_url` already exists.
    ///
    /// Returns [`StoreError::Unavailable`] on store failures.
    async fn create(&self, new_record: NewUrlRecord) -> Result<UrlRecord, StoreError>;

    /// Writes an absolute click count and bumps `updated_at`.
    ///
    /// The stored counter is raised to `clicks` and never lowered, so
    /// redundant or reordered calls from concurrent flushes are harmless.
    /// Unknown codes are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on store failures.
    async fn set_clicks(&self, code: &str, clicks: i64) -> Result<(), StoreError>;

    /// Checks if the store is reachable.
    async fn health_check(&self) -> bool;
}
