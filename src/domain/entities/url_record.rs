//! URL record entity: one short code, its target and its click counter.

use chrono::{DateTime, Utc};

/// A shortened URL as held by the durable store.
///
/// `code` and `long_url` never change after creation; only `clicks` and
/// `updated_at` are mutated (by the write-back flush). The public short URL is
/// not part of the record, see [`crate::utils::short_url`].
#[derive(Debug, Clone, PartialEq)]
pub struct UrlRecord {
    pub code: String,
    pub long_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(
        code: String,
        long_url: String,
        clicks: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            code,
            long_url,
            clicks,
            created_at,
            updated_at,
        }
    }

    /// Returns the record with `clicks` replaced by the cached counter when
    /// that counter is ahead of the durable one.
    pub fn with_cached_clicks(mut self, cached: Option<i64>) -> Self {
        if let Some(cached) = cached {
            self.clicks = self.clicks.max(cached);
        }
        self
    }
}

/// Input data for creating a record. The store assigns `clicks = 0` and both
/// timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub code: String,
    pub long_url: String,
}
