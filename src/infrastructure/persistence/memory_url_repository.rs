//! In-memory implementation of the URL repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::error::{DuplicateField, StoreError};
use crate::domain::repositories::UrlRepository;

/// In-memory repository using DashMap.
///
/// Mirrors the PostgreSQL schema: records keyed by unique code plus a unique
/// secondary index by long URL. Inserts always lock the long URL index before
/// the record map, so both uniqueness checks and the insert happen as one
/// step. Nothing survives a restart; intended for tests and local runs.
#[derive(Debug, Default)]
pub struct MemoryUrlRepository {
    records: DashMap<String, UrlRecord>,
    by_long_url: DashMap<String, String>,
}

impl MemoryUrlRepository {
    /// Creates a new, empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl UrlRepository for MemoryUrlRepository {
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlRecord>, StoreError> {
        let Some(code) = self.by_long_url.get(long_url).map(|c| c.value().clone()) else {
            return Ok(None);
        };

        Ok(self.records.get(&code).map(|r| r.value().clone()))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, StoreError> {
        Ok(self.records.get(code).map(|r| r.value().clone()))
    }

    async fn create(&self, new_record: NewUrlRecord) -> Result<UrlRecord, StoreError> {
        let index_slot = match self.by_long_url.entry(new_record.long_url.clone()) {
            Entry::Occupied(_) => return Err(StoreError::DuplicateKey(DuplicateField::LongUrl)),
            Entry::Vacant(slot) => slot,
        };

        let record_slot = match self.records.entry(new_record.code.clone()) {
            Entry::Occupied(_) => return Err(StoreError::DuplicateKey(DuplicateField::Code)),
            Entry::Vacant(slot) => slot,
        };

        let now = Utc::now();
        let record = UrlRecord::new(new_record.code.clone(), new_record.long_url, 0, now, now);

        record_slot.insert(record.clone());
        index_slot.insert(new_record.code);

        Ok(record)
    }

    async fn set_clicks(&self, code: &str, clicks: i64) -> Result<(), StoreError> {
        if let Some(mut record) = self.records.get_mut(code) {
            record.clicks = record.clicks.max(clicks);
            record.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
