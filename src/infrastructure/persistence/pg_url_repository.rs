//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::debug;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::error::StoreError;
use crate::domain::repositories::UrlRepository;

/// PostgreSQL repository for URL records.
///
/// Backed by the `urls` table, whose `urls_code_key` and `urls_long_url_key`
/// unique constraints enforce both uniqueness invariants at the store level.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UrlRow {
    code: String,
    long_url: String,
    clicks: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UrlRow> for UrlRecord {
    fn from(r: UrlRow) -> Self {
        UrlRecord::new(r.code, r.long_url, r.clicks, r.created_at, r.updated_at)
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlRecord>, StoreError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT code, long_url, clicks, created_at, updated_at
            FROM urls
            WHERE long_url = $1
            "#,
        )
        .bind(long_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, StoreError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT code, long_url, clicks, created_at, updated_at
            FROM urls
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn create(&self, new_record: NewUrlRecord) -> Result<UrlRecord, StoreError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            INSERT INTO urls (code, long_url)
            VALUES ($1, $2)
            RETURNING code, long_url, clicks, created_at, updated_at
            "#,
        )
        .bind(&new_record.code)
        .bind(&new_record.long_url)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn set_clicks(&self, code: &str, clicks: i64) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE urls
            SET clicks = GREATEST(clicks, $2), updated_at = NOW()
            WHERE code = $1
            "#,
        )
        .bind(code)
        .bind(clicks)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            debug!(code = %code, "set_clicks on unknown code ignored");
        }

        Ok(())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
