//! SQLite implementation of the URL repository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::entities::{InsertOutcome, NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// SQLite repository for URL record storage and retrieval.
///
/// Backed by the `urls` table created in `migrations/0001_create_urls.sql`.
/// Uses bound parameters throughout.
#[derive(Debug, Clone)]
pub struct SqliteUrlRepository {
    pool: SqlitePool,
}

impl SqliteUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UrlRow {
    id: i64,
    url: String,
    sig: String,
}

impl From<UrlRow> for UrlRecord {
    fn from(row: UrlRow) -> Self {
        UrlRecord::new(row.id, row.url, row.sig)
    }
}

#[async_trait]
impl UrlRepository for SqliteUrlRepository {
    async fn count_by_signature(&self, signature: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls WHERE sig = ?")
            .bind(signature)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            INSERT INTO urls (url, sig)
            VALUES (?, ?)
            RETURNING id, url, sig
            "#,
        )
        .bind(&new_record.url)
        .bind(&new_record.signature)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn insert_if_absent(&self, new_record: NewUrlRecord) -> Result<InsertOutcome, AppError> {
        let inserted = sqlx::query_as::<_, UrlRow>(
            r#"
            INSERT INTO urls (url, sig)
            VALUES (?, ?)
            ON CONFLICT (sig) DO NOTHING
            RETURNING id, url, sig
            "#,
        )
        .bind(&new_record.url)
        .bind(&new_record.signature)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = inserted {
            return Ok(InsertOutcome::Created(row.into()));
        }

        let existing = self
            .find_by_signature(&new_record.signature)
            .await?
            .ok_or_else(|| {
                AppError::internal(
                    "Database error",
                    serde_json::json!({
                        "reason": "insert skipped on conflict but no row matches the signature",
                        "sig": new_record.signature,
                    }),
                )
            })?;

        Ok(InsertOutcome::Existing(existing))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UrlRecord>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>("SELECT id, url, sig FROM urls WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn find_by_signature(&self, signature: &str) -> Result<Option<UrlRecord>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>("SELECT id, url, sig FROM urls WHERE sig = ?")
            .bind(signature)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
