//! Database operations for the `feedback` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fbdb_core::{Category, FeedbackRecord, NewFeedbackRecord, Sentiment};
use sqlx::PgPool;

use crate::{DbError, RecordStore};

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `feedback` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FeedbackRow {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub category: String,
    pub message: String,
    pub sentiment: String,
    pub submitted_at: DateTime<Utc>,
}

impl TryFrom<FeedbackRow> for FeedbackRecord {
    type Error = DbError;

    fn try_from(row: FeedbackRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .parse::<Category>()
            .map_err(|e| DbError::InvalidRow(format!("feedback {}: {e}", row.id)))?;
        let sentiment = row
            .sentiment
            .parse::<Sentiment>()
            .map_err(|e| DbError::InvalidRow(format!("feedback {}: {e}", row.id)))?;

        Ok(FeedbackRecord {
            id: row.id,
            name: row.name,
            email: row.email,
            category,
            message: row.message,
            sentiment,
            submitted_at: row.submitted_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert a feedback row and return it with its generated id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_feedback(
    pool: &PgPool,
    record: &NewFeedbackRecord,
) -> Result<FeedbackRecord, DbError> {
    let row = sqlx::query_as::<_, FeedbackRow>(
        "INSERT INTO feedback (name, email, category, message, sentiment, submitted_at) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id, name, email, category, message, sentiment, submitted_at",
    )
    .bind(&record.name)
    .bind(record.email.as_deref())
    .bind(record.category.label())
    .bind(&record.message)
    .bind(record.sentiment.label())
    .bind(record.submitted_at)
    .fetch_one(pool)
    .await?;

    row.try_into()
}

/// Delete a feedback row. Returns `false` if no row matched.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_feedback(pool: &PgPool, id: i64) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM feedback WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// List every feedback row ordered by `id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidRow`]
/// if a stored category or sentiment is outside the known set.
pub async fn list_feedback(pool: &PgPool) -> Result<Vec<FeedbackRecord>, DbError> {
    let rows = sqlx::query_as::<_, FeedbackRow>(
        "SELECT id, name, email, category, message, sentiment, submitted_at \
         FROM feedback \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(FeedbackRecord::try_from).collect()
}

// ---------------------------------------------------------------------------
// Store adapter
// ---------------------------------------------------------------------------

/// [`RecordStore`] backed by Postgres. `BIGSERIAL` ids make assignment atomic.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn insert(&self, record: NewFeedbackRecord) -> Result<FeedbackRecord, DbError> {
        insert_feedback(&self.pool, &record).await
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        delete_feedback(&self.pool, id).await
    }

    async fn list_all(&self) -> Result<Vec<FeedbackRecord>, DbError> {
        list_feedback(&self.pool).await
    }

    async fn health_check(&self) -> Result<(), DbError> {
        crate::health_check(&self.pool).await
    }
}
