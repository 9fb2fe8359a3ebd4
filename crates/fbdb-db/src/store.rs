//! The record store port the archive service queries against.

use async_trait::async_trait;
use fbdb_core::{FeedbackRecord, NewFeedbackRecord};

use crate::DbError;

/// Persistence contract for feedback records.
///
/// Implementations assign ids atomically with respect to concurrent inserts
/// and make a record visible to readers only once it is fully written.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a record and return it with its assigned id.
    async fn insert(&self, record: NewFeedbackRecord) -> Result<FeedbackRecord, DbError>;

    /// Remove a record. Returns `false` if no record had that id.
    async fn delete(&self, id: i64) -> Result<bool, DbError>;

    /// A consistent snapshot of every record, in insertion (id) order.
    async fn list_all(&self) -> Result<Vec<FeedbackRecord>, DbError>;

    /// Verify the store is reachable.
    async fn health_check(&self) -> Result<(), DbError>;
}
