//! In-process record store.

use async_trait::async_trait;
use fbdb_core::{FeedbackRecord, NewFeedbackRecord};
use tokio::sync::RwLock;

use crate::{DbError, RecordStore};

#[derive(Debug)]
struct MemoryInner {
    next_id: i64,
    records: Vec<FeedbackRecord>,
}

/// A [`RecordStore`] held in memory.
///
/// A single write lock covers both id assignment and the push, so ids are
/// unique under concurrent inserts and readers never see a partial record.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryInner {
                next_id: 1,
                records: Vec::new(),
            }),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, record: NewFeedbackRecord) -> Result<FeedbackRecord, DbError> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id = id
            .checked_add(1)
            .ok_or_else(|| DbError::InvalidRow("feedback id space exhausted".to_string()))?;
        let stored = record.with_id(id);
        inner.records.push(stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let mut inner = self.inner.write().await;
        match inner.records.iter().position(|r| r.id == id) {
            Some(index) => {
                inner.records.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_all(&self) -> Result<Vec<FeedbackRecord>, DbError> {
        Ok(self.inner.read().await.records.clone())
    }

    async fn health_check(&self) -> Result<(), DbError> {
        Ok(())
    }
}
