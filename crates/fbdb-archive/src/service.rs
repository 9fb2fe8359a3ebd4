//! The archive service: submission, browsing, deletion and export over a
//! [`RecordStore`].

use std::sync::Arc;

use chrono::Utc;
use fbdb_core::{AdminContext, Category, FeedbackRecord, NewFeedbackRecord, Submission};
use fbdb_db::RecordStore;
use fbdb_sentiment::SentimentClassifier;

use crate::export::{export_records, ExportFile, ExportFormat};
use crate::query::{FeedbackQuery, FilterCriteria};
use crate::summary::SentimentSummary;
use crate::ArchiveError;

#[derive(Clone)]
pub struct FeedbackArchive {
    store: Arc<dyn RecordStore>,
    classifier: SentimentClassifier,
}

impl std::fmt::Debug for FeedbackArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackArchive").finish_non_exhaustive()
    }
}

impl FeedbackArchive {
    /// Build an archive using the default lexicon classifier.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_classifier(store, SentimentClassifier::default())
    }

    #[must_use]
    pub fn with_classifier(store: Arc<dyn RecordStore>, classifier: SentimentClassifier) -> Self {
        Self { store, classifier }
    }

    /// The fixed category set, in presentation order.
    #[must_use]
    pub fn categories(&self) -> &'static [Category] {
        &Category::ALL
    }

    /// Validate, classify and persist a submission.
    ///
    /// Sentiment is computed once here and never recomputed.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Validation`] for bad input (nothing is stored)
    /// or [`ArchiveError::Store`] if persistence fails.
    pub async fn submit(&self, submission: Submission) -> Result<FeedbackRecord, ArchiveError> {
        let valid = submission.validate()?;
        let sentiment = self.classifier.classify(&valid.message);

        let record = self
            .store
            .insert(NewFeedbackRecord {
                name: valid.name,
                email: valid.email,
                category: valid.category,
                message: valid.message,
                sentiment,
                submitted_at: Utc::now(),
            })
            .await?;

        tracing::info!(
            id = record.id,
            category = %record.category,
            sentiment = %record.sentiment,
            "feedback submitted"
        );
        Ok(record)
    }

    /// Records matching `criteria`, newest first.
    ///
    /// Criteria are validated before the store is read.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Validation`] for a malformed date, or
    /// [`ArchiveError::Store`] if the store cannot be read.
    pub async fn browse(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<Vec<FeedbackRecord>, ArchiveError> {
        let query = FeedbackQuery::from_criteria(criteria)?;
        let records = self.store.list_all().await?;
        let total = records.len();
        let selected = query.run(records);
        tracing::debug!(total, matched = selected.len(), "browsed feedback");
        Ok(selected)
    }

    /// Every record, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Store`] if the store cannot be read.
    pub async fn list_all(&self) -> Result<Vec<FeedbackRecord>, ArchiveError> {
        self.browse(&FilterCriteria::default()).await
    }

    /// Remove a record.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::NotFound`] if no record has `id`, or
    /// [`ArchiveError::Store`] if the store fails.
    pub async fn delete(&self, admin: &AdminContext, id: i64) -> Result<(), ArchiveError> {
        if !self.store.delete(id).await? {
            tracing::warn!(id, admin = admin.username(), "delete of unknown feedback");
            return Err(ArchiveError::NotFound(id));
        }
        tracing::info!(id, admin = admin.username(), "feedback deleted");
        Ok(())
    }

    /// Render the records matching `criteria` as `format`.
    ///
    /// The format is checked before the store is read.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::UnsupportedFormat`] for an unknown format, any
    /// error [`FeedbackArchive::browse`] can return, or an export writer error.
    pub async fn export(
        &self,
        admin: &AdminContext,
        criteria: &FilterCriteria,
        format: &str,
    ) -> Result<ExportFile, ArchiveError> {
        let format: ExportFormat = format.parse()?;
        let records = self.browse(criteria).await?;
        let file = export_records(&records, format, Utc::now())?;
        tracing::info!(
            admin = admin.username(),
            format = %format,
            records = records.len(),
            bytes = file.bytes.len(),
            "feedback exported"
        );
        Ok(file)
    }

    /// Sentiment counts over the records matching `criteria`.
    ///
    /// # Errors
    ///
    /// Returns any error [`FeedbackArchive::browse`] can return.
    pub async fn summary(
        &self,
        admin: &AdminContext,
        criteria: &FilterCriteria,
    ) -> Result<SentimentSummary, ArchiveError> {
        let records = self.browse(criteria).await?;
        let summary = SentimentSummary::from_records(&records);
        tracing::debug!(
            admin = admin.username(),
            total = summary.total,
            positive = summary.positive,
            neutral = summary.neutral,
            negative = summary.negative,
            "feedback summary"
        );
        Ok(summary)
    }

    /// Verify the backing store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Store`] if the store health check fails.
    pub async fn health_check(&self) -> Result<(), ArchiveError> {
        self.store.health_check().await?;
        Ok(())
    }
}
