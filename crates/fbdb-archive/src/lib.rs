//! Feedback archive service: filtering, export and the operations the HTTP
//! and CLI front ends call.

pub mod error;
pub mod export;
pub mod query;
pub mod service;
pub mod summary;

pub use error::ArchiveError;
pub use export::{export_records, ExportFile, ExportFormat, COLUMNS};
pub use query::{sort_newest_first, CategoryFilter, FeedbackQuery, FilterCriteria, ALL_CATEGORIES};
pub use service::FeedbackArchive;
pub use summary::SentimentSummary;
