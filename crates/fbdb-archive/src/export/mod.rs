//! Rendering filtered records into downloadable documents.
//!
//! Both formats emit the same seven columns in the same order, one row per
//! record, in the order the records are given.

mod csv_export;
mod report;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use fbdb_core::FeedbackRecord;

use crate::ArchiveError;

pub use csv_export::write_csv;
pub use report::{escape_html, render_report, REPORT_TITLE};

/// Column headers shared by every export format.
pub const COLUMNS: [&str; 7] = [
    "ID",
    "Name",
    "Email",
    "Category",
    "Message",
    "Sentiment",
    "Submitted At",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    /// Printable HTML document.
    Report,
}

impl ExportFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Report => "report",
        }
    }

    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Report => "text/html; charset=utf-8",
        }
    }

    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Csv => "feedback_export.csv",
            ExportFormat::Report => "feedback_export.html",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ArchiveError;

    /// Accepts `csv` and `report`; `pdf` and `html` are aliases for `report`.
    /// Matching ignores ASCII case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "report" | "pdf" | "html" => Ok(ExportFormat::Report),
            _ => Err(ArchiveError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// A rendered export ready to hand to a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub format: ExportFormat,
    pub content_type: &'static str,
    pub file_name: &'static str,
    pub bytes: Vec<u8>,
}

/// Render `records` in `format`. `generated_at` is stamped into the report header.
///
/// # Errors
///
/// Returns [`ArchiveError::Csv`] or [`ArchiveError::Export`] if the writer fails.
pub fn export_records(
    records: &[FeedbackRecord],
    format: ExportFormat,
    generated_at: DateTime<Utc>,
) -> Result<ExportFile, ArchiveError> {
    let bytes = match format {
        ExportFormat::Csv => write_csv(records)?,
        ExportFormat::Report => render_report(records, generated_at).into_bytes(),
    };

    Ok(ExportFile {
        format,
        content_type: format.content_type(),
        file_name: format.file_name(),
        bytes,
    })
}

/// One record as the seven column values. A missing email renders empty.
pub(crate) fn row_values(record: &FeedbackRecord) -> [String; 7] {
    [
        record.id.to_string(),
        record.name.clone(),
        record.email.clone().unwrap_or_default(),
        record.category.label().to_string(),
        record.message.clone(),
        record.sentiment.label().to_string(),
        record.submitted_at_display(),
    ]
}
