use fbdb_core::FeedbackRecord;

use super::{row_values, COLUMNS};
use crate::ArchiveError;

/// Write a header row followed by one row per record.
///
/// Fields containing commas, quotes or newlines are quoted per RFC 4180.
///
/// # Errors
///
/// Returns [`ArchiveError::Csv`] if a record cannot be written, or
/// [`ArchiveError::Export`] if the buffer cannot be flushed.
pub fn write_csv(records: &[FeedbackRecord]) -> Result<Vec<u8>, ArchiveError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.write_record(row_values(record))?;
    }
    writer
        .into_inner()
        .map_err(|e| ArchiveError::Export(e.error().to_string()))
}
