use fbdb_core::ValidationError;
use fbdb_db::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("unsupported export format '{0}' (expected csv or report)")]
    UnsupportedFormat(String),
    #[error("feedback {0} not found")]
    NotFound(i64),
    #[error(transparent)]
    Store(#[from] DbError),
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("export failed: {0}")]
    Export(String),
}

impl ArchiveError {
    /// Stable machine-readable code for API and CLI callers.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ArchiveError::Validation(_) => "validation_error",
            ArchiveError::UnsupportedFormat(_) => "unsupported_format",
            ArchiveError::NotFound(_) => "not_found",
            ArchiveError::Store(_) | ArchiveError::Csv(_) | ArchiveError::Export(_) => {
                "internal_error"
            }
        }
    }

    /// True for errors the caller can fix by changing the request.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ArchiveError::Validation(_)
                | ArchiveError::UnsupportedFormat(_)
                | ArchiveError::NotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_distinguish_client_and_server_errors() {
        let validation = ArchiveError::from(ValidationError::MissingField("name"));
        assert_eq!(validation.code(), "validation_error");
        assert!(validation.is_client_error());
        assert_eq!(validation.to_string(), "missing required field: name");

        let missing = ArchiveError::NotFound(7);
        assert_eq!(missing.code(), "not_found");
        assert_eq!(missing.to_string(), "feedback 7 not found");

        let store = ArchiveError::from(DbError::MissingDatabaseUrl);
        assert_eq!(store.code(), "internal_error");
        assert!(!store.is_client_error());
    }
}
