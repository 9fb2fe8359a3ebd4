//! Shared domain types and configuration for the feedback archive.

pub mod admin;
pub mod app_config;
pub mod config;
pub mod feedback;

use thiserror::Error;

pub use admin::{AdminContext, AdminUser, CredentialError, PasswordHash, DEFAULT_ITERATIONS};
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use feedback::{
    is_valid_email, Category, FeedbackRecord, NewFeedbackRecord, Sentiment, Submission,
    ValidSubmission, MAX_EMAIL_CHARS, MAX_NAME_CHARS, TIMESTAMP_FORMAT,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Caller-correctable input problems.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("invalid email address: '{0}'")]
    InvalidEmail(String),
    #[error("unknown category '{0}'")]
    InvalidCategory(String),
    #[error("invalid {field} '{value}': expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },
}
