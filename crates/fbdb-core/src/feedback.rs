//! Feedback records, the closed category set, and submission validation.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Rendering used for `submitted_at` in listings and exports.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Longest accepted `name` and `email`, in characters.
pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_EMAIL_CHARS: usize = 100;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("valid regex"));

/// The fixed feedback categories. Serialized as their display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "General Feedback")]
    GeneralFeedback,
    #[serde(rename = "Bug Report")]
    BugReport,
    #[serde(rename = "Feature Request")]
    FeatureRequest,
    Complaint,
    Compliment,
    Question,
}

impl Category {
    /// Every category, in presentation order.
    pub const ALL: [Category; 6] = [
        Category::GeneralFeedback,
        Category::BugReport,
        Category::FeatureRequest,
        Category::Complaint,
        Category::Compliment,
        Category::Question,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::GeneralFeedback => "General Feedback",
            Category::BugReport => "Bug Report",
            Category::FeatureRequest => "Feature Request",
            Category::Complaint => "Complaint",
            Category::Compliment => "Compliment",
            Category::Question => "Question",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = ValidationError;

    /// Parses a display label exactly (`"Bug Report"`, not `"bug report"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| ValidationError::InvalidCategory(s.to_string()))
    }
}

/// Discrete sentiment label computed from a message at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Positive" => Ok(Sentiment::Positive),
            "Negative" => Ok(Sentiment::Negative),
            "Neutral" => Ok(Sentiment::Neutral),
            other => Err(format!("unknown sentiment '{other}'")),
        }
    }
}

/// A stored piece of visitor feedback. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub category: Category,
    pub message: String,
    pub sentiment: Sentiment,
    #[serde(with = "timestamp")]
    pub submitted_at: DateTime<Utc>,
}

impl FeedbackRecord {
    /// `submitted_at` rendered as `YYYY-MM-DD HH:MM:SS`.
    #[must_use]
    pub fn submitted_at_display(&self) -> String {
        self.submitted_at.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Everything a store needs to persist a record except its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedbackRecord {
    pub name: String,
    pub email: Option<String>,
    pub category: Category,
    pub message: String,
    pub sentiment: Sentiment,
    pub submitted_at: DateTime<Utc>,
}

impl NewFeedbackRecord {
    #[must_use]
    pub fn with_id(self, id: i64) -> FeedbackRecord {
        FeedbackRecord {
            id,
            name: self.name,
            email: self.email,
            category: self.category,
            message: self.message,
            sentiment: self.sentiment,
            submitted_at: self.submitted_at,
        }
    }
}

/// Raw, unvalidated submission as received from a form, JSON body or CLI.
///
/// Missing fields deserialize as empty so validation reports them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Submission {
    pub name: String,
    pub email: Option<String>,
    pub category: String,
    pub message: String,
}

/// A submission that passed [`Submission::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    pub name: String,
    pub email: Option<String>,
    pub category: Category,
    pub message: String,
}

impl Submission {
    /// Check required fields, the email shape, and the category.
    ///
    /// Name and message are trimmed. An empty email counts as absent.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, checking name, category
    /// presence, message, email, then the category value.
    pub fn validate(self) -> Result<ValidSubmission, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(ValidationError::TooLong {
                field: "name",
                max: MAX_NAME_CHARS,
            });
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingField("category"));
        }
        let message = self.message.trim();
        if message.is_empty() {
            return Err(ValidationError::MissingField("message"));
        }

        let email = self
            .email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        if let Some(ref e) = email {
            if e.chars().count() > MAX_EMAIL_CHARS {
                return Err(ValidationError::TooLong {
                    field: "email",
                    max: MAX_EMAIL_CHARS,
                });
            }
            if !is_valid_email(e) {
                return Err(ValidationError::InvalidEmail(e.clone()));
            }
        }

        let category = self.category.trim().parse::<Category>()?;

        Ok(ValidSubmission {
            name: name.to_string(),
            email,
            category,
            message: message.to_string(),
        })
    }
}

/// `local@domain.tld` shape check.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub(super) fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}
