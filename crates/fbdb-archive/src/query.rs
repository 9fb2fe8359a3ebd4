//! Filter criteria parsing and predicate evaluation.
//!
//! Raw criteria arrive as optional strings (query parameters, CLI flags).
//! [`FeedbackQuery::from_criteria`] validates them once; [`FeedbackQuery::run`]
//! then applies category, start date, end date and search predicates in that
//! order and sorts newest first.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use fbdb_core::{Category, FeedbackRecord, ValidationError};
use serde::Deserialize;

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Unvalidated browse/export criteria. Absent or empty values impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date_start: Option<String>,
    #[serde(default)]
    pub date_end: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

impl FilterCriteria {
    /// True when no field would constrain the result.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        non_blank(self.category.as_deref())
            .is_none_or(|c| c == ALL_CATEGORIES)
            && non_blank(self.date_start.as_deref()).is_none()
            && non_blank(self.date_end.as_deref()).is_none()
            && self.search.as_deref().is_none_or(str::is_empty)
    }
}

/// Category predicate after parsing the raw label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    Only(Category),
    /// A label outside the fixed set. No stored record can carry it.
    Unmatched(String),
}

impl CategoryFilter {
    fn parse(label: &str) -> Self {
        label
            .parse::<Category>()
            .map_or_else(|_| Self::Unmatched(label.to_string()), Self::Only)
    }

    #[must_use]
    pub fn matches(&self, category: Category) -> bool {
        match self {
            Self::Only(wanted) => *wanted == category,
            Self::Unmatched(_) => false,
        }
    }
}

/// Validated criteria ready to run against a record snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackQuery {
    pub category: Option<CategoryFilter>,
    /// Inclusive lower bound: midnight UTC of `date_start`.
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound: the last instant of `date_end`.
    pub end: Option<DateTime<Utc>>,
    /// Case-sensitive substring matched against name, message and email.
    pub search: Option<String>,
}

impl FeedbackQuery {
    /// Validate raw criteria.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDate`] for a date that is not
    /// `YYYY-MM-DD`. An unknown category is not an error; it matches nothing.
    pub fn from_criteria(criteria: &FilterCriteria) -> Result<Self, ValidationError> {
        let category = match non_blank(criteria.category.as_deref()) {
            None | Some(ALL_CATEGORIES) => None,
            Some(label) => Some(CategoryFilter::parse(label)),
        };

        let start = non_blank(criteria.date_start.as_deref())
            .map(|raw| parse_date("date_start", raw).map(start_of_day))
            .transpose()?;
        let end = non_blank(criteria.date_end.as_deref())
            .map(|raw| parse_date("date_end", raw).map(end_of_day))
            .transpose()?;

        let search = criteria.search.clone().filter(|s| !s.is_empty());

        Ok(Self {
            category,
            start,
            end,
            search,
        })
    }

    /// Whether a single record satisfies every supplied predicate.
    #[must_use]
    pub fn matches(&self, record: &FeedbackRecord) -> bool {
        self.category
            .as_ref()
            .is_none_or(|c| c.matches(record.category))
            && self.start.is_none_or(|start| record.submitted_at >= start)
            && self.end.is_none_or(|end| record.submitted_at <= end)
            && self
                .search
                .as_deref()
                .is_none_or(|needle| contains_search(record, needle))
    }

    /// Filter a snapshot and order it newest first.
    ///
    /// `records` must be in insertion order; ties on `submitted_at` keep that order.
    #[must_use]
    pub fn run(&self, records: Vec<FeedbackRecord>) -> Vec<FeedbackRecord> {
        let mut selected: Vec<FeedbackRecord> =
            records.into_iter().filter(|r| self.matches(r)).collect();
        sort_newest_first(&mut selected);
        selected
    }
}

/// Stable sort by `submitted_at` descending.
pub fn sort_newest_first(records: &mut [FeedbackRecord]) {
    records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
}

fn contains_search(record: &FeedbackRecord, needle: &str) -> bool {
    record.name.contains(needle)
        || record.message.contains(needle)
        || record.email.as_deref().is_some_and(|e| e.contains(needle))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    // 23:59:59 plus the full sub-second range, so fractional timestamps on
    // the end day are still included.
    let last = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN);
    date.and_time(last).and_utc()
}
