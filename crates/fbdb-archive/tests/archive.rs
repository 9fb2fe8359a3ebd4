use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use fbdb_archive::{
    ArchiveError, ExportFormat, FeedbackArchive, FilterCriteria, SentimentSummary, COLUMNS,
};
use fbdb_core::{
    AdminContext, AdminUser, Category, NewFeedbackRecord, PasswordHash, Sentiment, Submission,
    ValidationError,
};
use fbdb_db::{MemoryStore, RecordStore};
use fbdb_sentiment::SentimentClassifier;

fn admin() -> AdminContext {
    let user = AdminUser::new("admin", PasswordHash::derive("admin123", "s1", 1_000)).unwrap();
    user.authenticate("admin", "admin123").unwrap()
}

fn submission(name: &str, email: Option<&str>, category: &str, message: &str) -> Submission {
    Submission {
        name: name.to_string(),
        email: email.map(ToString::to_string),
        category: category.to_string(),
        message: message.to_string(),
    }
}

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

async fn seeded(records: Vec<NewFeedbackRecord>) -> (Arc<MemoryStore>, FeedbackArchive) {
    let store = Arc::new(MemoryStore::new());
    for record in records {
        store.insert(record).await.unwrap();
    }
    let archive = FeedbackArchive::new(store.clone());
    (store, archive)
}

fn stored(
    name: &str,
    email: Option<&str>,
    category: Category,
    submitted_at: DateTime<Utc>,
) -> NewFeedbackRecord {
    NewFeedbackRecord {
        name: name.to_string(),
        email: email.map(ToString::to_string),
        category,
        message: format!("note from {name}"),
        sentiment: Sentiment::Neutral,
        submitted_at,
    }
}

// ---------------------------------------------------------------------------
// submit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_stores_record_with_sentiment() {
    let (store, archive) = seeded(vec![]).await;

    let record = archive
        .submit(submission(
            "Alice",
            Some("alice@example.com"),
            "Compliment",
            "The staff were wonderful and helpful",
        ))
        .await
        .unwrap();

    assert_eq!(record.id, 1);
    assert_eq!(record.category, Category::Compliment);
    assert_eq!(record.sentiment, Sentiment::Positive);
    assert_eq!(store.len().await, 1);

    let listed = archive.list_all().await.unwrap();
    assert_eq!(listed, vec![record]);
}

#[tokio::test]
async fn submit_uses_injected_classifier() {
    let store = Arc::new(MemoryStore::new());
    let archive =
        FeedbackArchive::with_classifier(store, SentimentClassifier::new(|_: &str| -0.5_f32));

    let record = archive
        .submit(submission("Bob", None, "Question", "anything"))
        .await
        .unwrap();
    assert_eq!(record.sentiment, Sentiment::Negative);
    assert_eq!(record.email, None);
}

#[tokio::test]
async fn invalid_submissions_store_nothing() {
    let (store, archive) = seeded(vec![]).await;

    let cases = [
        (
            submission("", None, "Question", "hi"),
            ValidationError::MissingField("name"),
        ),
        (
            submission("Al", None, "Question", "   "),
            ValidationError::MissingField("message"),
        ),
        (
            submission("Al", Some("not-an-email"), "Question", "hi"),
            ValidationError::InvalidEmail("not-an-email".to_string()),
        ),
        (
            submission("Al", None, "Rant", "hi"),
            ValidationError::InvalidCategory("Rant".to_string()),
        ),
    ];

    for (input, expected) in cases {
        let err = archive.submit(input).await.unwrap_err();
        assert!(
            matches!(err, ArchiveError::Validation(ref e) if *e == expected),
            "unexpected error: {err:?}"
        );
    }
    assert!(store.is_empty().await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_get_distinct_ids() {
    let (_, archive) = seeded(vec![]).await;

    let tasks = (0..50).map(|i| {
        let archive = archive.clone();
        tokio::spawn(async move {
            archive
                .submit(submission(&format!("visitor {i}"), None, "Question", "hi"))
                .await
        })
    });
    let ids: HashSet<i64> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.expect("task").expect("submit").id)
        .collect();

    assert_eq!(ids.len(), 50);
    assert_eq!(archive.list_all().await.unwrap().len(), 50);
}

// ---------------------------------------------------------------------------
// browse
// ---------------------------------------------------------------------------

#[tokio::test]
async fn browse_without_criteria_returns_everything_newest_first() {
    let (_, archive) = seeded(vec![
        stored("a", None, Category::Question, at(2025, 1, 1, 0, 0, 0)),
        stored("b", None, Category::Question, at(2025, 1, 3, 0, 0, 0)),
        stored("c", None, Category::Question, at(2025, 1, 2, 0, 0, 0)),
    ])
    .await;

    let names: Vec<String> = archive
        .browse(&FilterCriteria::default())
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, ["b", "c", "a"]);
}

#[tokio::test]
async fn browse_single_day_range_is_inclusive_of_the_whole_day() {
    let (_, archive) = seeded(vec![
        stored("late", None, Category::Question, at(2025, 1, 10, 23, 59, 0)),
        stored("next", None, Category::Question, at(2025, 1, 11, 0, 0, 1)),
    ])
    .await;

    let criteria = FilterCriteria {
        date_start: Some("2025-01-10".to_string()),
        date_end: Some("2025-01-10".to_string()),
        ..FilterCriteria::default()
    };
    let result = archive.browse(&criteria).await.unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].name, "late");
}

#[tokio::test]
async fn browse_search_spans_name_and_email() {
    let t = at(2025, 1, 1, 0, 0, 0);
    let (_, archive) = seeded(vec![
        stored("alice smith", None, Category::Question, t),
        stored("bob", Some("bob@alice.com"), Category::Question, t),
        stored("carol", Some("carol@example.com"), Category::Question, t),
    ])
    .await;

    let criteria = FilterCriteria {
        search: Some("alice".to_string()),
        ..FilterCriteria::default()
    };
    let names: HashSet<String> = archive
        .browse(&criteria)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(
        names,
        HashSet::from(["alice smith".to_string(), "bob".to_string()])
    );
}

#[tokio::test]
async fn browse_all_category_is_unfiltered_and_unknown_matches_nothing() {
    let t = at(2025, 1, 1, 0, 0, 0);
    let (_, archive) = seeded(vec![
        stored("a", None, Category::BugReport, t),
        stored("b", None, Category::Complaint, t),
    ])
    .await;

    let all = FilterCriteria {
        category: Some("All".to_string()),
        ..FilterCriteria::default()
    };
    assert_eq!(archive.browse(&all).await.unwrap().len(), 2);

    let complaints = FilterCriteria {
        category: Some("Complaint".to_string()),
        ..FilterCriteria::default()
    };
    let result = archive.browse(&complaints).await.unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].name, "b");

    for raw in ["complaint", "Rant"] {
        let unknown = FilterCriteria {
            category: Some(raw.to_string()),
            ..FilterCriteria::default()
        };
        assert!(archive.browse(&unknown).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn browse_rejects_malformed_date() {
    let (_, archive) = seeded(vec![]).await;
    let criteria = FilterCriteria {
        date_end: Some("yesterday".to_string()),
        ..FilterCriteria::default()
    };
    assert!(matches!(
        archive.browse(&criteria).await.unwrap_err(),
        ArchiveError::Validation(ValidationError::InvalidDate {
            field: "date_end",
            ..
        })
    ));
}

// ---------------------------------------------------------------------------
// delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_removes_record_and_reports_missing_ids() {
    let (_, archive) = seeded(vec![
        stored("a", None, Category::Question, at(2025, 1, 1, 0, 0, 0)),
        stored("b", None, Category::Question, at(2025, 1, 2, 0, 0, 0)),
    ])
    .await;

    archive.delete(&admin(), 1).await.unwrap();
    let remaining: Vec<i64> = archive
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(remaining, [2]);

    let err = archive.delete(&admin(), 1).await.unwrap_err();
    assert!(matches!(err, ArchiveError::NotFound(1)));
}

// ---------------------------------------------------------------------------
// export
// ---------------------------------------------------------------------------

#[tokio::test]
async fn csv_export_round_trips_filtered_records() {
    let (_, archive) = seeded(vec![
        stored("Smith, Jane", Some("jane@x.org"), Category::BugReport, at(2025, 1, 5, 8, 0, 0)),
        stored("Bob", None, Category::Question, at(2025, 1, 6, 8, 0, 0)),
    ])
    .await;

    let criteria = FilterCriteria {
        category: Some("Bug Report".to_string()),
        ..FilterCriteria::default()
    };
    let file = archive.export(&admin(), &criteria, "csv").await.unwrap();
    assert_eq!(file.format, ExportFormat::Csv);
    assert_eq!(file.file_name, "feedback_export.csv");

    let mut reader = csv::Reader::from_reader(file.bytes.as_slice());
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, COLUMNS.map(String::from).to_vec());

    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], "1");
    assert_eq!(&rows[0][1], "Smith, Jane");
    assert_eq!(&rows[0][3], "Bug Report");
    assert_eq!(&rows[0][6], "2025-01-05 08:00:00");
}

#[tokio::test]
async fn report_export_matches_csv_rows() {
    let (_, archive) = seeded(vec![
        stored("a", None, Category::Question, at(2025, 1, 5, 8, 0, 0)),
        stored("b", None, Category::Question, at(2025, 1, 6, 8, 0, 0)),
    ])
    .await;

    let report = archive
        .export(&admin(), &FilterCriteria::default(), "pdf")
        .await
        .unwrap();
    assert_eq!(report.format, ExportFormat::Report);
    let html = String::from_utf8(report.bytes).unwrap();
    assert_eq!(html.matches("<tr><td>").count(), 2);
    // newest first
    assert!(html.find("note from b").unwrap() < html.find("note from a").unwrap());
}

#[tokio::test]
async fn unsupported_format_fails_before_reading_the_store() {
    let (_, archive) = seeded(vec![]).await;
    let criteria = FilterCriteria {
        date_start: Some("garbage".to_string()),
        ..FilterCriteria::default()
    };
    let err = archive.export(&admin(), &criteria, "xml").await.unwrap_err();
    assert!(matches!(err, ArchiveError::UnsupportedFormat(ref f) if f == "xml"));
}

#[tokio::test]
async fn export_of_empty_selection_has_header_only() {
    let (_, archive) = seeded(vec![]).await;
    let file = archive
        .export(&admin(), &FilterCriteria::default(), "csv")
        .await
        .unwrap();
    let mut reader = csv::Reader::from_reader(file.bytes.as_slice());
    assert_eq!(reader.headers().unwrap().len(), 7);
    assert_eq!(reader.records().count(), 0);
}

// ---------------------------------------------------------------------------
// summary
// ---------------------------------------------------------------------------

fn with_sentiment(mut record: NewFeedbackRecord, sentiment: Sentiment) -> NewFeedbackRecord {
    record.sentiment = sentiment;
    record
}

#[tokio::test]
async fn summary_splits_counts_by_sentiment() {
    let t = at(2025, 1, 1, 0, 0, 0);
    let (_, archive) = seeded(vec![
        with_sentiment(stored("a", None, Category::Compliment, t), Sentiment::Positive),
        with_sentiment(stored("b", None, Category::Complaint, t), Sentiment::Negative),
        with_sentiment(stored("c", None, Category::Compliment, t), Sentiment::Positive),
        stored("d", None, Category::Question, t),
    ])
    .await;

    let summary = archive
        .summary(&admin(), &FilterCriteria::default())
        .await
        .unwrap();
    assert_eq!(
        summary,
        SentimentSummary {
            total: 4,
            positive: 2,
            neutral: 1,
            negative: 1,
        }
    );

    let compliments = FilterCriteria {
        category: Some("Compliment".to_string()),
        ..FilterCriteria::default()
    };
    let summary = archive.summary(&admin(), &compliments).await.unwrap();
    assert_eq!((summary.total, summary.positive), (2, 2));
}

#[tokio::test]
async fn summary_of_empty_store_is_zero() {
    let (_, archive) = seeded(vec![]).await;
    let summary = archive
        .summary(&admin(), &FilterCriteria::default())
        .await
        .unwrap();
    assert_eq!(summary, SentimentSummary::default());
}

#[tokio::test]
async fn categories_are_the_fixed_six() {
    let (_, archive) = seeded(vec![]).await;
    let labels: Vec<&str> = archive.categories().iter().map(|c| c.label()).collect();
    assert_eq!(
        labels,
        [
            "General Feedback",
            "Bug Report",
            "Feature Request",
            "Complaint",
            "Compliment",
            "Question"
        ]
    );
}
