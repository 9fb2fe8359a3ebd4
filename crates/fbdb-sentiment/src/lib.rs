//! Sentiment classification for visitor feedback.
//!
//! A [`PolarityScorer`] turns text into a score in `[-1.0, 1.0]`; the
//! classifier applies a ±0.1 deadband to produce a [`Sentiment`] label. The
//! default scorer averages weights from a general opinion-word lexicon.

pub mod classifier;
pub mod scorer;

pub use classifier::{
    classify, label_for_polarity, SentimentClassifier, NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD,
};
pub use fbdb_core::Sentiment;
pub use scorer::{LexiconScorer, PolarityScorer};
