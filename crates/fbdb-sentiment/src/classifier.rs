//! Polarity thresholding into discrete sentiment labels.

use std::sync::Arc;

use fbdb_core::Sentiment;

use crate::scorer::{LexiconScorer, PolarityScorer};

/// Scores strictly above this are positive.
pub const POSITIVE_THRESHOLD: f32 = 0.1;
/// Scores strictly below this are negative.
pub const NEGATIVE_THRESHOLD: f32 = -0.1;

/// Map a polarity score to a label with a ±0.1 neutral deadband.
///
/// The boundaries themselves (`0.1`, `-0.1`) are neutral. `NaN` is neutral.
#[must_use]
pub fn label_for_polarity(score: f32) -> Sentiment {
    if score > POSITIVE_THRESHOLD {
        Sentiment::Positive
    } else if score < NEGATIVE_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Classifier over a swappable [`PolarityScorer`].
#[derive(Clone)]
pub struct SentimentClassifier {
    scorer: Arc<dyn PolarityScorer>,
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        Self::new(LexiconScorer::default())
    }
}

impl std::fmt::Debug for SentimentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentClassifier").finish_non_exhaustive()
    }
}

impl SentimentClassifier {
    pub fn new(scorer: impl PolarityScorer + 'static) -> Self {
        Self {
            scorer: Arc::new(scorer),
        }
    }

    #[must_use]
    pub fn polarity(&self, text: &str) -> f32 {
        self.scorer.polarity(text)
    }

    #[must_use]
    pub fn classify(&self, text: &str) -> Sentiment {
        label_for_polarity(self.polarity(text))
    }
}

/// Classify with the built-in lexicon.
#[must_use]
pub fn classify(text: &str) -> Sentiment {
    label_for_polarity(LexiconScorer::default().polarity(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadband_boundaries_are_neutral() {
        assert_eq!(label_for_polarity(0.1), Sentiment::Neutral);
        assert_eq!(label_for_polarity(-0.1), Sentiment::Neutral);
        assert_eq!(label_for_polarity(0.0), Sentiment::Neutral);
    }

    #[test]
    fn just_outside_deadband_is_labelled() {
        assert_eq!(label_for_polarity(0.100_001), Sentiment::Positive);
        assert_eq!(label_for_polarity(-0.100_001), Sentiment::Negative);
        assert_eq!(label_for_polarity(1.0), Sentiment::Positive);
        assert_eq!(label_for_polarity(-1.0), Sentiment::Negative);
    }

    #[test]
    fn nan_is_neutral() {
        assert_eq!(label_for_polarity(f32::NAN), Sentiment::Neutral);
    }

    #[test]
    fn empty_text_is_neutral() {
        assert_eq!(classify(""), Sentiment::Neutral);
        assert_eq!(classify("   "), Sentiment::Neutral);
    }

    #[test]
    fn default_lexicon_labels_obvious_text() {
        assert_eq!(classify("I love this museum"), Sentiment::Positive);
        assert_eq!(classify("terrible experience"), Sentiment::Negative);
        assert_eq!(classify("where is the exit"), Sentiment::Neutral);
    }

    #[test]
    fn weak_opinion_stays_neutral() {
        // "like" weighs 0.2; negated it becomes -0.1, inside the deadband
        assert_eq!(classify("not like"), Sentiment::Neutral);
    }

    #[test]
    fn classifier_uses_supplied_scorer() {
        let always_negative = SentimentClassifier::new(|_: &str| -0.5_f32);
        assert_eq!(always_negative.classify("great"), Sentiment::Negative);
        assert!((always_negative.polarity("x") + 0.5).abs() < f32::EPSILON);

        let on_the_line = SentimentClassifier::new(|_: &str| 0.1_f32);
        assert_eq!(on_the_line.classify("anything"), Sentiment::Neutral);
    }
}
