//! Word-level polarity scoring for free-text feedback.

/// Maps text to a polarity score in `[-1.0, 1.0]`.
///
/// Implementations must be pure: the same text always yields the same score,
/// and no input (including the empty string) may panic.
pub trait PolarityScorer: Send + Sync {
    fn polarity(&self, text: &str) -> f32;
}

impl<F> PolarityScorer for F
where
    F: Fn(&str) -> f32 + Send + Sync,
{
    fn polarity(&self, text: &str) -> f32 {
        self(text)
    }
}

/// General-purpose opinion word weights.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative.
pub(crate) const LEXICON: &[(&str, f32)] = &[
    // Positive signals
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("wonderful", 1.0),
    ("fantastic", 0.4),
    ("perfect", 1.0),
    ("best", 1.0),
    ("better", 0.5),
    ("nice", 0.6),
    ("love", 0.5),
    ("loved", 0.7),
    ("like", 0.2),
    ("liked", 0.3),
    ("enjoy", 0.4),
    ("enjoyed", 0.5),
    ("happy", 0.8),
    ("glad", 0.5),
    ("pleased", 0.5),
    ("helpful", 0.5),
    ("friendly", 0.4),
    ("easy", 0.4),
    ("fast", 0.2),
    ("clean", 0.4),
    ("beautiful", 0.85),
    ("impressive", 1.0),
    ("useful", 0.3),
    ("recommend", 0.4),
    ("thanks", 0.2),
    ("thank", 0.2),
    ("appreciate", 0.4),
    ("fun", 0.3),
    ("smooth", 0.4),
    ("satisfied", 0.5),
    ("interesting", 0.5),
    // Negative signals
    ("bad", -0.7),
    ("worse", -0.4),
    ("worst", -1.0),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("poor", -0.4),
    ("hate", -0.8),
    ("hated", -0.9),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("annoying", -0.8),
    ("broken", -0.4),
    ("slow", -0.3),
    ("confusing", -0.3),
    ("difficult", -0.5),
    ("hard", -0.3),
    ("useless", -0.5),
    ("wrong", -0.5),
    ("rude", -0.3),
    ("dirty", -0.6),
    ("ugly", -0.7),
    ("sad", -0.5),
    ("angry", -0.5),
    ("frustrating", -0.4),
    ("frustrated", -0.7),
    ("problem", -0.3),
    ("crash", -0.4),
    ("crashes", -0.4),
    ("fail", -0.5),
    ("failed", -0.5),
    ("unacceptable", -0.8),
    ("expensive", -0.5),
    ("boring", -1.0),
];

/// Multipliers applied to the next opinion word.
const INTENSIFIERS: &[(&str, f32)] = &[
    ("very", 1.3),
    ("really", 1.2),
    ("extremely", 1.5),
    ("incredibly", 1.4),
    ("super", 1.3),
    ("so", 1.2),
    ("quite", 1.1),
    ("slightly", 0.6),
    ("somewhat", 0.7),
];

/// A negator flips and damps the next opinion word.
const NEGATION_FACTOR: f32 = -0.5;

const NEGATORS: &[&str] = &["not", "no", "never", "cannot", "nothing", "hardly"];

/// Lexicon-backed scorer: the mean of matched opinion-word weights.
///
/// Each token is lowercased with non-alphabetic edges stripped. A negator or
/// intensifier adjusts the next opinion word; the adjustment is dropped at
/// clause punctuation. Text with no opinion words scores `0.0`.
#[derive(Debug, Clone, Copy)]
pub struct LexiconScorer {
    lexicon: &'static [(&'static str, f32)],
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self { lexicon: LEXICON }
    }
}

impl LexiconScorer {
    /// Score with a caller-provided word table instead of the built-in one.
    #[must_use]
    pub fn with_lexicon(lexicon: &'static [(&'static str, f32)]) -> Self {
        Self { lexicon }
    }

    fn weight(&self, word: &str) -> Option<f32> {
        self.lexicon
            .iter()
            .find(|(lex_word, _)| *lex_word == word)
            .map(|&(_, weight)| weight)
    }
}

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> f32 {
        let mut total = 0.0_f32;
        let mut matched = 0_usize;
        let mut modifier = 1.0_f32;

        for raw in text.split_whitespace() {
            let word = raw
                .trim_matches(|c: char| !c.is_alphabetic())
                .to_lowercase();

            if is_negator(&word) {
                modifier *= NEGATION_FACTOR;
            } else if let Some(factor) = intensifier(&word) {
                modifier *= factor;
            } else if let Some(weight) = self.weight(&word) {
                total += (weight * modifier).clamp(-1.0, 1.0);
                matched += 1;
                modifier = 1.0;
            }

            if raw.ends_with(['.', ',', ';', '!', '?']) {
                modifier = 1.0;
            }
        }

        if matched == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = total / matched as f32;
        mean.clamp(-1.0, 1.0)
    }
}

fn is_negator(word: &str) -> bool {
    NEGATORS.contains(&word) || word.ends_with("n't")
}

fn intensifier(word: &str) -> Option<f32> {
    INTENSIFIERS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|&(_, factor)| factor)
}
