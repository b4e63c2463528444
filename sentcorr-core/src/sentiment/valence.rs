//! Rule-based valence scores from the VADER lexicon.

use std::fmt;
use vader_sentiment::SentimentIntensityAnalyzer;

/// Compound valence plus the positive/negative/neutral proportions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Valence {
    pub compound: f64,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

pub struct ValenceModel {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl fmt::Debug for ValenceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValenceModel").finish_non_exhaustive()
    }
}

impl Default for ValenceModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ValenceModel {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }

    /// Blank text scores all-zero.
    pub fn score(&self, text: &str) -> Valence {
        if text.trim().is_empty() {
            return Valence::default();
        }
        let scores = self.analyzer.polarity_scores(text);
        let get = |key: &str| scores.get(key).copied().unwrap_or(0.0);
        Valence {
            compound: get("compound"),
            positive: get("pos"),
            negative: get("neg"),
            neutral: get("neu"),
        }
    }
}
