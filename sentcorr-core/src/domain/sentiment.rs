//! Per-headline sentiment scores and the classification label.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Dated;

/// Scores for a single text record from both sentiment models.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentScores {
    /// Lexical polarity in [-1, 1].
    pub polarity: f64,
    /// Lexical subjectivity in [0, 1].
    pub subjectivity: f64,
    /// Rule-based compound valence in [-1, 1].
    pub compound: f64,
    /// Proportion of positive valence.
    pub positive: f64,
    /// Proportion of negative valence.
    pub negative: f64,
    /// Proportion of neutral valence.
    pub neutral: f64,
}

/// Classification of a record by its polarity.
///
/// The pivot is a fixed threshold (0.5 by default), not zero: anything
/// strictly above is positive, strictly below is negative, and only a
/// polarity exactly equal to the threshold is neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn classify(polarity: f64, threshold: f64) -> Self {
        if polarity > threshold {
            SentimentLabel::Positive
        } else if polarity < threshold {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        };
        f.write_str(s)
    }
}

/// A scored news record, ready for daily aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHeadline {
    pub date: NaiveDate,
    pub scores: SentimentScores,
    pub label: SentimentLabel,
}

impl Dated for ScoredHeadline {
    fn date(&self) -> NaiveDate {
        self.date
    }
}
