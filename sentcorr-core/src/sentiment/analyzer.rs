//! Per-record scoring with both sentiment models.

use chrono::NaiveDate;
use rayon::prelude::*;

use super::polarity::PolarityModel;
use super::valence::ValenceModel;
use crate::data::{ColumnMapping, ColumnRole, DataError, DatedFrame};
use crate::domain::{ScoredHeadline, SentimentLabel, SentimentScores};

/// Default polarity pivot for the positive/negative label.
pub const DEFAULT_POSITIVE_THRESHOLD: f64 = 0.5;

/// Scores headlines for polarity/subjectivity and valence, and labels them.
#[derive(Debug)]
pub struct SentimentAnalyzer {
    polarity: PolarityModel,
    valence: ValenceModel,
    threshold: f64,
    parallel: bool,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            polarity: PolarityModel::new(),
            valence: ValenceModel::new(),
            threshold: DEFAULT_POSITIVE_THRESHOLD,
            parallel: true,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Score frames on the rayon pool (default) or sequentially.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Scores for one text; missing or blank text scores all-zero.
    pub fn score(&self, text: Option<&str>) -> SentimentScores {
        let text = match text {
            Some(t) if !t.trim().is_empty() => t,
            _ => return SentimentScores::default(),
        };
        let (polarity, subjectivity) = self.polarity.score(text);
        let valence = self.valence.score(text);
        SentimentScores {
            polarity,
            subjectivity,
            compound: valence.compound,
            positive: valence.positive,
            negative: valence.negative,
            neutral: valence.neutral,
        }
    }

    pub fn label(&self, scores: &SentimentScores) -> SentimentLabel {
        SentimentLabel::classify(scores.polarity, self.threshold)
    }

    pub fn score_record(&self, date: NaiveDate, text: Option<&str>) -> ScoredHeadline {
        let scores = self.score(text);
        ScoredHeadline {
            date,
            label: self.label(&scores),
            scores,
        }
    }

    /// Score every row of a news table, in row order.
    pub fn score_frame(
        &self,
        news: &DatedFrame,
        columns: &ColumnMapping,
    ) -> Result<Vec<ScoredHeadline>, DataError> {
        let text_column = columns.resolve(ColumnRole::Text, &news.column_names())?;
        let dates = news.dates()?;
        let texts = news.text_column(&text_column)?;

        let scored: Vec<ScoredHeadline> = if self.parallel {
            dates
                .par_iter()
                .zip(texts.par_iter())
                .map(|(date, text)| self.score_record(*date, text.as_deref()))
                .collect()
        } else {
            dates
                .iter()
                .zip(texts.iter())
                .map(|(date, text)| self.score_record(*date, text.as_deref()))
                .collect()
        };

        log::debug!("scored {} headlines from '{text_column}'", scored.len());
        Ok(scored)
    }
}
