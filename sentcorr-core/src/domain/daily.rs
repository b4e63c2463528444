//! Day-granularity records: daily sentiment aggregates, daily returns, and
//! the inner-joined combination of both.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Dated;

/// Sentiment aggregates for one calendar date. All values rounded to 4 dp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySentiment {
    pub date: NaiveDate,
    pub avg_polarity: f64,
    /// Population standard deviation; 0.0 for a single-article day.
    pub std_polarity: f64,
    pub article_count: usize,
    pub avg_vader_compound: f64,
    pub std_vader_compound: f64,
    /// Fraction of the day's articles labeled positive.
    pub positive_ratio: f64,
}

impl Dated for DailySentiment {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Close and percentage return for one trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyReturn {
    pub date: NaiveDate,
    pub close: Option<f64>,
    /// `(close[i] - close[i-1]) / close[i-1] * 100`; missing on the first
    /// row and wherever the division is not finite.
    pub daily_return: Option<f64>,
}

impl Dated for DailyReturn {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// One row of the sentiment/return inner join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedDay {
    pub date: NaiveDate,
    pub avg_polarity: f64,
    pub std_polarity: f64,
    pub article_count: usize,
    pub avg_vader_compound: f64,
    pub std_vader_compound: f64,
    pub positive_ratio: Option<f64>,
    pub close: Option<f64>,
    pub daily_return: Option<f64>,
}

impl CombinedDay {
    pub fn join(sentiment: &DailySentiment, ret: &DailyReturn) -> Self {
        Self {
            date: sentiment.date,
            avg_polarity: sentiment.avg_polarity,
            std_polarity: sentiment.std_polarity,
            article_count: sentiment.article_count,
            avg_vader_compound: sentiment.avg_vader_compound,
            std_vader_compound: sentiment.std_vader_compound,
            positive_ratio: Some(sentiment.positive_ratio),
            close: ret.close,
            daily_return: ret.daily_return,
        }
    }

    /// True when polarity, compound score and return are all present and finite.
    pub fn is_complete(&self) -> bool {
        self.avg_polarity.is_finite()
            && self.avg_vader_compound.is_finite()
            && self.daily_return.is_some_and(f64::is_finite)
    }
}

impl Dated for CombinedDay {
    fn date(&self) -> NaiveDate {
        self.date
    }
}
