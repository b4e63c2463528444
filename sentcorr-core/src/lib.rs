//! SentCorr Core: frame loading, date alignment, returns, sentiment, correlation.
//!
//! This crate contains the analytical heart of the pipeline:
//! - Domain types (daily sentiment, daily returns, combined days, date ranges)
//! - CSV frame loading with column discovery and calendar-date normalization
//! - Date alignment of two dated tables to their common range
//! - Day-over-day percentage returns from a close-price column
//! - Per-headline polarity/subjectivity and valence scoring, daily aggregation
//! - Pearson and Spearman correlation with two-sided p-values
//! - Technical indicators over close-price series
//!
//! Nothing in here writes files or renders charts; that lives in `sentcorr-runner`.

pub mod correlation;
pub mod data;
pub mod domain;
pub mod returns;
pub mod sentiment;
pub mod stats;
pub mod technicals;

pub use correlation::{combine, compute_correlations, CorrelationReport, CorrelationSet};
pub use data::{ColumnMapping, DataError, DatedFrame, FrameLoader};
pub use domain::{CombinedDay, DailyReturn, DailySentiment, DateRange};
pub use returns::{compute_daily_returns, PriceReturns};
pub use sentiment::{aggregate_daily, SentimentAnalyzer};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types handed across threads by the runner are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<DatedFrame>();
        require_sync::<DatedFrame>();
        require_send::<DailySentiment>();
        require_sync::<DailySentiment>();
        require_send::<CombinedDay>();
        require_sync::<CombinedDay>();
        require_send::<CorrelationReport>();
        require_sync::<CorrelationReport>();
        require_send::<ColumnMapping>();
        require_sync::<ColumnMapping>();
        require_sync::<SentimentAnalyzer>();
    }
}
