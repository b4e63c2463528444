//! Daily aggregation of scored headlines.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{DailySentiment, ScoredHeadline, SentimentLabel};
use crate::stats::{mean, population_std, round_dp};

/// Decimal places kept on every daily aggregate.
pub const AGGREGATE_DECIMALS: i32 = 4;

/// Group scored headlines by date, ascending.
///
/// Per date: mean and population std of polarity and compound score, article
/// count, and the fraction of articles labeled positive. A single-article
/// day has std 0.0.
pub fn aggregate_daily(headlines: &[ScoredHeadline]) -> Vec<DailySentiment> {
    let mut groups: BTreeMap<NaiveDate, Vec<&ScoredHeadline>> = BTreeMap::new();
    for h in headlines {
        groups.entry(h.date).or_default().push(h);
    }

    groups
        .into_iter()
        .map(|(date, day)| {
            let polarity: Vec<f64> = day.iter().map(|h| h.scores.polarity).collect();
            let compound: Vec<f64> = day.iter().map(|h| h.scores.compound).collect();
            let positive = day
                .iter()
                .filter(|h| h.label == SentimentLabel::Positive)
                .count();
            let positive_ratio = if day.is_empty() {
                0.0
            } else {
                positive as f64 / day.len() as f64
            };

            DailySentiment {
                date,
                avg_polarity: round_dp(mean(&polarity), AGGREGATE_DECIMALS),
                std_polarity: round_dp(population_std(&polarity), AGGREGATE_DECIMALS),
                article_count: day.len(),
                avg_vader_compound: round_dp(mean(&compound), AGGREGATE_DECIMALS),
                std_vader_compound: round_dp(population_std(&compound), AGGREGATE_DECIMALS),
                positive_ratio: round_dp(positive_ratio, AGGREGATE_DECIMALS),
            }
        })
        .collect()
}
