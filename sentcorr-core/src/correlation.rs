//! Correlation engine: joins daily sentiment with daily returns and measures
//! how each sentiment metric co-moves with the return.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{CombinedDay, DailyReturn, DailySentiment, DateRange};
use crate::stats::{pearson, spearman, CorrelationStat};

/// Minimum complete rows for any coefficient.
pub const MIN_CORRELATION_ROWS: usize = 2;

/// Inner join on exact date equality, in sentiment order.
///
/// A date present more than once on the return side yields one combined row
/// per match.
pub fn combine(sentiment: &[DailySentiment], returns: &[DailyReturn]) -> Vec<CombinedDay> {
    let mut by_date: HashMap<NaiveDate, Vec<&DailyReturn>> = HashMap::new();
    for r in returns {
        by_date.entry(r.date).or_default().push(r);
    }

    sentiment
        .iter()
        .flat_map(|s| {
            by_date
                .get(&s.date)
                .into_iter()
                .flatten()
                .map(move |r| CombinedDay::join(s, r))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Pearson,
    Spearman,
}

/// Coefficients for each sentiment metric against the daily return.
/// `None` marks a statistic that could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CorrelationSet {
    pub pearson_polarity: Option<CorrelationStat>,
    pub pearson_vader: Option<CorrelationStat>,
    pub pearson_positive_ratio: Option<CorrelationStat>,
    pub spearman_polarity: Option<CorrelationStat>,
    pub spearman_vader: Option<CorrelationStat>,
}

impl CorrelationSet {
    /// `(method, label, value)` in report order.
    pub fn entries(&self) -> [(Method, &'static str, Option<CorrelationStat>); 5] {
        [
            (Method::Pearson, "Polarity vs Returns", self.pearson_polarity),
            (Method::Pearson, "VADER vs Returns", self.pearson_vader),
            (
                Method::Pearson,
                "Positive Ratio vs Returns",
                self.pearson_positive_ratio,
            ),
            (Method::Spearman, "Polarity vs Returns", self.spearman_polarity),
            (Method::Spearman, "VADER vs Returns", self.spearman_vader),
        ]
    }
}

/// Correlations plus the span of the rows they were computed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationReport {
    /// Complete rows used.
    pub total_days: usize,
    /// Inclusive date span of those rows.
    pub range: DateRange,
    pub correlations: CorrelationSet,
}

/// Correlate sentiment metrics with returns over the complete rows of `days`.
///
/// Rows missing polarity, compound score or return are dropped first. With
/// fewer than [`MIN_CORRELATION_ROWS`] left, no report is produced.
pub fn compute_correlations(days: &[CombinedDay]) -> Option<CorrelationReport> {
    let clean: Vec<&CombinedDay> = days.iter().filter(|d| d.is_complete()).collect();
    if clean.len() < MIN_CORRELATION_ROWS {
        log::debug!(
            "{} complete rows; at least {MIN_CORRELATION_ROWS} needed for correlation",
            clean.len()
        );
        return None;
    }

    let returns: Vec<f64> = clean.iter().filter_map(|d| d.daily_return).collect();
    let polarity: Vec<f64> = clean.iter().map(|d| d.avg_polarity).collect();
    let compound: Vec<f64> = clean.iter().map(|d| d.avg_vader_compound).collect();

    let (ratio, ratio_returns): (Vec<f64>, Vec<f64>) = clean
        .iter()
        .filter_map(|d| match (d.positive_ratio, d.daily_return) {
            (Some(p), Some(r)) if p.is_finite() => Some((p, r)),
            _ => None,
        })
        .unzip();

    let correlations = CorrelationSet {
        pearson_polarity: pearson(&polarity, &returns),
        pearson_vader: pearson(&compound, &returns),
        pearson_positive_ratio: pearson(&ratio, &ratio_returns),
        spearman_polarity: spearman(&polarity, &returns),
        spearman_vader: spearman(&compound, &returns),
    };

    let range = DateRange::covering(&clean.iter().map(|d| d.date).collect::<Vec<_>>())?;
    Some(CorrelationReport {
        total_days: clean.len(),
        range,
        correlations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn sentiment(day: u32, polarity: f64) -> DailySentiment {
        DailySentiment {
            date: date(day),
            avg_polarity: polarity,
            std_polarity: 0.0,
            article_count: 1,
            avg_vader_compound: polarity / 2.0,
            std_vader_compound: 0.0,
            positive_ratio: if polarity > 0.5 { 1.0 } else { 0.0 },
        }
    }

    fn ret(day: u32, r: Option<f64>) -> DailyReturn {
        DailyReturn {
            date: date(day),
            close: Some(100.0),
            daily_return: r,
        }
    }

    #[test]
    fn inner_join_keeps_matching_dates_only() {
        let s = vec![sentiment(1, 0.1), sentiment(2, 0.2), sentiment(5, 0.5)];
        let r = vec![ret(2, Some(1.0)), ret(3, Some(2.0)), ret(5, None)];
        let combined = combine(&s, &r);
        assert_eq!(combined.len(), 2);
        assert_eq!(combined[0].date, date(2));
        assert_eq!(combined[1].date, date(5));
        assert!(combined[1].daily_return.is_none());
    }

    #[test]
    fn duplicate_return_dates_multiply_rows() {
        let s = vec![sentiment(1, 0.1)];
        let r = vec![ret(1, Some(1.0)), ret(1, Some(2.0))];
        assert_eq!(combine(&s, &r).len(), 2);
    }

    #[test]
    fn fewer_than_two_complete_rows_is_unavailable() {
        let s = vec![sentiment(1, 0.1), sentiment(2, 0.2)];
        let r = vec![ret(1, None), ret(2, Some(1.0))];
        assert!(compute_correlations(&combine(&s, &r)).is_none());
        assert!(compute_correlations(&[]).is_none());
    }

    #[test]
    fn summary_covers_retained_rows() {
        let s: Vec<_> = (1..=6).map(|d| sentiment(d, d as f64 / 10.0)).collect();
        let r = vec![
            ret(1, None),
            ret(2, Some(1.0)),
            ret(3, Some(-0.5)),
            ret(4, Some(2.0)),
            ret(5, Some(0.7)),
            ret(6, Some(3.0)),
        ];
        let report = compute_correlations(&combine(&s, &r)).unwrap();
        assert_eq!(report.total_days, 5);
        assert_eq!(report.range.start, date(2));
        assert_eq!(report.range.end, date(6));
        let c = report.correlations;
        assert!(c.pearson_polarity.is_some());
        assert!(c.spearman_vader.is_some());
        assert!(c.pearson_positive_ratio.is_some());
    }

    #[test]
    fn missing_positive_ratio_is_unavailable_not_zero() {
        let s: Vec<_> = (1..=4).map(|d| sentiment(d, d as f64 / 10.0)).collect();
        let r: Vec<_> = (1..=4).map(|d| ret(d, Some(d as f64))).collect();
        let mut combined = combine(&s, &r);
        for day in &mut combined {
            day.positive_ratio = None;
        }
        let report = compute_correlations(&combined).unwrap();
        assert!(report.correlations.pearson_positive_ratio.is_none());
        assert!(report.correlations.pearson_polarity.is_some());
    }

    #[test]
    fn entries_follow_report_order() {
        let labels: Vec<_> = CorrelationSet::default()
            .entries()
            .iter()
            .map(|(m, l, _)| (*m, *l))
            .collect();
        assert_eq!(labels[0], (Method::Pearson, "Polarity vs Returns"));
        assert_eq!(labels[4], (Method::Spearman, "VADER vs Returns"));
    }
}
