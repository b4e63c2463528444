//! Domain types: calendar-date ranges and the per-day records the pipeline produces.

pub mod daily;
pub mod sentiment;

pub use daily::{CombinedDay, DailyReturn, DailySentiment};
pub use sentiment::{ScoredHeadline, SentimentLabel, SentimentScores};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Anything keyed by a calendar date (no time of day, no timezone).
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for NaiveDate {
    fn date(&self) -> NaiveDate {
        *self
    }
}

/// Inclusive calendar-date range. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, or `None` when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Smallest range covering every item, `None` for an empty slice.
    pub fn covering<T: Dated>(items: &[T]) -> Option<Self> {
        let start = items.iter().map(Dated::date).min()?;
        let end = items.iter().map(Dated::date).max()?;
        Some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Common sub-range of two ranges: `[max(starts), min(ends)]`.
    pub fn intersect(&self, other: &DateRange) -> Option<DateRange> {
        DateRange::new(self.start.max(other.start), self.end.min(other.end))
    }

    /// Number of calendar days in the range, both ends included.
    pub fn calendar_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
