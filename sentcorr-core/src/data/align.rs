//! Date alignment of two dated tables.
//!
//! Both tables are restricted to the inclusive intersection of their date
//! ranges. Disjoint ranges (or an empty input) produce two empty tables;
//! callers treat that as "nothing to analyze", not as an error.

use super::frame::DatedFrame;
use super::DataError;
use crate::domain::DateRange;

/// Result of aligning two tables.
#[derive(Debug, Clone)]
pub struct Alignment {
    /// The common range, `None` when the inputs do not overlap.
    pub range: Option<DateRange>,
    pub left: DatedFrame,
    pub right: DatedFrame,
}

impl Alignment {
    /// True when there is nothing left to analyze on either side.
    pub fn is_empty(&self) -> bool {
        self.range.is_none() || self.left.is_empty() || self.right.is_empty()
    }
}

/// `[max(start_a, start_b), min(end_a, end_b)]`, `None` when that is inverted.
///
/// Symmetric in its arguments.
pub fn overlap(a: Option<DateRange>, b: Option<DateRange>) -> Option<DateRange> {
    a?.intersect(&b?)
}

/// Restrict `left` and `right` to their common date range.
pub fn align_dates(left: &DatedFrame, right: &DatedFrame) -> Result<Alignment, DataError> {
    let range = overlap(left.date_range()?, right.date_range()?);

    match range {
        Some(range) => {
            log::debug!("aligned date range {range}");
            Ok(Alignment {
                range: Some(range),
                left: left.filter_range(&range)?,
                right: right.filter_range(&range)?,
            })
        }
        None => {
            log::debug!("date ranges do not overlap");
            Ok(Alignment {
                range: None,
                left: left.empty(),
                right: right.empty(),
            })
        }
    }
}
