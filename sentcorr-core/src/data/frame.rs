//! `DatedFrame`: a Polars table guaranteed to carry a `date` column of
//! Polars `Date` dtype with no nulls.
//!
//! Everything downstream of the loader reads through this wrapper, so column
//! extraction and date filtering go through one place.

use chrono::NaiveDate;
use polars::prelude::*;

use super::DataError;
use crate::domain::DateRange;

/// Name of the normalized date column.
pub const DATE_COLUMN: &str = "date";

/// A table with a normalized, null-free calendar-date column.
#[derive(Debug, Clone)]
pub struct DatedFrame {
    df: DataFrame,
}

impl DatedFrame {
    /// Wrap a DataFrame, validating the `date` column.
    pub fn new(df: DataFrame) -> Result<Self, DataError> {
        let column = df
            .column(DATE_COLUMN)
            .map_err(|_| DataError::MissingRequiredColumn {
                role: super::ColumnRole::Date,
                available: column_names(&df),
            })?;
        if column.dtype() != &DataType::Date {
            return Err(DataError::Frame(format!(
                "'{DATE_COLUMN}' column has dtype {}, expected date",
                column.dtype()
            )));
        }
        if column.null_count() > 0 {
            return Err(DataError::Frame(format!(
                "'{DATE_COLUMN}' column contains {} null values",
                column.null_count()
            )));
        }
        Ok(Self { df })
    }

    /// Build a frame from typed dates plus extra columns of equal length.
    pub fn from_columns(dates: &[NaiveDate], extra: Vec<Column>) -> Result<Self, DataError> {
        let mut columns = Vec::with_capacity(extra.len() + 1);
        columns.push(date_column(dates)?);
        columns.extend(extra);
        let df = DataFrame::new(columns).map_err(DataError::frame("dataframe creation"))?;
        Self::new(df)
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        column_names(&self.df)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.column(name).is_ok()
    }

    /// The date column as calendar dates, in row order.
    pub fn dates(&self) -> Result<Vec<NaiveDate>, DataError> {
        let column = self
            .df
            .column(DATE_COLUMN)
            .map_err(DataError::frame("date column"))?;
        let ca = column.date().map_err(DataError::frame("date column type"))?;

        (0..self.df.height())
            .map(|i| {
                let days = ca
                    .get(i)
                    .ok_or_else(|| DataError::Frame(format!("null date at row {i}")))?;
                from_epoch_days(days)
            })
            .collect()
    }

    /// `[min, max]` of the date column, `None` when the frame is empty.
    pub fn date_range(&self) -> Result<Option<DateRange>, DataError> {
        Ok(DateRange::covering(&self.dates()?))
    }

    /// Rows whose date lies in `range` (inclusive), original order preserved.
    pub fn filter_range(&self, range: &DateRange) -> Result<Self, DataError> {
        let mask: BooleanChunked = self
            .dates()?
            .into_iter()
            .map(|d| range.contains(d))
            .collect();
        self.filter_mask(&mask)
    }

    /// Keep the rows where `keep` is true.
    pub fn filter_rows(&self, keep: &[bool]) -> Result<Self, DataError> {
        if keep.len() != self.height() {
            return Err(DataError::Frame(format!(
                "row mask has {} entries for {} rows",
                keep.len(),
                self.height()
            )));
        }
        let mask: BooleanChunked = keep.iter().copied().collect();
        self.filter_mask(&mask)
    }

    fn filter_mask(&self, mask: &BooleanChunked) -> Result<Self, DataError> {
        let df = self.df.filter(mask).map_err(DataError::frame("filter"))?;
        Ok(Self { df })
    }

    /// Same schema, zero rows.
    pub fn empty(&self) -> Self {
        Self {
            df: self.df.clear(),
        }
    }

    /// Stable sort by date (equal dates keep their relative order).
    pub fn sorted_by_date(&self) -> Result<Self, DataError> {
        let df = self
            .df
            .clone()
            .lazy()
            .sort(
                [DATE_COLUMN],
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .collect()
            .map_err(DataError::frame("sort by date"))?;
        Ok(Self { df })
    }

    /// Numeric column as `f64` values; non-numeric cells read as missing.
    pub fn f64_column(&self, name: &str) -> Result<Vec<Option<f64>>, DataError> {
        let column = self.column(name)?;
        let cast = column
            .cast(&DataType::Float64)
            .map_err(DataError::frame("cast to f64"))?;
        let ca = cast.f64().map_err(DataError::frame("f64 column type"))?;
        Ok((0..ca.len()).map(|i| ca.get(i)).collect())
    }

    /// Column rendered as text; nulls read as `None`.
    pub fn text_column(&self, name: &str) -> Result<Vec<Option<String>>, DataError> {
        let column = self.column(name)?;
        let cast = column
            .cast(&DataType::String)
            .map_err(DataError::frame("cast to text"))?;
        let ca = cast.str().map_err(DataError::frame("text column type"))?;
        Ok((0..ca.len()).map(|i| ca.get(i).map(str::to_string)).collect())
    }

    /// Copy of the frame with `name` set to `values` (replacing any existing column).
    pub fn with_f64_column(&self, name: &str, values: Vec<Option<f64>>) -> Result<Self, DataError> {
        if values.len() != self.height() {
            return Err(DataError::Frame(format!(
                "column '{name}' has {} values for {} rows",
                values.len(),
                self.height()
            )));
        }
        let mut df = self.df.clone();
        df.with_column(Column::new(name.into(), values))
            .map_err(DataError::frame("add column"))?;
        Ok(Self { df })
    }

    fn column(&self, name: &str) -> Result<&Column, DataError> {
        self.df
            .column(name)
            .map_err(|_| DataError::Frame(format!("no column named '{name}'")))
    }
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

/// A Polars `Date` column built from calendar dates.
pub(crate) fn date_column(dates: &[NaiveDate]) -> Result<Column, DataError> {
    let days: Vec<i32> = dates.iter().map(|d| to_epoch_days(*d)).collect();
    Column::new(DATE_COLUMN.into(), days)
        .cast(&DataType::Date)
        .map_err(DataError::frame("date cast"))
}

// NaiveDate's default is 1970-01-01, the Polars Date epoch.
fn to_epoch_days(date: NaiveDate) -> i32 {
    (date - NaiveDate::default()).num_days() as i32
}

fn from_epoch_days(days: i32) -> Result<NaiveDate, DataError> {
    NaiveDate::default()
        .checked_add_signed(chrono::Duration::days(i64::from(days)))
        .ok_or_else(|| DataError::Frame(format!("date out of range: {days} days from epoch")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> DatedFrame {
        let dates = [d("2024-01-03"), d("2024-01-01"), d("2024-01-02")];
        let close = Column::new("close".into(), vec![Some(3.0), Some(1.0), None]);
        DatedFrame::from_columns(&dates, vec![close]).unwrap()
    }

    #[test]
    fn epoch_day_conversion_round_trips() {
        let date = d("2020-06-05");
        assert_eq!(from_epoch_days(to_epoch_days(date)).unwrap(), date);
        assert_eq!(to_epoch_days(d("1970-01-01")), 0);
    }

    #[test]
    fn rejects_frame_without_date() {
        let df = DataFrame::new(vec![Column::new("close".into(), vec![1.0f64])]).unwrap();
        let err = DatedFrame::new(df).unwrap_err();
        assert!(matches!(err, DataError::MissingRequiredColumn { .. }));
    }

    #[test]
    fn sort_and_range() {
        let frame = sample().sorted_by_date().unwrap();
        assert_eq!(
            frame.dates().unwrap(),
            vec![d("2024-01-01"), d("2024-01-02"), d("2024-01-03")]
        );
        assert_eq!(frame.f64_column("close").unwrap(), vec![Some(1.0), None, Some(3.0)]);

        let range = frame.date_range().unwrap().unwrap();
        assert_eq!(range.start, d("2024-01-01"));
        assert_eq!(range.end, d("2024-01-03"));
    }

    #[test]
    fn filter_range_is_inclusive() {
        let range = DateRange::new(d("2024-01-02"), d("2024-01-03")).unwrap();
        let filtered = sample().filter_range(&range).unwrap();
        assert_eq!(filtered.height(), 2);
        assert_eq!(filtered.dates().unwrap(), vec![d("2024-01-03"), d("2024-01-02")]);
    }

    #[test]
    fn empty_keeps_schema() {
        let empty = sample().empty();
        assert!(empty.is_empty());
        assert_eq!(empty.column_names(), vec!["date", "close"]);
        assert!(empty.date_range().unwrap().is_none());
    }

    #[test]
    fn with_column_rejects_length_mismatch() {
        assert!(sample().with_f64_column("x", vec![Some(1.0)]).is_err());
        let frame = sample()
            .with_f64_column("x", vec![Some(1.0), Some(2.0), None])
            .unwrap();
        assert!(frame.has_column("x"));
    }
}
