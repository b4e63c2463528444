//! CSV frame loader.
//!
//! Reads a CSV with Polars, lower-cases the header, resolves the date-bearing
//! column through the [`ColumnMapping`], parses it to calendar dates and drops
//! rows whose date does not parse. A failed load never yields a partial table.

use polars::prelude::*;
use std::path::{Path, PathBuf};

use super::columns::{ColumnMapping, ColumnRole};
use super::dates::parse_calendar_date;
use super::frame::{date_column, DatedFrame, DATE_COLUMN};
use super::DataError;

/// Rows sampled for CSV schema inference.
const INFER_SCHEMA_ROWS: usize = 10_000;

/// Loads dated tables from CSV files.
#[derive(Debug, Clone, Default)]
pub struct FrameLoader {
    columns: ColumnMapping,
}

impl FrameLoader {
    pub fn new(columns: ColumnMapping) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &ColumnMapping {
        &self.columns
    }

    /// Load `path` into a [`DatedFrame`].
    pub fn load(&self, path: &Path) -> Result<DatedFrame, DataError> {
        if !path.is_file() {
            return Err(DataError::MissingFile {
                path: path.to_path_buf(),
            });
        }

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .finish()
            .and_then(|lf| lf.collect())
            .map_err(|e| read_error(path, e))?;

        let frame = self.normalize(df, path)?;
        match frame.date_range()? {
            Some(range) => log::info!(
                "loaded {} rows from {} ({range})",
                frame.height(),
                path.display()
            ),
            None => log::info!("loaded empty table from {}", path.display()),
        }
        Ok(frame)
    }

    /// Lower-case the header and normalize the date column of an in-memory table.
    ///
    /// `origin` only labels errors and log lines.
    pub fn normalize(&self, mut df: DataFrame, origin: &Path) -> Result<DatedFrame, DataError> {
        let lowered: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_lowercase())
            .collect();
        df.set_column_names(lowered.iter().map(String::as_str))
            .map_err(|e| read_error(origin, e))?;

        let source = self.columns.resolve(ColumnRole::Date, &lowered)?;
        let raw = df
            .column(&source)
            .and_then(|c| c.cast(&DataType::String))
            .map_err(|e| read_error(origin, e))?;
        let raw = raw.str().map_err(|e| read_error(origin, e))?;

        let parsed: Vec<Option<chrono::NaiveDate>> = (0..raw.len())
            .map(|i| raw.get(i).and_then(parse_calendar_date))
            .collect();
        let valid = parsed.iter().filter(|d| d.is_some()).count();

        if valid == 0 && !parsed.is_empty() {
            return Err(DataError::UnparseableDate {
                path: origin.to_path_buf(),
                column: source,
            });
        }
        let dropped = parsed.len() - valid;
        if dropped > 0 {
            log::warn!(
                "{}: dropped {dropped} of {} rows with unparseable '{source}' values",
                origin.display(),
                parsed.len()
            );
        }

        let mask: BooleanChunked = parsed.iter().map(Option::is_some).collect();
        let mut df = df.filter(&mask).map_err(|e| read_error(origin, e))?;
        let dates: Vec<chrono::NaiveDate> = parsed.into_iter().flatten().collect();

        if source != DATE_COLUMN {
            df = df.drop(&source).map_err(|e| read_error(origin, e))?;
        }
        df.with_column(date_column(&dates)?)
            .map_err(|e| read_error(origin, e))?;

        DatedFrame::new(df)
    }
}

fn read_error(path: &Path, e: PolarsError) -> DataError {
    DataError::Read {
        path: PathBuf::from(path),
        reason: e.to_string(),
    }
}
