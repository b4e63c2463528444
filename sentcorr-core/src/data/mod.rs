//! Data ingestion: CSV loading, column discovery, date normalization, alignment.

pub mod align;
pub mod columns;
pub mod dates;
pub mod frame;
pub mod loader;
pub mod news;

pub use align::{align_dates, overlap, Alignment};
pub use columns::{ColumnMapping, ColumnRole};
pub use dates::parse_calendar_date;
pub use frame::DatedFrame;
pub use loader::FrameLoader;
pub use news::{select_ticker_news, TickerNews};

use std::path::PathBuf;
use thiserror::Error;

/// Structured error types for loading and reshaping tables.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("no parseable dates in column '{column}' of {}", path.display())]
    UnparseableDate { path: PathBuf, column: String },

    #[error("no {role} column found (available: {})", available.join(", "))]
    MissingRequiredColumn {
        role: ColumnRole,
        available: Vec<String>,
    },

    #[error("failed to read {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },

    #[error("frame error: {0}")]
    Frame(String),
}

impl DataError {
    /// Wrap a Polars error with a short description of the failed operation.
    pub(crate) fn frame(context: &str) -> impl Fn(polars::prelude::PolarsError) -> DataError + '_ {
        move |e| DataError::Frame(format!("{context}: {e}"))
    }
}
