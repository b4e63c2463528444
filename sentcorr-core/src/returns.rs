//! Day-over-day percentage returns from a close-price column.

use crate::data::{ColumnMapping, ColumnRole, DataError, DatedFrame};
use crate::domain::DailyReturn;

/// Name of the return column added to price frames.
pub const RETURN_COLUMN: &str = "daily_return";

/// A price table sorted by date, carrying a `daily_return` column.
#[derive(Debug, Clone)]
pub struct PriceReturns {
    pub frame: DatedFrame,
    /// The resolved close-price column.
    pub close_column: String,
}

impl PriceReturns {
    /// Typed per-day view of the table.
    pub fn daily(&self) -> Result<Vec<DailyReturn>, DataError> {
        let dates = self.frame.dates()?;
        let closes = self.frame.f64_column(&self.close_column)?;
        let returns = self.frame.f64_column(RETURN_COLUMN)?;

        Ok(dates
            .into_iter()
            .zip(closes)
            .zip(returns)
            .map(|((date, close), daily_return)| DailyReturn {
                date,
                close: close.filter(|c| c.is_finite()),
                daily_return: daily_return.filter(|r| r.is_finite()),
            })
            .collect())
    }

    pub fn closes(&self) -> Result<Vec<Option<f64>>, DataError> {
        self.frame.f64_column(&self.close_column)
    }
}

/// `(close[i] - close[i-1]) / close[i-1] * 100`.
///
/// The first entry is always missing. Any entry whose inputs are missing or
/// whose result is not finite (zero prior close, NaN) is missing as well.
pub fn pct_change(closes: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return out;
    }
    out.push(None);
    for pair in closes.windows(2) {
        let ret = match (pair[0], pair[1]) {
            (Some(prev), Some(cur)) => Some((cur - prev) / prev * 100.0),
            _ => None,
        };
        out.push(ret.filter(|r| r.is_finite()));
    }
    out
}

/// Resolve the close-price column of a price table and read it.
pub fn close_series(
    frame: &DatedFrame,
    columns: &ColumnMapping,
) -> Result<(String, Vec<Option<f64>>), DataError> {
    let name = columns.resolve(ColumnRole::Close, &frame.column_names())?;
    let values = frame.f64_column(&name)?;
    Ok((name, values))
}

/// Sort `prices` by date and append the `daily_return` column.
///
/// A table without a close-like column is a hard error for that ticker.
pub fn compute_daily_returns(
    prices: &DatedFrame,
    columns: &ColumnMapping,
) -> Result<PriceReturns, DataError> {
    let sorted = prices.sorted_by_date()?;
    let (close_column, closes) = close_series(&sorted, columns)?;
    let returns = pct_change(&closes);

    let missing = returns.iter().skip(1).filter(|r| r.is_none()).count();
    if missing > 0 {
        log::debug!("{missing} returns missing after the first row (zero or missing close)");
    }

    Ok(PriceReturns {
        frame: sorted.with_f64_column(RETURN_COLUMN, returns)?,
        close_column,
    })
}
