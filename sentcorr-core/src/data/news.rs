//! Per-ticker selection of news rows.

use super::columns::{ColumnMapping, ColumnRole};
use super::frame::DatedFrame;
use super::DataError;

/// News rows chosen for one ticker.
#[derive(Debug, Clone)]
pub struct TickerNews {
    pub frame: DatedFrame,
    /// True when no row matched the ticker and the full table is used instead.
    pub fell_back: bool,
}

/// Rows whose ticker column equals `ticker` (case-insensitive, trimmed).
///
/// Without a ticker column, or when nothing matches, the whole table is
/// returned and `fell_back` is set for the latter case.
pub fn select_ticker_news(
    news: &DatedFrame,
    columns: &ColumnMapping,
    ticker: &str,
) -> Result<TickerNews, DataError> {
    let Some(ticker_column) = columns.resolve_optional(ColumnRole::Ticker, &news.column_names())
    else {
        log::debug!("news table has no ticker column; using all {} rows", news.height());
        return Ok(TickerNews {
            frame: news.clone(),
            fell_back: false,
        });
    };

    let wanted = ticker.trim().to_lowercase();
    let keep: Vec<bool> = news
        .text_column(&ticker_column)?
        .iter()
        .map(|cell| {
            cell.as_deref()
                .is_some_and(|s| s.trim().to_lowercase() == wanted)
        })
        .collect();

    let matched = keep.iter().filter(|k| **k).count();
    if matched == 0 {
        log::warn!(
            "no news rows for {ticker} in column '{ticker_column}'; using all {} rows",
            news.height()
        );
        return Ok(TickerNews {
            frame: news.clone(),
            fell_back: true,
        });
    }

    log::info!("{ticker}: {matched} news rows");
    Ok(TickerNews {
        frame: news.filter_rows(&keep)?,
        fell_back: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use polars::prelude::*;

    fn news(stocks: &[&str]) -> DatedFrame {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let dates = vec![date; stocks.len()];
        let headlines: Vec<String> = (0..stocks.len()).map(|i| format!("headline {i}")).collect();
        DatedFrame::from_columns(
            &dates,
            vec![
                Column::new("headline".into(), headlines),
                Column::new("stock".into(), stocks.to_vec()),
            ],
        )
        .unwrap()
    }

    #[test]
    fn filters_case_insensitively() {
        let table = news(&["AAPL", "msft", "aapl", "GOOG"]);
        let selected = select_ticker_news(&table, &ColumnMapping::default(), "AAPL").unwrap();
        assert!(!selected.fell_back);
        assert_eq!(selected.frame.height(), 2);
    }

    #[test]
    fn falls_back_to_full_table() {
        let table = news(&["AAPL", "MSFT"]);
        let selected = select_ticker_news(&table, &ColumnMapping::default(), "NVDA").unwrap();
        assert!(selected.fell_back);
        assert_eq!(selected.frame.height(), 2);
    }

    #[test]
    fn missing_ticker_column_uses_everything() {
        let table = news(&["AAPL", "MSFT"]);
        let mapping = ColumnMapping {
            ticker: "symbol".into(),
            ..Default::default()
        };
        let selected = select_ticker_news(&table, &mapping, "AAPL").unwrap();
        assert!(!selected.fell_back);
        assert_eq!(selected.frame.height(), 2);
    }
}
