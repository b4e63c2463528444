//! Deterministic synthetic dataset for offline runs and tests.
//!
//! Each ticker gets a weekday random-walk price file seeded from the BLAKE3
//! hash of its symbol. Headlines are drawn for the same days, leaning
//! positive on up days and negative on down days, so the demo run shows a
//! non-trivial correlation. These files are clearly fake.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::reporting::export::{ensure_dir, ExportError};

const POSITIVE_HEADLINES: &[&str] = &[
    "{} shares surge after excellent quarterly results",
    "Analysts upgrade {} on strong demand",
    "{} beats estimates with impressive growth",
    "{} announces great new product lineup",
    "Bullish outlook for {} as margins improve",
];

const NEGATIVE_HEADLINES: &[&str] = &[
    "{} shares fall after weak guidance",
    "Analysts downgrade {} citing poor sales",
    "{} misses estimates, outlook is bad",
    "{} faces terrible supply problems",
    "Bearish analysts warn of {} losses",
];

const NEUTRAL_HEADLINES: &[&str] = &[
    "{} to hold annual shareholder meeting",
    "{} files quarterly report",
    "Stocks to watch this week: {}",
];

/// What [`write_demo_dataset`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoDataset {
    pub price_files: Vec<PathBuf>,
    pub ratings_file: PathBuf,
    pub headlines: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PriceRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsRow {
    pub headline: String,
    pub url: String,
    pub publisher: String,
    pub date: String,
    pub stock: String,
}

fn rng_for(ticker: &str, salt: &str) -> StdRng {
    let seed = blake3::hash(format!("{salt}:{ticker}").as_bytes());
    StdRng::from_seed(*seed.as_bytes())
}

fn is_weekend(d: NaiveDate) -> bool {
    matches!(d.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Weekday random walk from 100.0, `days` calendar days from `start`.
pub fn synthetic_prices(ticker: &str, start: NaiveDate, days: i64) -> Vec<PriceRow> {
    let mut rng = rng_for(ticker, "prices");
    let mut price = 100.0_f64;
    let mut rows = Vec::new();

    for offset in 0..days {
        let date = start + Duration::days(offset);
        if is_weekend(date) {
            continue;
        }
        let change: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + change);
        rows.push(PriceRow {
            date,
            open,
            high: open.max(close) * (1.0 + rng.gen_range(0.0..0.01)),
            low: open.min(close) * (1.0 - rng.gen_range(0.0..0.01)),
            close,
            volume: rng.gen_range(500_000..5_000_000u64),
        });
        price = close;
    }
    rows
}

/// One to three headlines per trading day, tilted by the day's move.
pub fn synthetic_news(ticker: &str, prices: &[PriceRow]) -> Vec<NewsRow> {
    let mut rng = rng_for(ticker, "news");
    let mut rows = Vec::new();

    for (i, bar) in prices.iter().enumerate() {
        let up = i > 0 && bar.close >= prices[i - 1].close;
        for _ in 0..rng.gen_range(1..=3) {
            let pool = match rng.gen_range(0..10) {
                0 => NEUTRAL_HEADLINES,
                1 | 2 if up => NEGATIVE_HEADLINES,
                1 | 2 => POSITIVE_HEADLINES,
                _ if up => POSITIVE_HEADLINES,
                _ => NEGATIVE_HEADLINES,
            };
            let template = pool[rng.gen_range(0..pool.len())];
            let (hour, minute) = (rng.gen_range(6..20), rng.gen_range(0..60));
            rows.push(NewsRow {
                headline: template.replace("{}", ticker),
                url: format!("https://news.example.com/{}/{}", ticker.to_lowercase(), rows.len()),
                publisher: "Synthetic Wire".into(),
                date: format!("{} {hour:02}:{minute:02}:00-04:00", bar.date),
                stock: ticker.to_string(),
            });
        }
    }
    rows
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `<TICKER>.csv` per ticker plus `raw_analyst_ratings.csv` into `out_dir`.
pub fn write_demo_dataset(
    out_dir: &Path,
    tickers: &[String],
    start: NaiveDate,
    days: i64,
) -> Result<DemoDataset, ExportError> {
    ensure_dir(out_dir)?;
    let mut price_files = Vec::with_capacity(tickers.len());
    let mut news = Vec::new();

    for ticker in tickers {
        let prices = synthetic_prices(ticker, start, days);
        let path = out_dir.join(format!("{ticker}.csv"));
        write_csv(&path, &prices)?;
        news.extend(synthetic_news(ticker, &prices));
        price_files.push(path);
    }

    let ratings_file = out_dir.join("raw_analyst_ratings.csv");
    write_csv(&ratings_file, &news)?;
    log::info!(
        "wrote {} price files and {} headlines to {}",
        price_files.len(),
        news.len(),
        out_dir.display()
    );

    Ok(DemoDataset {
        price_files,
        ratings_file,
        headlines: news.len(),
    })
}
