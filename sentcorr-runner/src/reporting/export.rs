//! Artifact export: per-ticker results CSV and the run manifest.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use sentcorr_core::correlation::CorrelationSet;
use sentcorr_core::domain::{CombinedDay, DateRange};

/// Bumped whenever the manifest layout changes.
pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

pub const MANIFEST_FILE: &str = "run_manifest.json";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> ExportError + '_ {
        move |source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Create `dir` and its parents; an existing directory is fine.
pub fn ensure_dir(dir: &Path) -> Result<(), ExportError> {
    std::fs::create_dir_all(dir).map_err(ExportError::io(dir))
}

// ── Results CSV ──────────────────────────────────────────────────────

/// CSV row; non-finite values become empty cells.
#[derive(Debug, Serialize)]
struct ResultRow {
    date: NaiveDate,
    avg_polarity: Option<f64>,
    std_polarity: Option<f64>,
    article_count: usize,
    avg_vader_compound: Option<f64>,
    std_vader_compound: Option<f64>,
    positive_ratio: Option<f64>,
    close: Option<f64>,
    daily_return: Option<f64>,
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

impl From<&CombinedDay> for ResultRow {
    fn from(d: &CombinedDay) -> Self {
        Self {
            date: d.date,
            avg_polarity: finite(d.avg_polarity),
            std_polarity: finite(d.std_polarity),
            article_count: d.article_count,
            avg_vader_compound: finite(d.avg_vader_compound),
            std_vader_compound: finite(d.std_vader_compound),
            positive_ratio: d.positive_ratio.and_then(finite),
            close: d.close.and_then(finite),
            daily_return: d.daily_return.and_then(finite),
        }
    }
}

pub fn results_path(results_dir: &Path, ticker: &str) -> PathBuf {
    results_dir.join(format!("{ticker}_results.csv"))
}

/// Write the combined daily table to `<results_dir>/<TICKER>_results.csv`.
pub fn write_results_csv(
    results_dir: &Path,
    ticker: &str,
    days: &[CombinedDay],
) -> Result<PathBuf, ExportError> {
    ensure_dir(results_dir)?;
    let path = results_path(results_dir, ticker);
    let mut wtr = csv::Writer::from_path(&path)?;
    for day in days {
        wtr.serialize(ResultRow::from(day))?;
    }
    wtr.flush().map_err(ExportError::io(&path))?;
    log::info!("results saved: {}", path.display());
    Ok(path)
}

// ── Manifest ─────────────────────────────────────────────────────────

/// An input file and its BLAKE3 digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileHash {
    pub path: PathBuf,
    pub blake3: String,
}

impl FileHash {
    pub fn of(path: &Path) -> Result<Self, ExportError> {
        let mut file = std::fs::File::open(path).map_err(ExportError::io(path))?;
        let mut hasher = blake3::Hasher::new();
        std::io::copy(&mut file, &mut hasher).map_err(ExportError::io(path))?;
        Ok(Self {
            path: path.to_path_buf(),
            blake3: hasher.finalize().to_hex().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TickerStatus {
    Success {
        combined_days: usize,
        /// Absent when fewer than two complete days remained.
        total_days: Option<usize>,
        range: Option<DateRange>,
        correlations: Option<CorrelationSet>,
    },
    Skipped {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerOutcome {
    pub ticker: String,
    pub price_file: Option<FileHash>,
    #[serde(flatten)]
    pub status: TickerStatus,
}

impl TickerOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self.status, TickerStatus::Success { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: u32,
    pub started_at: DateTime<Utc>,
    pub data_dir: PathBuf,
    pub ratings_file: FileHash,
    pub tickers: Vec<TickerOutcome>,
    pub succeeded: usize,
    pub failed: usize,
}

impl RunManifest {
    pub fn new(
        started_at: DateTime<Utc>,
        data_dir: PathBuf,
        ratings_file: FileHash,
        tickers: Vec<TickerOutcome>,
    ) -> Self {
        let succeeded = tickers.iter().filter(|t| t.succeeded()).count();
        Self {
            schema_version: MANIFEST_SCHEMA_VERSION,
            started_at,
            data_dir,
            ratings_file,
            failed: tickers.len() - succeeded,
            succeeded,
            tickers,
        }
    }
}

/// Write `run_manifest.json` into `results_dir`.
pub fn write_manifest(results_dir: &Path, manifest: &RunManifest) -> Result<PathBuf, ExportError> {
    ensure_dir(results_dir)?;
    let path = results_dir.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(&path, json).map_err(ExportError::io(&path))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32, ret: Option<f64>) -> CombinedDay {
        CombinedDay {
            date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
            avg_polarity: 0.25,
            std_polarity: 0.0,
            article_count: 2,
            avg_vader_compound: -0.1,
            std_vader_compound: 0.05,
            positive_ratio: Some(0.5),
            close: Some(101.5),
            daily_return: ret,
        }
    }

    #[test]
    fn results_csv_has_header_and_empty_missing_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_results_csv(dir.path(), "AAPL", &[day(2, None), day(3, Some(1.5))]).unwrap();
        assert_eq!(path, dir.path().join("AAPL_results.csv"));

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "date,avg_polarity,std_polarity,article_count,avg_vader_compound,\
             std_vader_compound,positive_ratio,close,daily_return"
        );
        assert_eq!(lines[1], "2024-01-02,0.25,0.0,2,-0.1,0.05,0.5,101.5,");
        assert_eq!(lines[2], "2024-01-03,0.25,0.0,2,-0.1,0.05,0.5,101.5,1.5");
    }

    #[test]
    fn nan_aggregate_is_written_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut d = day(2, Some(1.0));
        d.std_polarity = f64::NAN;
        let path = write_results_csv(dir.path(), "X", &[d]).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("2024-01-02,0.25,,2,"));
    }

    #[test]
    fn directory_creation_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn file_hash_is_content_addressed() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        std::fs::write(&a, "date,close\n2024-01-02,1\n").unwrap();
        std::fs::write(&b, "date,close\n2024-01-02,1\n").unwrap();
        let (ha, hb) = (FileHash::of(&a).unwrap(), FileHash::of(&b).unwrap());
        assert_eq!(ha.blake3, hb.blake3);
        assert_eq!(ha.blake3.len(), 64);

        std::fs::write(&b, "date,close\n2024-01-02,2\n").unwrap();
        assert_ne!(ha.blake3, FileHash::of(&b).unwrap().blake3);
    }

    #[test]
    fn manifest_tallies_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let news = dir.path().join("news.csv");
        std::fs::write(&news, "date,headline\n").unwrap();

        let outcomes = vec![
            TickerOutcome {
                ticker: "AAPL".into(),
                price_file: None,
                status: TickerStatus::Success {
                    combined_days: 7,
                    total_days: Some(6),
                    range: None,
                    correlations: Some(CorrelationSet::default()),
                },
            },
            TickerOutcome {
                ticker: "MSFT".into(),
                price_file: None,
                status: TickerStatus::Skipped {
                    reason: "file not found".into(),
                },
            },
        ];
        let manifest = RunManifest::new(
            Utc::now(),
            dir.path().to_path_buf(),
            FileHash::of(&news).unwrap(),
            outcomes,
        );
        assert_eq!((manifest.succeeded, manifest.failed), (1, 1));

        let path = write_manifest(dir.path(), &manifest).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(json["schema_version"], 1);
        assert_eq!(json["tickers"][0]["status"], "success");
        assert_eq!(json["tickers"][1]["status"], "skipped");
        assert_eq!(json["tickers"][1]["reason"], "file not found");
    }
}
