//! Per-ticker analysis and the multi-ticker run.
//!
//! A run loads the shared news table once, then takes each ticker through:
//! load prices → select news → align dates → returns → score and aggregate
//! sentiment → join → size check → correlations → report → charts → CSV.
//!
//! A failure inside one ticker is logged and that ticker is skipped. Only a
//! news table that cannot be loaded aborts the run.

use chrono::Utc;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use sentcorr_core::correlation::{combine, compute_correlations, CorrelationReport};
use sentcorr_core::data::{
    align_dates, select_ticker_news, DataError, DatedFrame, FrameLoader,
};
use sentcorr_core::domain::CombinedDay;
use sentcorr_core::returns::{close_series, compute_daily_returns};
use sentcorr_core::sentiment::{aggregate_daily, SentimentAnalyzer};

use crate::config::{AnalysisConfig, ConfigError};
use crate::reporting::charts::{render_dashboard, render_technicals, ChartError, ChartPaths};
use crate::reporting::export::{
    write_manifest, write_results_csv, ExportError, FileHash, RunManifest, TickerOutcome,
    TickerStatus,
};
use crate::reporting::text::{render_report, render_unavailable};

/// Errors from a single ticker's analysis or from the run as a whole.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Missing file, unparseable dates or a missing required column.
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("no overlapping dates between news and prices for {ticker}")]
    EmptyAlignment { ticker: String },

    #[error("insufficient {stage}: {found} (need at least {required})")]
    InsufficientData {
        stage: &'static str,
        found: usize,
        required: usize,
    },

    #[error("render failure: {0}")]
    RenderFailure(String),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("export error: {0}")]
    Export(#[from] ExportError),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ChartError> for AnalysisError {
    fn from(e: ChartError) -> Self {
        AnalysisError::RenderFailure(e.0)
    }
}

/// Everything produced for one ticker.
#[derive(Debug, Clone)]
pub struct TickerAnalysis {
    pub ticker: String,
    pub price_file: PathBuf,
    /// News rows used after the ticker filter (before alignment).
    pub news_rows: usize,
    /// True when no news row carried the ticker and the full table was used.
    pub news_fell_back: bool,
    pub combined: Vec<CombinedDay>,
    /// `None` when fewer than two complete days remained.
    pub report: Option<CorrelationReport>,
    pub charts: Option<ChartPaths>,
    pub technicals: Option<PathBuf>,
    pub results_csv: PathBuf,
}

impl TickerAnalysis {
    fn status(&self) -> TickerStatus {
        TickerStatus::Success {
            combined_days: self.combined.len(),
            total_days: self.report.as_ref().map(|r| r.total_days),
            range: self.report.as_ref().map(|r| r.range),
            correlations: self.report.as_ref().map(|r| r.correlations),
        }
    }
}

/// End-of-run tally.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub analyses: Vec<TickerAnalysis>,
    /// `(ticker, reason)` for each skipped ticker.
    pub failed: Vec<(String, String)>,
    pub manifest: Option<PathBuf>,
    pub results_dir: PathBuf,
}

impl RunSummary {
    pub fn succeeded(&self) -> Vec<&str> {
        self.analyses.iter().map(|a| a.ticker.as_str()).collect()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A configured pipeline bound to a data directory.
#[derive(Debug)]
pub struct Pipeline {
    config: AnalysisConfig,
    data_dir: PathBuf,
    loader: FrameLoader,
    sentiment: SentimentAnalyzer,
}

impl Pipeline {
    /// Build a pipeline, resolving the data directory from the config.
    pub fn new(config: AnalysisConfig) -> Self {
        let data_dir = config.resolve_data_dir();
        Self::with_data_dir(config, data_dir)
    }

    pub fn with_data_dir(config: AnalysisConfig, data_dir: PathBuf) -> Self {
        let loader = FrameLoader::new(config.columns.clone());
        let sentiment =
            SentimentAnalyzer::new().with_threshold(config.analysis.positive_threshold);
        Self {
            config,
            data_dir,
            loader,
            sentiment,
        }
    }

    /// Toggle record-level parallel scoring (enabled by default).
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.sentiment = self.sentiment.with_parallelism(parallel);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn results_dir(&self) -> &Path {
        &self.config.paths.results_dir
    }

    /// Locate and load the shared news table.
    pub fn load_news(&self) -> Result<(PathBuf, DatedFrame), AnalysisError> {
        let path = self.config.ratings_path(&self.data_dir).ok_or_else(|| {
            DataError::MissingFile {
                path: self.data_dir.join(
                    self.config
                        .paths
                        .ratings_files
                        .first()
                        .map(String::as_str)
                        .unwrap_or("raw_analyst_ratings.csv"),
                ),
            }
        })?;
        let news = self.loader.load(&path)?;
        Ok((path, news))
    }

    /// Run the full per-ticker pipeline, writing the text report to `out`.
    pub fn analyze_ticker(
        &self,
        ticker: &str,
        news: &DatedFrame,
        out: &mut impl Write,
    ) -> Result<TickerAnalysis, AnalysisError> {
        let columns = &self.config.columns;
        let settings = &self.config.analysis;

        let price_file = AnalysisConfig::price_path(&self.data_dir, ticker);
        let prices = self.loader.load(&price_file)?;

        let selected = select_ticker_news(news, columns, ticker)?;
        log::info!("{ticker}: using {} news rows", selected.frame.height());

        let aligned = align_dates(&selected.frame, &prices)?;
        if aligned.is_empty() {
            return Err(AnalysisError::EmptyAlignment {
                ticker: ticker.to_string(),
            });
        }

        let returns = compute_daily_returns(&aligned.right, columns)?.daily()?;
        let scored = self.sentiment.score_frame(&aligned.left, columns)?;
        let daily = aggregate_daily(&scored);
        log::info!("{ticker}: aggregated sentiment for {} days", daily.len());

        let combined = combine(&daily, &returns);
        if combined.len() < settings.min_combined_days {
            return Err(AnalysisError::InsufficientData {
                stage: "combined days",
                found: combined.len(),
                required: settings.min_combined_days,
            });
        }

        let report = compute_correlations(&combined);
        let text = match &report {
            Some(r) => render_report(ticker, r),
            None => render_unavailable(
                ticker,
                combined.iter().filter(|d| d.is_complete()).count(),
            ),
        };
        out.write_all(text.as_bytes())?;

        let charts = if settings.render_charts {
            self.render_charts(ticker, &combined)
        } else {
            None
        };
        let technicals = if settings.render_charts && settings.technicals {
            self.render_technicals(ticker, &prices)
        } else {
            None
        };

        let results_csv = write_results_csv(self.results_dir(), ticker, &combined)?;

        Ok(TickerAnalysis {
            ticker: ticker.to_string(),
            price_file,
            news_rows: selected.frame.height(),
            news_fell_back: selected.fell_back,
            combined,
            report,
            charts,
            technicals,
            results_csv,
        })
    }

    /// Render failures are logged, never propagated.
    fn render_charts(&self, ticker: &str, combined: &[CombinedDay]) -> Option<ChartPaths> {
        match render_dashboard(combined, ticker, self.results_dir()) {
            Ok(paths) => paths,
            Err(e) => {
                log::warn!("{ticker}: {}", AnalysisError::from(e));
                None
            }
        }
    }

    fn render_technicals(&self, ticker: &str, prices: &DatedFrame) -> Option<PathBuf> {
        let closes = prices
            .sorted_by_date()
            .and_then(|sorted| close_series(&sorted, &self.config.columns));
        let rendered = match closes {
            Ok((_, closes)) => render_technicals(&closes, ticker, self.results_dir())
                .map_err(AnalysisError::from),
            Err(e) => Err(AnalysisError::from(e)),
        };
        match rendered {
            Ok(path) => path,
            Err(e) => {
                log::warn!("{ticker}: technicals chart skipped: {e}");
                None
            }
        }
    }

    /// Analyze every configured ticker in order.
    ///
    /// Fails only when the news table cannot be loaded.
    pub fn run(&self, out: &mut impl Write) -> Result<RunSummary, AnalysisError> {
        let started_at = Utc::now();
        let (news_path, news) = self.load_news()?;
        let tickers = &self.config.universe.tickers;
        log::info!(
            "analyzing {} tickers with {} news rows from {}",
            tickers.len(),
            news.height(),
            news_path.display()
        );

        let mut analyses = Vec::new();
        let mut failed = Vec::new();
        let mut outcomes = Vec::with_capacity(tickers.len());

        for ticker in tickers {
            log::info!("analyzing {ticker}");
            let price_file = FileHash::of(&AnalysisConfig::price_path(&self.data_dir, ticker)).ok();
            match self.analyze_ticker(ticker, &news, out) {
                Ok(analysis) => {
                    outcomes.push(TickerOutcome {
                        ticker: ticker.clone(),
                        price_file,
                        status: analysis.status(),
                    });
                    analyses.push(analysis);
                }
                Err(e) => {
                    log::warn!("skipping {ticker}: {e}");
                    outcomes.push(TickerOutcome {
                        ticker: ticker.clone(),
                        price_file,
                        status: TickerStatus::Skipped {
                            reason: e.to_string(),
                        },
                    });
                    failed.push((ticker.clone(), e.to_string()));
                }
            }
        }

        let manifest = FileHash::of(&news_path)
            .map(|ratings| {
                RunManifest::new(started_at, self.data_dir.clone(), ratings, outcomes)
            })
            .and_then(|m| write_manifest(self.results_dir(), &m));
        let manifest = match manifest {
            Ok(path) => Some(path),
            Err(e) => {
                log::warn!("run manifest not written: {e}");
                None
            }
        };

        log::info!(
            "analysis complete: {} succeeded, {} skipped",
            analyses.len(),
            failed.len()
        );

        Ok(RunSummary {
            analyses,
            failed,
            manifest,
            results_dir: self.results_dir().to_path_buf(),
        })
    }
}

/// Run the whole analysis described by `config`, writing reports to `out`.
pub fn run_analysis(
    config: &AnalysisConfig,
    out: &mut impl Write,
) -> Result<RunSummary, AnalysisError> {
    Pipeline::new(config.clone()).run(out)
}
