//! SentCorr Runner: configuration, per-ticker orchestration, reports and artifacts.
//!
//! This crate builds on `sentcorr-core` to provide:
//! - TOML configuration with data-directory discovery
//! - The per-ticker pipeline and the multi-ticker run with skip-and-continue
//! - Text correlation reports, PNG dashboards and technical charts
//! - Results CSV and the run manifest with input hashes
//! - A deterministic synthetic dataset for offline runs

pub mod config;
pub mod pipeline;
pub mod reporting;
pub mod synthetic;

pub use config::{AnalysisConfig, AnalysisSettings, ConfigError, PathsConfig, UniverseConfig};
pub use pipeline::{run_analysis, AnalysisError, Pipeline, RunSummary, TickerAnalysis};
pub use reporting::{ChartError, ExportError, RunManifest};
pub use synthetic::{write_demo_dataset, DemoDataset};
