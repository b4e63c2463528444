//! Serializable analysis configuration.
//!
//! A run is fully described by an [`AnalysisConfig`]: where the inputs live,
//! which tickers to analyze, how columns are named, and the analysis knobs.
//! Every section has defaults, so an empty TOML file is a valid config.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use sentcorr_core::data::ColumnMapping;
use sentcorr_core::sentiment::DEFAULT_POSITIVE_THRESHOLD;

/// Environment variable that overrides the data-directory search.
pub const DATA_DIR_ENV: &str = "SENTCORR_DATA_DIR";

/// Tickers analyzed when none are configured.
pub const DEFAULT_TICKERS: &[&str] = &["AAPL", "AMZN", "GOOG", "META", "MSFT", "NVDA"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(String),

    #[error("failed to serialize config: {0}")]
    Serialize(String),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level configuration, one TOML table per section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub paths: PathsConfig,
    pub universe: UniverseConfig,
    pub columns: ColumnMapping,
    pub analysis: AnalysisSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Input directory; searched for when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub results_dir: PathBuf,
    /// Candidate news/ratings file names inside the data directory; the
    /// first that exists is used.
    pub ratings_files: Vec<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            results_dir: PathBuf::from("results"),
            ratings_files: vec!["raw_analyst_ratings.csv".into(), "news.csv".into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    pub tickers: Vec<String>,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            tickers: DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Joined rows a ticker needs before correlations are attempted.
    pub min_combined_days: usize,
    /// Polarity above which a headline counts as positive.
    pub positive_threshold: f64,
    pub render_charts: bool,
    /// Draw the technical-indicator chart alongside the dashboard.
    pub technicals: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            min_combined_days: 5,
            positive_threshold: DEFAULT_POSITIVE_THRESHOLD,
            render_charts: true,
            technicals: true,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string and validate it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.universe.tickers.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                field: "universe.tickers",
                reason: "ticker symbols must not be blank".into(),
            });
        }
        if !self.analysis.positive_threshold.is_finite() {
            return Err(ConfigError::Invalid {
                field: "analysis.positive_threshold",
                reason: format!("{} is not a finite number", self.analysis.positive_threshold),
            });
        }
        if self.paths.ratings_files.is_empty() {
            return Err(ConfigError::Invalid {
                field: "paths.ratings_files",
                reason: "at least one file name is required".into(),
            });
        }
        Ok(())
    }

    /// The configured data directory, or the first existing candidate of
    /// the search order.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.paths.data_dir {
            return dir.clone();
        }
        let candidates = data_dir_candidates(
            std::env::var_os(DATA_DIR_ENV).map(PathBuf::from),
            std::env::current_exe().ok(),
            std::env::current_dir().ok(),
        );
        match candidates.iter().find(|c| c.is_dir()) {
            Some(dir) => {
                log::debug!("using data directory {}", dir.display());
                dir.clone()
            }
            None => {
                log::warn!(
                    "no data directory found (searched {}); falling back to ./data",
                    candidates
                        .iter()
                        .map(|c| c.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                PathBuf::from("data")
            }
        }
    }

    /// First configured ratings file that exists under `data_dir`.
    pub fn ratings_path(&self, data_dir: &Path) -> Option<PathBuf> {
        self.paths
            .ratings_files
            .iter()
            .map(|name| data_dir.join(name))
            .find(|p| p.is_file())
    }

    /// `<data_dir>/<TICKER>.csv`.
    pub fn price_path(data_dir: &Path, ticker: &str) -> PathBuf {
        data_dir.join(format!("{ticker}.csv"))
    }
}

/// Data-directory candidates in search order.
pub fn data_dir_candidates(
    env_override: Option<PathBuf>,
    exe: Option<PathBuf>,
    cwd: Option<PathBuf>,
) -> Vec<PathBuf> {
    let mut out = Vec::new();
    out.extend(env_override);
    out.push(PathBuf::from("data"));
    out.push(PathBuf::from("../data"));
    if let Some(exe_dir) = exe.as_deref().and_then(Path::parent) {
        out.push(exe_dir.join("..").join("data"));
    }
    if let Some(cwd) = cwd {
        out.push(cwd.join("data"));
    }
    out
}
