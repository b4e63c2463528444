//! SentCorr CLI: run the sentiment/return correlation analysis.
//!
//! Commands:
//! - `run`: analyze every configured ticker and write reports, charts and CSVs
//! - `score`: score a single headline with both sentiment models
//! - `config`: print the default configuration as TOML
//! - `demo`: write a deterministic synthetic dataset

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use sentcorr_core::sentiment::SentimentAnalyzer;
use sentcorr_runner::config::DEFAULT_TICKERS;
use sentcorr_runner::{write_demo_dataset, AnalysisConfig, Pipeline};

#[derive(Parser)]
#[command(
    name = "sentcorr",
    about = "SentCorr CLI: news sentiment vs. daily stock returns"
)]
struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Log warnings and errors only.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze every configured ticker.
    Run {
        /// Path to a TOML config file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Input directory (overrides the config and the directory search).
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Output directory for reports, charts and CSVs.
        #[arg(long)]
        results_dir: Option<PathBuf>,

        /// Comma-separated tickers (e.g., AAPL,MSFT).
        #[arg(long, value_delimiter = ',')]
        tickers: Option<Vec<String>>,

        /// Skip all chart rendering.
        #[arg(long, default_value_t = false)]
        no_charts: bool,

        /// Skip the technical-indicator chart.
        #[arg(long, default_value_t = false)]
        no_technicals: bool,
    },
    /// Score one headline and print every sentiment component.
    Score {
        text: String,

        /// Polarity above which the headline is labeled positive.
        #[arg(long, default_value_t = 0.5)]
        threshold: f64,
    },
    /// Print the default configuration as TOML.
    Config,
    /// Write a synthetic dataset for offline runs.
    Demo {
        /// Output directory.
        #[arg(long, default_value = "data")]
        out: PathBuf,

        /// First calendar date (YYYY-MM-DD).
        #[arg(long, default_value = "2023-01-02")]
        start: String,

        /// Calendar days to generate.
        #[arg(long, default_value_t = 365)]
        days: i64,

        /// Comma-separated tickers. Defaults to the standard universe.
        #[arg(long, value_delimiter = ',')]
        tickers: Option<Vec<String>>,
    },
}

fn init_logging(verbose: bool, quiet: bool) {
    let default = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Run {
            config,
            data_dir,
            results_dir,
            tickers,
            no_charts,
            no_technicals,
        } => run_cmd(config, data_dir, results_dir, tickers, no_charts, no_technicals),
        Commands::Score { text, threshold } => score_cmd(&text, threshold),
        Commands::Config => config_cmd(),
        Commands::Demo {
            out,
            start,
            days,
            tickers,
        } => demo_cmd(out, &start, days, tickers),
    }
}

fn run_cmd(
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    results_dir: Option<PathBuf>,
    tickers: Option<Vec<String>>,
    no_charts: bool,
    no_technicals: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => AnalysisConfig::from_file(&path)?,
        None => AnalysisConfig::default(),
    };

    if let Some(dir) = data_dir {
        config.paths.data_dir = Some(dir);
    }
    if let Some(dir) = results_dir {
        config.paths.results_dir = dir;
    }
    if let Some(tickers) = tickers {
        let tickers: Vec<String> = tickers
            .into_iter()
            .map(|t| t.trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .collect();
        if tickers.is_empty() {
            bail!("--tickers needs at least one symbol");
        }
        config.universe.tickers = tickers;
    }
    if no_charts {
        config.analysis.render_charts = false;
    }
    if no_technicals {
        config.analysis.technicals = false;
    }
    config.validate()?;

    let pipeline = Pipeline::new(config);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let summary = match pipeline.run(&mut out) {
        Ok(summary) => summary,
        Err(e) => {
            log::error!("failed to load news table: {e}");
            std::process::exit(1);
        }
    };

    writeln!(out)?;
    writeln!(out, "Analysis completed")?;
    writeln!(out, "Successful: {} tickers", summary.analyses.len())?;
    for (ticker, reason) in &summary.failed {
        writeln!(out, "Skipped {ticker}: {reason}")?;
    }
    writeln!(out, "Results saved in {}", summary.results_dir.display())?;
    Ok(())
}

fn score_cmd(text: &str, threshold: f64) -> Result<()> {
    let analyzer = SentimentAnalyzer::new().with_threshold(threshold);
    let scores = analyzer.score(Some(text));

    println!("Text:         {text}");
    println!("Polarity:     {:.4}", scores.polarity);
    println!("Subjectivity: {:.4}", scores.subjectivity);
    println!("Compound:     {:.4}", scores.compound);
    println!(
        "Pos/Neg/Neu:  {:.3} / {:.3} / {:.3}",
        scores.positive, scores.negative, scores.neutral
    );
    println!("Label:        {}", analyzer.label(&scores));
    Ok(())
}

fn config_cmd() -> Result<()> {
    print!("{}", AnalysisConfig::default().to_toml()?);
    Ok(())
}

fn demo_cmd(out: PathBuf, start: &str, days: i64, tickers: Option<Vec<String>>) -> Result<()> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d")
        .with_context(|| format!("invalid --start date '{start}'"))?;
    if days <= 0 {
        bail!("--days must be positive");
    }
    let tickers = tickers
        .unwrap_or_else(|| DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect());

    let demo = write_demo_dataset(&out, &tickers, start, days)?;
    println!(
        "Wrote {} price files and {} headlines to {}",
        demo.price_files.len(),
        demo.headlines,
        out.display()
    );
    Ok(())
}
