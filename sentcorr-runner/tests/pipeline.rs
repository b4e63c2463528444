//! Integration tests for the multi-ticker run on synthetic and hand-written
//! fixtures in temporary directories.

use chrono::NaiveDate;
use std::path::Path;

use sentcorr_core::data::DataError;
use sentcorr_runner::config::AnalysisConfig;
use sentcorr_runner::pipeline::{AnalysisError, Pipeline};
use sentcorr_runner::synthetic::write_demo_dataset;
use sentcorr_runner::run_analysis;

fn config_for(data: &Path, results: &Path, tickers: &[&str]) -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.paths.data_dir = Some(data.to_path_buf());
    config.paths.results_dir = results.to_path_buf();
    config.universe.tickers = tickers.iter().map(|t| t.to_string()).collect();
    config.analysis.render_charts = false;
    config
}

fn demo(dir: &Path, tickers: &[&str]) {
    let tickers: Vec<String> = tickers.iter().map(|t| t.to_string()).collect();
    write_demo_dataset(dir, &tickers, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 60).unwrap();
}

#[test]
fn demo_run_analyzes_every_ticker() {
    let data = tempfile::tempdir().unwrap();
    let results = tempfile::tempdir().unwrap();
    demo(data.path(), &["AAPL", "MSFT"]);

    let config = config_for(data.path(), results.path(), &["AAPL", "MSFT"]);
    let mut out = Vec::new();
    let summary = run_analysis(&config, &mut out).unwrap();

    assert!(summary.all_succeeded());
    assert_eq!(summary.succeeded(), vec!["AAPL", "MSFT"]);

    for analysis in &summary.analyses {
        let report = analysis.report.as_ref().unwrap();
        // The first aligned day has no prior close.
        assert_eq!(report.total_days, analysis.combined.len() - 1);
        assert!(report.correlations.pearson_polarity.is_some());
        assert!(analysis.results_csv.is_file());
        assert!(!analysis.news_fell_back);
    }

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("CORRELATION RESULTS: AAPL"));
    assert!(text.contains("CORRELATION RESULTS: MSFT"));

    let manifest = summary.manifest.unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(manifest).unwrap()).unwrap();
    assert_eq!(json["succeeded"], 2);
    assert_eq!(json["failed"], 0);
    assert_eq!(json["ratings_file"]["blake3"].as_str().unwrap().len(), 64);
}

#[test]
fn missing_price_file_skips_only_that_ticker() {
    let data = tempfile::tempdir().unwrap();
    let results = tempfile::tempdir().unwrap();
    demo(data.path(), &["AAPL"]);

    let config = config_for(data.path(), results.path(), &["NVDA", "AAPL"]);
    let summary = run_analysis(&config, &mut std::io::sink()).unwrap();

    assert_eq!(summary.succeeded(), vec!["AAPL"]);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, "NVDA");
    assert!(summary.failed[0].1.contains("file not found"));
    assert!(!results.path().join("NVDA_results.csv").exists());
}

#[test]
fn missing_news_table_aborts_the_run() {
    let data = tempfile::tempdir().unwrap();
    let results = tempfile::tempdir().unwrap();
    std::fs::write(data.path().join("AAPL.csv"), "Date,Close\n2024-01-02,1\n").unwrap();

    let config = config_for(data.path(), results.path(), &["AAPL"]);
    let err = run_analysis(&config, &mut std::io::sink()).unwrap_err();
    assert!(matches!(err, AnalysisError::Data(DataError::MissingFile { .. })));
}

#[test]
fn too_few_combined_days_is_insufficient_data() {
    let data = tempfile::tempdir().unwrap();
    let results = tempfile::tempdir().unwrap();
    std::fs::write(
        data.path().join("AAPL.csv"),
        "Date,Close\n2024-01-02,100\n2024-01-03,101\n2024-01-04,99\n",
    )
    .unwrap();
    std::fs::write(
        data.path().join("news.csv"),
        "date,headline,stock\n\
         2024-01-02,Great results,AAPL\n\
         2024-01-03,Weak outlook,AAPL\n\
         2024-01-04,Strong demand,AAPL\n",
    )
    .unwrap();

    let config = config_for(data.path(), results.path(), &["AAPL"]);
    let pipeline = Pipeline::with_data_dir(config, data.path().to_path_buf());
    let (_, news) = pipeline.load_news().unwrap();
    let err = pipeline
        .analyze_ticker("AAPL", &news, &mut std::io::sink())
        .unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::InsufficientData {
            found: 3,
            required: 5,
            ..
        }
    ));
}

#[test]
fn disjoint_dates_are_empty_alignment() {
    let data = tempfile::tempdir().unwrap();
    let results = tempfile::tempdir().unwrap();
    std::fs::write(data.path().join("AAPL.csv"), "Date,Close\n2024-01-02,100\n").unwrap();
    std::fs::write(
        data.path().join("raw_analyst_ratings.csv"),
        "date,headline,stock\n2023-05-01,Old news,AAPL\n",
    )
    .unwrap();

    let config = config_for(data.path(), results.path(), &["AAPL"]);
    let summary = run_analysis(&config, &mut std::io::sink()).unwrap();
    assert!(summary.analyses.is_empty());
    assert!(summary.failed[0].1.contains("no overlapping dates"));
}

#[test]
fn price_file_without_close_is_missing_column() {
    let data = tempfile::tempdir().unwrap();
    let results = tempfile::tempdir().unwrap();
    demo(data.path(), &["AAPL"]);
    std::fs::write(
        data.path().join("AAPL.csv"),
        "Date,Price\n2024-01-02,100\n2024-01-03,101\n",
    )
    .unwrap();

    let config = config_for(data.path(), results.path(), &["AAPL"]);
    let summary = run_analysis(&config, &mut std::io::sink()).unwrap();
    assert!(summary.failed[0].1.contains("no close column found"));
}

#[test]
fn charts_are_rendered_when_enabled() {
    let data = tempfile::tempdir().unwrap();
    let results = tempfile::tempdir().unwrap();
    demo(data.path(), &["META"]);

    let mut config = config_for(data.path(), results.path(), &["META"]);
    config.analysis.render_charts = true;
    let summary = run_analysis(&config, &mut std::io::sink()).unwrap();

    let analysis = &summary.analyses[0];
    let charts = analysis.charts.as_ref().unwrap();
    assert_eq!(charts.dashboard, results.path().join("META_dashboard.png"));
    assert!(charts.dashboard.is_file());
    assert!(results
        .path()
        .join("individual_plots/META/META_vader_vs_returns.png")
        .is_file());
    assert_eq!(
        analysis.technicals.as_deref(),
        Some(results.path().join("META_technicals.png").as_path())
    );
}

#[test]
fn chart_failure_does_not_abort_the_ticker() {
    let data = tempfile::tempdir().unwrap();
    let results = tempfile::tempdir().unwrap();
    demo(data.path(), &["META"]);
    // A regular file where the individual plot directory should go.
    std::fs::write(results.path().join("individual_plots"), "not a directory").unwrap();

    let mut config = config_for(data.path(), results.path(), &["META"]);
    config.analysis.render_charts = true;
    let summary = run_analysis(&config, &mut std::io::sink()).unwrap();

    assert!(summary.all_succeeded());
    let analysis = &summary.analyses[0];
    assert!(analysis.charts.is_none());
    assert!(analysis.report.is_some());
    assert!(analysis.results_csv.is_file());
    assert_eq!(analysis.results_csv, results.path().join("META_results.csv"));
}

#[test]
fn too_few_complete_days_reports_unavailable() {
    let data = tempfile::tempdir().unwrap();
    let results = tempfile::tempdir().unwrap();
    std::fs::write(
        data.path().join("AAPL.csv"),
        "Date,Close\n2024-01-02,100\n2024-01-03,102\n",
    )
    .unwrap();
    std::fs::write(
        data.path().join("raw_analyst_ratings.csv"),
        "date,headline,stock\n\
         2024-01-02,Great results,AAPL\n\
         2024-01-03,Weak outlook,AAPL\n",
    )
    .unwrap();

    let mut config = config_for(data.path(), results.path(), &["AAPL"]);
    config.analysis.min_combined_days = 2;
    let mut out = Vec::new();
    let summary = run_analysis(&config, &mut out).unwrap();

    assert!(summary.all_succeeded());
    let analysis = &summary.analyses[0];
    assert_eq!(analysis.combined.len(), 2);
    assert!(analysis.report.is_none());
    assert!(analysis.results_csv.is_file());

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("CORRELATION RESULTS: AAPL"));
    assert!(text.contains("Correlations not available (1 complete days)"));
}
