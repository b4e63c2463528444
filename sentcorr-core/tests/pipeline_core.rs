//! End-to-end tests of the core pipeline on small CSV fixtures written to a
//! temp directory: load → align → returns → sentiment → join → correlate.

use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use sentcorr_core::data::{align_dates, select_ticker_news, ColumnMapping, FrameLoader};
use sentcorr_core::domain::DailySentiment;
use sentcorr_core::{
    aggregate_daily, combine, compute_correlations, compute_daily_returns, SentimentAnalyzer,
};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn temp_dir() -> PathBuf {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("sentcorr_core_e2e_{}_{id}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn round4(v: f64) -> f64 {
    (v * 1e4).round() / 1e4
}

fn write_prices(dir: &std::path::Path, rows: &[(&str, f64)]) -> PathBuf {
    let mut csv = String::from("Date,Open,High,Low,Close,Volume\n");
    for (date, close) in rows {
        csv.push_str(&format!("{date},{close},{close},{close},{close},1000\n"));
    }
    let path = dir.join("AAPL.csv");
    std::fs::write(&path, csv).unwrap();
    path
}

fn sentiment_rows(dates: &[&str]) -> Vec<DailySentiment> {
    let polarity = [0.10, 0.40, -0.20, 0.55, 0.70, 0.05];
    dates
        .iter()
        .enumerate()
        .map(|(i, date)| DailySentiment {
            date: d(date),
            avg_polarity: polarity[i],
            std_polarity: 0.0,
            article_count: 1,
            avg_vader_compound: polarity[i] * 0.8 - 0.01 * i as f64,
            std_vader_compound: 0.0,
            positive_ratio: if polarity[i] > 0.5 { 1.0 } else { 0.0 },
        })
        .collect()
}

#[test]
fn five_day_example_returns_and_correlation() {
    let dir = temp_dir();
    let days = ["2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05", "2024-01-08"];
    let closes = [100.0, 102.0, 101.0, 105.0, 110.0];
    let rows: Vec<(&str, f64)> = days.iter().copied().zip(closes).collect();
    let path = write_prices(&dir, &rows);

    let mapping = ColumnMapping::default();
    let prices = FrameLoader::new(mapping.clone()).load(&path).unwrap();
    let priced = compute_daily_returns(&prices, &mapping).unwrap();
    let daily = priced.daily().unwrap();

    let returns: Vec<Option<f64>> = daily.iter().map(|r| r.daily_return.map(round4)).collect();
    assert_eq!(
        returns,
        vec![None, Some(2.0), Some(-0.9804), Some(3.9604), Some(4.7619)]
    );

    let combined = combine(&sentiment_rows(&days), &daily);
    assert_eq!(combined.len(), 5);

    // The first day has no return and is dropped before correlating.
    let report = compute_correlations(&combined).unwrap();
    assert_eq!(report.total_days, 4);
    assert_eq!(report.range.start, d("2024-01-03"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn five_complete_days_report_five_and_finite_coefficients() {
    let dir = temp_dir();
    // A prior close before the window gives every sentiment day a return.
    let rows = [
        ("2023-12-29", 98.0),
        ("2024-01-02", 100.0),
        ("2024-01-03", 102.0),
        ("2024-01-04", 101.0),
        ("2024-01-05", 105.0),
        ("2024-01-08", 110.0),
    ];
    let path = write_prices(&dir, &rows);

    let mapping = ColumnMapping::default();
    let prices = FrameLoader::new(mapping.clone()).load(&path).unwrap();
    let daily = compute_daily_returns(&prices, &mapping)
        .unwrap()
        .daily()
        .unwrap();

    let days = ["2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05", "2024-01-08"];
    let combined = combine(&sentiment_rows(&days), &daily);
    let report = compute_correlations(&combined).unwrap();

    assert_eq!(report.total_days, 5);
    assert_eq!(report.range.start, d("2024-01-02"));
    assert_eq!(report.range.end, d("2024-01-08"));

    let c = report.correlations;
    for stat in [c.pearson_polarity, c.spearman_polarity, c.pearson_vader, c.spearman_vader] {
        let stat = stat.expect("coefficient should be available");
        assert!(stat.coefficient.is_finite());
        assert!((-1.0..=1.0).contains(&stat.coefficient));
        assert!((0.0..=1.0).contains(&stat.p_value));
    }

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn news_and_prices_flow_through_alignment() {
    let dir = temp_dir();
    let prices_path = write_prices(
        &dir,
        &[
            ("2024-01-01", 10.0),
            ("2024-01-02", 11.0),
            ("2024-01-03", 12.0),
            ("2024-01-04", 11.5),
            ("2024-01-05", 12.5),
        ],
    );
    let news_path = dir.join("raw_analyst_ratings.csv");
    std::fs::write(
        &news_path,
        "headline,url,publisher,date,stock\n\
         Great quarter for Apple,u,p,2024-01-02 09:00:00-05:00,AAPL\n\
         Apple shares look weak,u,p,2024-01-03 10:00:00-05:00,AAPL\n\
         Excellent outlook,u,p,2024-01-04 11:00:00-05:00,aapl\n\
         Terrible miss,u,p,2024-01-05 12:00:00-05:00,AAPL\n\
         Microsoft news,u,p,2024-01-05 12:00:00-05:00,MSFT\n\
         Late story,u,p,2024-02-01 12:00:00-05:00,AAPL\n",
    )
    .unwrap();

    let mapping = ColumnMapping::default();
    let loader = FrameLoader::new(mapping.clone());
    let prices = loader.load(&prices_path).unwrap();
    let news = loader.load(&news_path).unwrap();

    let selected = select_ticker_news(&news, &mapping, "AAPL").unwrap();
    assert!(!selected.fell_back);
    assert_eq!(selected.frame.height(), 5);

    let aligned = align_dates(&selected.frame, &prices).unwrap();
    let range = aligned.range.unwrap();
    assert_eq!(range.start, d("2024-01-02"));
    assert_eq!(range.end, d("2024-01-05"));
    assert_eq!(aligned.left.height(), 4);
    assert_eq!(aligned.right.height(), 4);

    let returns = compute_daily_returns(&aligned.right, &mapping)
        .unwrap()
        .daily()
        .unwrap();
    let scored = SentimentAnalyzer::new()
        .score_frame(&aligned.left, &mapping)
        .unwrap();
    let daily = aggregate_daily(&scored);
    assert_eq!(daily.len(), 4);

    let combined = combine(&daily, &returns);
    assert_eq!(combined.len(), 4);
    let report = compute_correlations(&combined).unwrap();
    assert_eq!(report.total_days, 3);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn disjoint_dates_leave_nothing_to_analyze() {
    let dir = temp_dir();
    let prices_path = write_prices(&dir, &[("2024-01-01", 10.0), ("2024-01-02", 11.0)]);
    let news_path = dir.join("news.csv");
    std::fs::write(&news_path, "date,headline\n2023-06-01,Old news\n").unwrap();

    let loader = FrameLoader::default();
    let aligned = align_dates(
        &loader.load(&news_path).unwrap(),
        &loader.load(&prices_path).unwrap(),
    )
    .unwrap();
    assert!(aligned.is_empty());
    assert!(aligned.left.is_empty() && aligned.right.is_empty());

    let _ = std::fs::remove_dir_all(&dir);
}
