//! Plain-text correlation report.

use std::fmt::Write as _;

use sentcorr_core::correlation::{CorrelationReport, Method};
use sentcorr_core::stats::CorrelationStat;

const RULE_WIDTH: usize = 60;
const SECTION_WIDTH: usize = 40;
const LABEL_WIDTH: usize = 30;

pub const SIGNIFICANCE_LEGEND: &str = "Significance: *** p<0.001, ** p<0.01, * p<0.05";

/// One report row: `label : coef (p=…) stars`, or "Not available".
pub fn format_stat(label: &str, stat: Option<&CorrelationStat>) -> String {
    match stat {
        Some(s) => format!(
            "{label:<LABEL_WIDTH$}: {:7.4} (p={:.4}) {}",
            s.coefficient,
            s.p_value,
            s.stars()
        )
        .trim_end()
        .to_string(),
        None => format!("{label:<LABEL_WIDTH$}: Not available"),
    }
}

/// Render the report block printed after each ticker's analysis.
pub fn render_report(ticker: &str, report: &CorrelationReport) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let thin = "-".repeat(SECTION_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "\n{rule}");
    let _ = writeln!(out, "CORRELATION RESULTS: {ticker}");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Analysis Period: {}", report.range);
    let _ = writeln!(out, "Total Days Analyzed: {}", report.total_days);

    for (method, heading) in [
        (Method::Pearson, "PEARSON CORRELATIONS"),
        (Method::Spearman, "SPEARMAN CORRELATIONS"),
    ] {
        let _ = writeln!(out, "\n{heading}:");
        let _ = writeln!(out, "{thin}");
        for (m, label, stat) in report.correlations.entries() {
            if m == method {
                let _ = writeln!(out, "{}", format_stat(label, stat.as_ref()));
            }
        }
    }

    let _ = writeln!(out, "\n{SIGNIFICANCE_LEGEND}");
    let _ = writeln!(out, "{rule}");
    out
}

/// Shown in place of the report when no correlation could be computed.
pub fn render_unavailable(ticker: &str, complete_rows: usize) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!(
        "\n{rule}\nCORRELATION RESULTS: {ticker}\n{rule}\n\
         Correlations not available ({complete_rows} complete days)\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sentcorr_core::correlation::CorrelationSet;
    use sentcorr_core::domain::DateRange;

    fn report() -> CorrelationReport {
        CorrelationReport {
            total_days: 42,
            range: DateRange::new(
                NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
            )
            .unwrap(),
            correlations: CorrelationSet {
                pearson_polarity: Some(CorrelationStat {
                    coefficient: 0.31234,
                    p_value: 0.0041,
                }),
                pearson_vader: Some(CorrelationStat {
                    coefficient: -0.05,
                    p_value: 0.75,
                }),
                pearson_positive_ratio: None,
                spearman_polarity: Some(CorrelationStat {
                    coefficient: 0.9,
                    p_value: 0.00001,
                }),
                spearman_vader: None,
            },
        }
    }

    #[test]
    fn row_layout() {
        let stat = CorrelationStat {
            coefficient: 0.31234,
            p_value: 0.0041,
        };
        assert_eq!(
            format_stat("Polarity vs Returns", Some(&stat)),
            "Polarity vs Returns           :  0.3123 (p=0.0041) **"
        );
        assert_eq!(
            format_stat("Positive Ratio vs Returns", None),
            "Positive Ratio vs Returns     : Not available"
        );
    }

    #[test]
    fn insignificant_row_has_no_trailing_space() {
        let stat = CorrelationStat {
            coefficient: -0.05,
            p_value: 0.75,
        };
        assert!(format_stat("x", Some(&stat)).ends_with("(p=0.7500)"));
    }

    #[test]
    fn report_sections_in_order() {
        let text = render_report("AAPL", &report());
        let title = text.find("CORRELATION RESULTS: AAPL").unwrap();
        let pearson = text.find("PEARSON CORRELATIONS:").unwrap();
        let spearman = text.find("SPEARMAN CORRELATIONS:").unwrap();
        assert!(title < pearson && pearson < spearman);
        assert!(text.contains("Analysis Period: 2020-01-02 to 2020-03-01"));
        assert!(text.contains("Total Days Analyzed: 42"));
        assert!(text.contains(&"=".repeat(60)));
        assert!(text.contains("(p=0.0000) ***"));
        assert_eq!(text.matches("Not available").count(), 2);
        let legend = text.find(SIGNIFICANCE_LEGEND).unwrap();
        assert!(spearman < legend);
        assert!(text.trim_end().ends_with(&"=".repeat(60)));
    }
}
