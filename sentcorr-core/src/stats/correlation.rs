//! Pearson and Spearman correlation with two-sided p-values.

use serde::{Deserialize, Serialize};

use super::distribution::t_two_sided_p;

/// A correlation coefficient and its two-sided p-value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationStat {
    pub coefficient: f64,
    pub p_value: f64,
}

impl CorrelationStat {
    /// Significance marker: `***` p<0.001, `**` p<0.01, `*` p<0.05.
    pub fn stars(&self) -> &'static str {
        match self.p_value {
            p if p < 0.001 => "***",
            p if p < 0.01 => "**",
            p if p < 0.05 => "*",
            _ => "",
        }
    }
}

/// Pearson product-moment correlation.
///
/// `None` when the slices differ in length, hold fewer than 2 pairs, contain
/// non-finite values, or either side has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<CorrelationStat> {
    let n = x.len();
    if n != y.len() || n < 2 {
        return None;
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return None;
    }

    let nf = n as f64;
    let mean_x = x.iter().sum::<f64>() / nf;
    let mean_y = y.iter().sum::<f64>() / nf;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }

    let r = (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0);
    Some(CorrelationStat {
        coefficient: r,
        p_value: correlation_p_value(r, n),
    })
}

/// Spearman rank correlation: Pearson over average ranks.
pub fn spearman(x: &[f64], y: &[f64]) -> Option<CorrelationStat> {
    if x.len() != y.len() || x.iter().chain(y).any(|v| !v.is_finite()) {
        return None;
    }
    pearson(&rank_average(x), &rank_average(y))
}

/// 1-based ranks; tied values share the mean of the ranks they span.
pub fn rank_average(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1..=end
        let shared = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = shared;
        }
        start = end;
    }
    ranks
}

/// Two-sided p-value for a sample correlation `r` over `n` pairs, using the
/// t statistic `r * sqrt((n - 2) / (1 - r^2))` with n - 2 degrees of freedom.
fn correlation_p_value(r: f64, n: usize) -> f64 {
    if n <= 2 {
        // Two points always lie on a line.
        return 1.0;
    }
    let df = (n - 2) as f64;
    let denom = 1.0 - r * r;
    if denom <= 0.0 {
        return 0.0;
    }
    t_two_sided_p(r * (df / denom).sqrt(), df)
}
