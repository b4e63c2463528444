//! Statistical primitives: descriptive statistics, the Student-t distribution,
//! and Pearson/Spearman correlation.

pub mod correlation;
pub mod distribution;

pub use correlation::{pearson, rank_average, spearman, CorrelationStat};
pub use distribution::{t_cdf, t_two_sided_p};

/// Arithmetic mean, NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divisor n). A single value gives 0.0;
/// an empty slice gives NaN.
pub fn population_std(values: &[f64]) -> f64 {
    let m = mean(values);
    if m.is_nan() {
        return f64::NAN;
    }
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Round half away from zero to `dp` decimal places.
pub fn round_dp(value: f64, dp: i32) -> f64 {
    let scale = 10f64.powi(dp);
    (value * scale).round() / scale
}
