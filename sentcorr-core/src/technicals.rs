//! Technical indicators over a close-price series.
//!
//! Every indicator returns a series the same length as its input, NaN during
//! warm-up. A NaN inside the input taints every later value of the recursive
//! indicators (EMA, RSI, MACD); the SMA only loses the windows containing it.

/// A pure function from a close series to an indicator series.
pub trait Indicator: Send + Sync {
    /// Short name, e.g. `sma_20`.
    fn name(&self) -> &str;

    /// Leading values that are always NaN.
    fn lookback(&self) -> usize;

    fn compute(&self, closes: &[f64]) -> Vec<f64>;
}

/// Simple moving average over `period` closes.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    /// `period` of zero is treated as 1.
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let mut out = vec![f64::NAN; closes.len()];
        for (i, window) in closes.windows(self.period).enumerate() {
            out[i + self.period - 1] = window.iter().sum::<f64>() / self.period as f64;
        }
        out
    }
}

/// Exponential moving average, seeded with the SMA of the first `period` values.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        ema_series(closes, self.period)
    }
}

/// EMA of an arbitrary series; leading NaNs (e.g. another indicator's
/// warm-up) are skipped before seeding.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let period = period.max(1);
    let mut out = vec![f64::NAN; values.len()];
    let Some(first) = values.iter().position(|v| !v.is_nan()) else {
        return out;
    };
    let seed_end = first + period;
    if seed_end > values.len() {
        return out;
    }

    let seed_window = &values[first..seed_end];
    if seed_window.iter().any(|v| v.is_nan()) {
        return out;
    }
    let mut prev = seed_window.iter().sum::<f64>() / period as f64;
    out[seed_end - 1] = prev;

    let alpha = 2.0 / (period as f64 + 1.0);
    for i in seed_end..values.len() {
        if values[i].is_nan() {
            break;
        }
        prev = alpha * values[i] + (1.0 - alpha) * prev;
        out[i] = prev;
    }
    out
}

/// Relative strength index with Wilder smoothing.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let n = closes.len();
        let mut out = vec![f64::NAN; n];
        if n <= self.period {
            return out;
        }

        let change = |i: usize| closes[i] - closes[i - 1];
        let p = self.period as f64;

        let (mut gain, mut loss) = (0.0, 0.0);
        for i in 1..=self.period {
            let ch = change(i);
            if ch.is_nan() {
                return out;
            }
            gain += ch.max(0.0);
            loss += (-ch).max(0.0);
        }
        gain /= p;
        loss /= p;
        out[self.period] = rsi_value(gain, loss);

        for i in (self.period + 1)..n {
            let ch = change(i);
            if ch.is_nan() {
                break;
            }
            gain = (gain * (p - 1.0) + ch.max(0.0)) / p;
            loss = (loss * (p - 1.0) + (-ch).max(0.0)) / p;
            out[i] = rsi_value(gain, loss);
        }
        out
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    match (avg_gain == 0.0, avg_loss == 0.0) {
        (true, true) => 50.0,
        (_, true) => 100.0,
        (true, _) => 0.0,
        _ => 100.0 - 100.0 / (1.0 + avg_gain / avg_loss),
    }
}

/// Which MACD series an instance produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdSeries {
    Line,
    Signal,
    Histogram,
}

/// Moving average convergence/divergence: `EMA(fast) - EMA(slow)`, its
/// `signal`-period EMA, and their difference.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    series: MacdSeries,
    name: String,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize, series: MacdSeries) -> Self {
        let suffix = match series {
            MacdSeries::Line => "line",
            MacdSeries::Signal => "signal",
            MacdSeries::Histogram => "hist",
        };
        Self {
            fast: fast.max(1),
            slow: slow.max(1),
            signal: signal.max(1),
            series,
            name: format!("macd_{fast}_{slow}_{signal}_{suffix}"),
        }
    }

    /// The common 12/26/9 configuration.
    pub fn standard(series: MacdSeries) -> Self {
        Self::new(12, 26, 9, series)
    }

    /// `(line, signal, histogram)` in one pass.
    pub fn compute_all(&self, closes: &[f64]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let fast = ema_series(closes, self.fast);
        let slow = ema_series(closes, self.slow);
        let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema_series(&line, self.signal);
        let hist = line.iter().zip(&signal).map(|(l, s)| l - s).collect();
        (line, signal, hist)
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        let line = self.fast.max(self.slow) - 1;
        match self.series {
            MacdSeries::Line => line,
            MacdSeries::Signal | MacdSeries::Histogram => line + self.signal - 1,
        }
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let (line, signal, hist) = self.compute_all(closes);
        match self.series {
            MacdSeries::Line => line,
            MacdSeries::Signal => signal,
            MacdSeries::Histogram => hist,
        }
    }
}

/// The indicator set drawn on the technicals chart.
#[derive(Debug, Clone, PartialEq)]
pub struct TechnicalSeries {
    pub sma: Vec<f64>,
    pub ema: Vec<f64>,
    pub rsi: Vec<f64>,
    pub macd: Vec<f64>,
    pub macd_signal: Vec<f64>,
    pub macd_hist: Vec<f64>,
}

impl TechnicalSeries {
    /// SMA(20), EMA(20), RSI(14), MACD(12, 26, 9). Missing closes read as NaN.
    pub fn compute(closes: &[Option<f64>]) -> Self {
        let closes: Vec<f64> = closes.iter().map(|c| c.unwrap_or(f64::NAN)).collect();
        let (macd, macd_signal, macd_hist) =
            Macd::standard(MacdSeries::Line).compute_all(&closes);
        Self {
            sma: Sma::new(20).compute(&closes),
            ema: Ema::new(20).compute(&closes),
            rsi: Rsi::new(14).compute(&closes),
            macd,
            macd_signal,
            macd_hist,
        }
    }
}
