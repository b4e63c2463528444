//! PNG charts: the per-ticker dashboard, individual scatter plots and the
//! technical-indicator chart.
//!
//! Everything is drawn with the plotters bitmap backend. Text (captions,
//! axis labels, the `r = …` annotation) uses the bundled DejaVu Sans face,
//! registered on first render; the `ttf` feature switches to system fonts.

use chrono::{Duration, NaiveDate};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::register_font;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Once;

use sentcorr_core::domain::CombinedDay;
use sentcorr_core::stats::{mean, pearson};
use sentcorr_core::technicals::TechnicalSeries;

use super::export::ensure_dir;

const DASHBOARD_SIZE: (u32, u32) = (1500, 1200);
const SCATTER_SIZE: (u32, u32) = (1000, 600);
const TECHNICALS_SIZE: (u32, u32) = (1400, 1400);
const HISTOGRAM_BINS: usize = 15;
const FONT: &str = "sans-serif";
const FONT_BYTES: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

const ORANGE: RGBColor = RGBColor(255, 140, 0);
const GREY: RGBColor = RGBColor(128, 128, 128);
const DARK_GREEN: RGBColor = RGBColor(0, 128, 0);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("chart rendering failed: {0}")]
pub struct ChartError(pub String);

fn chart_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError(e.to_string())
}

/// Register the bundled face under [`FONT`]. Safe to call repeatedly.
fn register_fonts() {
    static REGISTER: Once = Once::new();
    REGISTER.call_once(|| {
        if register_font(FONT, FontStyle::Normal, FONT_BYTES).is_err() {
            log::warn!("bundled chart font is invalid; charts will have no text");
        }
    });
}

/// Rows with polarity, compound score and return all present.
#[derive(Debug, Clone, Default)]
pub struct PlotData {
    pub dates: Vec<NaiveDate>,
    pub polarity: Vec<f64>,
    pub compound: Vec<f64>,
    pub returns: Vec<f64>,
}

impl PlotData {
    pub fn from_days(days: &[CombinedDay]) -> Self {
        let mut out = Self::default();
        for d in days.iter().filter(|d| d.is_complete()) {
            if let Some(r) = d.daily_return {
                out.dates.push(d.date);
                out.polarity.push(d.avg_polarity);
                out.compound.push(d.avg_vader_compound);
                out.returns.push(r);
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

struct ScatterStyle<'a> {
    title: &'a str,
    x_label: &'a str,
    color: RGBColor,
}

/// Files written by [`render_dashboard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPaths {
    pub dashboard: PathBuf,
    pub individual: Vec<PathBuf>,
}

/// Render `<TICKER>_dashboard.png` and the individual scatter plots.
///
/// Returns `Ok(None)` when fewer than two plottable rows exist.
pub fn render_dashboard(
    days: &[CombinedDay],
    ticker: &str,
    results_dir: &Path,
) -> Result<Option<ChartPaths>, ChartError> {
    let data = PlotData::from_days(days);
    if data.len() < 2 {
        log::warn!("insufficient data for {ticker} dashboard ({} rows)", data.len());
        return Ok(None);
    }
    ensure_dir(results_dir).map_err(chart_err)?;
    register_fonts();

    let dashboard = results_dir.join(format!("{ticker}_dashboard.png"));
    {
        let root = BitMapBackend::new(&dashboard, DASHBOARD_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;
        let root = root
            .titled(
                &format!("News Sentiment vs Stock Returns: {ticker}"),
                (FONT, 32),
            )
            .map_err(chart_err)?;
        let panels = root.split_evenly((2, 2));

        scatter_panel(
            &panels[0],
            &data.polarity,
            &data.returns,
            &ScatterStyle {
                title: "Polarity vs Returns",
                x_label: "Sentiment Polarity",
                color: BLUE,
            },
        )?;
        scatter_panel(
            &panels[1],
            &data.compound,
            &data.returns,
            &ScatterStyle {
                title: "VADER Sentiment vs Returns",
                x_label: "VADER Compound Score",
                color: ORANGE,
            },
        )?;
        timeline_panel(&panels[2], &data, ticker)?;
        histogram_panel(&panels[3], &data.polarity, ticker)?;
        root.present().map_err(chart_err)?;
    }
    log::info!("dashboard saved: {}", dashboard.display());

    let plot_dir = results_dir.join("individual_plots").join(ticker);
    ensure_dir(&plot_dir).map_err(chart_err)?;
    let individual = vec![
        render_scatter(
            &plot_dir.join(format!("{ticker}_polarity_vs_returns.png")),
            &data.polarity,
            &data.returns,
            &ScatterStyle {
                title: &format!("{ticker}: Polarity vs Returns"),
                x_label: "Sentiment Polarity",
                color: BLUE,
            },
        )?,
        render_scatter(
            &plot_dir.join(format!("{ticker}_vader_vs_returns.png")),
            &data.compound,
            &data.returns,
            &ScatterStyle {
                title: &format!("{ticker}: VADER Sentiment vs Returns"),
                x_label: "VADER Compound Score",
                color: ORANGE,
            },
        )?,
    ];

    Ok(Some(ChartPaths {
        dashboard,
        individual,
    }))
}

fn render_scatter(
    path: &Path,
    xs: &[f64],
    ys: &[f64],
    style: &ScatterStyle<'_>,
) -> Result<PathBuf, ChartError> {
    let root = BitMapBackend::new(path, SCATTER_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    scatter_panel(&root, xs, ys, style)?;
    root.present().map_err(chart_err)?;
    Ok(path.to_path_buf())
}

/// Scatter with a least-squares trend line and the Pearson `r` annotation.
fn scatter_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    xs: &[f64],
    ys: &[f64],
    style: &ScatterStyle<'_>,
) -> Result<(), ChartError>
where
    DB: DrawingBackend,
{
    let x_range = padded_range(xs);
    let y_range = padded_range(ys);

    let mut chart = ChartBuilder::on(area)
        .caption(style.title, (FONT, 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(x_range.clone(), y_range.clone())
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc(style.x_label)
        .y_desc("Daily Return (%)")
        .light_line_style(BLACK.mix(0.05).stroke_width(1))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(
            xs.iter()
                .zip(ys)
                .map(|(x, y)| Circle::new((*x, *y), 4, style.color.mix(0.6).filled())),
        )
        .map_err(chart_err)?;

    if let Some((slope, intercept)) = least_squares(xs, ys) {
        let line = [x_range.start, x_range.end].map(|x| (x, slope * x + intercept));
        chart
            .draw_series(LineSeries::new(line, RED.mix(0.8).stroke_width(2)))
            .map_err(chart_err)?;
    }

    if let Some(stat) = pearson(xs, ys) {
        let at = (
            x_range.start + 0.05 * (x_range.end - x_range.start),
            y_range.end - 0.08 * (y_range.end - y_range.start),
        );
        chart
            .draw_series(std::iter::once(Text::new(
                format!("r = {:.3}", stat.coefficient),
                at,
                (FONT, 18),
            )))
            .map_err(chart_err)?;
    }
    Ok(())
}

/// Polarity on the left axis, return on the right, against time.
fn timeline_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    data: &PlotData,
    ticker: &str,
) -> Result<(), ChartError>
where
    DB: DrawingBackend,
{
    let Some(&first) = data.dates.first() else {
        return Ok(());
    };
    let offsets: Vec<f64> = data
        .dates
        .iter()
        .map(|d| (*d - first).num_days() as f64)
        .collect();
    let x_range = padded_range(&offsets);
    let label_date = |x: &f64| (first + Duration::days(x.round() as i64)).to_string();

    let mut chart = ChartBuilder::on(area)
        .caption(format!("{ticker}: Timeline"), (FONT, 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .right_y_label_area_size(55)
        .build_cartesian_2d(x_range.clone(), padded_range(&data.polarity))
        .map_err(chart_err)?
        .set_secondary_coord(x_range, padded_range(&data.returns));

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Sentiment Polarity")
        .x_label_formatter(&label_date)
        .x_labels(6)
        .light_line_style(BLACK.mix(0.05).stroke_width(1))
        .draw()
        .map_err(chart_err)?;
    chart
        .configure_secondary_axes()
        .y_desc("Daily Return (%)")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(
            offsets.iter().copied().zip(data.polarity.iter().copied()),
            DARK_GREEN.stroke_width(2),
        ))
        .map_err(chart_err)?
        .label("Sentiment")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], DARK_GREEN.stroke_width(2)));
    chart
        .draw_secondary_series(LineSeries::new(
            offsets.iter().copied().zip(data.returns.iter().copied()),
            BLUE.mix(0.7).stroke_width(1),
        ))
        .map_err(chart_err)?
        .label("Returns")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(1)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8).filled())
        .border_style(BLACK.stroke_width(1))
        .draw()
        .map_err(chart_err)?;
    Ok(())
}

fn histogram_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    values: &[f64],
    ticker: &str,
) -> Result<(), ChartError>
where
    DB: DrawingBackend,
{
    let x_range = padded_range(values);
    let bins = histogram(values, x_range.clone(), HISTOGRAM_BINS);
    let peak = bins.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1) as f64;

    let mut chart = ChartBuilder::on(area)
        .caption(format!("{ticker}: Distributions"), (FONT, 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(x_range, 0.0..peak * 1.1)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("Sentiment Polarity")
        .y_desc("Frequency")
        .light_line_style(BLACK.mix(0.05).stroke_width(1))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(bins.iter().map(|(span, count)| {
            Rectangle::new(
                [(span.start, 0.0), (span.end, *count as f64)],
                DARK_GREEN.mix(0.7).filled(),
            )
        }))
        .map_err(chart_err)?
        .label("Sentiment")
        .legend(|(x, y)| Rectangle::new([(x, y - 4), (x + 20, y + 4)], DARK_GREEN.mix(0.7).filled()));
    chart
        .draw_series(bins.iter().map(|(span, count)| {
            Rectangle::new(
                [(span.start, 0.0), (span.end, *count as f64)],
                BLACK.stroke_width(1),
            )
        }))
        .map_err(chart_err)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8).filled())
        .border_style(BLACK.stroke_width(1))
        .draw()
        .map_err(chart_err)?;
    Ok(())
}

/// Render `<TICKER>_technicals.png`: close with SMA/EMA, RSI and MACD.
///
/// `None` when no close is present.
pub fn render_technicals(
    closes: &[Option<f64>],
    ticker: &str,
    results_dir: &Path,
) -> Result<Option<PathBuf>, ChartError> {
    let finite: Vec<f64> = closes.iter().flatten().copied().filter(|c| c.is_finite()).collect();
    if finite.is_empty() {
        return Ok(None);
    }
    ensure_dir(results_dir).map_err(chart_err)?;
    register_fonts();

    let series = TechnicalSeries::compute(closes);
    let close: Vec<f64> = closes.iter().map(|c| c.unwrap_or(f64::NAN)).collect();
    let x_range = 0.0..closes.len().max(2) as f64 - 1.0;

    let path = results_dir.join(format!("{ticker}_technicals.png"));
    {
        let root = BitMapBackend::new(&path, TECHNICALS_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;
        let (top, rest) = root.split_vertically((TECHNICALS_SIZE.1 * 45 / 100) as i32);
        let (middle, bottom) = rest.split_vertically((rest.dim_in_pixel().1 / 2) as i32);

        line_panel(
            &top,
            &format!("{ticker} Stock Price with Moving Averages"),
            x_range.clone(),
            &[
                ("Close Price", &close[..], BLUE),
                ("SMA 20", &series.sma[..], ORANGE),
                ("EMA 20", &series.ema[..], DARK_GREEN),
            ],
            &[],
        )?;
        line_panel(
            &middle,
            &format!("{ticker} RSI Indicator"),
            x_range.clone(),
            &[("RSI", &series.rsi[..], MAGENTA)],
            &[(70.0, RED), (30.0, DARK_GREEN)],
        )?;
        macd_panel(&bottom, ticker, x_range, &series)?;
        root.present().map_err(chart_err)?;
    }
    log::info!("technicals saved: {}", path.display());
    Ok(Some(path))
}

type NamedSeries<'a> = (&'a str, &'a [f64], RGBColor);

fn line_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    x_range: Range<f64>,
    lines: &[NamedSeries<'_>],
    guides: &[(f64, RGBColor)],
) -> Result<(), ChartError>
where
    DB: DrawingBackend,
{
    let all: Vec<f64> = lines
        .iter()
        .flat_map(|(_, v, _)| v.iter().copied())
        .chain(guides.iter().map(|(g, _)| *g))
        .collect();

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 22))
        .margin(12)
        .x_label_area_size(30)
        .y_label_area_size(55)
        .build_cartesian_2d(x_range.clone(), padded_range(&all))
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .light_line_style(BLACK.mix(0.05).stroke_width(1))
        .draw()
        .map_err(chart_err)?;

    for (level, color) in guides {
        chart
            .draw_series(LineSeries::new(
                [(x_range.start, *level), (x_range.end, *level)],
                color.mix(0.7).stroke_width(1),
            ))
            .map_err(chart_err)?;
    }
    for line in lines {
        draw_named_line(&mut chart, *line)?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8).filled())
        .border_style(BLACK.stroke_width(1))
        .draw()
        .map_err(chart_err)?;
    Ok(())
}

fn draw_named_line<DB>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    (name, values, color): NamedSeries<'_>,
) -> Result<(), ChartError>
where
    DB: DrawingBackend,
{
    chart
        .draw_series(LineSeries::new(finite_points(values), color.stroke_width(2)))
        .map_err(chart_err)?
        .label(name)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    Ok(())
}

fn macd_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    ticker: &str,
    x_range: Range<f64>,
    series: &TechnicalSeries,
) -> Result<(), ChartError>
where
    DB: DrawingBackend,
{
    let all: Vec<f64> = series
        .macd
        .iter()
        .chain(&series.macd_signal)
        .chain(&series.macd_hist)
        .copied()
        .chain(std::iter::once(0.0))
        .collect();

    let mut chart = ChartBuilder::on(area)
        .caption(format!("{ticker} MACD Indicator"), (FONT, 22))
        .margin(12)
        .x_label_area_size(30)
        .y_label_area_size(55)
        .build_cartesian_2d(x_range, padded_range(&all))
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .light_line_style(BLACK.mix(0.05).stroke_width(1))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(
            series
                .macd_hist
                .iter()
                .enumerate()
                .filter(|(_, h)| h.is_finite())
                .map(|(i, h)| {
                    let x = i as f64;
                    Rectangle::new([(x - 0.4, 0.0), (x + 0.4, *h)], GREY.filled())
                }),
        )
        .map_err(chart_err)?
        .label("Histogram")
        .legend(|(x, y)| Rectangle::new([(x, y - 4), (x + 20, y + 4)], GREY.filled()));

    draw_named_line(&mut chart, ("MACD", &series.macd[..], BLUE))?;
    draw_named_line(&mut chart, ("Signal", &series.macd_signal[..], ORANGE))?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8).filled())
        .border_style(BLACK.stroke_width(1))
        .draw()
        .map_err(chart_err)?;
    Ok(())
}

// ── Geometry helpers ─────────────────────────────────────────────────

fn finite_points(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, v)| (i as f64, *v))
        .collect()
}

/// Min..max of the finite values, widened by 5% (or ±1 when flat).
pub fn padded_range(values: &[f64]) -> Range<f64> {
    let (lo, hi) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    if lo > hi {
        return -1.0..1.0;
    }
    let span = hi - lo;
    if span == 0.0 {
        return lo - 1.0..hi + 1.0;
    }
    let pad = span * 0.05;
    lo - pad..hi + pad
}

/// Ordinary least-squares `(slope, intercept)`; `None` when x is constant.
pub fn least_squares(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let (mx, my) = (mean(xs), mean(ys));
    let sxx: f64 = xs.iter().map(|x| (x - mx).powi(2)).sum();
    if sxx == 0.0 || !sxx.is_finite() {
        return None;
    }
    let sxy: f64 = xs.iter().zip(ys).map(|(x, y)| (x - mx) * (y - my)).sum();
    let slope = sxy / sxx;
    Some((slope, my - slope * mx))
}

/// Equal-width bins over `range`; the last bin is closed on the right.
pub fn histogram(values: &[f64], range: Range<f64>, bins: usize) -> Vec<(Range<f64>, usize)> {
    let bins = bins.max(1);
    let width = (range.end - range.start) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in values.iter().filter(|v| v.is_finite()) {
        let idx = ((v - range.start) / width).floor();
        if idx >= 0.0 {
            counts[(idx as usize).min(bins - 1)] += 1;
        }
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, c)| {
            let start = range.start + i as f64 * width;
            (start..start + width, c)
        })
        .collect()
}
