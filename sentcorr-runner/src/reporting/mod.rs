//! Presentation and artifacts: text report, charts, results CSV, run manifest.

pub mod charts;
pub mod export;
pub mod text;

pub use charts::{render_dashboard, render_technicals, ChartError, ChartPaths};
pub use export::{
    write_manifest, write_results_csv, ExportError, FileHash, RunManifest, TickerOutcome,
    TickerStatus,
};
pub use text::{render_report, render_unavailable};
