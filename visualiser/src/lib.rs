use anyhow::Context;
use loadtest_summary_model::results::{
    load_results_frame, records_from_frame, successful_latencies, RESULTS_FILE_NAME,
};
use loadtest_summary_model::{RequestType, SUMMARY_FILE_NAME};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

mod analyze;
pub mod cli;
mod intervals;
mod render;
pub mod report;

pub use analyze::{histogram, HistogramBin};
pub use intervals::write_read_intervals;

pub const LATENCY_CHART_FILE_NAME: &str = "latency_distribution.svg";
pub const INTERVAL_CHART_FILE_NAME: &str = "time_intervals.svg";
pub const DEFAULT_BINS: usize = 50;
/// Chart label used when the results directory has no summary
pub const UNKNOWN_CONFIG: &str = "Unknown";

#[derive(Error, Debug)]
pub enum VisualiseError {
    #[error("{} not found", .path.display())]
    MissingInput { path: PathBuf },
    #[error("At least one histogram bin is needed")]
    NoBins,
}

/// The part of `summary.json` the charts are labelled with
///
/// Other fields are ignored so summaries written by other tools are accepted.
#[derive(Deserialize)]
struct SummaryLabel {
    config: Option<String>,
}

/// What [visualise_results] produced
#[derive(Debug)]
pub struct VisualiseOutput {
    pub config_name: String,
    pub latency_chart: PathBuf,
    /// `None` when no write was directly followed by a read of the same key
    pub interval_chart: Option<PathBuf>,
    pub read_latencies: Vec<f64>,
    pub write_latencies: Vec<f64>,
    pub intervals: Vec<f64>,
}

impl VisualiseOutput {
    pub fn latency_rows(&self) -> Vec<report::LatencyRow> {
        vec![
            report::LatencyRow::new(RequestType::Read, &self.read_latencies),
            report::LatencyRow::new(RequestType::Write, &self.write_latencies),
        ]
    }
}

/// Render the graphs for the results in `results_dir`
///
/// `results.csv` must exist. `summary.json` is only used for the configuration label.
pub fn visualise_results(results_dir: &Path, bins: usize) -> anyhow::Result<VisualiseOutput> {
    if bins == 0 {
        return Err(VisualiseError::NoBins.into());
    }

    let results_path = results_dir.join(RESULTS_FILE_NAME);
    if !results_path.exists() {
        return Err(VisualiseError::MissingInput { path: results_path }.into());
    }

    let summary_path = results_dir.join(SUMMARY_FILE_NAME);
    let config_name = config_label(&summary_path)
        .with_context(|| format!("Failed to load {}", summary_path.display()))?;

    let frame = load_results_frame(&results_path)
        .with_context(|| format!("Failed to load {}", results_path.display()))?;
    let read_latencies = successful_latencies(&frame, RequestType::Read)?;
    let write_latencies = successful_latencies(&frame, RequestType::Write)?;
    log::debug!(
        "Loaded {} successful reads and {} successful writes",
        read_latencies.len(),
        write_latencies.len()
    );

    for (request_type, latencies) in [
        (RequestType::Read, &read_latencies),
        (RequestType::Write, &write_latencies),
    ] {
        if latencies.is_empty() {
            log::info!("No successful {request_type} requests for {config_name}");
        }
    }

    let latency_chart = results_dir.join(LATENCY_CHART_FILE_NAME);
    render::render_latency_distribution(
        &latency_chart,
        &read_latencies,
        &write_latencies,
        &config_name,
        bins,
    )
    .context("Failed to render latency distribution")?;
    log::info!("Saved latency distribution: {}", latency_chart.display());

    let records = records_from_frame(&frame)?;
    let intervals = write_read_intervals(&records);
    let interval_chart = if intervals.is_empty() {
        log::info!("No read-write intervals found for {config_name}");
        None
    } else {
        let path = results_dir.join(INTERVAL_CHART_FILE_NAME);
        render::render_time_intervals(&path, &intervals, &config_name, bins)
            .context("Failed to render time intervals")?;
        log::info!("Saved time intervals: {}", path.display());
        Some(path)
    };

    Ok(VisualiseOutput {
        config_name,
        latency_chart,
        interval_chart,
        read_latencies,
        write_latencies,
        intervals,
    })
}

/// Configuration label from the summary, or [UNKNOWN_CONFIG] if there is none
fn config_label(summary_path: &Path) -> anyhow::Result<String> {
    if !summary_path.exists() {
        log::debug!("No summary at {}", summary_path.display());
        return Ok(UNKNOWN_CONFIG.to_string());
    }

    let file = std::fs::File::open(summary_path)?;
    let label: SummaryLabel = serde_json::from_reader(std::io::BufReader::new(file))?;

    Ok(label.config.unwrap_or_else(|| UNKNOWN_CONFIG.to_string()))
}
