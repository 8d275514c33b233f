use anyhow::Context;
use chrono::{DateTime, TimeDelta, Utc};
use loadtest_summary_model::results::{write_results, RESULTS_FILE_NAME};
use loadtest_summary_model::{write_run_summary_file, RunSummary, SUMMARY_FILE_NAME};
use rand::Rng;
use std::path::{Path, PathBuf};

pub mod cli;
mod generator;

pub use generator::{
    GeneratorError, SampleGenerator, TrafficModel, KEY_SPACE, LATENCY_FLOOR_MS, MAX_VERSION,
};

/// What to generate
#[derive(Debug, Clone)]
pub struct SampleDataConfig {
    /// Label written to the summary, shown on the charts
    pub config_name: String,
    pub count: usize,
    pub interval: TimeDelta,
    /// Timestamp of the first record
    pub start: DateTime<Utc>,
    pub traffic: TrafficModel,
}

impl SampleDataConfig {
    /// A run of `count` records spaced `interval` apart that ends around now
    pub fn ending_now(config_name: String, count: usize, interval: TimeDelta) -> Self {
        Self {
            config_name,
            count,
            interval,
            start: Utc::now() - TimeDelta::seconds(60),
            traffic: TrafficModel::default(),
        }
    }
}

/// Files written by [create_sample_data]
#[derive(Debug)]
pub struct SampleDataOutput {
    pub results_path: PathBuf,
    pub summary_path: PathBuf,
    pub summary: RunSummary,
}

/// Generate mock results and write `results.csv` and `summary.json` into `output_dir`
///
/// The output directory is created if it does not exist. Existing files are replaced.
pub fn create_sample_data<R: Rng + ?Sized>(
    output_dir: &Path,
    config: &SampleDataConfig,
    rng: &mut R,
) -> anyhow::Result<SampleDataOutput> {
    std::fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            output_dir.display()
        )
    })?;

    let generator = SampleGenerator::new(config.traffic.clone())?;
    let records = generator.generate(rng, config.start, config.interval, config.count)?;
    log::debug!("Generated {} records", records.len());

    let results_path = output_dir.join(RESULTS_FILE_NAME);
    let results_file = std::fs::File::create(&results_path)
        .with_context(|| format!("Failed to create {}", results_path.display()))?;
    write_results(&records, results_file)
        .with_context(|| format!("Failed to write {}", results_path.display()))?;

    let summary = RunSummary::from_records(config.config_name.clone(), &records);
    let summary_path = output_dir.join(SUMMARY_FILE_NAME);
    write_run_summary_file(&summary, &summary_path)
        .with_context(|| format!("Failed to write {}", summary_path.display()))?;

    Ok(SampleDataOutput {
        results_path,
        summary_path,
        summary,
    })
}
