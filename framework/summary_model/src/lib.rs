use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

mod latency;
mod record;
pub mod results;

pub use latency::{percentile, sorted_latencies, LatencySummary};
pub use record::{RequestRecord, RequestType, UnknownRequestType};

pub const SUMMARY_FILE_NAME: &str = "summary.json";

/// Summary of a load test run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    /// Human readable description of the configuration that was tested
    pub config: String,
    pub total_requests: usize,
    pub total_writes: usize,
    pub total_reads: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    /// The number of reads flagged as stale, whether or not they succeeded
    pub stale_reads: usize,
    /// Latency of successful writes
    ///
    /// `None` if no write succeeded during the run.
    pub write_latency: Option<LatencySummary>,
    /// Latency of successful reads
    ///
    /// `None` if no read succeeded during the run.
    pub read_latency: Option<LatencySummary>,
    /// The earliest request timestamp
    pub start_time: DateTime<Utc>,
    /// The latest request timestamp
    pub end_time: DateTime<Utc>,
    /// The span between `start_time` and `end_time`, for display
    pub duration: String,
}

impl RunSummary {
    /// Compute a run summary from the records of a run
    ///
    /// Every record counts towards its request type and outcome, but only successful requests
    /// contribute to the latency summaries. If there are no records then the counts are zero,
    /// both latency summaries are `None` and the time window is empty, starting now.
    pub fn from_records(config: impl Into<String>, records: &[RequestRecord]) -> Self {
        let mut write_latencies = Vec::new();
        let mut read_latencies = Vec::new();
        let mut successful_requests = 0;
        let mut stale_reads = 0;
        let mut total_writes = 0;
        let mut total_reads = 0;

        for record in records {
            if record.success {
                successful_requests += 1;
            }

            match record.request_type {
                RequestType::Write => {
                    total_writes += 1;
                    if record.success {
                        write_latencies.push(record.latency_ms);
                    }
                }
                RequestType::Read => {
                    total_reads += 1;
                    if record.success {
                        read_latencies.push(record.latency_ms);
                    }
                    if record.is_stale {
                        stale_reads += 1;
                    }
                }
            }
        }

        let now = Utc::now();
        let start_time = records.iter().map(|r| r.timestamp).min().unwrap_or(now);
        let end_time = records.iter().map(|r| r.timestamp).max().unwrap_or(now);

        Self {
            config: config.into(),
            total_requests: records.len(),
            total_writes,
            total_reads,
            successful_requests,
            failed_requests: records.len() - successful_requests,
            stale_reads,
            write_latency: LatencySummary::from_latencies(&write_latencies),
            read_latency: LatencySummary::from_latencies(&read_latencies),
            start_time,
            end_time,
            duration: format_duration(end_time - start_time),
        }
    }
}

/// Format a duration as seconds with millisecond precision, such as `59.940s`
pub fn format_duration(duration: TimeDelta) -> String {
    format!("{:.3}s", duration.num_milliseconds() as f64 / 1000.0)
}

/// Serialize the run summary to a writer as pretty printed JSON
pub fn store_run_summary<W: Write>(run_summary: &RunSummary, writer: W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(writer, run_summary)?;
    Ok(())
}

/// Load a run summary from a reader
pub fn load_run_summary<R: Read>(reader: R) -> anyhow::Result<RunSummary> {
    let reader = std::io::BufReader::new(reader);
    let run_summary: RunSummary = serde_json::from_reader(reader)?;
    Ok(run_summary)
}

/// Write the run summary to a file, replacing any existing file
pub fn write_run_summary_file(run_summary: &RunSummary, path: &Path) -> anyhow::Result<()> {
    let mut file = std::fs::File::create(path)?;
    store_run_summary(run_summary, &mut file)?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Load a run summary from a file, as written by [write_run_summary_file]
pub fn load_run_summary_file(path: &Path) -> anyhow::Result<RunSummary> {
    let file = std::fs::File::open(path)?;
    load_run_summary(file)
}
