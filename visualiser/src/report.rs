use loadtest_summary_model::{LatencySummary, RequestType};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
pub struct LatencyRow {
    #[tabled(rename = "type")]
    pub request_type: RequestType,
    pub samples: usize,
    #[tabled(display = "optional_ms")]
    pub min_ms: Option<f64>,
    #[tabled(display = "optional_ms")]
    pub mean_ms: Option<f64>,
    #[tabled(display = "optional_ms")]
    pub p50_ms: Option<f64>,
    #[tabled(display = "optional_ms")]
    pub p95_ms: Option<f64>,
    #[tabled(display = "optional_ms")]
    pub p99_ms: Option<f64>,
    #[tabled(display = "optional_ms")]
    pub p999_ms: Option<f64>,
    #[tabled(display = "optional_ms")]
    pub max_ms: Option<f64>,
}

impl LatencyRow {
    pub fn new(request_type: RequestType, latencies: &[f64]) -> Self {
        let summary = LatencySummary::from_latencies(latencies);
        Self {
            request_type,
            samples: latencies.len(),
            min_ms: summary.map(|s| s.min_ms),
            mean_ms: summary.map(|s| s.mean_ms),
            p50_ms: summary.map(|s| s.p50_ms),
            p95_ms: summary.map(|s| s.p95_ms),
            p99_ms: summary.map(|s| s.p99_ms),
            p999_ms: summary.map(|s| s.p999_ms),
            max_ms: summary.map(|s| s.max_ms),
        }
    }
}

/// Table of latency statistics for successful requests, one row per request type
pub fn latency_table(rows: &[LatencyRow]) -> String {
    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

fn optional_ms(value: &Option<f64>) -> String {
    match value {
        Some(value) => format!("{:.2}", value),
        None => "no data".to_string(),
    }
}
