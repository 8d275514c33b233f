use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(about = "Create mock load test results for trying out the visualiser", long_about = None)]
pub struct CliArgs {
    /// Directory to write `results.csv` and `summary.json` to.
    #[arg(default_value = "results/sample")]
    pub output_dir: PathBuf,

    /// Number of requests to generate.
    #[arg(long, default_value_t = 1000)]
    pub count: usize,

    /// Milliseconds between consecutive requests.
    #[arg(long, default_value_t = 60)]
    pub interval_ms: u32,

    /// Seed for the random number generator. A fresh seed is used if not set.
    #[arg(long, env = "SAMPLE_DATA_SEED")]
    pub seed: Option<u64>,

    /// Configuration label recorded in the summary.
    #[arg(
        long,
        default_value = "Leader-Follower W=5 R=1 (10% writes, 90% reads) - SAMPLE DATA"
    )]
    pub config: String,
}
