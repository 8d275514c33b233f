use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(about = "Create graphs from load test results", long_about = None)]
pub struct CliArgs {
    /// Directory containing `results.csv` and, optionally, `summary.json`.
    ///
    /// The graphs are written to the same directory.
    pub results_dir: PathBuf,

    /// Number of histogram bins, at least 1.
    #[arg(
        long,
        env = "VISUALISE_BINS",
        default_value_t = crate::DEFAULT_BINS,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub bins: usize,
}

/// Exit status for a command line that could not be parsed
///
/// Usage errors exit with 1. Help and version output are not failures.
pub fn exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}
