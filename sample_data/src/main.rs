#[macro_use]
extern crate log;

use chrono::TimeDelta;
use clap::Parser as _;
use loadtest_sample_data::cli::CliArgs;
use loadtest_sample_data::{create_sample_data, SampleDataConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init()?;

    let args = CliArgs::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Using seed {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    let config = SampleDataConfig::ending_now(
        args.config,
        args.count,
        TimeDelta::milliseconds(i64::from(args.interval_ms)),
    );
    let output = create_sample_data(&args.output_dir, &config, &mut rng)?;

    info!("Sample data created in: {}", args.output_dir.display());
    info!("  - {}", output.results_path.display());
    info!("  - {}", output.summary_path.display());
    debug!("Summary: {:?}", output.summary);

    println!("\nNow you can generate graphs:");
    println!("  visualise-results {}", args.output_dir.display());

    Ok(())
}
