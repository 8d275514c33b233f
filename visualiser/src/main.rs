use clap::Parser as _;
use loadtest_visualiser::cli::{exit_code, CliArgs};
use loadtest_visualiser::report::latency_table;
use loadtest_visualiser::visualise_results;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init()?;

    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Nothing else to report if the terminal is gone
            e.print().ok();
            std::process::exit(exit_code(&e));
        }
    };
    log::debug!("Using results directory: {}", args.results_dir.display());

    let output = visualise_results(&args.results_dir, args.bins)?;

    println!("\nLatency of successful requests ({})", output.config_name);
    println!("{}", latency_table(&output.latency_rows()));

    log::info!(
        "Visualizations created in: {}",
        args.results_dir.display()
    );

    Ok(())
}
