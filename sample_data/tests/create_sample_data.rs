use chrono::{TimeDelta, TimeZone, Utc};
use loadtest_sample_data::{
    create_sample_data, GeneratorError, SampleDataConfig, SampleGenerator, TrafficModel,
};
use loadtest_summary_model::{load_run_summary_file, LatencySummary, RunSummary};
use loadtest_summary_model::results::{load_results_frame, records_from_frame};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn config() -> SampleDataConfig {
    SampleDataConfig {
        config_name: "Sample".to_string(),
        count: 1000,
        interval: TimeDelta::milliseconds(60),
        start: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        traffic: TrafficModel::default(),
    }
}

#[test]
fn writes_results_and_summary() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let output_dir = dir.path().join("nested").join("sample");

    let output = create_sample_data(&output_dir, &config(), &mut StdRng::seed_from_u64(11))?;

    assert!(output.results_path.exists());
    assert!(output.summary_path.exists());

    let records = records_from_frame(&load_results_frame(&output.results_path)?)?;
    assert_eq!(records.len(), 1000);
    assert!(records.iter().all(|r| r.latency_ms >= 10.0));
    assert_eq!(records[0].timestamp, config().start);
    assert_eq!(
        records[999].timestamp,
        config().start + TimeDelta::milliseconds(999 * 60)
    );

    let summary = load_run_summary_file(&output.summary_path)?;
    assert_eq!(summary.config, "Sample");
    assert_eq!(summary.start_time, output.summary.start_time);
    assert_eq!(summary.stale_reads, output.summary.stale_reads);
    assert_eq!(summary.total_requests, 1000);
    assert_eq!(summary.total_reads + summary.total_writes, 1000);
    assert_eq!(
        summary.successful_requests,
        records.iter().filter(|r| r.success).count()
    );
    assert_eq!(summary.duration, "59.940s");

    Ok(())
}

#[test]
fn seeded_runs_are_reproducible() -> anyhow::Result<()> {
    let first = tempfile::tempdir()?;
    let second = tempfile::tempdir()?;

    let a = create_sample_data(first.path(), &config(), &mut StdRng::seed_from_u64(5))?;
    let b = create_sample_data(second.path(), &config(), &mut StdRng::seed_from_u64(5))?;

    assert_eq!(
        std::fs::read_to_string(a.results_path)?,
        std::fs::read_to_string(b.results_path)?
    );
    assert_eq!(a.summary, b.summary);
    Ok(())
}

#[test]
fn unwritable_output_location_fails() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let blocker = dir.path().join("not-a-directory");
    std::fs::write(&blocker, "")?;

    let result = create_sample_data(&blocker, &config(), &mut StdRng::seed_from_u64(1));

    assert!(result.is_err());
    Ok(())
}

#[test]
fn bad_interval_fails_without_writing_results() -> anyhow::Result<()> {
    for interval in [
        TimeDelta::milliseconds(-60),
        TimeDelta::milliseconds(10_000_000_000_000),
    ] {
        let dir = tempfile::tempdir()?;
        let config = SampleDataConfig {
            interval,
            ..config()
        };

        let err = create_sample_data(dir.path(), &config, &mut StdRng::seed_from_u64(2))
            .unwrap_err();

        assert!(err.downcast_ref::<GeneratorError>().is_some(), "got {err:?}");
        assert!(!dir.path().join("results.csv").exists());
    }
    Ok(())
}

fn assert_ordered(summary: &LatencySummary) {
    let ordered = [
        summary.min_ms,
        summary.p50_ms,
        summary.p95_ms,
        summary.p99_ms,
        summary.p999_ms,
        summary.max_ms,
    ];
    assert!(
        ordered.windows(2).all(|pair| pair[0] <= pair[1]),
        "not ordered: {summary:?}"
    );
    assert_eq!(summary.median_ms, summary.p50_ms);
    assert!(summary.min_ms <= summary.mean_ms && summary.mean_ms <= summary.max_ms);
}

#[test]
fn generated_percentiles_are_ordered() -> anyhow::Result<()> {
    let generator = SampleGenerator::new(TrafficModel::default())?;
    for seed in 0..20 {
        let records = generator.generate(
            &mut StdRng::seed_from_u64(seed),
            config().start,
            TimeDelta::milliseconds(60),
            2_000,
        )?;

        let summary = RunSummary::from_records("ordered", &records);

        assert_ordered(summary.read_latency.as_ref().expect("reads succeed"));
        assert_ordered(summary.write_latency.as_ref().expect("writes succeed"));
    }
    Ok(())
}
