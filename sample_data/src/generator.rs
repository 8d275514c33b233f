use chrono::{DateTime, TimeDelta, Utc};
use loadtest_summary_model::{RequestRecord, RequestType};
use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError};
use thiserror::Error;

/// Number of distinct keys, named `key_0` to `key_99`
pub const KEY_SPACE: u32 = 100;
/// No generated latency is lower than this, in milliseconds
pub const LATENCY_FLOOR_MS: f64 = 10.0;
pub const MAX_VERSION: u32 = 10;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Invalid latency distribution: {0}")]
    Distribution(#[from] NormalError),
    #[error("{name} must be between 0 and 1, got {value}")]
    Ratio { name: &'static str, value: f64 },
    #[error("Interval between requests must not be negative, got {0}")]
    NegativeInterval(TimeDelta),
    #[error("Timestamp of request {index} is out of range")]
    TimestampOverflow { index: usize },
}

/// Shape of the synthetic traffic
///
/// The defaults describe a read heavy workload where writes are much slower than reads, as
/// seen when writes wait for replication to a quorum.
#[derive(Debug, Clone)]
pub struct TrafficModel {
    pub write_ratio: f64,
    pub success_ratio: f64,
    /// Chance that a read is flagged stale
    pub stale_read_ratio: f64,
    pub read_latency_mean_ms: f64,
    pub read_latency_std_ms: f64,
    pub write_latency_mean_ms: f64,
    pub write_latency_std_ms: f64,
}

impl Default for TrafficModel {
    fn default() -> Self {
        Self {
            write_ratio: 0.1,
            success_ratio: 0.95,
            stale_read_ratio: 0.1,
            read_latency_mean_ms: 50.0,
            read_latency_std_ms: 10.0,
            write_latency_mean_ms: 1200.0,
            write_latency_std_ms: 200.0,
        }
    }
}

/// Generates mock request records following a [TrafficModel]
pub struct SampleGenerator {
    model: TrafficModel,
    read_latency: Normal<f64>,
    write_latency: Normal<f64>,
}

impl SampleGenerator {
    pub fn new(model: TrafficModel) -> Result<Self, GeneratorError> {
        for (name, value) in [
            ("write_ratio", model.write_ratio),
            ("success_ratio", model.success_ratio),
            ("stale_read_ratio", model.stale_read_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GeneratorError::Ratio { name, value });
            }
        }

        Ok(Self {
            read_latency: Normal::new(model.read_latency_mean_ms, model.read_latency_std_ms)?,
            write_latency: Normal::new(model.write_latency_mean_ms, model.write_latency_std_ms)?,
            model,
        })
    }

    /// Generate `count` records, the `i`th issued at `start + i * interval`
    ///
    /// Records come out in timestamp order, so `interval` must not be negative.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        start: DateTime<Utc>,
        interval: TimeDelta,
        count: usize,
    ) -> Result<Vec<RequestRecord>, GeneratorError> {
        if interval < TimeDelta::zero() {
            return Err(GeneratorError::NegativeInterval(interval));
        }

        let mut records = Vec::with_capacity(count);
        let mut timestamp = start;
        for index in 0..count {
            if index > 0 {
                timestamp = timestamp
                    .checked_add_signed(interval)
                    .ok_or(GeneratorError::TimestampOverflow { index })?;
            }
            records.push(self.generate_record(rng, timestamp));
        }
        Ok(records)
    }

    fn generate_record<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        timestamp: DateTime<Utc>,
    ) -> RequestRecord {
        let request_type = if rng.gen_bool(self.model.write_ratio) {
            RequestType::Write
        } else {
            RequestType::Read
        };
        let key = format!("key_{}", rng.gen_range(0..KEY_SPACE));

        let latency_ms = match request_type {
            RequestType::Read => self.read_latency.sample(rng),
            RequestType::Write => self.write_latency.sample(rng),
        }
        .max(LATENCY_FLOOR_MS);

        let success = rng.gen_bool(self.model.success_ratio);
        let is_stale =
            request_type == RequestType::Read && rng.gen_bool(self.model.stale_read_ratio);

        RequestRecord {
            timestamp,
            request_type,
            key,
            latency_ms,
            success,
            is_stale,
            version: rng.gen_range(1..=MAX_VERSION),
        }
    }
}
