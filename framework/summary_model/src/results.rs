//! The `results.csv` format.
//!
//! One row per [RequestRecord] with the columns in [RESULTS_COLUMNS] order. Timestamps are
//! RFC 3339 UTC with millisecond precision, latencies have two decimal places and booleans are
//! lowercase literals.

use crate::record::{RequestRecord, RequestType, UnknownRequestType};
use chrono::{DateTime, SecondsFormat, Utc};
use itertools::izip;
use polars::prelude::*;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

pub const RESULTS_FILE_NAME: &str = "results.csv";

pub const RESULTS_COLUMNS: [&str; 7] = [
    "timestamp",
    "type",
    "key",
    "latency_ms",
    "success",
    "is_stale",
    "version",
];

#[derive(Error, Debug)]
pub enum ResultsError {
    #[error("Failed to process results frame: {0}")]
    Frame(#[from] PolarsError),
    #[error("Missing value in column `{column}` at row {row}")]
    MissingValue { column: &'static str, row: usize },
    #[error("Invalid timestamp at row {row}: {source}")]
    Timestamp {
        row: usize,
        source: chrono::ParseError,
    },
    #[error("Invalid request type at row {row}: {source}")]
    RequestType {
        row: usize,
        source: UnknownRequestType,
    },
    #[error("Version out of range at row {row}: {version}")]
    Version { row: usize, version: i64 },
}

/// Build a [DataFrame] with one row per record, in the results file layout
pub fn records_to_frame(records: &[RequestRecord]) -> Result<DataFrame, ResultsError> {
    let frame = df!(
        "timestamp" => records.iter().map(|r| format_timestamp(&r.timestamp)).collect::<Vec<_>>(),
        "type" => records.iter().map(|r| r.request_type.as_str()).collect::<Vec<_>>(),
        "key" => records.iter().map(|r| r.key.as_str()).collect::<Vec<_>>(),
        "latency_ms" => records.iter().map(|r| r.latency_ms).collect::<Vec<_>>(),
        "success" => records.iter().map(|r| r.success).collect::<Vec<_>>(),
        "is_stale" => records.iter().map(|r| r.is_stale).collect::<Vec<_>>(),
        "version" => records.iter().map(|r| r.version as i64).collect::<Vec<_>>(),
    )?;

    Ok(frame)
}

/// Write records as CSV, header first
pub fn write_results<W: Write>(records: &[RequestRecord], writer: W) -> Result<(), ResultsError> {
    let mut frame = records_to_frame(records)?;
    CsvWriter::new(writer)
        .include_header(true)
        .with_float_precision(Some(2))
        .finish(&mut frame)?;
    Ok(())
}

/// Load a results file into a [DataFrame]
///
/// Columns are read with a fixed schema rather than inferred, so a latency column that happens
/// to contain only whole numbers is still read as floating point.
pub fn load_results_frame(path: &Path) -> Result<DataFrame, ResultsError> {
    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_schema(Some(Arc::new(results_schema())))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    log::debug!("Loaded {} rows from {}", frame.height(), path.display());

    Ok(frame)
}

/// Convert a results [DataFrame] back into records
pub fn records_from_frame(frame: &DataFrame) -> Result<Vec<RequestRecord>, ResultsError> {
    let timestamps = frame.column("timestamp")?.str()?;
    let types = frame.column("type")?.str()?;
    let keys = frame.column("key")?.str()?;
    let latencies = frame.column("latency_ms")?.f64()?;
    let successes = frame.column("success")?.bool()?;
    let stale_flags = frame.column("is_stale")?.bool()?;
    let versions = frame.column("version")?.i64()?;

    let mut records = Vec::with_capacity(frame.height());
    for (row, (timestamp, request_type, key, latency_ms, success, is_stale, version)) in izip!(
        timestamps.into_iter(),
        types.into_iter(),
        keys.into_iter(),
        latencies.into_iter(),
        successes.into_iter(),
        stale_flags.into_iter(),
        versions.into_iter()
    )
    .enumerate()
    {
        let timestamp = timestamp.ok_or(ResultsError::MissingValue {
            column: "timestamp",
            row,
        })?;
        let request_type = request_type.ok_or(ResultsError::MissingValue {
            column: "type",
            row,
        })?;
        let version = version.ok_or(ResultsError::MissingValue {
            column: "version",
            row,
        })?;

        records.push(RequestRecord {
            timestamp: parse_timestamp(timestamp)
                .map_err(|source| ResultsError::Timestamp { row, source })?,
            request_type: request_type
                .parse::<RequestType>()
                .map_err(|source| ResultsError::RequestType { row, source })?,
            key: key
                .ok_or(ResultsError::MissingValue { column: "key", row })?
                .to_string(),
            latency_ms: latency_ms.ok_or(ResultsError::MissingValue {
                column: "latency_ms",
                row,
            })?,
            success: success.ok_or(ResultsError::MissingValue {
                column: "success",
                row,
            })?,
            is_stale: is_stale.ok_or(ResultsError::MissingValue {
                column: "is_stale",
                row,
            })?,
            version: u32::try_from(version)
                .map_err(|_| ResultsError::Version { row, version })?,
        });
    }

    Ok(records)
}

/// Latencies of the successful requests of one type, in file order
pub fn successful_latencies(
    frame: &DataFrame,
    request_type: RequestType,
) -> Result<Vec<f64>, ResultsError> {
    let selected = frame
        .clone()
        .lazy()
        .filter(
            col("success")
                .eq(lit(true))
                .and(col("type").eq(lit(request_type.as_str()))),
        )
        .select([col("latency_ms")])
        .collect()?;

    Ok(selected
        .column("latency_ms")?
        .f64()?
        .into_iter()
        .flatten()
        .collect())
}

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

fn results_schema() -> Schema {
    let dtypes = [
        DataType::String,
        DataType::String,
        DataType::String,
        DataType::Float64,
        DataType::Boolean,
        DataType::Boolean,
        DataType::Int64,
    ];

    let mut schema = Schema::with_capacity(RESULTS_COLUMNS.len());
    for (name, dtype) in RESULTS_COLUMNS.into_iter().zip(dtypes) {
        schema.with_column(name.into(), dtype);
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(request_type: RequestType, latency_ms: f64, success: bool) -> RequestRecord {
        RequestRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            request_type,
            key: "key_1".to_string(),
            latency_ms,
            success,
            is_stale: false,
            version: 1,
        }
    }

    #[test]
    fn frame_has_results_layout() -> anyhow::Result<()> {
        let frame = records_to_frame(&[record(RequestType::Read, 12.5, true)])?;
        let names = frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, RESULTS_COLUMNS);
        assert_eq!(frame.height(), 1);
        Ok(())
    }

    #[test]
    fn csv_header_and_literals() -> anyhow::Result<()> {
        let mut out = Vec::new();
        write_results(&[record(RequestType::Write, 1200.0, false)], &mut out)?;
        let text = String::from_utf8(out)?;
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("timestamp,type,key,latency_ms,success,is_stale,version")
        );
        assert_eq!(
            lines.next(),
            Some("2024-05-01T12:00:00.000Z,write,key_1,1200.00,false,false,1")
        );
        assert_eq!(lines.next(), None);
        Ok(())
    }

    #[test]
    fn selects_successful_latencies_by_type() -> anyhow::Result<()> {
        let frame = records_to_frame(&[
            record(RequestType::Read, 10.0, true),
            record(RequestType::Write, 1000.0, true),
            record(RequestType::Read, 20.0, false),
            record(RequestType::Read, 30.0, true),
        ])?;

        assert_eq!(
            successful_latencies(&frame, RequestType::Read)?,
            vec![10.0, 30.0]
        );
        assert_eq!(
            successful_latencies(&frame, RequestType::Write)?,
            vec![1000.0]
        );
        Ok(())
    }

    #[test]
    fn parses_timestamps_without_fraction() -> anyhow::Result<()> {
        let parsed = parse_timestamp("2024-05-01T12:00:00Z")?;
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        Ok(())
    }
}
