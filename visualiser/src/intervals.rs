use chrono::TimeDelta;
use itertools::Itertools;
use loadtest_summary_model::RequestRecord;

/// Time in milliseconds from each write to a read of the same key that immediately follows it
///
/// Records are grouped by key and each group is ordered by timestamp. Records with equal
/// timestamps keep their input order. A sample is taken for every adjacent `(write, read)`
/// pair within a group, whatever happened to other keys in between.
pub fn write_read_intervals(records: &[RequestRecord]) -> Vec<f64> {
    records
        .iter()
        .map(|record| (record.key.as_str(), record))
        .into_group_map()
        .into_iter()
        .sorted_by(|(a, _), (b, _)| a.cmp(b))
        .flat_map(|(_, mut events)| {
            events.sort_by_key(|record| record.timestamp);
            events
                .windows(2)
                .filter(|pair| pair[0].is_write() && pair[1].is_read())
                .map(|pair| millis(pair[1].timestamp - pair[0].timestamp))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn millis(delta: TimeDelta) -> f64 {
    delta
        .num_microseconds()
        .map_or(delta.num_milliseconds() as f64, |us| us as f64 / 1000.0)
}
