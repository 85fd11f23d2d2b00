//! CSV output formatting
//!
//! A header row of metric names followed by a single data row, ready for
//! appending to a results sheet across runs.

use super::METRIC_KEYS;
use crate::stats::MetricsSnapshot;
use chrono::{DateTime, SecondsFormat, Utc};

/// Render header and data rows, newline-terminated
pub fn render_csv(snapshot: &MetricsSnapshot) -> String {
    let row = [
        format_timestamp_csv(snapshot.start_time),
        format_timestamp_csv(snapshot.end_time),
        format!("{:.6}", snapshot.latency_secs),
        snapshot.bytes_written.to_string(),
        snapshot.bytes_read.to_string(),
        snapshot.total_operations.to_string(),
        snapshot.read_operations.to_string(),
        snapshot.write_operations.to_string(),
        format!("{:.2}", snapshot.throughput_bytes_per_sec),
        format!("{:.2}", snapshot.iops),
        format!("{:.2}", snapshot.cpu_usage_percent),
        snapshot.memory_usage_bytes.to_string(),
    ];

    format!("{}\n{}\n", METRIC_KEYS.join(","), row.join(","))
}

/// RFC 3339 timestamp, or an empty field when unset
fn format_timestamp_csv(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}
