//! Report rendering
//!
//! Turns a finished [`MetricsSnapshot`] into the configured output format.
//! Every format carries the same metrics, named by [`METRIC_KEYS`].

pub mod csv;
pub mod json;
pub mod text;

use crate::config::OutputFormat;
use crate::error::Result;
use crate::stats::MetricsSnapshot;

/// Metric names, in report order
pub const METRIC_KEYS: [&str; 12] = [
    "start_time",
    "end_time",
    "latency_secs",
    "bytes_written",
    "bytes_read",
    "total_operations",
    "read_operations",
    "write_operations",
    "throughput_bytes_per_sec",
    "iops",
    "cpu_usage_percent",
    "memory_usage_bytes",
];

/// Render `snapshot` in `format`
pub fn render(snapshot: &MetricsSnapshot, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text::render_text(snapshot)),
        OutputFormat::Json => json::render_json(snapshot),
        OutputFormat::Csv => Ok(csv::render_csv(snapshot)),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::stats::MetricsSnapshot;
    use chrono::{TimeZone, Utc};

    pub fn snapshot() -> MetricsSnapshot {
        MetricsSnapshot {
            start_time: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single(),
            end_time: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 2).single(),
            latency_secs: 2.0,
            bytes_written: 4 * 1024 * 1024,
            bytes_read: 0,
            total_operations: 4,
            read_operations: 0,
            write_operations: 4,
            throughput_bytes_per_sec: 2.0 * 1024.0 * 1024.0,
            iops: 2.0,
            cpu_usage_percent: 37.5,
            memory_usage_bytes: 12 * 1024 * 1024,
        }
    }
}
