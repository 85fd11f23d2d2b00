//! Human-readable text output

use crate::stats::MetricsSnapshot;
use crate::util::resource::available_cores;
use crate::util::time::{format_bytes, format_duration, format_rate, format_throughput};
use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::time::Duration;

/// Render one line per metric
pub fn render_text(snapshot: &MetricsSnapshot) -> String {
    let mut out = String::new();
    let latency = Duration::try_from_secs_f64(snapshot.latency_secs).unwrap_or_default();

    // Writing to a String cannot fail
    let _ = writeln!(out, "Start Time:        {}", format_time(snapshot.start_time));
    let _ = writeln!(out, "End Time:          {}", format_time(snapshot.end_time));
    let _ = writeln!(
        out,
        "Latency:           {} ({:.6} s)",
        format_duration(latency),
        snapshot.latency_secs
    );
    let _ = writeln!(
        out,
        "Bytes Written:     {} ({})",
        snapshot.bytes_written,
        format_bytes(snapshot.bytes_written)
    );
    let _ = writeln!(
        out,
        "Bytes Read:        {} ({})",
        snapshot.bytes_read,
        format_bytes(snapshot.bytes_read)
    );
    let _ = writeln!(out, "Total Operations:  {}", snapshot.total_operations);
    let _ = writeln!(out, "Read Operations:   {}", snapshot.read_operations);
    let _ = writeln!(out, "Write Operations:  {}", snapshot.write_operations);
    let _ = writeln!(
        out,
        "Throughput:        {}",
        format_throughput(snapshot.throughput_bytes_per_sec)
    );
    let _ = writeln!(out, "IOPS:              {}", format_rate(snapshot.iops));
    let _ = writeln!(
        out,
        "CPU Usage:         {:.2}% ({} cores available)",
        snapshot.cpu_usage_percent,
        available_cores()
    );
    let _ = write!(
        out,
        "Memory Usage:      {} ({})",
        snapshot.memory_usage_bytes,
        format_bytes(snapshot.memory_usage_bytes)
    );

    out
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures;

    #[test]
    fn test_one_line_per_metric() {
        let report = render_text(&fixtures::snapshot());
        assert_eq!(report.lines().count(), crate::output::METRIC_KEYS.len());
    }

    #[test]
    fn test_values_rendered() {
        let report = render_text(&fixtures::snapshot());
        assert!(report.contains("Start Time:        2024-03-01 12:00:00.000 UTC"));
        assert!(report.contains("Latency:           2.00s"));
        assert!(report.contains("Bytes Written:     4194304 (4.00 MB)"));
        assert!(report.contains("Write Operations:  4"));
        assert!(report.contains("Throughput:        2.00 MB/s"));
        assert!(report.contains("CPU Usage:         37.50%"));
    }

    #[test]
    fn test_missing_times_render_placeholder() {
        let mut snapshot = fixtures::snapshot();
        snapshot.start_time = None;
        snapshot.end_time = None;
        let report = render_text(&snapshot);
        assert!(report.starts_with("Start Time:        -\n"));
    }
}
