//! Human-readable formatting for report values

use std::time::Duration;

const KIB: f64 = 1024.0;
const BINARY_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Scale `value` down by powers of 1024 until it fits the largest unit below it
fn scale_binary(value: f64) -> (f64, &'static str) {
    let mut scaled = value;
    let mut unit = 0;
    while scaled >= KIB && unit < BINARY_UNITS.len() - 1 {
        scaled /= KIB;
        unit += 1;
    }
    (scaled, BINARY_UNITS[unit])
}

/// Format a duration with a unit matching its magnitude
///
/// ```
/// use std::time::Duration;
/// use storagetester::util::time::format_duration;
///
/// assert_eq!(format_duration(Duration::from_nanos(500)), "500ns");
/// assert_eq!(format_duration(Duration::from_micros(2500)), "2.50ms");
/// assert_eq!(format_duration(Duration::from_secs(5)), "5.00s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    match nanos {
        0..=999 => format!("{}ns", nanos),
        1_000..=999_999 => format!("{:.2}us", nanos as f64 / 1e3),
        1_000_000..=999_999_999 => format!("{:.2}ms", nanos as f64 / 1e6),
        _ => format!("{:.2}s", duration.as_secs_f64()),
    }
}

/// Format an operations-per-second rate with a decimal suffix
pub fn format_rate(rate: f64) -> String {
    if rate >= 1e9 {
        format!("{:.2}G", rate / 1e9)
    } else if rate >= 1e6 {
        format!("{:.2}M", rate / 1e6)
    } else if rate >= 1e3 {
        format!("{:.2}K", rate / 1e3)
    } else {
        format!("{:.0}", rate)
    }
}

/// Format a byte count in binary units (1.50 MB)
pub fn format_bytes(bytes: u64) -> String {
    let (scaled, unit) = scale_binary(bytes as f64);
    if unit == "B" {
        format!("{} B", bytes)
    } else {
        format!("{:.2} {}", scaled, unit)
    }
}

/// Format a throughput in binary units per second (2.50 MB/s)
pub fn format_throughput(bytes_per_sec: f64) -> String {
    let (scaled, unit) = scale_binary(bytes_per_sec);
    format!("{:.2} {}/s", scaled, unit)
}
