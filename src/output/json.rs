//! JSON output formatting
//!
//! The snapshot serializes directly: one key per metric, timestamps in
//! RFC 3339.

use crate::error::{BenchError, Result};
use crate::stats::MetricsSnapshot;

/// Render the snapshot as a pretty-printed JSON object
pub fn render_json(snapshot: &MetricsSnapshot) -> Result<String> {
    serde_json::to_string_pretty(snapshot).map_err(|e| BenchError::Report {
        format: "json",
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{fixtures, METRIC_KEYS};

    #[test]
    fn test_keys_match_metric_names() {
        let rendered = render_json(&fixtures::snapshot()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), METRIC_KEYS.len());
        for key in METRIC_KEYS {
            assert!(object.contains_key(key), "missing key {}", key);
        }
        assert_eq!(object["bytes_written"], 4 * 1024 * 1024);
        assert_eq!(object["start_time"], "2024-03-01T12:00:00Z");
    }

    #[test]
    fn test_parses_back_to_snapshot() {
        let snapshot = fixtures::snapshot();
        let rendered = render_json(&snapshot).unwrap();
        let parsed: MetricsSnapshot = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_non_finite_value_serializes_as_null() {
        let mut snapshot = fixtures::snapshot();
        snapshot.iops = f64::NAN;
        let rendered = render_json(&snapshot).unwrap();
        assert!(rendered.contains("\"iops\": null"));
    }
}
