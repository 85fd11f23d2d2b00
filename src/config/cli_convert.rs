//! Size and duration parsing for CLI values

use crate::error::{BenchError, Result};
use std::time::Duration;

/// Parse a size string (e.g., "4096", "4k", "100M", "1G") to bytes
pub fn parse_size(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();

    const UNITS: [(&str, u64); 9] = [
        ("kb", 1024),
        ("k", 1024),
        ("mb", 1024 * 1024),
        ("m", 1024 * 1024),
        ("gb", 1024 * 1024 * 1024),
        ("g", 1024 * 1024 * 1024),
        ("tb", 1024 * 1024 * 1024 * 1024),
        ("t", 1024 * 1024 * 1024 * 1024),
        ("b", 1),
    ];

    let (num_str, multiplier) = UNITS
        .iter()
        .find_map(|&(suffix, mult)| s.strip_suffix(suffix).map(|n| (n, mult)))
        .unwrap_or((s.as_str(), 1));

    let num: u64 = num_str
        .trim()
        .parse()
        .map_err(|_| BenchError::Config(format!("invalid size format: {}", s)))?;

    num.checked_mul(multiplier)
        .ok_or_else(|| BenchError::Config(format!("size overflows 64 bits: {}", s)))
}

/// Parse a duration string (e.g., "500ms", "30s", "5m", "1h")
///
/// A bare number is taken as seconds.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim().to_lowercase();

    // Longer suffixes first so "ms" is not read as minutes or seconds
    const UNITS: [(&str, u64); 7] = [
        ("ms", 1),
        ("sec", 1000),
        ("s", 1000),
        ("min", 60 * 1000),
        ("m", 60 * 1000),
        ("hr", 3600 * 1000),
        ("h", 3600 * 1000),
    ];

    let (num_str, millis_per_unit) = UNITS
        .iter()
        .find_map(|&(suffix, mult)| s.strip_suffix(suffix).map(|n| (n, mult)))
        .unwrap_or((s.as_str(), 1000));

    let num: u64 = num_str
        .trim()
        .parse()
        .map_err(|_| BenchError::Config(format!("invalid duration format: {}", s)))?;

    num.checked_mul(millis_per_unit)
        .map(Duration::from_millis)
        .ok_or_else(|| BenchError::Config(format!("duration overflows: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("4096").unwrap(), 4096);
        assert_eq!(parse_size("4k").unwrap(), 4096);
        assert_eq!(parse_size("4KB").unwrap(), 4096);
        assert_eq!(parse_size("1M").unwrap(), 1024 * 1024);
        assert_eq!(parse_size("1g").unwrap(), 1024 * 1024 * 1024);
        assert_eq!(parse_size("2T").unwrap(), 2 * 1024u64.pow(4));
        assert_eq!(parse_size(" 512b ").unwrap(), 512);
    }

    #[test]
    fn test_parse_size_rejects_garbage() {
        assert!(parse_size("").is_err());
        assert!(parse_size("-1").is_err());
        assert!(parse_size("4q").is_err());
        assert!(parse_size("abc").is_err());
    }

    #[test]
    fn test_parse_size_repeated_suffix_rejected() {
        assert!(parse_size("4kk").is_err());
        assert!(parse_size("1mm").is_err());
        assert!(parse_size("2gbgb").is_err());
        assert!(parse_size("8bb").is_err());
    }

    #[test]
    fn test_parse_size_overflow() {
        assert!(parse_size("99999999999T").is_err());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("10").unwrap(), Duration::from_secs(10));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("5ss").is_err());
        assert!(parse_duration("1hh").is_err());
    }
}
