//! CLI argument parsing using clap

use super::cli_convert::{parse_duration, parse_size};
use super::{BenchmarkConfig, FileDistribution, Operation, OutputFormat};
use crate::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// storagetester - concurrent chunked storage IO benchmark
#[derive(Parser, Debug)]
#[command(name = "storagetester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Chunk size for IO operations (e.g., 4096, 4k, 1M)
    #[arg(long, default_value = "4096")]
    pub chunk_size: String,

    /// Name of the test file
    #[arg(long, default_value = "test.txt")]
    pub file_name: PathBuf,

    /// Size of the test file (e.g., 100M, 1G)
    #[arg(long, default_value = "1G")]
    pub file_size: String,

    /// Operation type: read, write, or mixed
    #[arg(long, value_enum, default_value = "write")]
    pub operation: Operation,

    /// Number of concurrent workers
    #[arg(long, default_value = "1")]
    pub concurrency: usize,

    /// Output format: text, json, or csv
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// File distribution: shared (one file) or per-worker (<file>.workerN)
    #[arg(long, value_enum, default_value = "shared")]
    pub distribution: FileDistribution,

    /// Abort the run after this long (e.g., 30s, 5m); 0 disables
    #[arg(long)]
    pub timeout: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Convert parsed arguments into a benchmark configuration
    ///
    /// Only unit conversion happens here; range checks belong to
    /// [`validate_config`](super::validator::validate_config).
    pub fn to_config(&self) -> Result<BenchmarkConfig> {
        let timeout = match &self.timeout {
            Some(s) => Some(parse_duration(s)?).filter(|d| !d.is_zero()),
            None => None,
        };

        Ok(BenchmarkConfig {
            chunk_size: parse_size(&self.chunk_size)?,
            file_size: parse_size(&self.file_size)?,
            file_path: self.file_name.clone(),
            operation: self.operation,
            concurrency: self.concurrency,
            output_format: self.output_format,
            distribution: self.distribution,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["storagetester"]).unwrap();
        assert!(!cli.debug);
        assert_eq!(cli.to_config().unwrap(), BenchmarkConfig::default());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "storagetester",
            "--chunk-size",
            "64k",
            "--file-name",
            "/tmp/bench.dat",
            "--file-size",
            "100M",
            "--operation",
            "mixed",
            "--concurrency",
            "8",
            "--output-format",
            "json",
            "--distribution",
            "per-worker",
            "--timeout",
            "30s",
            "--debug",
        ])
        .unwrap();

        assert!(cli.debug);
        let config = cli.to_config().unwrap();
        assert_eq!(config.chunk_size, 64 * 1024);
        assert_eq!(config.file_size, 100 * 1024 * 1024);
        assert_eq!(config.file_path, PathBuf::from("/tmp/bench.dat"));
        assert_eq!(config.operation, Operation::Mixed);
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.distribution, FileDistribution::PerWorker);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_zero_timeout_disables_deadline() {
        let cli = Cli::try_parse_from(["storagetester", "--timeout", "0"]).unwrap();
        assert_eq!(cli.to_config().unwrap().timeout, None);
    }

    #[test]
    fn test_unknown_operation_rejected() {
        assert!(Cli::try_parse_from(["storagetester", "--operation", "append"]).is_err());
    }

    #[test]
    fn test_bad_size_rejected() {
        let cli = Cli::try_parse_from(["storagetester", "--file-size", "lots"]).unwrap();
        assert!(cli.to_config().is_err());
    }

    #[test]
    fn test_zero_concurrency_parses_but_fails_validation() {
        let cli = Cli::try_parse_from(["storagetester", "--concurrency", "0"]).unwrap();
        let config = cli.to_config().unwrap();
        assert!(crate::config::validator::validate_config(&config).is_err());
    }
}
