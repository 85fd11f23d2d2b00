//! Configuration module
//!
//! Holds the benchmark configuration, the CLI that produces it, and the
//! validation that runs before any IO is attempted.

pub mod cli;
pub mod cli_convert;
pub mod validator;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default chunk size (bytes)
pub const DEFAULT_CHUNK_SIZE: u64 = 4096;

/// Default test file size (1 GiB)
pub const DEFAULT_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// Complete benchmark configuration
///
/// Shared read-only with every worker once validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Bytes per individual read/write call
    pub chunk_size: u64,
    /// Size of the test file and of each write payload
    pub file_size: u64,
    /// Test file path
    pub file_path: PathBuf,
    /// Workload to run
    pub operation: Operation,
    /// Number of concurrent workers
    pub concurrency: usize,
    /// Report format
    #[serde(default)]
    pub output_format: OutputFormat,
    /// How workers map onto test files
    #[serde(default)]
    pub distribution: FileDistribution,
    /// Cooperative deadline for the whole run
    #[serde(default)]
    pub timeout: Option<Duration>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            file_size: DEFAULT_FILE_SIZE,
            file_path: PathBuf::from("test.txt"),
            operation: Operation::default(),
            concurrency: 1,
            output_format: OutputFormat::default(),
            distribution: FileDistribution::default(),
            timeout: None,
        }
    }
}

impl BenchmarkConfig {
    /// File targeted by `worker_id`
    pub fn target_path(&self, worker_id: usize) -> PathBuf {
        match self.distribution {
            FileDistribution::Shared => self.file_path.clone(),
            FileDistribution::PerWorker => {
                let mut path = self.file_path.clone().into_os_string();
                path.push(format!(".worker{}", worker_id));
                PathBuf::from(path)
            }
        }
    }

    /// Every distinct file touched by the run
    pub fn target_paths(&self) -> Vec<PathBuf> {
        match self.distribution {
            FileDistribution::Shared => vec![self.file_path.clone()],
            FileDistribution::PerWorker => (0..self.concurrency).map(|id| self.target_path(id)).collect(),
        }
    }
}

impl fmt::Display for BenchmarkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration:")?;
        writeln!(f, "  Chunk Size:    {} bytes", self.chunk_size)?;
        writeln!(f, "  File Name:     {}", self.file_path.display())?;
        writeln!(f, "  File Size:     {} bytes", self.file_size)?;
        writeln!(f, "  Operation:     {}", self.operation)?;
        writeln!(f, "  Concurrency:   {}", self.concurrency)?;
        writeln!(f, "  Distribution:  {}", self.distribution)?;
        if let Some(timeout) = self.timeout {
            writeln!(f, "  Timeout:       {:?}", timeout)?;
        }
        write!(f, "  Output Format: {}", self.output_format)
    }
}

/// Workload type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Every worker reads the whole test file once
    Read,
    /// Every worker writes a full-size payload once
    #[default]
    Write,
    /// Every worker writes a full-size payload, then reads the file back
    Mixed,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read => write!(f, "read"),
            Operation::Write => write!(f, "write"),
            Operation::Mixed => write!(f, "mixed"),
        }
    }
}

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One human-readable line per metric
    #[default]
    Text,
    /// Object keyed by metric name
    Json,
    /// Header row followed by one data row
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// How workers are assigned to test files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FileDistribution {
    /// All workers share one file
    #[default]
    Shared,
    /// Worker N uses `<file>.workerN`
    PerWorker,
}

impl fmt::Display for FileDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileDistribution::Shared => write!(f, "shared"),
            FileDistribution::PerWorker => write!(f, "per-worker"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.chunk_size, 4096);
        assert_eq!(config.file_size, 1024 * 1024 * 1024);
        assert_eq!(config.operation, Operation::Write);
        assert_eq!(config.output_format, OutputFormat::Text);
        assert_eq!(config.concurrency, 1);
    }

    #[test]
    fn test_shared_targets() {
        let config = BenchmarkConfig {
            concurrency: 4,
            ..Default::default()
        };
        assert_eq!(config.target_path(3), PathBuf::from("test.txt"));
        assert_eq!(config.target_paths(), vec![PathBuf::from("test.txt")]);
    }

    #[test]
    fn test_per_worker_targets() {
        let config = BenchmarkConfig {
            file_path: PathBuf::from("/data/bench.dat"),
            concurrency: 3,
            distribution: FileDistribution::PerWorker,
            ..Default::default()
        };
        assert_eq!(config.target_path(1), PathBuf::from("/data/bench.dat.worker1"));
        assert_eq!(config.target_paths().len(), 3);
    }

    #[test]
    fn test_enum_serde_names() {
        assert_eq!(serde_json::to_string(&Operation::Mixed).unwrap(), "\"mixed\"");
        assert_eq!(serde_json::to_string(&OutputFormat::Csv).unwrap(), "\"csv\"");
        assert_eq!(
            serde_json::to_string(&FileDistribution::PerWorker).unwrap(),
            "\"per-worker\""
        );
    }

    #[test]
    fn test_display_lists_settings() {
        let text = BenchmarkConfig::default().to_string();
        assert!(text.contains("Chunk Size:    4096 bytes"));
        assert!(text.contains("Operation:     write"));
    }
}
