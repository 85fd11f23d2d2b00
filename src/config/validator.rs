//! Configuration validation
//!
//! Runs before the filesystem is touched; every failure is a
//! [`BenchError::Config`].

use super::*;
use crate::error::{BenchError, Result};
use tracing::warn;

/// Validate complete configuration
pub fn validate_config(config: &BenchmarkConfig) -> Result<()> {
    if config.chunk_size == 0 || config.file_size == 0 || config.concurrency == 0 {
        return Err(BenchError::Config(format!(
            "chunk-size, file-size, and concurrency must be greater than 0 (got {}, {}, {})",
            config.chunk_size, config.file_size, config.concurrency
        )));
    }

    if config.file_path.as_os_str().is_empty() {
        return Err(BenchError::Config("file-name must not be empty".into()));
    }

    if usize::try_from(config.chunk_size).is_err() {
        return Err(BenchError::Config(format!(
            "chunk-size {} does not fit in memory on this platform",
            config.chunk_size
        )));
    }

    // Write payloads are held in memory in full
    if config.operation != Operation::Read && usize::try_from(config.file_size).is_err() {
        return Err(BenchError::Config(format!(
            "file-size {} is too large for an in-memory {} payload on this platform",
            config.file_size, config.operation
        )));
    }

    // Readers would race sibling writers truncating the same file
    if config.operation == Operation::Mixed
        && config.distribution == FileDistribution::Shared
        && config.concurrency > 1
    {
        return Err(BenchError::Config(format!(
            "mixed operation with {} workers needs --distribution per-worker",
            config.concurrency
        )));
    }

    if config.chunk_size > config.file_size {
        warn!(
            chunk_size = config.chunk_size,
            file_size = config.file_size,
            "chunk size exceeds file size; every transfer is a single chunk"
        );
    }

    if !config.chunk_size.is_power_of_two() {
        warn!(chunk_size = config.chunk_size, "chunk size is not a power of 2");
    }

    Ok(())
}
