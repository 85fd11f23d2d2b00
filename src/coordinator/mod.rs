//! Coordinator module
//!
//! Runs one benchmark end to end: validate the configuration, check chunk
//! alignment, lay down the test file, dispatch workers, and freeze the
//! collected metrics.

use crate::config::validator::validate_config;
use crate::config::{BenchmarkConfig, Operation};
use crate::engine::{generate_test_file, random_payload, read_chunked_cancellable, write_chunked_cancellable};
use crate::error::{BenchError, Result};
use crate::stats::{MetricsCollector, MetricsSnapshot};
use crate::storage::{alignment_report, nearest_existing};
use crate::util::cancel::CancelSignal;
use crate::worker::WorkerPool;
use tracing::{debug, info, warn};

/// Run the benchmark described by `config`
///
/// Each worker performs one logical transfer of the whole file (a write, a
/// read, or a write followed by a read-back for mixed) and records it once.
///
/// # Errors
///
/// - [`BenchError::Config`] if the configuration is invalid; nothing is written
/// - Any engine error from test file generation
/// - [`BenchError::Worker`] / [`BenchError::WorkerPanicked`] for the first
///   worker that failed; with a timeout this wraps [`BenchError::Cancelled`]
pub fn run_benchmark(config: &BenchmarkConfig) -> Result<MetricsSnapshot> {
    validate_config(config)?;
    let chunk_size = usize::try_from(config.chunk_size)
        .map_err(|_| BenchError::Config(format!("chunk-size {} out of range", config.chunk_size)))?;

    check_alignment(config);
    prepare_test_files(config)?;

    let payload = match config.operation {
        Operation::Read => Vec::new(),
        Operation::Write | Operation::Mixed => {
            let len = usize::try_from(config.file_size)
                .map_err(|_| BenchError::Config(format!("file-size {} out of range", config.file_size)))?;
            random_payload(len)
        }
    };

    let metrics = MetricsCollector::new();
    let workload = Workload {
        config,
        chunk_size,
        payload: &payload,
        metrics: &metrics,
    };

    let cancel = config.timeout.map(CancelSignal::with_timeout).unwrap_or_default();
    let pool = WorkerPool::new(config.concurrency);

    info!(
        operation = %config.operation,
        workers = pool.workers(),
        chunk_size,
        file_size = config.file_size,
        "starting workload"
    );

    metrics.start();
    let outcome = pool.run_supervised_with(&cancel, |worker_id, cancel| workload.run(worker_id, cancel));
    metrics.stop();
    outcome?;

    if !metrics.sample_resources() {
        debug!("process resource usage unavailable on this platform");
    }

    let snapshot = metrics.snapshot();
    info!(
        elapsed_secs = snapshot.latency_secs,
        bytes_written = snapshot.bytes_written,
        bytes_read = snapshot.bytes_read,
        "workload complete"
    );
    Ok(snapshot)
}

/// Per-run state shared by reference with every worker
struct Workload<'a> {
    config: &'a BenchmarkConfig,
    chunk_size: usize,
    payload: &'a [u8],
    metrics: &'a MetricsCollector,
}

impl Workload<'_> {
    fn run(&self, worker_id: usize, cancel: &CancelSignal) -> Result<()> {
        let path = self.config.target_path(worker_id);

        if matches!(self.config.operation, Operation::Write | Operation::Mixed) {
            let written = write_chunked_cancellable(&path, self.chunk_size, self.payload, cancel)?;
            self.metrics.record_write(written);
        }

        if matches!(self.config.operation, Operation::Read | Operation::Mixed) {
            let data = read_chunked_cancellable(&path, self.chunk_size, cancel)?;
            self.metrics.record_read(data.len() as u64);
        }

        debug!(worker_id, path = %path.display(), "worker finished");
        Ok(())
    }
}

/// Warn when the chunk size is not a multiple of the filesystem block size
fn check_alignment(config: &BenchmarkConfig) {
    let probe_path = nearest_existing(&config.file_path);

    match alignment_report(&probe_path, config.chunk_size) {
        Ok(report) if report.aligned => {
            debug!(block_size = report.block_size, chunk_size = report.chunk_size, "chunk size is block aligned");
        }
        Ok(report) => {
            warn!(
                path = %report.path.display(),
                block_size = report.block_size,
                chunk_size = report.chunk_size,
                "chunk size is not a multiple of the filesystem block size"
            );
        }
        Err(e) => {
            warn!(path = %probe_path.display(), error = %e, "could not determine filesystem block size");
        }
    }
}

/// Create (or overwrite) every file the run touches at exactly `file_size`
fn prepare_test_files(config: &BenchmarkConfig) -> Result<()> {
    for path in config.target_paths() {
        generate_test_file(&path, config.file_size)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileDistribution;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    const MIB: u64 = 1024 * 1024;

    fn config_in(temp_dir: &TempDir, operation: Operation, concurrency: usize) -> BenchmarkConfig {
        BenchmarkConfig {
            chunk_size: 4096,
            file_size: MIB,
            file_path: temp_dir.path().join("bench.dat"),
            operation,
            concurrency,
            ..Default::default()
        }
    }

    #[test]
    fn test_concurrent_write_run() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir, Operation::Write, 4);

        let snapshot = run_benchmark(&config).unwrap();

        assert_eq!(snapshot.bytes_written, 4 * MIB);
        assert_eq!(snapshot.bytes_read, 0);
        assert_eq!(snapshot.write_operations, 4);
        assert_eq!(snapshot.total_operations, 4);
        assert_eq!(fs::metadata(&config.file_path).unwrap().len(), MIB);
        assert!(snapshot.start_time.unwrap() <= snapshot.end_time.unwrap());
    }

    #[test]
    fn test_read_run() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir, Operation::Read, 3);

        let snapshot = run_benchmark(&config).unwrap();

        assert_eq!(snapshot.bytes_read, 3 * MIB);
        assert_eq!(snapshot.bytes_written, 0);
        assert_eq!(snapshot.read_operations, 3);
    }

    #[test]
    fn test_mixed_run_per_worker() {
        let temp_dir = TempDir::new().unwrap();
        let config = BenchmarkConfig {
            distribution: FileDistribution::PerWorker,
            ..config_in(&temp_dir, Operation::Mixed, 2)
        };

        let snapshot = run_benchmark(&config).unwrap();

        assert_eq!(snapshot.bytes_written, 2 * MIB);
        assert_eq!(snapshot.bytes_read, 2 * MIB);
        assert_eq!(snapshot.total_operations, 4);
        for path in config.target_paths() {
            assert_eq!(fs::metadata(&path).unwrap().len(), MIB);
        }
    }

    #[test]
    fn test_mixed_run_shared_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir, Operation::Mixed, 1);

        let snapshot = run_benchmark(&config).unwrap();

        assert_eq!(snapshot.bytes_written, MIB);
        assert_eq!(snapshot.bytes_read, MIB);
        assert_eq!(snapshot.read_operations, 1);
        assert_eq!(snapshot.write_operations, 1);
    }

    #[test]
    fn test_concurrent_mixed_run_shared_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir, Operation::Mixed, 8);

        assert!(matches!(run_benchmark(&config), Err(BenchError::Config(_))));
        assert!(!config.file_path.exists());
    }

    #[test]
    fn test_unaligned_chunk_size_still_runs() {
        let temp_dir = TempDir::new().unwrap();
        let config = BenchmarkConfig {
            chunk_size: 3000,
            ..config_in(&temp_dir, Operation::Write, 1)
        };

        let snapshot = run_benchmark(&config).unwrap();
        assert_eq!(snapshot.bytes_written, MIB);
    }

    #[test]
    fn test_invalid_config_touches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let config = BenchmarkConfig {
            chunk_size: 0,
            ..config_in(&temp_dir, Operation::Write, 1)
        };

        assert!(matches!(run_benchmark(&config), Err(BenchError::Config(_))));
        assert!(!config.file_path.exists());
    }

    #[test]
    fn test_expired_timeout_cancels_run() {
        let temp_dir = TempDir::new().unwrap();
        let config = BenchmarkConfig {
            timeout: Some(Duration::from_nanos(1)),
            ..config_in(&temp_dir, Operation::Read, 2)
        };

        let err = run_benchmark(&config).unwrap_err();
        assert!(err.is_cancelled(), "expected cancellation, got {:?}", err);
    }

    #[test]
    fn test_missing_parent_directory_fails_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config = BenchmarkConfig {
            file_path: temp_dir.path().join("missing").join("bench.dat"),
            ..config_in(&temp_dir, Operation::Write, 1)
        };

        assert!(matches!(run_benchmark(&config), Err(BenchError::Io { .. })));
    }
}
