//! Error taxonomy
//!
//! Every library operation returns [`Result`], whose error side is a
//! [`BenchError`]. Variants carry enough context (path, offset, byte counts)
//! to diagnose a failed or short transfer without re-running the benchmark.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout storagetester
pub type Result<T, E = BenchError> = std::result::Result<T, E>;

/// Errors produced by the benchmark engine and its collaborators
#[derive(Debug, Error)]
pub enum BenchError {
    /// Invalid flag combination, rejected before any IO
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Filesystem statistics could not be read for a path
    #[error("failed to query filesystem statistics for {}: {source}", path.display())]
    FileSystemQuery {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Chunk size is not a multiple of the filesystem block size (advisory)
    #[error(
        "chunk size ({chunk_size}) is not aligned with the filesystem block size ({block_size}) at {}",
        path.display()
    )]
    MisalignedChunk {
        path: PathBuf,
        chunk_size: u64,
        block_size: u64,
    },

    /// Create/open/read/write/stat failure
    #[error("{op} failed: path={}, offset={offset}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        offset: u64,
        #[source]
        source: io::Error,
    },

    /// A non-final chunk moved fewer bytes than required
    #[error(
        "short {op}: path={}, offset={offset}, expected={expected} bytes, actual={actual} bytes",
        path.display()
    )]
    PartialTransfer {
        op: &'static str,
        path: PathBuf,
        offset: u64,
        expected: u64,
        actual: u64,
    },

    /// Cooperative cancellation observed between chunks
    #[error("cancelled: path={}, completed={completed} bytes", path.display())]
    Cancelled { path: PathBuf, completed: u64 },

    /// First failure surfaced by the supervised worker pool
    #[error("worker {worker_id} failed: {source}")]
    Worker {
        worker_id: usize,
        #[source]
        source: Box<BenchError>,
    },

    /// A worker thread panicked instead of returning
    #[error("worker {worker_id} panicked")]
    WorkerPanicked { worker_id: usize },

    /// Report serialization failure
    #[error("failed to render {format} report: {message}")]
    Report { format: &'static str, message: String },
}

impl BenchError {
    /// Shorthand for building an [`BenchError::Io`]
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, offset: u64, source: io::Error) -> Self {
        BenchError::Io {
            op,
            path: path.into(),
            offset,
            source,
        }
    }

    /// True if this error (or the worker failure wrapping it) is a cancellation
    pub fn is_cancelled(&self) -> bool {
        match self {
            BenchError::Cancelled { .. } => true,
            BenchError::Worker { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }
}
