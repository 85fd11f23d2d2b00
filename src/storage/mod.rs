//! Filesystem block-size detection and chunk alignment
//!
//! Chunk sizes that are a multiple of the filesystem's native block size
//! avoid read-modify-write cycles on partial blocks. This module queries the
//! block size and checks a requested chunk size against it.
//!
//! The check is advisory: it validates intent before a run, and the IO engine
//! itself accepts any positive chunk size.
//!
//! # Platform support
//!
//! Block-size lookup goes through the [`BlockSizeProbe`] capability trait.
//! [`default_probe`] selects the implementation at build time:
//!
//! - **Unix**: [`StatvfsProbe`], backed by `statvfs(3)`
//! - **Everything else**: [`FixedBlockSize`] reporting [`FALLBACK_BLOCK_SIZE`]

use crate::error::{BenchError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Block size assumed when the platform offers no query
pub const FALLBACK_BLOCK_SIZE: u64 = 4096;

/// Source of filesystem block sizes
pub trait BlockSizeProbe: Send + Sync {
    /// Native block size of the filesystem containing `path`
    fn block_size(&self, path: &Path) -> Result<u64>;
}

/// Block size lookup via `statvfs(3)`
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default)]
pub struct StatvfsProbe;

#[cfg(unix)]
impl BlockSizeProbe for StatvfsProbe {
    fn block_size(&self, path: &Path) -> Result<u64> {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let query_error = |source: std::io::Error| BenchError::FileSystemQuery {
            path: path.to_path_buf(),
            source,
        };

        let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|e| {
            query_error(std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
        })?;

        // SAFETY: c_path is a valid NUL-terminated string and stat is a
        // properly sized out-parameter that statvfs fully initializes on success
        let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
        let result = unsafe { libc::statvfs(c_path.as_ptr(), &mut stat) };

        if result != 0 {
            return Err(query_error(std::io::Error::last_os_error()));
        }

        #[allow(clippy::unnecessary_cast)]
        let block_size = stat.f_bsize as u64;
        if block_size == 0 {
            return Err(query_error(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "filesystem reported a zero block size",
            )));
        }

        Ok(block_size)
    }
}

/// Probe that reports a constant block size
#[derive(Debug, Clone, Copy)]
pub struct FixedBlockSize(pub u64);

impl Default for FixedBlockSize {
    fn default() -> Self {
        Self(FALLBACK_BLOCK_SIZE)
    }
}

impl BlockSizeProbe for FixedBlockSize {
    fn block_size(&self, _path: &Path) -> Result<u64> {
        Ok(self.0)
    }
}

/// Probe for the current build target
#[cfg(unix)]
pub fn default_probe() -> Box<dyn BlockSizeProbe> {
    Box::new(StatvfsProbe)
}

/// Probe for the current build target
#[cfg(not(unix))]
pub fn default_probe() -> Box<dyn BlockSizeProbe> {
    Box::new(FixedBlockSize::default())
}

/// Outcome of comparing a chunk size with the filesystem block size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockAlignmentReport {
    pub path: PathBuf,
    pub chunk_size: u64,
    pub block_size: u64,
    pub aligned: bool,
}

impl BlockAlignmentReport {
    /// Convert a misaligned verdict into [`BenchError::MisalignedChunk`]
    pub fn into_result(self) -> Result<Self> {
        if self.aligned {
            Ok(self)
        } else {
            Err(BenchError::MisalignedChunk {
                path: self.path,
                chunk_size: self.chunk_size,
                block_size: self.block_size,
            })
        }
    }
}

/// Native block size of the filesystem containing `path`
///
/// # Errors
///
/// Returns [`BenchError::FileSystemQuery`] if `path` is inaccessible.
pub fn get_block_size(path: &Path) -> Result<u64> {
    default_probe().block_size(path)
}

/// Fail with [`BenchError::MisalignedChunk`] unless `chunk_size` is a
/// multiple of the block size at `path`
pub fn check_chunk_size(path: &Path, chunk_size: u64) -> Result<BlockAlignmentReport> {
    check_chunk_size_with(default_probe().as_ref(), path, chunk_size)
}

/// [`check_chunk_size`] against an explicit probe
pub fn check_chunk_size_with(
    probe: &dyn BlockSizeProbe,
    path: &Path,
    chunk_size: u64,
) -> Result<BlockAlignmentReport> {
    alignment_report_with(probe, path, chunk_size)?.into_result()
}

/// Compare `chunk_size` with the block size at `path` without failing on misalignment
pub fn alignment_report(path: &Path, chunk_size: u64) -> Result<BlockAlignmentReport> {
    alignment_report_with(default_probe().as_ref(), path, chunk_size)
}

/// [`alignment_report`] against an explicit probe
pub fn alignment_report_with(
    probe: &dyn BlockSizeProbe,
    path: &Path,
    chunk_size: u64,
) -> Result<BlockAlignmentReport> {
    if chunk_size == 0 {
        return Err(BenchError::Config(format!(
            "chunk size must be a positive value, got {}",
            chunk_size
        )));
    }

    let block_size = probe.block_size(path)?;
    Ok(BlockAlignmentReport {
        path: path.to_path_buf(),
        chunk_size,
        block_size,
        aligned: chunk_size % block_size == 0,
    })
}

/// Closest existing ancestor of `path`, for querying a file that may not exist yet
pub fn nearest_existing(path: &Path) -> PathBuf {
    path.ancestors()
        .find(|p| !p.as_os_str().is_empty() && p.exists())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
