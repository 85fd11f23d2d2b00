//! Test file generation
//!
//! Test files are filled with random bytes so that storage-level compression
//! and deduplication cannot flatter the results. Data is produced and written
//! through one reusable buffer, so memory use stays at
//! [`GENERATE_BUFFER_SIZE`] no matter how large the file is.

use super::chunked::write_chunk;
use crate::error::{BenchError, Result};
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Size of the streaming buffer used by [`generate_test_file`]
pub const GENERATE_BUFFER_SIZE: usize = 1024 * 1024;

/// Files above this size log progress in 10% increments
const PROGRESS_THRESHOLD: u64 = 1024 * 1024 * 1024;

/// Create (or overwrite) `path` with exactly `size` random bytes
///
/// # Errors
///
/// - [`BenchError::Io`] if the file cannot be created or written
/// - [`BenchError::PartialTransfer`] if a write stalls, or the size on disk
///   does not match `size` afterwards
pub fn generate_test_file(path: &Path, size: u64) -> Result<()> {
    let start = Instant::now();
    let mut file = File::create(path).map_err(|e| BenchError::io("create", path, 0, e))?;

    let buffer_len = usize::try_from(size).map_or(GENERATE_BUFFER_SIZE, |s| s.min(GENERATE_BUFFER_SIZE));
    let mut buffer = vec![0u8; buffer_len];
    let mut rng = Xoshiro256PlusPlus::from_entropy();

    let show_progress = size > PROGRESS_THRESHOLD;
    let progress_interval = size / 10;
    let mut next_progress = progress_interval;

    let mut offset: u64 = 0;
    while offset < size {
        let len = (size - offset).min(buffer_len as u64) as usize;
        rng.fill_bytes(&mut buffer[..len]);
        write_chunk(&mut file, path, offset, &buffer[..len])?;
        offset += len as u64;

        if show_progress && offset >= next_progress {
            debug!(
                path = %path.display(),
                percent = (offset as f64 / size as f64 * 100.0).round(),
                "generating test file"
            );
            next_progress += progress_interval;
        }
    }

    file.flush().map_err(|e| BenchError::io("flush", path, offset, e))?;

    let on_disk = file
        .metadata()
        .map_err(|e| BenchError::io("stat", path, offset, e))?
        .len();
    if on_disk != size {
        return Err(BenchError::PartialTransfer {
            op: "generate",
            path: path.to_path_buf(),
            offset: 0,
            expected: size,
            actual: on_disk,
        });
    }

    info!(
        path = %path.display(),
        bytes = size,
        elapsed_secs = start.elapsed().as_secs_f64(),
        "generated test file"
    );
    Ok(())
}

/// Build an in-memory payload of `len` random bytes
///
/// Uses the same generator as [`generate_test_file`]; write workloads build
/// one payload up front and share it read-only across workers.
pub fn random_payload(len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    Xoshiro256PlusPlus::from_entropy().fill_bytes(&mut data);
    data
}
