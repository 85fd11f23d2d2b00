//! Chunk-bounded reads and writes
//!
//! Writes slice the payload into contiguous `chunk_size` pieces, the final
//! piece clamped to whatever remains. Reads stream the file through a single
//! `chunk_size` buffer and stop at EOF; the last short read is the normal end
//! of the file, never an error.
//!
//! A file that grows while it is being read is unsupported: the reader keeps
//! going until it sees EOF, so the result may include bytes appended after
//! open. A file that shrinks before the reader reaches its size at open time
//! fails with [`BenchError::PartialTransfer`].

use crate::error::{BenchError, Result};
use crate::util::cancel::CancelSignal;
use std::fs::File;
use std::io::{self, ErrorKind, Read, Write};
use std::path::Path;
use tracing::debug;

/// Write `data` to `path` in `chunk_size` slices
///
/// The file is created or truncated first. Returns the number of bytes
/// written, which always equals `data.len()` on success.
///
/// # Errors
///
/// - [`BenchError::Io`] if the file cannot be created or a write fails
/// - [`BenchError::PartialTransfer`] if the OS accepts zero bytes for a chunk
pub fn write_chunked(path: &Path, chunk_size: usize, data: &[u8]) -> Result<u64> {
    write_chunked_cancellable(path, chunk_size, data, &CancelSignal::new())
}

/// [`write_chunked`] that checks `cancel` before every chunk
///
/// Returns [`BenchError::Cancelled`] with the number of bytes already written
/// when cancellation is observed.
pub fn write_chunked_cancellable(
    path: &Path,
    chunk_size: usize,
    data: &[u8],
    cancel: &CancelSignal,
) -> Result<u64> {
    ensure_chunk_size(path, chunk_size)?;

    let mut file = File::create(path).map_err(|e| BenchError::io("create", path, 0, e))?;

    let mut offset: u64 = 0;
    for chunk in data.chunks(chunk_size) {
        if cancel.is_cancelled() {
            return Err(BenchError::Cancelled {
                path: path.to_path_buf(),
                completed: offset,
            });
        }
        write_chunk(&mut file, path, offset, chunk)?;
        offset += chunk.len() as u64;
    }

    debug!(path = %path.display(), bytes = offset, chunk_size, "chunked write complete");
    Ok(offset)
}

/// Read the whole file at `path` through a `chunk_size` buffer
///
/// The result is pre-sized to the file length observed at open time and
/// filled until EOF.
///
/// # Errors
///
/// - [`BenchError::Io`] if the file cannot be opened, stat'ed, or read
/// - [`BenchError::PartialTransfer`] if EOF arrives before the size at open
pub fn read_chunked(path: &Path, chunk_size: usize) -> Result<Vec<u8>> {
    read_chunked_cancellable(path, chunk_size, &CancelSignal::new())
}

/// [`read_chunked`] that checks `cancel` before every chunk
pub fn read_chunked_cancellable(path: &Path, chunk_size: usize, cancel: &CancelSignal) -> Result<Vec<u8>> {
    ensure_chunk_size(path, chunk_size)?;

    let mut file = File::open(path).map_err(|e| BenchError::io("open", path, 0, e))?;
    let size_at_open = file
        .metadata()
        .map_err(|e| BenchError::io("stat", path, 0, e))?
        .len();

    let data = read_stream(&mut file, path, chunk_size, size_at_open, cancel)?;

    debug!(path = %path.display(), bytes = data.len(), chunk_size, "chunked read complete");
    Ok(data)
}

/// Drain `reader` until EOF through one `chunk_size` buffer
///
/// EOF before `expected` bytes is a [`BenchError::PartialTransfer`]: the file
/// shrank after it was opened.
fn read_stream<R: Read>(
    reader: &mut R,
    path: &Path,
    chunk_size: usize,
    expected: u64,
    cancel: &CancelSignal,
) -> Result<Vec<u8>> {
    let mut data = Vec::with_capacity(usize::try_from(expected).unwrap_or(0));
    let mut buffer = vec![0u8; chunk_size];

    loop {
        if cancel.is_cancelled() {
            return Err(BenchError::Cancelled {
                path: path.to_path_buf(),
                completed: data.len() as u64,
            });
        }

        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(BenchError::io("read", path, data.len() as u64, e)),
        };
        data.extend_from_slice(&buffer[..n]);
    }

    let actual = data.len() as u64;
    if actual < expected {
        return Err(BenchError::PartialTransfer {
            op: "read",
            path: path.to_path_buf(),
            offset: actual,
            expected,
            actual,
        });
    }

    Ok(data)
}

/// Hand one chunk to the OS, retrying partial writes until it is fully written
pub(crate) fn write_chunk(file: &mut File, path: &Path, offset: u64, chunk: &[u8]) -> Result<()> {
    let mut written = 0;

    while written < chunk.len() {
        match file.write(&chunk[written..]) {
            Ok(0) => {
                return Err(BenchError::PartialTransfer {
                    op: "write",
                    path: path.to_path_buf(),
                    offset,
                    expected: chunk.len() as u64,
                    actual: written as u64,
                });
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(BenchError::io("write", path, offset + written as u64, e)),
        }
    }

    Ok(())
}

// Zero is filtered out by config validation; a zero here would make `chunks()` panic.
fn ensure_chunk_size(path: &Path, chunk_size: usize) -> Result<()> {
    if chunk_size == 0 {
        return Err(BenchError::io(
            "chunk",
            path,
            0,
            io::Error::new(ErrorKind::InvalidInput, "chunk size must be greater than 0"),
        ));
    }
    Ok(())
}
