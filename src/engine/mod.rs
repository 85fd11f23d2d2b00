//! Chunked IO engine
//!
//! This module issues the actual file IO for a benchmark run. Every transfer is
//! split into chunks of a caller-chosen size and each chunk is handed to the
//! operating system as one read or write call, which is the unit the benchmark
//! measures.
//!
//! # Operations
//!
//! - [`generate_test_file`]: create a file of exactly N random bytes through a
//!   bounded 1 MiB buffer
//! - [`write_chunked`]: truncate a file and write a payload in `chunk_size` slices
//! - [`read_chunked`]: stream a whole file through a `chunk_size` buffer until EOF
//!
//! The `*_cancellable` variants poll a [`CancelSignal`](crate::util::cancel::CancelSignal)
//! between chunks.
//!
//! # Concurrency
//!
//! Each call opens its own file handle and owns its buffers, so calls from
//! different threads never share mutable state. Concurrent writers to the
//! *same* path are outside the engine's contract: every `write_chunked`
//! truncates on open, so interleaved writers can observe each other's
//! truncation. Callers either run a single writer per path or partition
//! writers across distinct files.
//!
//! # Example
//!
//! ```no_run
//! use storagetester::engine::{generate_test_file, read_chunked, write_chunked};
//! use std::path::Path;
//!
//! let path = Path::new("/tmp/bench.dat");
//! generate_test_file(path, 1024 * 1024)?;
//! let data = read_chunked(path, 4096)?;
//! write_chunked(path, 4096, &data)?;
//! # Ok::<(), storagetester::BenchError>(())
//! ```

pub mod chunked;
pub mod generate;

pub use chunked::{read_chunked, read_chunked_cancellable, write_chunked, write_chunked_cancellable};
pub use generate::{generate_test_file, random_payload, GENERATE_BUFFER_SIZE};
