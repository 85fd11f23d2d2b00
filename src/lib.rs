//! storagetester - concurrent chunked storage IO benchmark
//!
//! Measures how a filesystem handles whole-file reads and writes issued in
//! fixed-size chunks by several concurrent workers.
//!
//! # Architecture
//!
//! - **Engine**: chunked read/write and test file generation
//! - **Worker pool**: scoped worker threads with first-failure cancellation
//! - **Stats**: lock-free counters, run boundaries, point resource sample
//! - **Storage**: filesystem block size detection and chunk alignment
//! - **Output**: text, JSON, and CSV reports

pub mod config;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod output;
pub mod stats;
pub mod storage;
pub mod util;
pub mod worker;

// Re-export commonly used types
pub use config::BenchmarkConfig;
pub use coordinator::run_benchmark;
pub use error::{BenchError, Result};
pub use stats::{MetricsCollector, MetricsSnapshot};
