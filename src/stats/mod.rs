//! Metrics collection
//!
//! A [`MetricsCollector`] is the one piece of shared mutable state in a
//! benchmark run. The run owns a single collector and lends it by reference
//! to every worker; workers report transferred bytes through
//! [`record_read`](MetricsCollector::record_read) and
//! [`record_write`](MetricsCollector::record_write), which are lock-free and
//! lose no updates under concurrency.
//!
//! Once the workload is done the collector is stopped, a point sample of
//! CPU and memory is attached, and [`snapshot`](MetricsCollector::snapshot)
//! produces the read-only [`MetricsSnapshot`] handed to the report formatters.
//!
//! # Example
//!
//! ```
//! use storagetester::stats::MetricsCollector;
//!
//! let metrics = MetricsCollector::new();
//! metrics.start();
//! metrics.record_read(4096);
//! metrics.record_write(8192);
//! metrics.stop();
//!
//! assert_eq!(metrics.total_operations(), 2);
//! assert_eq!(metrics.total_bytes(), 12288);
//! ```

use crate::util::resource::ResourceSample;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};
use tracing::warn;

/// Cache-line aligned atomic counter to prevent false sharing
///
/// Every worker hits the same collector, so each counter gets its own 64-byte
/// cache line.
///
/// # Memory Layout
///
/// ```text
/// [value: 8 bytes][padding: 56 bytes] = 64 bytes total
/// ```
#[repr(align(64))]
#[derive(Debug)]
pub struct AlignedCounter {
    value: AtomicU64,
    _padding: [u8; 56],
}

impl AlignedCounter {
    /// Create a new counter with initial value 0
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
            _padding: [0; 56],
        }
    }

    /// Increment the counter by the specified amount
    ///
    /// `Ordering::Relaxed` is sufficient: counters are independent and are
    /// only read after the workers have been joined.
    #[inline]
    pub fn add(&self, val: u64) {
        self.value.fetch_add(val, Ordering::Relaxed);
    }

    /// Get the current value of the counter
    #[inline]
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl Default for AlignedCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// A run boundary on both the monotonic and the wall clock
#[derive(Debug, Clone, Copy)]
struct Mark {
    instant: Instant,
    wall: DateTime<Utc>,
}

impl Mark {
    fn at(instant: Instant) -> Self {
        // Wall time is derived from the monotonic instant so start <= end holds on both clocks
        let now = Instant::now();
        let wall_now = Utc::now();
        let wall = if instant <= now {
            wall_now - to_chrono(now - instant)
        } else {
            wall_now + to_chrono(instant - now)
        };
        Self { instant, wall }
    }
}

fn to_chrono(d: Duration) -> chrono::Duration {
    chrono::Duration::from_std(d).unwrap_or(chrono::Duration::zero())
}

/// Thread-safe aggregate of one benchmark run
#[derive(Debug, Default)]
pub struct MetricsCollector {
    started: OnceLock<Mark>,
    stopped: OnceLock<Mark>,

    bytes_read: AlignedCounter,
    bytes_written: AlignedCounter,
    read_ops: AlignedCounter,
    write_ops: AlignedCounter,
    total_ops: AlignedCounter,

    resources: Mutex<Option<ResourceSample>>,
}

impl MetricsCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of the workload
    pub fn start(&self) {
        self.start_at(Instant::now());
    }

    /// Mark the start of the workload at an explicit instant
    ///
    /// Only the first call has an effect.
    pub fn start_at(&self, instant: Instant) {
        if self.started.set(Mark::at(instant)).is_err() {
            warn!("metrics start recorded more than once; keeping the first");
        }
    }

    /// Mark the end of the workload
    pub fn stop(&self) {
        self.stop_at(Instant::now());
    }

    /// Mark the end of the workload at an explicit instant
    ///
    /// Stopping before starting is a caller error; it is logged and ignored.
    /// Only the first call has an effect.
    pub fn stop_at(&self, instant: Instant) {
        if self.started.get().is_none() {
            warn!("metrics stop called before start; ignoring");
            return;
        }
        if self.stopped.set(Mark::at(instant)).is_err() {
            warn!("metrics stop recorded more than once; keeping the first");
        }
    }

    /// Record a completed read of `bytes`
    #[inline]
    pub fn record_read(&self, bytes: u64) {
        self.bytes_read.add(bytes);
        self.read_ops.add(1);
        self.total_ops.add(1);
    }

    /// Record a completed write of `bytes`
    #[inline]
    pub fn record_write(&self, bytes: u64) {
        self.bytes_written.add(bytes);
        self.write_ops.add(1);
        self.total_ops.add(1);
    }

    /// Take the point-in-time CPU/memory sample for this run
    ///
    /// Returns false if the platform does not expose the statistics, in which
    /// case both values report as zero.
    pub fn sample_resources(&self) -> bool {
        let sample = ResourceSample::take();
        if sample.is_none() {
            warn!("process resource statistics unavailable on this platform");
        }
        self.set_resources(sample);
        sample.is_some()
    }

    fn set_resources(&self, sample: Option<ResourceSample>) {
        // A poisoned lock still holds a plain Option; take it over
        let mut slot = self.resources.lock().unwrap_or_else(|e| e.into_inner());
        *slot = sample;
    }

    fn resources(&self) -> Option<ResourceSample> {
        *self.resources.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read.get()
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.get()
    }

    pub fn total_bytes(&self) -> u64 {
        self.bytes_read() + self.bytes_written()
    }

    pub fn read_operations(&self) -> u64 {
        self.read_ops.get()
    }

    pub fn write_operations(&self) -> u64 {
        self.write_ops.get()
    }

    pub fn total_operations(&self) -> u64 {
        self.total_ops.get()
    }

    /// Wall-clock duration of the whole run (end - start)
    ///
    /// Zero until both boundaries are recorded.
    pub fn latency(&self) -> Duration {
        match (self.started.get(), self.stopped.get()) {
            (Some(start), Some(end)) => end.instant.saturating_duration_since(start.instant),
            _ => Duration::ZERO,
        }
    }

    /// Bytes moved per second across reads and writes; 0 for a zero-length run
    pub fn throughput(&self) -> f64 {
        per_second(self.total_bytes(), self.latency())
    }

    /// Logical operations per second; 0 for a zero-length run
    pub fn iops(&self) -> f64 {
        per_second(self.total_operations(), self.latency())
    }

    /// Freeze the collector into a report-ready snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        let resources = self.resources();
        let latency = self.latency();

        MetricsSnapshot {
            start_time: self.started.get().map(|m| m.wall),
            end_time: self.stopped.get().map(|m| m.wall),
            latency_secs: latency.as_secs_f64(),
            bytes_written: self.bytes_written(),
            bytes_read: self.bytes_read(),
            total_operations: self.total_operations(),
            read_operations: self.read_operations(),
            write_operations: self.write_operations(),
            throughput_bytes_per_sec: self.throughput(),
            iops: self.iops(),
            cpu_usage_percent: resources.map_or(0.0, |r| r.cpu_percent),
            memory_usage_bytes: resources.map_or(0, |r| r.memory_rss_bytes),
        }
    }
}

fn per_second(count: u64, elapsed: Duration) -> f64 {
    let seconds = elapsed.as_secs_f64();
    if seconds > 0.0 {
        count as f64 / seconds
    } else {
        0.0
    }
}

/// Read-only result of a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub latency_secs: f64,
    pub bytes_written: u64,
    pub bytes_read: u64,
    pub total_operations: u64,
    pub read_operations: u64,
    pub write_operations: u64,
    pub throughput_bytes_per_sec: f64,
    pub iops: f64,
    pub cpu_usage_percent: f64,
    pub memory_usage_bytes: u64,
}
