//! Worker pool
//!
//! Runs one job concurrently across a fixed number of OS threads and blocks
//! until every thread has exited. There is a single primitive,
//! [`WorkerPool::run_supervised`], which hands each worker its index and a
//! [`CancelSignal`] and collects the first failure. [`WorkerPool::run_fixed`]
//! is a thin adapter over it for fire-and-forget jobs.
//!
//! # Guarantees
//!
//! - Exactly `n` workers are launched, each invoking the job once
//! - No ordering between workers
//! - The call never returns while a launched worker is still running, even
//!   after cancellation or failure
//!
//! # Example
//!
//! ```
//! use storagetester::worker::WorkerPool;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let counter = AtomicUsize::new(0);
//! WorkerPool::new(8).run_fixed(|| {
//!     counter.fetch_add(1, Ordering::Relaxed);
//! });
//! assert_eq!(counter.load(Ordering::Relaxed), 8);
//! ```

use crate::error::{BenchError, Result};
use crate::util::cancel::CancelSignal;
use crossbeam::channel;
use std::thread;
use tracing::{debug, error, warn};

/// Fixed-size pool of worker threads, dispatched once per call
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Create a pool that launches `workers` threads per run
    pub fn new(workers: usize) -> Self {
        Self { workers }
    }

    /// Number of workers launched per run
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `job` once on every worker, surfacing the first failure
    ///
    /// Each worker receives its index (`0..workers`) and a cancellation signal.
    /// The first worker to fail cancels that signal so the others can stop at
    /// their next checkpoint. If several fail concurrently, which failure is
    /// returned is unspecified.
    ///
    /// # Errors
    ///
    /// - [`BenchError::Worker`] wrapping the first error returned by a job
    /// - [`BenchError::WorkerPanicked`] if a worker panicked and none failed first
    /// - [`BenchError::Io`] if a worker thread could not be spawned
    pub fn run_supervised<F>(&self, job: F) -> Result<()>
    where
        F: Fn(usize, &CancelSignal) -> Result<()> + Sync,
    {
        self.run_supervised_with(&CancelSignal::new(), job)
    }

    /// [`run_supervised`](Self::run_supervised) under a caller-owned signal
    ///
    /// Workers observe a child of `parent`: cancelling `parent` (or letting its
    /// deadline pass) stops them, while a worker failure only cancels the
    /// child and leaves `parent` untouched.
    pub fn run_supervised_with<F>(&self, parent: &CancelSignal, job: F) -> Result<()>
    where
        F: Fn(usize, &CancelSignal) -> Result<()> + Sync,
    {
        let cancel = parent.child();
        // One slot per worker, and each worker reports at most once, so no sender blocks
        let (err_tx, err_rx) = channel::bounded::<BenchError>(self.workers.max(1));
        let job = &job;

        let spawn_failure = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.workers);
            let mut spawn_failure = None;

            for worker_id in 0..self.workers {
                let worker_cancel = cancel.clone();
                let worker_tx = err_tx.clone();

                let spawned = thread::Builder::new()
                    .name(format!("bench-worker-{}", worker_id))
                    .spawn_scoped(scope, move || {
                        if let Err(err) = job(worker_id, &worker_cancel) {
                            if !err.is_cancelled() {
                                debug!(worker_id, error = %err, "worker failed, cancelling siblings");
                            }
                            // Enqueue before cancelling so sibling cancellations land behind it
                            let _ = worker_tx.send(BenchError::Worker {
                                worker_id,
                                source: Box::new(err),
                            });
                            worker_cancel.cancel();
                        }
                    });

                match spawned {
                    Ok(handle) => handles.push((worker_id, handle)),
                    Err(e) => {
                        warn!(worker_id, error = %e, "failed to spawn worker thread");
                        cancel.cancel();
                        spawn_failure = Some(BenchError::io("spawn", format!("bench-worker-{}", worker_id), 0, e));
                        break;
                    }
                }
            }

            // Join explicitly so a panicking worker is reported instead of re-panicking the scope
            for (worker_id, handle) in handles {
                if handle.join().is_err() {
                    error!(worker_id, "worker thread panicked");
                    cancel.cancel();
                    let _ = err_tx.send(BenchError::WorkerPanicked { worker_id });
                }
            }

            spawn_failure
        });

        drop(err_tx);
        if let Some(err) = spawn_failure {
            return Err(err);
        }
        match err_rx.try_recv() {
            Ok(err) => Err(err),
            Err(_) => Ok(()),
        }
    }

    /// Run a zero-argument job once on every worker
    ///
    /// There is no error channel: the job handles (logs, records) its own
    /// failures. A panicking worker is logged.
    pub fn run_fixed<F>(&self, job: F)
    where
        F: Fn() + Sync,
    {
        let outcome = self.run_supervised(|_, _| {
            job();
            Ok(())
        });
        if let Err(err) = outcome {
            error!(error = %err, "fire-and-forget worker did not complete");
        }
    }
}

/// Launch `n` workers running `job` and wait for all of them
pub fn run_fixed<F>(n: usize, job: F)
where
    F: Fn() + Sync,
{
    WorkerPool::new(n).run_fixed(job)
}

/// Launch `n` supervised workers and return the first failure, if any
pub fn run_supervised<F>(n: usize, job: F) -> Result<()>
where
    F: Fn(usize, &CancelSignal) -> Result<()> + Sync,
{
    WorkerPool::new(n).run_supervised(job)
}
