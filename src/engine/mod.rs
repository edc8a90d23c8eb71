//! Bounded worker pool for per-unit decompilation tasks.
//!
//! The pool holds at most `worker_count` concurrent task executions; excess
//! work queues FIFO in a channel. Workers are crossbeam scoped threads, so
//! every exit path of [`TaskManager::run`] joins every worker before
//! returning and no thread can leak across calls.
//!
//! Correctness contract: for every job handed to `run`, exactly one
//! [`DecompileResult`] reaches the sink and the returned vector, in
//! completion order. A panicking task is caught at the worker boundary and
//! converted into a failed result for its job rather than aborting the batch.

mod progress;

pub use progress::ProgressTracker;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use crossbeam::channel::bounded;
use tracing::{error, info, warn};

use crate::model::DecompileResult;
use crate::task::DecompileTask;

pub struct TaskManager {
    workers: usize,
}

impl TaskManager {
    /// Create a pool with the given worker count; zero means one worker per
    /// available CPU core.
    pub fn new(worker_count: usize) -> Self {
        let workers = if worker_count == 0 {
            num_cpus::get()
        } else {
            worker_count
        };
        Self { workers }
    }

    pub fn worker_count(&self) -> usize {
        self.workers
    }

    /// Run one task per item and collect every result.
    ///
    /// `task_factory` is invoked on a worker thread; `sink` is invoked on the
    /// calling thread, in completion order, before the result is appended to
    /// the returned vector. Progress is logged at each 10% boundary.
    pub fn run<T, F, S>(&self, items: Vec<T>, task_factory: F, mut sink: S) -> Vec<DecompileResult>
    where
        T: Send,
        F: Fn(T) -> DecompileTask + Send + Sync,
        S: FnMut(&DecompileResult),
    {
        let total = items.len();
        if total == 0 {
            return Vec::new();
        }

        let workers = self.workers.min(total);
        let (work_tx, work_rx) = bounded::<T>(workers * 2);
        let (result_tx, result_rx) = bounded::<DecompileResult>(workers * 2);

        let mut results = Vec::with_capacity(total);
        let mut progress = ProgressTracker::new(total);

        let scope_outcome = crossbeam::thread::scope(|s| {
            for _ in 0..workers {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                let task_factory = &task_factory;
                s.spawn(move |_| {
                    while let Ok(item) = work_rx.recv() {
                        let task = task_factory(item);
                        let job = task.job().clone();
                        let result = match catch_unwind(AssertUnwindSafe(|| task.run())) {
                            Ok(result) => result,
                            Err(_) => {
                                error!("task panicked while processing {}", job.source_name());
                                DecompileResult::failed(job, "task panicked")
                            }
                        };
                        if result_tx.send(result).is_err() {
                            break;
                        }
                    }
                });
            }

            s.spawn(move |_| {
                for item in items {
                    if work_tx.send(item).is_err() {
                        break;
                    }
                }
            });

            // The workers hold the only remaining senders; once they exit the
            // collector loop below ends.
            drop(result_tx);

            while let Ok(result) = result_rx.recv() {
                sink(&result);
                results.push(result);
                if let Some(boundary) = progress.record() {
                    info!(
                        "progress: {}% ({} of {} files)",
                        boundary,
                        progress.completed(),
                        progress.total()
                    );
                }
            }
        });

        // Workers catch task panics themselves, so this only fires if the
        // pool machinery itself went down. Collected results are preserved.
        if scope_outcome.is_err() {
            error!("worker pool terminated abnormally; returning collected results");
        }

        results
    }

    /// Fire-and-forget variant for parallel side-effecting operations such as
    /// archive extraction: submit all, wait for all, log the failure count.
    /// Nothing is surfaced to the caller beyond logging.
    pub fn execute_and_wait(&self, ops: Vec<Box<dyn FnOnce() -> Result<()> + Send>>) {
        let total = ops.len();
        if total == 0 {
            return;
        }

        let workers = self.workers.min(total);
        let (work_tx, work_rx) = bounded::<Box<dyn FnOnce() -> Result<()> + Send>>(workers * 2);
        let failures = AtomicUsize::new(0);

        let scope_outcome = crossbeam::thread::scope(|s| {
            for _ in 0..workers {
                let work_rx = work_rx.clone();
                let failures = &failures;
                s.spawn(move |_| {
                    while let Ok(op) = work_rx.recv() {
                        match catch_unwind(AssertUnwindSafe(op)) {
                            Ok(Ok(())) => {}
                            Ok(Err(e)) => {
                                error!("parallel operation failed: {e:#}");
                                failures.fetch_add(1, Ordering::Relaxed);
                            }
                            Err(_) => {
                                error!("parallel operation panicked");
                                failures.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                    }
                });
            }

            s.spawn(move |_| {
                for op in ops {
                    if work_tx.send(op).is_err() {
                        break;
                    }
                }
            });
        });
        if scope_outcome.is_err() {
            error!("worker pool terminated abnormally during parallel operations");
        }

        let failed = failures.load(Ordering::Relaxed);
        if failed > 0 {
            warn!("completed {total} parallel operations, {failed} failed");
        } else {
            info!("completed {total} parallel operations");
        }
    }
}
