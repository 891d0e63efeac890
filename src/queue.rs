//! A bounded worker pool with an await-quiescence barrier.
//!
//! The parallel analysis phase submits registration work as small jobs, and
//! jobs may fan out into further jobs. The driver blocks on
//! [`WorkQueue::await_quiescence`] until everything submitted, directly or
//! transitively, has finished. In fail-fast mode the first job error
//! cancels all not-yet-started jobs; work already committed to the action
//! graph stays valid and can still be unregistered afterwards.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use crate::error::DriverError;

/// Result of a single submitted job.
pub type JobResult = anyhow::Result<()>;

struct QueueState {
    in_flight: usize,
    first_error: Option<anyhow::Error>,
}

struct QueueCore {
    pool: rayon::ThreadPool,
    state: Mutex<QueueState>,
    quiescence: Condvar,
    fail_fast: bool,
    cancelled: AtomicBool,
}

/// Handle to a fixed-size worker pool. Cloning is cheap and every clone
/// drives the same pool, so jobs can submit follow-up jobs through the
/// handle they receive.
#[derive(Clone)]
pub struct WorkQueue {
    core: Arc<QueueCore>,
}

impl WorkQueue {
    /// Builds a pool of `workers` threads named after `name`.
    ///
    /// With `fail_fast` set, the first failing job flips the queue into the
    /// cancelled state and jobs that have not started yet are skipped.
    pub fn new(name: &str, workers: usize, fail_fast: bool) -> Result<Self, DriverError> {
        let name = name.to_owned();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(move |index| format!("{name}-{index}"))
            .build()?;

        Ok(Self {
            core: Arc::new(QueueCore {
                pool,
                state: Mutex::new(QueueState {
                    in_flight: 0,
                    first_error: None,
                }),
                quiescence: Condvar::new(),
                fail_fast,
                cancelled: AtomicBool::new(false),
            }),
        })
    }

    /// Submits a job for execution on the pool.
    ///
    /// The job receives a queue handle and may call `execute` itself; the
    /// quiescence barrier accounts for such recursive submissions because a
    /// job counts as in flight while it spawns its children.
    pub fn execute<F>(&self, job: F)
    where
        F: FnOnce(&WorkQueue) -> JobResult + Send + 'static,
    {
        {
            let mut state = self.core.state.lock().unwrap();
            state.in_flight += 1;
        }

        let core = Arc::clone(&self.core);
        self.core.pool.spawn(move || {
            let queue = WorkQueue {
                core: Arc::clone(&core),
            };

            if !core.cancelled.load(Ordering::Acquire)
                && let Err(err) = job(&queue)
            {
                tracing::debug!("worker job failed: {err:#}");
                if core.fail_fast {
                    core.cancelled.store(true, Ordering::Release);
                }

                let mut state = core.state.lock().unwrap();
                if state.first_error.is_none() {
                    state.first_error = Some(err);
                }
            }

            let mut state = core.state.lock().unwrap();
            state.in_flight -= 1;
            if state.in_flight == 0 {
                core.quiescence.notify_all();
            }
        });
    }

    /// Blocks until no job is pending or running, then reports the first
    /// job error, if any, exactly once.
    pub fn await_quiescence(&self) -> Result<(), DriverError> {
        let mut state = self.core.state.lock().unwrap();
        while state.in_flight > 0 {
            state = self.core.quiescence.wait(state).unwrap();
        }

        match state.first_error.take() {
            Some(err) => Err(DriverError::Job(err)),
            None => Ok(()),
        }
    }

    /// True once a fail-fast queue has seen an error.
    pub fn is_cancelled(&self) -> bool {
        self.core.cancelled.load(Ordering::Acquire)
    }
}
