//! Fixed-size worker pool.
//!
//! Tasks are nullary closures pushed onto a shared queue and consumed by a
//! fixed number of OS threads. Submitting returns a [`TaskHandle`] whose
//! [`join`](TaskHandle::join) blocks until the task's result is available.
//! [`WorkerPool::join_all`] is the batch barrier used by the runner.
//!
//! A panic inside a task is caught on the worker thread and surfaces as
//! [`PoolError::TaskPanicked`] from the matching handle; the worker keeps
//! serving the queue.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Errors observed when collecting a task result.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PoolError {
    /// The task panicked while running.
    #[error("worker task panicked")]
    TaskPanicked,

    /// The task was dropped before producing a result.
    #[error("worker pool shut down before the task completed")]
    Disconnected,
}

/// Future-like handle to the result of a submitted task.
#[derive(Debug)]
pub struct TaskHandle<T> {
    result: Receiver<Result<T, PoolError>>,
}

impl<T> TaskHandle<T> {
    /// Blocks until the task finishes and returns its result.
    pub fn join(self) -> Result<T, PoolError> {
        self.result.recv().unwrap_or(Err(PoolError::Disconnected))
    }

    /// Returns the result if the task already finished.
    pub fn try_join(&self) -> Option<Result<T, PoolError>> {
        self.result.try_recv().ok()
    }
}

/// A fixed set of worker threads consuming a shared task queue.
///
/// # Usage
///
/// ```
/// use u_evolve::pool::WorkerPool;
///
/// let pool = WorkerPool::new(2).unwrap();
/// let handles: Vec<_> = (0..4).map(|i| pool.submit(move || i * i)).collect();
/// let results: Vec<_> = WorkerPool::join_all(handles)
///     .into_iter()
///     .map(|r| r.unwrap())
///     .collect();
/// assert_eq!(results, vec![0, 1, 4, 9]);
/// ```
pub struct WorkerPool {
    queue: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `threads` workers (at least one).
    ///
    /// # Errors
    /// Fails if the OS refuses to spawn a thread; workers already spawned
    /// are shut down.
    pub fn new(threads: usize) -> std::io::Result<Self> {
        let (queue, jobs) = unbounded::<Job>();
        let mut pool = Self {
            queue: Some(queue),
            workers: Vec::with_capacity(threads.max(1)),
        };
        for i in 0..threads.max(1) {
            let jobs = jobs.clone();
            let worker = thread::Builder::new()
                .name(format!("u-evolve-worker-{i}"))
                .spawn(move || {
                    // Ends once every sender is dropped and the queue drains.
                    for job in jobs.iter() {
                        job();
                    }
                })?;
            pool.workers.push(worker);
        }
        Ok(pool)
    }

    /// Number of worker threads.
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queues a task and returns a handle to its result.
    pub fn submit<F, T>(&self, task: F) -> TaskHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = bounded(1);
        let job: Job = Box::new(move || {
            let result = catch_unwind(AssertUnwindSafe(task)).map_err(|_| PoolError::TaskPanicked);
            // The handle may have been dropped; nobody is waiting then.
            let _ = tx.send(result);
        });

        if let Some(queue) = &self.queue {
            // Workers hold the receiving end for the pool's whole lifetime.
            let _ = queue.send(job);
        }
        TaskHandle { result: rx }
    }

    /// Waits for every handle, preserving submission order.
    pub fn join_all<T>(handles: Vec<TaskHandle<T>>) -> Vec<Result<T, PoolError>> {
        handles.into_iter().map(TaskHandle::join).collect()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        drop(self.queue.take());
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("threads", &self.workers.len())
            .finish()
    }
}

/// Thread count used when none is configured.
pub fn default_threads() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::time::Duration;

    #[test]
    fn test_results_in_submission_order() {
        let pool = WorkerPool::new(3).unwrap();
        let handles: Vec<_> = (0..20)
            .map(|i| {
                pool.submit(move || {
                    thread::sleep(Duration::from_millis((20 - i) as u64));
                    i
                })
            })
            .collect();
        let results: Vec<usize> = WorkerPool::join_all(handles)
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(results, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_runs_concurrently() {
        // Two tasks that each wait for the other can only finish with two workers.
        let pool = WorkerPool::new(2).unwrap();
        let barrier = Arc::new(Barrier::new(2));
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let barrier = barrier.clone();
                pool.submit(move || {
                    barrier.wait();
                    true
                })
            })
            .collect();
        assert!(WorkerPool::join_all(handles).into_iter().all(|r| r == Ok(true)));
    }

    #[test]
    fn test_zero_threads_clamped() {
        let pool = WorkerPool::new(0).unwrap();
        assert_eq!(pool.size(), 1);
        assert_eq!(pool.submit(|| 5).join(), Ok(5));
    }

    #[test]
    fn test_panic_is_reported_and_worker_survives() {
        let pool = WorkerPool::new(1).unwrap();
        let failed = pool.submit(|| -> u32 { panic!("boom") });
        assert_eq!(failed.join(), Err(PoolError::TaskPanicked));

        let ok = pool.submit(|| 7u32);
        assert_eq!(ok.join(), Ok(7));
    }

    #[test]
    fn test_drop_drains_queue() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let pool = WorkerPool::new(2).unwrap();
            for _ in 0..8 {
                let counter = counter.clone();
                pool.submit(move || {
                    thread::sleep(Duration::from_millis(5));
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            }
        }
        assert_eq!(counter.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn test_try_join() {
        let pool = WorkerPool::new(1).unwrap();
        let handle = pool.submit(|| 1);
        let result = loop {
            if let Some(r) = handle.try_join() {
                break r;
            }
            thread::yield_now();
        };
        assert_eq!(result, Ok(1));
    }

    #[test]
    fn test_default_threads_positive() {
        assert!(default_threads() >= 1);
    }
}
