/*!
 * Worker Pool
 *
 * Fixed set of worker threads fed from one internal [`BlockingQueue`].
 *
 * # Shutdown
 *
 * `shutdown` flips the pool to draining under an exclusive lock that every
 * `submit` holds shared, then queues one terminate message per worker. No
 * task can land behind those messages, FIFO order hands out every accepted
 * task first, and each worker exits on the message it pops. Workers never
 * wait on a flag, so a shutdown racing an empty queue cannot strand one.
 */

mod stats;
mod task;
mod worker;

pub use stats::PoolStats;
pub use task::{TaskHandle, TaskId};

use crate::core::errors::{PoolError, PoolResult};
use crate::core::sync::config::PoolConfig;
use crate::core::sync::queue::BlockingQueue;
use parking_lot::{Mutex, RwLock};
use stats::AtomicPoolStats;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use task::Message;
use tracing::{debug, error, info};

/// State shared between the pool handle and its workers
struct Shared {
    queue: BlockingQueue<Message>,
    stats: AtomicPoolStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PoolState {
    Running,
    Draining,
    Terminated,
}

/// Fixed-size thread pool returning a result handle per submission
///
/// # Example
///
/// ```
/// use sync_containers::WorkerPool;
///
/// let pool = WorkerPool::new(4).unwrap();
/// let handle = pool.submit(|| 6 * 7).unwrap();
/// assert_eq!(handle.join(), Ok(42));
///
/// pool.shutdown();
/// assert!(pool.submit(|| ()).is_err());
/// ```
pub struct WorkerPool {
    shared: Arc<Shared>,
    state: RwLock<PoolState>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    /// Threads owned by this pool, fixed at construction
    worker_ids: Vec<ThreadId>,
    worker_count: usize,
    next_task_id: AtomicU64,
}

impl WorkerPool {
    /// Start a pool with `workers` threads and default settings
    pub fn new(workers: usize) -> PoolResult<Self> {
        Self::with_config(PoolConfig::with_workers(workers))
    }

    pub fn with_config(config: PoolConfig) -> PoolResult<Self> {
        config.validate()?;

        let shared = Arc::new(Shared {
            queue: BlockingQueue::new(),
            stats: AtomicPoolStats::new(),
        });

        let mut handles = Vec::with_capacity(config.workers);
        for index in 0..config.workers {
            match worker::spawn(index, &config, Arc::clone(&shared)) {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    error!(worker = index, error = %err, "failed to start worker");
                    for _ in 0..handles.len() {
                        shared.queue.push(Message::Terminate);
                    }
                    worker::join_all(handles);
                    return Err(err);
                }
            }
        }

        info!(
            workers = config.workers,
            prefix = %config.thread_name_prefix,
            "worker pool started"
        );

        let worker_ids = handles.iter().map(|h| h.thread().id()).collect();

        Ok(Self {
            shared,
            state: RwLock::new(PoolState::Running),
            workers: Mutex::new(handles),
            worker_ids,
            worker_count: config.workers,
            next_task_id: AtomicU64::new(0),
        })
    }

    /// Queue `task` for execution and return its result handle
    ///
    /// Fails with [`PoolError::SubmissionAfterShutdown`] once shutdown began;
    /// nothing is enqueued in that case.
    pub fn submit<F, T>(&self, task: F) -> PoolResult<TaskHandle<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let state = self.state.read();
        if *state != PoolState::Running {
            return Err(PoolError::SubmissionAfterShutdown);
        }

        let id = self.next_task_id.fetch_add(1, Ordering::Relaxed);
        let (job, handle) = task::package(id, task);
        self.shared.stats.inc_submitted();
        self.shared.queue.push(Message::Run { id, job });
        Ok(handle)
    }

    /// Stop accepting work, drain the queue, and join every worker
    ///
    /// Idempotent. Concurrent callers all return after the workers are gone.
    ///
    /// Called from one of this pool's own workers (a task holding the pool),
    /// it only begins draining and returns without joining: the calling
    /// worker is still running its task. The pool stays draining until a
    /// call from outside the pool, or the pool's drop, joins the workers.
    pub fn shutdown(&self) {
        {
            let mut state = self.state.write();
            if *state == PoolState::Running {
                *state = PoolState::Draining;
                for _ in 0..self.worker_count {
                    self.shared.queue.push(Message::Terminate);
                }
                info!(workers = self.worker_count, "worker pool draining");
            }
        }

        if self.is_worker_thread() {
            debug!("shutdown called from a worker; leaving the join to an outside caller");
            return;
        }

        let mut workers = self.workers.lock();
        if workers.is_empty() {
            return;
        }
        worker::join_all(workers.drain(..));
        *self.state.write() = PoolState::Terminated;

        let stats = self.stats();
        info!(
            completed = stats.completed,
            failed = stats.failed,
            "worker pool shut down"
        );
    }

    fn is_worker_thread(&self) -> bool {
        let current = thread::current().id();
        self.worker_ids.contains(&current)
    }

    /// True once shutdown has begun
    pub fn is_shutdown(&self) -> bool {
        *self.state.read() != PoolState::Running
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn stats(&self) -> PoolStats {
        self.shared.stats.snapshot(self.worker_count)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Dropped on one of its own workers, the others are detached rather than joined
        self.shutdown();
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("state", &*self.state.read())
            .field("stats", &self.stats())
            .finish()
    }
}
