/*!
 * Synchronization Primitives
 *
 * Blocking containers and the worker pool built on them:
 * - `BlockingQueue`: two-lock FIFO with blocking and non-blocking pops
 * - `BlockingStack`: single-lock LIFO with blocking pop
 * - `ConcurrentTable`: sharded hash table with stop-the-world resize
 * - `WorkerPool`: fixed thread pool draining a `BlockingQueue` of tasks
 *
 * # Lock Ordering
 *
 * Where two locks are held together they are always taken in the same order:
 * queue head before queue tail, table-wide lock before any bucket lock, and
 * stacks in address order.
 */

mod config;
mod pool;
mod queue;
mod stack;
mod table;

pub use config::{PoolConfig, TableConfig};
pub use pool::{PoolStats, TaskHandle, TaskId, WorkerPool};
pub use queue::BlockingQueue;
pub use stack::BlockingStack;
pub use table::{ConcurrentTable, TableStats};
