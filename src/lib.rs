/*!
 * Sync Containers
 * Thread-safe containers and a worker pool for in-process concurrency
 *
 * - [`BlockingQueue`]: unbounded FIFO with separate head and tail locks
 * - [`BlockingStack`]: LIFO with a blocking pop
 * - [`ConcurrentTable`]: bucket-locked hash table that grows along a prime ladder
 * - [`WorkerPool`]: fixed worker threads draining a shared task queue
 *
 * ```
 * use sync_containers::{ConcurrentTable, WorkerPool};
 * use std::sync::Arc;
 *
 * let table = Arc::new(ConcurrentTable::<u32, u32>::new());
 * let pool = WorkerPool::new(2).unwrap();
 *
 * let handles: Vec<_> = (0..8)
 *     .map(|i| {
 *         let table = table.clone();
 *         pool.submit(move || table.add_pair(i, i * i)).unwrap()
 *     })
 *     .collect();
 * for handle in handles {
 *     handle.join().unwrap();
 * }
 *
 * assert_eq!(table.len(), 8);
 * assert_eq!(table.get_value(&3, 0), 9);
 * ```
 */

pub mod core;
pub mod monitoring;

// Re-exports
pub use crate::core::errors::{
    PoolError, PoolResult, TableError, TableResult, TaskError, TaskResult,
};
pub use crate::core::sync::{
    BlockingQueue, BlockingStack, ConcurrentTable, PoolConfig, PoolStats, TableConfig,
    TableStats, TaskHandle, TaskId, WorkerPool,
};
pub use monitoring::init_tracing;
