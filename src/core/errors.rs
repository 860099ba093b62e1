/*!
 * Error Types
 * Pool and task failures with thiserror and miette diagnostics
 */

use miette::Diagnostic;
use thiserror::Error;

/// Result type for worker pool operations
pub type PoolResult<T> = Result<T, PoolError>;

/// Result type carried by a task handle
pub type TaskResult<T> = Result<T, TaskError>;

/// Result type for concurrent table construction
pub type TableResult<T> = Result<T, TableError>;

/// Worker pool errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum PoolError {
    #[error("Worker pool is shutting down; task rejected")]
    #[diagnostic(
        code(pool::submission_after_shutdown),
        help("Submit work before calling shutdown() or dropping the pool.")
    )]
    SubmissionAfterShutdown,

    #[error("Failed to spawn worker thread {index}: {reason}")]
    #[diagnostic(
        code(pool::spawn_failed),
        help("The OS refused to create a thread. Check thread limits and available memory.")
    )]
    SpawnFailed { index: usize, reason: String },

    #[error("Invalid pool configuration: {0}")]
    #[diagnostic(
        code(pool::invalid_config),
        help("A pool needs at least one worker and a non-empty thread name prefix.")
    )]
    InvalidConfig(String),
}

/// Failure attached to a single task's result handle
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum TaskError {
    #[error("Task panicked: {0}")]
    #[diagnostic(
        code(task::panicked),
        help("The task body panicked. The worker that ran it keeps serving other tasks.")
    )]
    Panicked(String),

    #[error("Task was dropped before producing a result")]
    #[diagnostic(
        code(task::abandoned),
        help("The result slot was released without a value, or it was already consumed.")
    )]
    Abandoned,
}

/// Concurrent table errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum TableError {
    #[error("Invalid table configuration: {0}")]
    #[diagnostic(
        code(table::invalid_config),
        help("A table needs at least one bucket.")
    )]
    InvalidConfig(String),
}
