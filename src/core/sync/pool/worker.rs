/*!
 * Pool Workers
 *
 * Each worker is an OS thread bound to the pool for its whole life:
 *
 * ```text
 * Running --(task popped)--> Executing --(task done)--> Running
 * Running --(terminate popped)--> Terminated
 * ```
 *
 * Terminate messages are queued behind every task accepted before shutdown,
 * so a worker only retires once that backlog has been handed out.
 */

use super::task::Message;
use super::Shared;
use crate::core::errors::{PoolError, PoolResult};
use crate::core::sync::config::PoolConfig;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, warn};

/// Start worker `index`
pub(super) fn spawn(
    index: usize,
    config: &PoolConfig,
    shared: Arc<Shared>,
) -> PoolResult<JoinHandle<()>> {
    let mut builder =
        thread::Builder::new().name(format!("{}-{}", config.thread_name_prefix, index));
    if let Some(stack_size) = config.stack_size {
        builder = builder.stack_size(stack_size);
    }

    builder
        .spawn(move || run(index, &shared))
        .map_err(|err| PoolError::SpawnFailed {
            index,
            reason: err.to_string(),
        })
}

fn run(index: usize, shared: &Shared) {
    debug!(worker = index, "worker started");

    loop {
        match shared.queue.wait_and_pop() {
            Message::Run { id, job } => {
                shared.stats.task_started();
                let status = job();
                shared.stats.task_finished(status.is_ok());
                if let Err(err) = status {
                    warn!(worker = index, task = id, error = %err, "task failed");
                }
            }
            Message::Terminate => break,
        }
    }

    debug!(worker = index, "worker terminated");
}

/// Join worker threads
///
/// Must not be called from one of the threads being joined.
pub(super) fn join_all(handles: impl IntoIterator<Item = JoinHandle<()>>) {
    for handle in handles {
        let name = handle.thread().name().unwrap_or("<unnamed>").to_string();
        if handle.join().is_err() {
            error!(worker = %name, "worker thread panicked outside a task");
        }
    }
}
