/*!
 * Tasks and Result Handles
 *
 * A submitted closure is split in two: a type-erased job the workers run, and
 * a typed handle the submitter keeps. They share a single-slot channel that is
 * written exactly once, with the value or with the captured panic.
 */

use crate::core::errors::{TaskError, TaskResult};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Identifier assigned to each submission, unique per pool
pub type TaskId = u64;

/// Type-erased task body; reports whether it ran to completion
pub(super) type Job = Box<dyn FnOnce() -> TaskResult<()> + Send + 'static>;

/// Item carried by the pool's internal queue
pub(super) enum Message {
    Run { id: TaskId, job: Job },
    /// Retires the worker that pops it
    Terminate,
}

/// Wrap `task` into a job plus the handle that observes its outcome
pub(super) fn package<F, T>(id: TaskId, task: F) -> (Job, TaskHandle<T>)
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (sender, receiver) = flume::bounded(1);

    let job: Job = Box::new(move || {
        let outcome = panic::catch_unwind(AssertUnwindSafe(task))
            .map_err(|payload| TaskError::Panicked(panic_message(payload)));
        let status = match &outcome {
            Ok(_) => Ok(()),
            Err(err) => Err(err.clone()),
        };
        // The submitter may have dropped its handle; the result is discarded then
        let _ = sender.send(outcome);
        status
    });

    (job, TaskHandle { id, receiver })
}

/// Format panic payloads into a stable message
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic payload".to_string()
    }
}

/// Caller-side view of a submitted task
///
/// Resolves exactly once. After the outcome has been taken, further polls
/// report [`TaskError::Abandoned`].
#[must_use = "dropping a TaskHandle discards the task's result"]
pub struct TaskHandle<T> {
    id: TaskId,
    receiver: flume::Receiver<TaskResult<T>>,
}

impl<T> TaskHandle<T> {
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Block until the task has run and return its outcome
    pub fn join(self) -> TaskResult<T> {
        self.receiver.recv().unwrap_or(Err(TaskError::Abandoned))
    }

    /// Await the outcome without blocking the calling thread
    pub async fn join_async(self) -> TaskResult<T> {
        self.receiver
            .recv_async()
            .await
            .unwrap_or(Err(TaskError::Abandoned))
    }

    /// Take the outcome if the task already finished
    pub fn try_join(&self) -> Option<TaskResult<T>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(flume::TryRecvError::Empty) => None,
            Err(flume::TryRecvError::Disconnected) => Some(Err(TaskError::Abandoned)),
        }
    }

    pub fn is_finished(&self) -> bool {
        !self.receiver.is_empty() || self.receiver.is_disconnected()
    }
}

impl<T> fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id)
            .field("finished", &self.is_finished())
            .finish()
    }
}
