/*!
 * Lock-Free Pool Statistics
 * Atomic counters updated by workers, read as a snapshot
 */

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Atomic pool statistics for lock-free updates
///
/// # Performance
/// - Cache-line aligned to prevent false sharing with the task queue
/// - All operations use relaxed ordering; joining the workers orders the
///   final values
#[repr(C, align(64))]
pub(super) struct AtomicPoolStats {
    submitted: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    active: AtomicUsize,
}

impl AtomicPoolStats {
    pub(super) const fn new() -> Self {
        Self {
            submitted: AtomicU64::new(0),
            completed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            active: AtomicUsize::new(0),
        }
    }

    #[inline(always)]
    pub(super) fn inc_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    /// A worker moved from idle to executing
    #[inline(always)]
    pub(super) fn task_started(&self) {
        self.active.fetch_add(1, Ordering::Relaxed);
    }

    /// A worker finished executing, successfully or not
    #[inline(always)]
    pub(super) fn task_finished(&self, succeeded: bool) {
        if succeeded {
            self.completed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        self.active.fetch_sub(1, Ordering::Relaxed);
    }

    pub(super) fn snapshot(&self, workers: usize) -> PoolStats {
        PoolStats {
            workers,
            submitted: self.submitted.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            active: self.active.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time pool statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    pub workers: usize,
    pub submitted: u64,
    pub completed: u64,
    pub failed: u64,
    /// Workers currently executing a task
    pub active: usize,
}

impl PoolStats {
    /// Tasks submitted but not yet picked up by a worker
    pub fn pending(&self) -> u64 {
        self.submitted
            .saturating_sub(self.completed + self.failed + self.active as u64)
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.completed + self.failed;
        if total == 0 {
            return 1.0;
        }
        self.completed as f64 / total as f64
    }

    pub fn utilization(&self) -> f64 {
        if self.workers == 0 {
            return 0.0;
        }
        self.active as f64 / self.workers as f64
    }
}
