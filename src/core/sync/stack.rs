/*!
 * Blocking Stack
 * Single-lock LIFO with blocking pop, the coarse-grained sibling of the queue
 */

use parking_lot::{Condvar, Mutex};
use std::fmt;

/// Thread-safe LIFO stack guarded by one mutex
pub struct BlockingStack<T> {
    items: Mutex<Vec<T>>,
    data_cond: Condvar,
}

impl<T> BlockingStack<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            data_cond: Condvar::new(),
        }
    }

    /// Push a value and wake one waiting consumer
    pub fn push(&self, value: T) {
        self.items.lock().push(value);
        self.data_cond.notify_one();
    }

    /// Pop the most recently pushed value, or `None` if empty
    pub fn try_pop(&self) -> Option<T> {
        self.items.lock().pop()
    }

    /// Pop the most recently pushed value, blocking until one exists
    pub fn wait_and_pop(&self) -> T {
        let mut items = self.items.lock();
        loop {
            self.data_cond.wait_while(&mut items, |items| items.is_empty());
            if let Some(value) = items.pop() {
                return value;
            }
        }
    }

    pub fn empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Exchange contents with another stack
    ///
    /// Both locks are taken in address order, so two threads swapping the
    /// same pair in opposite directions cannot deadlock.
    pub fn swap(&self, other: &Self) {
        if std::ptr::eq(self, other) {
            return;
        }

        let (first, second) = if (self as *const Self) < (other as *const Self) {
            (self, other)
        } else {
            (other, self)
        };
        let mut a = first.items.lock();
        let mut b = second.items.lock();
        std::mem::swap(&mut *a, &mut *b);

        let a_filled = !a.is_empty();
        let b_filled = !b.is_empty();
        drop(b);
        drop(a);
        if a_filled {
            first.data_cond.notify_all();
        }
        if b_filled {
            second.data_cond.notify_all();
        }
    }
}

impl<T> Default for BlockingStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for BlockingStack<T> {
    fn clone(&self) -> Self {
        Self {
            items: Mutex::new(self.items.lock().clone()),
            data_cond: Condvar::new(),
        }
    }
}

impl<T> fmt::Debug for BlockingStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingStack")
            .field("len", &self.len())
            .finish()
    }
}
