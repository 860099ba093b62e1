/*!
 * Blocking Queue
 *
 * Unbounded FIFO queue with separate head and tail locks.
 *
 * # Design: Two-Lock Chain
 *
 * Producers only ever touch the tail lock and consumers only ever touch the
 * head lock, so a push and a pop proceed in parallel. The one crossing point
 * is the emptiness check inside a pop, which briefly takes the tail lock to
 * compare the two ends. Lock order is always head before tail.
 *
 * - **FIFO**: pops are serialized by the head lock and walk the chain in
 *   link order
 * - **Exactly-once**: a node is moved out of its link by the single consumer
 *   holding the head lock
 * - **No lost wakeups**: `wait_and_pop` blocks on a predicate that is
 *   re-checked after every wake, and `push` routes its notification through
 *   the head lock whenever a waiter is registered
 */

mod node;

use node::{Link, Node};
use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Unbounded multi-producer multi-consumer FIFO queue
///
/// # Example
///
/// ```
/// use sync_containers::BlockingQueue;
///
/// let queue = BlockingQueue::new();
/// queue.push(1);
/// queue.push(2);
///
/// assert_eq!(queue.try_pop(), Some(1));
/// assert_eq!(queue.wait_and_pop(), 2);
/// assert!(queue.empty());
/// ```
pub struct BlockingQueue<T> {
    head: Mutex<Link<T>>,
    tail: Mutex<Link<T>>,
    data_cond: Condvar,
    /// Consumers parked (or about to park) in `wait_and_pop`
    waiters: AtomicUsize,
}

impl<T> BlockingQueue<T> {
    /// Create an empty queue holding only its sentinel link
    pub fn new() -> Self {
        let sentinel = node::sentinel();
        Self {
            head: Mutex::new(Arc::clone(&sentinel)),
            tail: Mutex::new(sentinel),
            data_cond: Condvar::new(),
            waiters: AtomicUsize::new(0),
        }
    }

    /// Append a value at the tail and wake one waiting consumer
    ///
    /// The node is built before the tail lock is taken, so a panic while
    /// producing `value` can never leave the chain half-linked.
    pub fn push(&self, value: T) {
        let (node, successor) = Node::new(value);
        {
            let mut tail = self.tail.lock();
            *tail.lock() = Some(node);
            *tail = successor;
        }

        if self.waiters.load(Ordering::SeqCst) > 0 {
            // A waiter that saw the old tail still holds the head lock until it
            // parks; passing through the lock orders our notify after its park.
            drop(self.head.lock());
            self.data_cond.notify_one();
        }
    }

    /// Pop the front value, or `None` if the queue is empty
    pub fn try_pop(&self) -> Option<T> {
        let mut head = self.head.lock();
        if self.is_sentinel(&head) {
            return None;
        }
        Self::pop_head(&mut head)
    }

    /// Pop the front value, blocking until one is available
    pub fn wait_and_pop(&self) -> T {
        let mut head = self.head.lock();
        self.waiters.fetch_add(1, Ordering::SeqCst);
        let value = loop {
            self.data_cond
                .wait_while(&mut head, |head| self.is_sentinel(head));
            if let Some(value) = Self::pop_head(&mut head) {
                break value;
            }
        };
        self.waiters.fetch_sub(1, Ordering::SeqCst);
        value
    }

    /// Snapshot emptiness check; may be stale under concurrent pushes
    pub fn empty(&self) -> bool {
        let head = self.head.lock();
        self.is_sentinel(&head)
    }

    /// True when `head` is the link the tail currently points at
    #[inline]
    fn is_sentinel(&self, head: &Link<T>) -> bool {
        Arc::ptr_eq(head, &self.tail.lock())
    }

    /// Move the first node out of the chain and advance the head
    ///
    /// Caller holds the head lock and has checked that head is not the tail.
    fn pop_head(head: &mut Link<T>) -> Option<T> {
        let node = head.lock().take()?;
        *head = node.next;
        Some(node.value)
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for BlockingQueue<T> {
    fn drop(&mut self) {
        // Unlink iteratively; letting the chain drop itself recurses per node.
        let mut link = Arc::clone(self.head.get_mut());
        loop {
            let node = link.lock().take();
            match node {
                Some(node) => link = node.next,
                None => break,
            }
        }
    }
}

impl<T> fmt::Debug for BlockingQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingQueue")
            .field("empty", &self.empty())
            .field("waiters", &self.waiters.load(Ordering::Relaxed))
            .finish()
    }
}
