/*!
 * Queue Links
 *
 * The chain is a sequence of links. A link starts unfilled; the producer that
 * owns the tail fills it exactly once with a node holding the payload and the
 * next unfilled link. The consumer that owns the head takes the node back out,
 * moving the payload to the caller.
 */

use parking_lot::Mutex;
use std::sync::Arc;

/// Shared slot between the chain and whichever end currently points at it
///
/// A link is filled only under the tail lock and emptied only under the head
/// lock, after the tail has moved past it, so its own mutex never contends.
pub(super) type Link<T> = Arc<Mutex<Option<Node<T>>>>;

/// A published element and the link that follows it
pub(super) struct Node<T> {
    pub(super) value: T,
    pub(super) next: Link<T>,
}

impl<T> Node<T> {
    /// Build a node together with its (unfilled) successor link
    pub(super) fn new(value: T) -> (Self, Link<T>) {
        let next = sentinel();
        let node = Self {
            value,
            next: Arc::clone(&next),
        };
        (node, next)
    }
}

/// An unfilled link; the queue is empty when head and tail both hold it
pub(super) fn sentinel<T>() -> Link<T> {
    Arc::new(Mutex::new(None))
}
