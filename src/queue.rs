//! Blocking handoff queue
//!
//! An unbounded FIFO shared by any number of producers and consumers.
//! `send` never waits for a receiver; `receive` parks the caller until a
//! value is available. Values move through the queue, they are never cloned.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Multi-producer, multi-consumer blocking FIFO
#[derive(Debug)]
pub struct MessageQueue<T> {
    items: Mutex<VecDeque<T>>,
    available: Condvar,
}

impl<T> MessageQueue<T> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }

    /// Append a value to the tail and wake one blocked receiver.
    pub fn send(&self, value: T) {
        let mut items = self.lock();
        items.push_back(value);
        log::trace!("queue send, {} pending", items.len());
        self.available.notify_one();
    }

    /// Remove the head value, blocking until one is available.
    ///
    /// Blocks forever if nothing is ever sent.
    pub fn receive(&self) -> T {
        let mut items = self.lock();
        loop {
            if let Some(value) = items.pop_front() {
                return value;
            }
            items = self
                .available
                .wait(items)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Remove the head value if one is queued, without blocking.
    pub fn try_receive(&self) -> Option<T> {
        self.lock().pop_front()
    }

    /// Like [`receive`](Self::receive), but gives up once `timeout` has elapsed.
    ///
    /// A timeout too large to form a deadline waits like `receive`.
    pub fn receive_timeout(&self, timeout: Duration) -> Option<T> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return Some(self.receive());
        };
        let mut items = self.lock();
        loop {
            if let Some(value) = items.pop_front() {
                return Some(value);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            items = self
                .available
                .wait_timeout(items, remaining)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Number of values waiting for a receiver
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no values are waiting
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic elsewhere cannot leave the deque half-mutated, so a poisoned
    // lock still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for MessageQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
