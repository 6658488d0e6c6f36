//! Next-tick task queue.
//!
//! Work that must not run inline (for example, validating a surface that may
//! not be attached to its window yet) is posted here and handed back to the
//! owner on the next turn of the event thread.
//!
//! A tick only ever returns work posted *before* the tick began. Anything
//! posted while the owner is processing a tick waits for the following one.

use std::collections::VecDeque;

/// A FIFO of payloads deferred to the next tick.
#[derive(Debug)]
pub struct TickQueue<T> {
    /// Pending payloads, in posting order.
    tasks: VecDeque<T>,
}

impl<T> TickQueue<T> {
    /// Create a new, empty queue.
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    /// Post a payload to be handed back on the next tick.
    pub fn post(&mut self, payload: T) {
        self.tasks.push_back(payload);
        tracing::trace!(target: "horizon_menu_core::task", pending = self.tasks.len(), "task posted");
    }

    /// Check whether any pending payload matches a predicate.
    pub fn any_pending(&self, predicate: impl FnMut(&T) -> bool) -> bool {
        self.tasks.iter().any(predicate)
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Start a tick, taking every payload posted so far in posting order.
    pub fn begin_tick(&mut self) -> Vec<T> {
        let count = self.tasks.len();
        tracing::trace!(target: "horizon_menu_core::task", count, "tick started");
        self.tasks.drain(..).collect()
    }
}

impl<T> Default for TickQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
