//! Deferred scheduler for delayed follow-up work.
//!
//! Some menu commands need a second step that can only run after something
//! asynchronous settles elsewhere (waking a sleeping account, for example).
//! The scheduler holds those follow-ups as plain payloads ordered by the
//! instant they become ready. The owner supplies "now" when asking for ready
//! work, so tests can drive time explicitly.
//!
//! # Example
//!
//! ```
//! use horizon_menu_core::DeferredScheduler;
//! use std::time::{Duration, Instant};
//!
//! let mut scheduler = DeferredScheduler::new();
//! let start = Instant::now();
//! scheduler.schedule_after(start, Duration::from_millis(500), "load url");
//!
//! assert!(scheduler.take_ready(start).is_empty());
//! assert_eq!(
//!     scheduler.take_ready(start + Duration::from_millis(500)),
//!     vec!["load url"]
//! );
//! ```

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, SchedulerError};

new_key_type! {
    /// A unique identifier for a scheduled task.
    pub struct ScheduledTaskId;
}

/// An entry in the scheduler queue (min-heap by ready time).
#[derive(Debug, Clone, Copy)]
struct SchedulerQueueEntry {
    id: ScheduledTaskId,
    run_at: Instant,
    seq: u64,
}

impl PartialEq for SchedulerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.run_at == other.run_at && self.seq == other.seq
    }
}

impl Eq for SchedulerQueueEntry {}

impl PartialOrd for SchedulerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SchedulerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other
            .run_at
            .cmp(&self.run_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Holds one-shot payloads until their deadline passes.
#[derive(Debug)]
pub struct DeferredScheduler<T> {
    /// Payloads of all pending tasks.
    tasks: SlotMap<ScheduledTaskId, T>,
    /// Priority queue of pending deadlines (min-heap by ready time).
    queue: BinaryHeap<SchedulerQueueEntry>,
    /// Next insertion sequence number.
    next_seq: u64,
}

impl<T> DeferredScheduler<T> {
    /// Create a new, empty scheduler.
    pub fn new() -> Self {
        Self {
            tasks: SlotMap::with_key(),
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Schedule a payload to become ready `delay` after `now`.
    pub fn schedule_after(&mut self, now: Instant, delay: Duration, payload: T) -> ScheduledTaskId {
        self.schedule_at(now + delay, payload)
    }

    fn schedule_at(&mut self, run_at: Instant, payload: T) -> ScheduledTaskId {
        let seq = self.next_seq;
        self.next_seq += 1;

        let id = self.tasks.insert(payload);
        self.queue.push(SchedulerQueueEntry { id, run_at, seq });
        id
    }

    /// Cancel a pending task, returning its payload.
    pub fn cancel(&mut self, id: ScheduledTaskId) -> Result<T> {
        self.tasks.remove(id).ok_or(SchedulerError::InvalidTaskId)
    }

    /// Check if a task is still pending.
    pub fn is_pending(&self, id: ScheduledTaskId) -> bool {
        self.tasks.contains_key(id)
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Get the duration from `now` until the next task is ready, if any.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        self.discard_cancelled();
        self.queue
            .peek()
            .map(|entry| entry.run_at.saturating_duration_since(now))
    }

    /// Take every payload whose deadline is at or before `now`.
    ///
    /// Payloads are returned in deadline order; equal deadlines keep their
    /// scheduling order.
    #[tracing::instrument(skip(self), target = "horizon_menu_core::scheduler", level = "trace")]
    pub fn take_ready(&mut self, now: Instant) -> Vec<T> {
        let mut ready = Vec::new();

        while let Some(entry) = self.queue.peek().copied() {
            if entry.run_at > now {
                break;
            }
            self.queue.pop();

            // Cancelled tasks leave their heap entry behind.
            let Some(payload) = self.tasks.remove(entry.id) else {
                continue;
            };
            tracing::trace!(target: "horizon_menu_core::scheduler", id = ?entry.id, "scheduled task ready");
            ready.push(payload);
        }

        ready
    }

    fn discard_cancelled(&mut self) {
        while let Some(entry) = self.queue.peek() {
            if self.tasks.contains_key(entry.id) {
                break;
            }
            self.queue.pop();
        }
    }
}

impl<T> Default for DeferredScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
