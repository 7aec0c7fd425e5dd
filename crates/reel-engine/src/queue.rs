//! Pending one-shot queue with deterministic ordering.
//!
//! [`PendingQueue`] holds the `(fire tick, event id)` keys of one-shot
//! events that have not yet fired. Keys pop in ascending order of the
//! composite key, so two events due at the same tick always come out in
//! insertion order no matter when they were queued or how late the
//! caller drains.
//!
//! # Ordering
//!
//! `(fire_tick, arrival_seq)`, where the arrival sequence is the
//! monotonically assigned [`EventId`].

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use reel_core::{EventId, TickId};

/// Min-heap of pending one-shot keys.
#[derive(Debug, Default)]
pub struct PendingQueue {
    heap: BinaryHeap<Reverse<(TickId, EventId)>>,
}

impl PendingQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event to fire at `at`.
    pub fn push(&mut self, at: TickId, id: EventId) {
        self.heap.push(Reverse((at, id)));
    }

    /// Earliest pending key, if any.
    pub fn peek(&self) -> Option<(TickId, EventId)> {
        self.heap.peek().map(|Reverse(key)| *key)
    }

    /// Pop the earliest key if it is due at `now`.
    pub fn pop_due(&mut self, now: TickId) -> Option<(TickId, EventId)> {
        match self.peek() {
            Some((at, _)) if at <= now => self.heap.pop().map(|Reverse(key)| key),
            _ => None,
        }
    }

    /// Pop every key due at `now`, in deterministic order.
    pub fn drain_due(&mut self, now: TickId) -> Vec<(TickId, EventId)> {
        let mut due = Vec::new();
        while let Some(key) = self.pop_due(now) {
            due.push(key);
        }
        due
    }

    /// Number of pending keys.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Discard all pending keys.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
