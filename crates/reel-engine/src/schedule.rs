//! The event schedule: insertion-ordered storage plus fired tracking.
//!
//! [`EventSchedule`] owns every [`ScheduledEvent`] inserted into it,
//! assigns each a monotonically increasing [`EventId`], and tracks a
//! fired flag per one-shot event so that a payload is handed out at most
//! once regardless of how often or how late the schedule is queried.
//!
//! Two query styles coexist:
//!
//! - [`active_at()`](EventSchedule::active_at) is a pure read used for
//!   idempotent re-evaluation (video frames).
//! - [`take_due()`](EventSchedule::take_due) consumes one-shot events
//!   and marks them fired (delayed callbacks).

use indexmap::IndexMap;

use reel_core::{EventId, EventState, ScheduleError, ScheduledEvent, TickId};

use crate::queue::PendingQueue;

struct Slot<P> {
    event: ScheduledEvent<P>,
    fired: bool,
}

/// Ordered, optionally bounded collection of scheduled events.
pub struct EventSchedule<P> {
    slots: IndexMap<EventId, Slot<P>>,
    pending: PendingQueue,
    capacity: usize,
    next_id: u64,
}

impl<P> Default for EventSchedule<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> EventSchedule<P> {
    /// Create an unbounded schedule.
    pub fn new() -> Self {
        Self::with_capacity(usize::MAX)
    }

    /// Create a schedule holding at most `capacity` events at once.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: IndexMap::new(),
            pending: PendingQueue::new(),
            capacity,
            next_id: 0,
        }
    }

    /// Insert an event.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::ZeroDuration`] if a duration-bound event has a
    /// zero-length window, [`ScheduleError::QueueFull`] at capacity.
    pub fn schedule(&mut self, event: ScheduledEvent<P>) -> Result<EventId, ScheduleError> {
        if event.duration == Some(0) {
            return Err(ScheduleError::ZeroDuration);
        }
        if self.slots.len() >= self.capacity {
            return Err(ScheduleError::QueueFull {
                capacity: self.capacity,
            });
        }
        let id = EventId(self.next_id);
        self.next_id += 1;
        if event.duration.is_none() {
            self.pending.push(event.trigger, id);
        }
        self.slots.insert(id, Slot { event, fired: false });
        Ok(id)
    }

    /// Look up an event by id.
    pub fn get(&self, id: EventId) -> Option<&ScheduledEvent<P>> {
        self.slots.get(&id).map(|slot| &slot.event)
    }

    /// All held events in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (EventId, &ScheduledEvent<P>)> + '_ {
        self.slots.iter().map(|(id, slot)| (*id, &slot.event))
    }

    /// Events active at `tick`, ordered by `(trigger, id)`.
    ///
    /// An event is active when `trigger <= tick` and it is either a
    /// one-shot or `tick < trigger + duration`. One-shots stay in the
    /// active set after they fire; this query never changes fired state.
    pub fn active_at(&self, tick: TickId) -> Vec<(EventId, &ScheduledEvent<P>)> {
        let mut active: Vec<_> = self
            .slots
            .iter()
            .filter(|(_, slot)| {
                let span = slot.event.span();
                span.trigger <= tick && span.end().is_none_or(|end| tick < end)
            })
            .map(|(id, slot)| (*id, &slot.event))
            .collect();
        active.sort_by_key(|(id, event)| (event.trigger, *id));
        active
    }

    /// Fire every unfired one-shot with `trigger <= tick`.
    ///
    /// Returns their ids ordered by `(trigger, id)`. Each one-shot is
    /// returned by exactly one call over the schedule's lifetime.
    pub fn take_due(&mut self, tick: TickId) -> Vec<EventId> {
        let mut fired = Vec::new();
        while let Some(id) = self.take_next_due(tick) {
            fired.push(id);
        }
        fired
    }

    /// Fire the single earliest unfired one-shot with `trigger <= tick`.
    pub fn take_next_due(&mut self, tick: TickId) -> Option<EventId> {
        while let Some((_, id)) = self.pending.pop_due(tick) {
            if let Some(slot) = self.slots.get_mut(&id) {
                if !slot.fired {
                    slot.fired = true;
                    return Some(id);
                }
            }
        }
        None
    }

    /// Trigger tick of the earliest unfired one-shot.
    pub fn next_due(&self) -> Option<TickId> {
        self.pending.peek().map(|(at, _)| at)
    }

    /// Lifecycle state of `id` at `tick`.
    pub fn state_at(&self, id: EventId, tick: TickId) -> Result<EventState, ScheduleError> {
        self.slots
            .get(&id)
            .map(|slot| slot.event.span().state_at(tick, slot.fired))
            .ok_or(ScheduleError::UnknownEvent(id))
    }

    /// Whether one-shot `id` has fired.
    pub fn is_fired(&self, id: EventId) -> Result<bool, ScheduleError> {
        self.slots
            .get(&id)
            .map(|slot| slot.fired)
            .ok_or(ScheduleError::UnknownEvent(id))
    }

    /// Remove fired one-shot `id`, handing its event back.
    ///
    /// Returns `None` if `id` is unknown or has not fired. The slot no
    /// longer counts against capacity.
    pub fn release(&mut self, id: EventId) -> Option<ScheduledEvent<P>> {
        match self.slots.get(&id) {
            Some(slot) if slot.fired => self.slots.shift_remove(&id).map(|slot| slot.event),
            _ => None,
        }
    }

    /// Drop fired one-shots, returning how many were removed.
    ///
    /// Long-running drivers call this to keep the schedule bounded.
    /// Removed ids become unknown to [`state_at()`](Self::state_at).
    pub fn remove_fired(&mut self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, slot| !slot.fired);
        before - self.slots.len()
    }

    /// Number of events held.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the schedule holds no events.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of one-shots that have not fired.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Maximum number of events held at once.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// How many more events fit before [`ScheduleError::QueueFull`].
    pub fn headroom(&self) -> usize {
        self.capacity.saturating_sub(self.slots.len())
    }
}
