//! Scheduled events and their lifecycle states.

use crate::id::TickId;

/// Lifecycle state of a scheduled event at a given tick.
///
/// ```text
/// Pending ──(tick reaches trigger)──▶ Active ──(trigger + duration)──▶ Settled
///                                        │
///                                        └──(one-shot dispatched)──▶ Fired
/// ```
///
/// `Settled` and `Fired` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventState {
    /// The trigger tick has not been reached.
    Pending,
    /// Within its duration window, or a one-shot that is due but not yet dispatched.
    Active,
    /// A duration-bound event whose window has elapsed.
    Settled,
    /// A one-shot event whose payload has been dispatched.
    Fired,
}

impl EventState {
    /// Whether this state is terminal (`Settled` or `Fired`).
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Settled | Self::Fired)
    }
}

/// Trigger tick and optional duration of an event, without its payload.
///
/// Handed to payload evaluators so they can shape fades against the
/// end of their own window without knowing their absolute position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventSpan {
    /// First tick at which the event is active.
    pub trigger: TickId,
    /// Number of ticks the event stays active, or `None` for a one-shot.
    pub duration: Option<u64>,
}

impl EventSpan {
    /// First tick at which a duration-bound event is no longer active.
    pub fn end(&self) -> Option<TickId> {
        self.duration.map(|d| self.trigger.offset(d))
    }

    /// Whether this span describes a one-shot event.
    pub fn is_one_shot(&self) -> bool {
        self.duration.is_none()
    }

    /// Lifecycle state at `tick`, given whether a one-shot has already fired.
    ///
    /// `fired` is ignored for duration-bound events.
    pub fn state_at(&self, tick: TickId, fired: bool) -> EventState {
        if tick < self.trigger {
            return EventState::Pending;
        }
        match self.end() {
            Some(end) if tick < end => EventState::Active,
            Some(_) => EventState::Settled,
            None if fired => EventState::Fired,
            None => EventState::Active,
        }
    }
}

/// A `(trigger tick, payload)` pair, optionally bounded by a duration.
///
/// The engine treats `payload` as opaque data: it is forwarded to the
/// payload's evaluator and then to the presentation sink.
///
/// # Examples
///
/// ```
/// use reel_core::{EventState, ScheduledEvent, TickId};
///
/// let fade = ScheduledEvent::spanning(TickId(30), 60, "title");
/// assert_eq!(fade.span().state_at(TickId(29), false), EventState::Pending);
/// assert_eq!(fade.span().state_at(TickId(30), false), EventState::Active);
/// assert_eq!(fade.span().state_at(TickId(90), false), EventState::Settled);
///
/// let ping = ScheduledEvent::one_shot(TickId(5), "ping");
/// assert_eq!(ping.span().state_at(TickId(9), true), EventState::Fired);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledEvent<P> {
    /// First tick at which the event becomes active.
    pub trigger: TickId,
    /// Active window length in ticks; `None` for a one-shot event.
    pub duration: Option<u64>,
    /// Opaque payload forwarded to the evaluator and presentation sink.
    pub payload: P,
}

impl<P> ScheduledEvent<P> {
    /// A one-shot event that fires once at `trigger` and never decays.
    pub fn one_shot(trigger: TickId, payload: P) -> Self {
        Self {
            trigger,
            duration: None,
            payload,
        }
    }

    /// An event active over `[trigger, trigger + duration)`.
    pub fn spanning(trigger: TickId, duration: u64, payload: P) -> Self {
        Self {
            trigger,
            duration: Some(duration),
            payload,
        }
    }

    /// The event's timing without its payload.
    pub fn span(&self) -> EventSpan {
        EventSpan {
            trigger: self.trigger,
            duration: self.duration,
        }
    }
}
