//! Per-tick evaluation and one-shot firing over an [`EventSchedule`].
//!
//! [`Dispatcher`] answers "what is visible at this tick, and with which
//! derived values". Values come from the payload's [`Animate`] impl,
//! always evaluated against the event-local clock `tick - trigger`,
//! never the global tick, so payload definitions are position-free.
//!
//! Results are ordered by `(trigger, EventId)`: later log lines append
//! after earlier ones and earlier-declared elements paint first.

use tracing::trace;

use reel_anim::LocalClock;
use reel_core::{EventId, EventSpan, EventState, FrameRate, ScheduleError, ScheduledEvent, TickId};

use crate::metrics::DispatchMetrics;
use crate::schedule::EventSchedule;

/// A payload that derives presentation values from its local clock.
pub trait Animate {
    /// Derived value handed to the presentation sink.
    type Output;

    /// Derive the value at `clock`, zeroed at the event's trigger.
    ///
    /// `span` carries the event's own duration so fades can be shaped
    /// against the end of the window.
    fn animate(&self, clock: LocalClock, span: EventSpan) -> Self::Output;
}

/// One dispatched event and its derived value.
#[derive(Debug)]
pub struct Dispatched<'a, P: Animate> {
    /// Schedule id of the event.
    pub id: EventId,
    /// The event itself.
    pub event: &'a ScheduledEvent<P>,
    /// Lifecycle state at the dispatched tick.
    pub state: EventState,
    /// Value derived by the payload.
    pub value: P::Output,
}

/// Scheduler over an [`EventSchedule`] at a fixed frame rate.
pub struct Dispatcher<P> {
    schedule: EventSchedule<P>,
    fps: FrameRate,
    metrics: DispatchMetrics,
}

impl<P> Dispatcher<P> {
    /// Wrap an existing schedule.
    pub fn new(schedule: EventSchedule<P>, fps: FrameRate) -> Self {
        Self {
            schedule,
            fps,
            metrics: DispatchMetrics::default(),
        }
    }

    /// Insert an event into the underlying schedule.
    pub fn schedule(&mut self, event: ScheduledEvent<P>) -> Result<EventId, ScheduleError> {
        match self.schedule.schedule(event) {
            Ok(id) => {
                self.metrics.events_scheduled += 1;
                Ok(id)
            }
            Err(e) => {
                if matches!(e, ScheduleError::QueueFull { .. }) {
                    self.metrics.queue_full_rejections += 1;
                }
                Err(e)
            }
        }
    }

    /// The underlying schedule.
    pub fn events(&self) -> &EventSchedule<P> {
        &self.schedule
    }

    /// Mutable access to the underlying schedule.
    pub fn events_mut(&mut self) -> &mut EventSchedule<P> {
        &mut self.schedule
    }

    /// Frame rate used to build local clocks.
    pub fn fps(&self) -> FrameRate {
        self.fps
    }

    /// Counters accumulated by stateful dispatch.
    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    /// Trigger tick of the earliest unfired one-shot.
    pub fn next_due(&self) -> Option<TickId> {
        self.schedule.next_due()
    }

    /// Fire every due one-shot at `tick` without deriving values.
    ///
    /// Same firing path as [`tick()`](Self::tick); used by drivers whose
    /// payloads are commands rather than animations.
    pub fn fire_due(&mut self, tick: TickId) -> Result<Vec<EventId>, ScheduleError> {
        self.check_monotonic(tick)?;
        let fired = self.schedule.take_due(tick);
        self.record(tick, fired.len(), 0);
        Ok(fired)
    }

    /// Fire the earliest due one-shot at `tick` and take it out of the
    /// schedule.
    ///
    /// The released slot stops counting against capacity, so follow-ups
    /// scheduled while reacting to it have room.
    pub fn fire_next(
        &mut self,
        tick: TickId,
    ) -> Result<Option<(EventId, ScheduledEvent<P>)>, ScheduleError> {
        self.check_monotonic(tick)?;
        let Some(id) = self.schedule.take_next_due(tick) else {
            return Ok(None);
        };
        self.metrics.one_shots_fired += 1;
        self.metrics.last_tick = Some(tick);
        Ok(self.schedule.release(id).map(|event| (id, event)))
    }

    fn check_monotonic(&mut self, tick: TickId) -> Result<(), ScheduleError> {
        match self.metrics.last_tick {
            Some(last) if tick < last => {
                self.metrics.rewind_rejections += 1;
                Err(ScheduleError::TickRewound {
                    last,
                    requested: tick,
                })
            }
            _ => Ok(()),
        }
    }

    fn record(&mut self, tick: TickId, fired: usize, spans: usize) {
        self.metrics.ticks_dispatched += 1;
        self.metrics.one_shots_fired += fired as u64;
        self.metrics.active_spans = u32::try_from(spans).unwrap_or(u32::MAX);
        self.metrics.last_tick = Some(tick);
        trace!(tick = tick.0, fired, spans, "dispatch");
    }
}

impl<P: Animate> Dispatcher<P> {
    /// Every active event at `tick` with its derived value.
    ///
    /// Pure: does not fire one-shots or touch metrics, so any tick can be
    /// re-evaluated any number of times with identical results.
    pub fn evaluate(&self, tick: TickId) -> Vec<Dispatched<'_, P>> {
        self.schedule
            .active_at(tick)
            .into_iter()
            .map(|(id, event)| {
                let fired = self.schedule.is_fired(id).unwrap_or(false);
                self.derive(id, event, tick, event.span().state_at(tick, fired))
            })
            .collect()
    }

    /// Stateful dispatch at `tick`.
    ///
    /// Returns one-shots that fire at this call (each exactly once over
    /// the dispatcher's lifetime) and duration-bound events active at
    /// `tick`, in `(trigger, EventId)` order.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::TickRewound`] if `tick` precedes the last
    /// dispatched tick. Repeating the same tick is allowed.
    pub fn tick(&mut self, tick: TickId) -> Result<Vec<Dispatched<'_, P>>, ScheduleError> {
        self.check_monotonic(tick)?;
        let fired = self.schedule.take_due(tick);

        let mut picked: Vec<(EventId, EventState)> = Vec::new();
        let mut spans = 0usize;
        for (id, event) in self.schedule.active_at(tick) {
            if event.duration.is_some() {
                spans += 1;
                picked.push((id, EventState::Active));
            } else if fired.contains(&id) {
                picked.push((id, EventState::Fired));
            }
        }
        self.record(tick, fired.len(), spans);

        let schedule = &self.schedule;
        Ok(picked
            .into_iter()
            .filter_map(|(id, state)| {
                schedule
                    .get(id)
                    .map(|event| self.derive(id, event, tick, state))
            })
            .collect())
    }

    fn derive<'a>(
        &self,
        id: EventId,
        event: &'a ScheduledEvent<P>,
        tick: TickId,
        state: EventState,
    ) -> Dispatched<'a, P> {
        let clock = LocalClock::since(tick, event.trigger, self.fps);
        Dispatched {
            id,
            event,
            state,
            value: event.payload.animate(clock, event.span()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_anim::fade_in_out;

    /// Payload reporting its local clock and fade opacity.
    #[derive(Debug, PartialEq)]
    struct Probe(&'static str);

    impl Animate for Probe {
        type Output = (i64, f64);

        fn animate(&self, clock: LocalClock, span: EventSpan) -> (i64, f64) {
            let opacity = match span.duration {
                Some(d) => fade_in_out(clock.elapsed(), d, 12),
                None => 1.0,
            };
            (clock.elapsed(), opacity)
        }
    }

    fn dispatcher() -> Dispatcher<Probe> {
        Dispatcher::new(EventSchedule::new(), FrameRate::new(30.0).unwrap())
    }

    fn names(out: &[Dispatched<'_, Probe>]) -> Vec<&'static str> {
        out.iter().map(|d| d.event.payload.0).collect()
    }

    #[test]
    fn values_use_event_local_clock() {
        let mut d = dispatcher();
        d.schedule(ScheduledEvent::spanning(TickId(150), 330, Probe("problem")))
            .unwrap();
        let out = d.evaluate(TickId(200));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value, (50, 1.0));
        assert_eq!(out[0].state, EventState::Active);
    }

    #[test]
    fn evaluate_is_pure() {
        let mut d = dispatcher();
        d.schedule(ScheduledEvent::one_shot(TickId(5), Probe("ping")))
            .unwrap();
        d.schedule(ScheduledEvent::spanning(TickId(0), 100, Probe("bg")))
            .unwrap();
        let a: Vec<_> = d.evaluate(TickId(10)).into_iter().map(|x| x.value).collect();
        let b: Vec<_> = d.evaluate(TickId(10)).into_iter().map(|x| x.value).collect();
        assert_eq!(a, b);
        assert_eq!(d.metrics().ticks_dispatched, 0);
        assert_eq!(d.events().next_due(), Some(TickId(5)));
        // Out-of-order evaluation is fine.
        assert_eq!(d.evaluate(TickId(1)).len(), 1);
    }

    #[test]
    fn tick_fires_one_shot_exactly_once() {
        let mut d = dispatcher();
        d.schedule(ScheduledEvent::one_shot(TickId(5), Probe("ping")))
            .unwrap();

        assert!(d.tick(TickId(4)).unwrap().is_empty());
        let first = d.tick(TickId(5)).unwrap();
        assert_eq!(names(&first), vec!["ping"]);
        assert_eq!(first[0].state, EventState::Fired);
        assert!(d.tick(TickId(5)).unwrap().is_empty());
        assert!(d.tick(TickId(6)).unwrap().is_empty());
        assert!(d.tick(TickId(1_000)).unwrap().is_empty());
        assert_eq!(d.metrics().one_shots_fired, 1);
    }

    #[test]
    fn tick_rejects_rewind() {
        let mut d = dispatcher();
        d.tick(TickId(10)).unwrap();
        match d.tick(TickId(9)) {
            Err(ScheduleError::TickRewound { last, requested }) => {
                assert_eq!(last, TickId(10));
                assert_eq!(requested, TickId(9));
            }
            other => panic!("expected TickRewound, got {:?}", other.map(|v| v.len())),
        }
        assert_eq!(d.metrics().rewind_rejections, 1);
    }

    #[test]
    fn tick_orders_spans_and_fired_shots_together() {
        let mut d = dispatcher();
        d.schedule(ScheduledEvent::one_shot(TickId(3), Probe("log")))
            .unwrap();
        d.schedule(ScheduledEvent::spanning(TickId(0), 10, Probe("box")))
            .unwrap();
        d.schedule(ScheduledEvent::spanning(TickId(3), 10, Probe("arrow")))
            .unwrap();
        let out = d.tick(TickId(4)).unwrap();
        assert_eq!(names(&out), vec!["box", "log", "arrow"]);
        assert_eq!(d.metrics().active_spans, 2);
    }

    #[test]
    fn settled_events_leave_the_active_set() {
        let mut d = dispatcher();
        d.schedule(ScheduledEvent::spanning(TickId(0), 150, Probe("title")))
            .unwrap();
        assert_eq!(d.evaluate(TickId(149)).len(), 1);
        assert!(d.evaluate(TickId(150)).is_empty());
    }

    #[test]
    fn fire_due_shares_the_fired_flag() {
        let mut d = dispatcher();
        d.schedule(ScheduledEvent::one_shot(TickId(2), Probe("a")))
            .unwrap();
        assert_eq!(d.fire_due(TickId(2)).unwrap().len(), 1);
        assert!(d.tick(TickId(2)).unwrap().is_empty());
    }

    #[test]
    fn fire_next_hands_out_each_one_shot_once() {
        let mut d = Dispatcher::new(EventSchedule::with_capacity(2), FrameRate::new(30.0).unwrap());
        d.schedule(ScheduledEvent::one_shot(TickId(4), Probe("b")))
            .unwrap();
        d.schedule(ScheduledEvent::one_shot(TickId(1), Probe("a")))
            .unwrap();
        assert!(d.fire_next(TickId(0)).unwrap().is_none());

        let mut order = Vec::new();
        while let Some((_, event)) = d.fire_next(TickId(4)).unwrap() {
            order.push(event.payload.0);
        }
        assert_eq!(order, vec!["a", "b"]);
        assert!(d.events().is_empty());
        assert_eq!(d.metrics().one_shots_fired, 2);
        assert_eq!(d.events().headroom(), 2);
    }

    #[test]
    fn full_schedule_counts_rejections() {
        let mut d = Dispatcher::new(EventSchedule::with_capacity(1), FrameRate::new(30.0).unwrap());
        d.schedule(ScheduledEvent::one_shot(TickId(0), Probe("a")))
            .unwrap();
        assert!(d
            .schedule(ScheduledEvent::one_shot(TickId(0), Probe("b")))
            .is_err());
        assert_eq!(d.metrics().events_scheduled, 1);
        assert_eq!(d.metrics().queue_full_rejections, 1);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn nothing_visible_before_trigger(trigger in 1u64..10_000, dur in 1u64..1_000, back in 1u64..10_000) {
                let mut d = dispatcher();
                d.schedule(ScheduledEvent::spanning(TickId(trigger), dur, Probe("x"))).unwrap();
                let tick = TickId(trigger.saturating_sub(back));
                prop_assume!(tick.0 < trigger);
                prop_assert!(d.evaluate(tick).is_empty());
            }

            #[test]
            fn late_ticks_are_settled(trigger in 0u64..10_000, dur in 1u64..1_000, past in 0u64..10_000) {
                let mut d = dispatcher();
                let id = d.schedule(ScheduledEvent::spanning(TickId(trigger), dur, Probe("x"))).unwrap();
                let tick = TickId(trigger + dur + past);
                prop_assert!(d.evaluate(tick).is_empty());
                prop_assert_eq!(d.events().state_at(id, tick).unwrap(), EventState::Settled);
                // The payload's own curve is fully faded there too.
                let (elapsed, opacity) = Probe("x").animate(
                    LocalClock::since(tick, TickId(trigger), d.fps()),
                    EventSpan { trigger: TickId(trigger), duration: Some(dur) },
                );
                prop_assert!(elapsed >= dur as i64);
                prop_assert_eq!(opacity, 0.0);
            }
        }
    }
}
