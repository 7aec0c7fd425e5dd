//! Lockstep (synchronous) event-driven driver.
//!
//! [`LockstepDriver`] owns a [`Reactor`] and the [`Dispatcher`] feeding
//! it. Instead of real timers it jumps a [`ManualClock`] straight to the
//! next due one-shot, hands the event to the reactor, and inserts any
//! follow-up events the reactor staged on its [`Timers`]. Because the
//! pending queue is keyed on absolute fire tick and arrival order, the
//! sequence of reactions is the same however the driver is advanced:
//! one step at a time, in large jumps, or to completion.
//!
//! # Ownership model
//!
//! The reactor never sees the dispatcher. It only receives the event and
//! a `Timers` handle, and the driver applies the staged events once the
//! reaction returns.
//!
//! # Capacity
//!
//! A fired event leaves the schedule before its reaction runs, so
//! `max_pending` bounds the events still waiting. Follow-ups that do not
//! fit are held by the driver and every further step reports
//! [`ScheduleError::QueueFull`]; nothing that was fired or staged is
//! lost.

use smallvec::SmallVec;
use tracing::{debug, warn};

use reel_core::{Clock, EventId, FrameRate, PresentationSink, ScheduleError, ScheduledEvent, TickId};

use crate::clock::ManualClock;
use crate::config::{ConfigError, DriverConfig};
use crate::dispatcher::Dispatcher;
use crate::metrics::DispatchMetrics;
use crate::schedule::EventSchedule;

// ── Reactor ─────────────────────────────────────────────────────

/// State machine driven by one-shot events.
pub trait Reactor {
    /// Event payload type.
    type Event;
    /// State exposed to the presentation sink after each reaction.
    type State: ?Sized;

    /// Apply `event` at tick `now`, staging follow-ups on `timers`.
    fn react(&mut self, now: TickId, event: &Self::Event, timers: &mut Timers<Self::Event>);

    /// Current state.
    fn state(&self) -> &Self::State;
}

// ── Timers ──────────────────────────────────────────────────────

/// Follow-up events staged during one reaction.
///
/// Delays are relative to the reaction's tick. Nothing is scheduled
/// until the reaction returns.
#[derive(Debug)]
pub struct Timers<E> {
    now: TickId,
    staged: SmallVec<[(TickId, E); 4]>,
}

impl<E> Timers<E> {
    /// An empty stage for a reaction at `now`.
    pub fn new(now: TickId) -> Self {
        Self {
            now,
            staged: SmallVec::new(),
        }
    }

    /// Tick of the reaction.
    pub fn now(&self) -> TickId {
        self.now
    }

    /// Fire `event` `delay` ticks from now.
    pub fn after(&mut self, delay: u64, event: E) {
        self.staged.push((self.now.offset(delay), event));
    }

    /// Fire `event` at `tick`, or now if `tick` has already passed.
    pub fn at(&mut self, tick: TickId, event: E) {
        self.staged.push((tick.max(self.now), event));
    }

    /// Number of staged events.
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    /// Whether nothing was staged.
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Staged `(fire tick, event)` pairs in staging order.
    pub fn into_staged(self) -> impl Iterator<Item = (TickId, E)> {
        self.staged.into_iter()
    }
}

// ── LockstepDriver ──────────────────────────────────────────────

/// Synchronous driver for a [`Reactor`].
///
/// # Example
///
/// ```
/// use reel_core::TickId;
/// use reel_engine::{DriverConfig, LockstepDriver, Reactor, Timers};
///
/// struct Countdown(Vec<u64>);
///
/// impl Reactor for Countdown {
///     type Event = u64;
///     type State = [u64];
///     fn react(&mut self, now: TickId, n: &u64, timers: &mut Timers<u64>) {
///         self.0.push(now.0);
///         if *n > 0 {
///             timers.after(10, n - 1);
///         }
///     }
///     fn state(&self) -> &[u64] {
///         &self.0
///     }
/// }
///
/// let mut driver = LockstepDriver::new(Countdown(Vec::new()), &DriverConfig::default()).unwrap();
/// driver.inject(3).unwrap();
/// let fired = driver.run_until_idle(&mut |_: TickId, _: &[u64]| {}).unwrap();
/// assert_eq!(fired, 4);
/// assert_eq!(driver.reactor().0, vec![0, 10, 20, 30]);
/// ```
pub struct LockstepDriver<R: Reactor> {
    dispatcher: Dispatcher<R::Event>,
    clock: ManualClock,
    reactor: R,
    /// Staged follow-ups waiting for room in the schedule.
    deferred: Vec<(TickId, R::Event)>,
}

impl<R: Reactor> LockstepDriver<R> {
    /// Create a driver at tick 0.
    pub fn new(reactor: R, config: &DriverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let fps = FrameRate::new(config.tick_rate_hz).map_err(|_| ConfigError::InvalidTickRate {
            value: config.tick_rate_hz,
        })?;
        Ok(Self {
            dispatcher: Dispatcher::new(EventSchedule::with_capacity(config.max_pending), fps),
            clock: ManualClock::new(),
            reactor,
            deferred: Vec::new(),
        })
    }

    /// Current driver tick.
    pub fn now(&self) -> TickId {
        self.clock.current_tick()
    }

    /// Schedule `event` at the current tick.
    pub fn inject(&mut self, event: R::Event) -> Result<EventId, ScheduleError> {
        let now = self.now();
        self.dispatcher.schedule(ScheduledEvent::one_shot(now, event))
    }

    /// Schedule `event` `delay` ticks from now.
    pub fn schedule_after(&mut self, delay: u64, event: R::Event) -> Result<EventId, ScheduleError> {
        let at = self.now().offset(delay);
        self.dispatcher.schedule(ScheduledEvent::one_shot(at, event))
    }

    /// Tick of the next pending event.
    pub fn next_due(&self) -> Option<TickId> {
        let deferred = self.deferred.iter().map(|(at, _)| *at).min();
        match (self.dispatcher.next_due(), deferred) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Number of events waiting to fire, including follow-ups held back
    /// by a full schedule.
    pub fn pending(&self) -> usize {
        self.dispatcher.events().pending_len() + self.deferred.len()
    }

    /// Whether nothing is waiting to fire.
    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    /// Fire every event due at the next pending tick.
    ///
    /// Moves the clock to that tick, reacts to each due event in
    /// `(trigger, EventId)` order, and presents the reactor's state after
    /// each reaction. Events staged with zero delay fire in the same
    /// step, after those already due. Returns the tick handled, or `None`
    /// when idle.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::QueueFull`] when staged follow-ups do not fit.
    /// The reaction that staged them has been applied and presented; the
    /// follow-ups stay held and no further event fires until they fit.
    pub fn step<S>(&mut self, sink: &mut S) -> Result<Option<TickId>, ScheduleError>
    where
        S: PresentationSink<R::State> + ?Sized,
    {
        self.flush_deferred()?;
        let Some(due) = self.dispatcher.next_due() else {
            return Ok(None);
        };
        let now = due.max(self.now());
        self.clock.set(now)?;

        while let Some((id, event)) = self.dispatcher.fire_next(now)? {
            debug!(tick = now.0, event = %id, "event fired");
            let mut timers = Timers::new(now);
            self.reactor.react(now, &event.payload, &mut timers);
            self.deferred.extend(timers.into_staged());
            sink.present(now, self.reactor.state());
            self.flush_deferred()?;
        }
        Ok(Some(now))
    }

    /// Move held follow-ups into the schedule, all or none.
    fn flush_deferred(&mut self) -> Result<(), ScheduleError> {
        if self.deferred.is_empty() {
            return Ok(());
        }
        let headroom = self.dispatcher.events().headroom();
        if headroom < self.deferred.len() {
            let capacity = self.dispatcher.events().capacity();
            warn!(
                staged = self.deferred.len(),
                headroom,
                capacity,
                "schedule full, follow-ups held"
            );
            return Err(ScheduleError::QueueFull { capacity });
        }
        for (at, event) in self.deferred.drain(..) {
            self.dispatcher.schedule(ScheduledEvent::one_shot(at, event))?;
        }
        Ok(())
    }

    /// Step through every event due at or before `target`, then move the
    /// clock to `target`. Returns how many events fired.
    pub fn advance_to<S>(&mut self, target: TickId, sink: &mut S) -> Result<u64, ScheduleError>
    where
        S: PresentationSink<R::State> + ?Sized,
    {
        let before = self.dispatcher.metrics().one_shots_fired;
        while self.next_due().is_some_and(|due| due <= target) {
            self.step(sink)?;
        }
        self.clock.set(target)?;
        Ok(self.dispatcher.metrics().one_shots_fired - before)
    }

    /// Step until nothing is pending. Returns how many events fired.
    ///
    /// Does not return for a reactor that keeps rescheduling itself; use
    /// [`advance_to()`](Self::advance_to) with a horizon for those.
    pub fn run_until_idle<S>(&mut self, sink: &mut S) -> Result<u64, ScheduleError>
    where
        S: PresentationSink<R::State> + ?Sized,
    {
        let before = self.dispatcher.metrics().one_shots_fired;
        while self.step(sink)?.is_some() {}
        Ok(self.dispatcher.metrics().one_shots_fired - before)
    }

    /// The reactor.
    pub fn reactor(&self) -> &R {
        &self.reactor
    }

    /// Mutable access to the reactor.
    pub fn reactor_mut(&mut self) -> &mut R {
        &mut self.reactor
    }

    /// Dispatch counters.
    pub fn metrics(&self) -> &DispatchMetrics {
        self.dispatcher.metrics()
    }

    /// Consume the driver, returning the reactor.
    pub fn into_reactor(self) -> R {
        self.reactor
    }
}
