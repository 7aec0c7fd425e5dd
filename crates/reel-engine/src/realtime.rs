//! Wall-clock driver running a reactor on a background thread.
//!
//! [`RealtimeDriver`] moves a [`LockstepDriver`] onto a named thread and
//! advances it against a [`WallClock`]. The thread sleeps on its control
//! channel until the next event is due, so injected events and shutdown
//! requests wake it immediately. Every reaction publishes a
//! [`Snapshot`] of the reactor state on a bounded channel.
//!
//! Timer jitter cannot reorder reactions: when the thread wakes late it
//! catches up through the lockstep driver, which fires everything due in
//! `(fire tick, arrival)` order.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use tracing::{debug, error, trace, warn};

use reel_core::{Clock, PresentationSink, ScheduleError, TickId};

use crate::clock::WallClock;
use crate::config::{ConfigError, DriverConfig};
use crate::lockstep::{LockstepDriver, Reactor};

/// Capacity of the control channel.
const CONTROL_CAPACITY: usize = 64;

/// Reactor state published after one reaction.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot<S> {
    /// Tick of the reaction.
    pub tick: TickId,
    /// Reactor state after the reaction.
    pub state: S,
}

enum Control<E> {
    Inject(E),
    Shutdown,
}

// ── Driver thread ───────────────────────────────────────────────

/// Sink forwarding cloned state to the snapshot channel.
struct ChannelSink<'a, S> {
    tx: &'a Sender<Snapshot<S>>,
    dropped: u64,
}

impl<S: Clone> PresentationSink<S> for ChannelSink<'_, S> {
    fn present(&mut self, tick: TickId, state: &S) {
        match self.tx.try_send(Snapshot {
            tick,
            state: state.clone(),
        }) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                trace!(tick = tick.0, "snapshot channel full, dropping");
            }
            // Nobody is listening.
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

struct DriverThread<R: Reactor>
where
    R::State: Sized,
{
    driver: LockstepDriver<R>,
    clock: WallClock,
    control_rx: Receiver<Control<R::Event>>,
    snapshot_tx: Sender<Snapshot<R::State>>,
    stop_when_idle: bool,
    dropped_snapshots: u64,
}

impl<R> DriverThread<R>
where
    R: Reactor,
    R::State: Clone + Sized,
{
    /// Main loop. Consumes self and returns the reactor, or the error
    /// that stopped the run.
    fn run(mut self) -> Result<R, ScheduleError> {
        let mut outcome = Ok(());
        loop {
            let now = self.clock.current_tick();
            if let Err(e) = self.catch_up(now) {
                error!(error = %e, "driver stopped");
                outcome = Err(e);
                break;
            }

            let due = self.driver.next_due();
            let wait = match due {
                None if self.stop_when_idle => break,
                None => self.recv_blocking(),
                Some(due) => match self.clock.instant_of(due) {
                    Some(deadline) => self.control_rx.recv_deadline(deadline),
                    None => self.recv_blocking(),
                },
            };

            let result = match wait {
                Ok(Control::Inject(event)) => self.inject(event),
                Ok(Control::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                // The deadline for `due` has passed even if float rounding
                // puts the wall tick one short of it.
                Err(RecvTimeoutError::Timeout) => {
                    let target = due.map_or(self.clock.current_tick(), |due| {
                        due.max(self.clock.current_tick())
                    });
                    self.catch_up(target)
                }
            };
            if let Err(e) = result {
                error!(error = %e, "driver stopped");
                outcome = Err(e);
                break;
            }
        }

        if self.dropped_snapshots > 0 {
            warn!(dropped = self.dropped_snapshots, "snapshots dropped on a full channel");
        }
        debug!(tick = self.driver.now().0, "driver thread exiting");
        outcome.map(|()| self.driver.into_reactor())
    }

    fn recv_blocking(&self) -> Result<Control<R::Event>, RecvTimeoutError> {
        self.control_rx
            .recv()
            .map_err(|_| RecvTimeoutError::Disconnected)
    }

    fn catch_up(&mut self, target: TickId) -> Result<(), ScheduleError> {
        let target = target.max(self.driver.now());
        let mut sink = ChannelSink {
            tx: &self.snapshot_tx,
            dropped: 0,
        };
        let result = self.driver.advance_to(target, &mut sink);
        self.dropped_snapshots += sink.dropped;
        result.map(|_| ())
    }

    fn inject(&mut self, event: R::Event) -> Result<(), ScheduleError> {
        let now = self.clock.current_tick();
        self.catch_up(now)?;
        match self.driver.inject(event) {
            Ok(_) => Ok(()),
            Err(e @ ScheduleError::QueueFull { .. }) => {
                warn!(error = %e, "injected event rejected");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

// ── RealtimeDriver ──────────────────────────────────────────────

/// Handle to a reactor running against the wall clock.
///
/// Dropping the handle shuts the thread down and joins it.
pub struct RealtimeDriver<R: Reactor>
where
    R::State: Sized,
{
    control: Option<Sender<Control<R::Event>>>,
    snapshots: Receiver<Snapshot<R::State>>,
    thread: Option<JoinHandle<Result<R, ScheduleError>>>,
}

impl<R> RealtimeDriver<R>
where
    R: Reactor + Send + 'static,
    R::Event: Send + 'static,
    R::State: Clone + Send + Sized + 'static,
{
    /// Spawn the driver thread with `initial` events scheduled at tick 0.
    ///
    /// With `stop_when_idle` set, the thread exits as soon as nothing is
    /// pending, so `initial` should seed the run.
    pub fn spawn(
        reactor: R,
        config: &DriverConfig,
        initial: impl IntoIterator<Item = R::Event>,
    ) -> Result<Self, ConfigError> {
        let mut driver = LockstepDriver::new(reactor, config)?;
        for event in initial {
            driver.inject(event)?;
        }

        let (control_tx, control_rx) = crossbeam_channel::bounded(CONTROL_CAPACITY);
        let (snapshot_tx, snapshots) = crossbeam_channel::bounded(config.snapshot_capacity);
        let clock = WallClock::new(config)?;
        let stop_when_idle = config.stop_when_idle;

        let thread = thread::Builder::new()
            .name("reel-driver".into())
            .spawn(move || {
                DriverThread {
                    driver,
                    clock,
                    control_rx,
                    snapshot_tx,
                    stop_when_idle,
                    dropped_snapshots: 0,
                }
                .run()
            })
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: e.to_string(),
            })?;

        Ok(Self {
            control: Some(control_tx),
            snapshots,
            thread: Some(thread),
        })
    }

    /// Schedule `event` at the current wall tick.
    ///
    /// Returns `false` if the driver thread has already exited.
    pub fn inject(&self, event: R::Event) -> bool {
        match &self.control {
            Some(tx) => tx.send(Control::Inject(event)).is_ok(),
            None => false,
        }
    }

    /// Snapshots published after each reaction.
    pub fn snapshots(&self) -> &Receiver<Snapshot<R::State>> {
        &self.snapshots
    }

    /// Whether the driver thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Ask the thread to stop after its current reaction.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.control.take() {
            // The thread may already have exited on idle.
            let _ = tx.send(Control::Shutdown);
        }
    }

    /// Wait for the thread to exit and recover the reactor.
    ///
    /// Without a prior [`shutdown()`](Self::shutdown) this waits for the
    /// thread to go idle, which never happens if `stop_when_idle` is off.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DriverStopped`] if a scheduling error ended the run
    /// early, [`ConfigError::EngineRecoveryFailed`] if the thread panicked.
    pub fn join(mut self) -> Result<R, ConfigError> {
        let handle = self.thread.take().ok_or(ConfigError::EngineRecoveryFailed)?;
        handle
            .join()
            .map_err(|_| ConfigError::EngineRecoveryFailed)?
            .map_err(ConfigError::DriverStopped)
    }
}

impl<R: Reactor> Drop for RealtimeDriver<R>
where
    R::State: Sized,
{
    fn drop(&mut self) {
        if let Some(tx) = self.control.take() {
            let _ = tx.send(Control::Shutdown);
        }
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lockstep::Timers;
    use std::time::Duration;

    #[derive(Clone, Debug, PartialEq)]
    enum Ev {
        Seed,
        Tag(&'static str),
    }

    #[derive(Default)]
    struct Tagger {
        log: Vec<(u64, &'static str)>,
    }

    impl Reactor for Tagger {
        type Event = Ev;
        type State = Vec<(u64, &'static str)>;

        fn react(&mut self, now: TickId, event: &Ev, timers: &mut Timers<Ev>) {
            match event {
                Ev::Seed => {
                    timers.after(30, Ev::Tag("late"));
                    timers.after(10, Ev::Tag("early"));
                    timers.after(10, Ev::Tag("early-2"));
                }
                Ev::Tag(name) => self.log.push((now.0, name)),
            }
        }

        fn state(&self) -> &Self::State {
            &self.log
        }
    }

    fn fast() -> DriverConfig {
        DriverConfig {
            tick_rate_hz: 1000.0,
            time_scale: 10.0,
            ..DriverConfig::default()
        }
    }

    #[test]
    fn runs_to_idle_in_order() {
        let driver = RealtimeDriver::spawn(Tagger::default(), &fast(), [Ev::Seed]).unwrap();
        let snapshots = driver.snapshots().clone();
        let reactor = driver.join().unwrap();
        assert_eq!(reactor.log, vec![(10, "early"), (10, "early-2"), (30, "late")]);

        let published: Vec<Snapshot<_>> = snapshots.try_iter().collect();
        assert_eq!(published.len(), 4);
        assert_eq!(published.last().map(|s| s.state.len()), Some(3));
        for pair in published.windows(2) {
            assert!(pair[0].tick <= pair[1].tick);
        }
    }

    #[test]
    fn shutdown_stops_a_long_wait() {
        let cfg = DriverConfig {
            stop_when_idle: false,
            ..DriverConfig::default()
        };
        let mut driver = RealtimeDriver::spawn(Tagger::default(), &cfg, []).unwrap();
        assert!(driver.inject(Ev::Tag("now")));
        // Wait for the injected reaction to publish.
        let snap = driver
            .snapshots()
            .recv_timeout(Duration::from_secs(5))
            .unwrap();
        assert_eq!(snap.state.len(), 1);
        driver.shutdown();
        assert!(!driver.inject(Ev::Tag("ignored")));
        let reactor = driver.join().unwrap();
        assert_eq!(reactor.log.len(), 1);
        assert_eq!(reactor.log[0].1, "now");
    }

    #[test]
    fn idle_start_exits_immediately() {
        let driver = RealtimeDriver::spawn(Tagger::default(), &fast(), []).unwrap();
        let reactor = driver.join().unwrap();
        assert!(reactor.log.is_empty());
    }

    #[test]
    fn scheduling_failure_surfaces_from_join() {
        // Seed stages three follow-ups; only two fit.
        let cfg = DriverConfig {
            max_pending: 2,
            ..fast()
        };
        let driver = RealtimeDriver::spawn(Tagger::default(), &cfg, [Ev::Seed]).unwrap();
        match driver.join() {
            Err(ConfigError::DriverStopped(ScheduleError::QueueFull { capacity: 2 })) => {}
            Err(other) => panic!("expected DriverStopped, got {other:?}"),
            Ok(_) => panic!("expected DriverStopped, got a reactor"),
        }
    }

    #[test]
    fn invalid_config_rejected_before_spawn() {
        let cfg = DriverConfig {
            snapshot_capacity: 0,
            ..DriverConfig::default()
        };
        match RealtimeDriver::spawn(Tagger::default(), &cfg, [Ev::Seed]) {
            Err(ConfigError::SnapshotCapacityZero) => {}
            Err(other) => panic!("expected SnapshotCapacityZero, got {other:?}"),
            Ok(_) => panic!("expected SnapshotCapacityZero, got a driver"),
        }
    }
}
