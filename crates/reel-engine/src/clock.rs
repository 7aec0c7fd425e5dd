//! Clock implementations.
//!
//! [`ManualClock`] is advanced explicitly by its owner: a renderer
//! requesting a frame, a lockstep driver jumping to the next due event,
//! or a test. [`WallClock`] derives ticks from elapsed wall time.

use std::time::{Duration, Instant};

use reel_core::{Clock, ScheduleError, TickId};

use crate::config::{ConfigError, DriverConfig};

// ── ManualClock ────────────────────────────────────────────────────

/// A clock that only moves when told to, and never backwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ManualClock {
    tick: TickId,
}

impl ManualClock {
    /// A clock at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock starting at `tick`.
    pub fn starting_at(tick: TickId) -> Self {
        Self { tick }
    }

    /// Move to `tick`. Setting the current tick again is allowed.
    pub fn set(&mut self, tick: TickId) -> Result<(), ScheduleError> {
        if tick < self.tick {
            return Err(ScheduleError::TickRewound {
                last: self.tick,
                requested: tick,
            });
        }
        self.tick = tick;
        Ok(())
    }

    /// Move forward by `ticks`, returning the new tick.
    pub fn advance(&mut self, ticks: u64) -> TickId {
        self.tick = self.tick.offset(ticks);
        self.tick
    }
}

impl Clock for ManualClock {
    fn current_tick(&self) -> TickId {
        self.tick
    }
}

// ── WallClock ──────────────────────────────────────────────────────

/// Maps elapsed wall time since construction to ticks.
#[derive(Clone, Debug)]
pub struct WallClock {
    origin: Instant,
    ticks_per_sec: f64,
}

impl WallClock {
    /// Start a clock at tick 0 now.
    pub fn new(config: &DriverConfig) -> Result<Self, ConfigError> {
        Self::starting_at(Instant::now(), config)
    }

    /// Start a clock whose tick 0 is `origin`.
    pub fn starting_at(origin: Instant, config: &DriverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            origin,
            ticks_per_sec: config.effective_rate(),
        })
    }

    /// Ticks elapsed at wall instant `at`. Instants before the origin
    /// map to tick 0.
    pub fn tick_at(&self, at: Instant) -> TickId {
        let secs = at.saturating_duration_since(self.origin).as_secs_f64();
        let ticks = (secs * self.ticks_per_sec).floor();
        if ticks >= u64::MAX as f64 {
            TickId(u64::MAX)
        } else {
            TickId(ticks as u64)
        }
    }

    /// Wall instant at which `tick` begins, or `None` if it is beyond
    /// what the platform's `Instant` can represent.
    pub fn instant_of(&self, tick: TickId) -> Option<Instant> {
        let secs = tick.0 as f64 / self.ticks_per_sec;
        let offset = Duration::try_from_secs_f64(secs).ok()?;
        self.origin.checked_add(offset)
    }
}

impl Clock for WallClock {
    fn current_tick(&self) -> TickId {
        self.tick_at(Instant::now())
    }
}
