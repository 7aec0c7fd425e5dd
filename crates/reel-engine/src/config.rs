//! Driver configuration, validation, and error types.
//!
//! [`DriverConfig`] is the input for constructing a
//! [`LockstepDriver`](crate::LockstepDriver) or
//! [`RealtimeDriver`](crate::RealtimeDriver).
//! [`validate()`](DriverConfig::validate) checks structural invariants
//! before any driver state is built.

use std::error::Error;
use std::fmt;

use reel_core::ScheduleError;

// ── DriverConfig ───────────────────────────────────────────────────

/// Configuration shared by the lockstep and realtime drivers.
#[derive(Clone, Debug, PartialEq)]
pub struct DriverConfig {
    /// Engine ticks per wall-clock second. Default: 1000 (1 tick = 1 ms).
    pub tick_rate_hz: f64,
    /// Wall-clock speed multiplier for the realtime driver. Values above
    /// 1 run the timeline faster than real time. Default: 1.0.
    pub time_scale: f64,
    /// Maximum number of events held by the schedule at once. Default: 1024.
    pub max_pending: usize,
    /// Capacity of the realtime driver's snapshot channel. Default: 64.
    pub snapshot_capacity: usize,
    /// Whether the realtime driver exits once nothing is pending. Default: true.
    pub stop_when_idle: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 1000.0,
            time_scale: 1.0,
            max_pending: 1024,
            snapshot_capacity: 64,
            stop_when_idle: true,
        }
    }
}

impl DriverConfig {
    /// Check every structural invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. tick_rate_hz finite and positive, with a finite period.
        if !self.tick_rate_hz.is_finite()
            || self.tick_rate_hz <= 0.0
            || !(1.0 / self.tick_rate_hz).is_finite()
        {
            return Err(ConfigError::InvalidTickRate {
                value: self.tick_rate_hz,
            });
        }
        // 2. time_scale finite and positive.
        if !self.time_scale.is_finite() || self.time_scale <= 0.0 {
            return Err(ConfigError::InvalidTimeScale {
                value: self.time_scale,
            });
        }
        // 3. Schedule can hold at least one event.
        if self.max_pending == 0 {
            return Err(ConfigError::PendingCapacityZero);
        }
        // 4. Snapshot channel can hold at least one snapshot.
        if self.snapshot_capacity == 0 {
            return Err(ConfigError::SnapshotCapacityZero);
        }
        Ok(())
    }

    /// Engine ticks per wall-clock second after applying `time_scale`.
    pub fn effective_rate(&self) -> f64 {
        self.tick_rate_hz * self.time_scale
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while building or recovering a driver.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// tick_rate_hz is NaN, infinite, zero, or negative.
    InvalidTickRate {
        /// The invalid value.
        value: f64,
    },
    /// time_scale is NaN, infinite, zero, or negative.
    InvalidTimeScale {
        /// The invalid value.
        value: f64,
    },
    /// max_pending is zero.
    PendingCapacityZero,
    /// snapshot_capacity is zero.
    SnapshotCapacityZero,
    /// Seeding the initial events failed.
    Schedule(ScheduleError),
    /// A background thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of the spawn failure.
        reason: String,
    },
    /// The driver thread panicked and its reactor could not be recovered.
    EngineRecoveryFailed,
    /// The driver thread stopped on a scheduling error before going idle.
    DriverStopped(ScheduleError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTickRate { value } => {
                write!(f, "tick_rate_hz must be finite and positive, got {value}")
            }
            Self::InvalidTimeScale { value } => {
                write!(f, "time_scale must be finite and positive, got {value}")
            }
            Self::PendingCapacityZero => write!(f, "max_pending must be at least 1"),
            Self::SnapshotCapacityZero => write!(f, "snapshot_capacity must be at least 1"),
            Self::Schedule(e) => write!(f, "initial schedule: {e}"),
            Self::ThreadSpawnFailed { reason } => {
                write!(f, "failed to spawn driver thread: {reason}")
            }
            Self::EngineRecoveryFailed => write!(f, "driver thread panicked"),
            Self::DriverStopped(e) => write!(f, "driver stopped early: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Schedule(e) | Self::DriverStopped(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ScheduleError> for ConfigError {
    fn from(e: ScheduleError) -> Self {
        Self::Schedule(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(DriverConfig::default().validate().is_ok());
        assert_eq!(DriverConfig::default().effective_rate(), 1000.0);
    }

    #[test]
    fn rejects_bad_tick_rate() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let cfg = DriverConfig {
                tick_rate_hz: bad,
                ..DriverConfig::default()
            };
            match cfg.validate() {
                Err(ConfigError::InvalidTickRate { .. }) => {}
                other => panic!("expected InvalidTickRate for {bad}, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_bad_time_scale() {
        let cfg = DriverConfig {
            time_scale: 0.0,
            ..DriverConfig::default()
        };
        match cfg.validate() {
            Err(ConfigError::InvalidTimeScale { value }) if value == 0.0 => {}
            other => panic!("expected InvalidTimeScale, got {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_capacities() {
        let cfg = DriverConfig {
            max_pending: 0,
            ..DriverConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::PendingCapacityZero));

        let cfg = DriverConfig {
            snapshot_capacity: 0,
            ..DriverConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::SnapshotCapacityZero));
    }

    #[test]
    fn schedule_error_is_source() {
        let err = ConfigError::from(ScheduleError::ZeroDuration);
        assert!(err.source().is_some());
        assert!(format!("{err}").contains("initial schedule"));

        let err = ConfigError::DriverStopped(ScheduleError::QueueFull { capacity: 5 });
        assert!(err.source().is_some());
        assert!(format!("{err}").contains("stopped early"));
    }
}
