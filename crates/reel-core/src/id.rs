//! Strongly-typed identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonically increasing tick counter.
///
/// One tick is one discrete unit of the engine's logical clock: a
/// rendered video frame, or one millisecond of simulated wall time
/// for the incident simulation. Ticks are never reused or rewound
/// within one run.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TickId(pub u64);

impl TickId {
    /// The first tick of every run.
    pub const ZERO: TickId = TickId(0);

    /// Returns the tick `delta` ticks after this one, saturating at `u64::MAX`.
    pub fn offset(self, delta: u64) -> TickId {
        TickId(self.0.saturating_add(delta))
    }

    /// Signed distance from `origin` to this tick.
    ///
    /// Negative when `self` lies before `origin`. Used to derive
    /// event-local clocks that may legitimately sit before their
    /// zero point.
    pub fn since(self, origin: TickId) -> i64 {
        let diff = i128::from(self.0) - i128::from(origin.0);
        diff.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }
}

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Identifies a scheduled event within one event schedule.
///
/// Assigned sequentially at insertion, so comparing two IDs compares
/// insertion order. This is the tie-break for events sharing a
/// trigger tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EventId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Identifies a scene in a video plan. `SceneId(n)` is the n-th slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(pub u32);

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SceneId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies an animated element within a scene.
///
/// Element IDs are assigned in declaration order, which is also the
/// paint order handed to the presentation sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ElementId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_saturates() {
        assert_eq!(TickId(u64::MAX - 1).offset(5), TickId(u64::MAX));
        assert_eq!(TickId(10).offset(5), TickId(15));
    }

    #[test]
    fn since_is_signed() {
        assert_eq!(TickId(10).since(TickId(4)), 6);
        assert_eq!(TickId(4).since(TickId(10)), -6);
        assert_eq!(TickId(7).since(TickId(7)), 0);
    }

    #[test]
    fn since_clamps_extremes() {
        assert_eq!(TickId(u64::MAX).since(TickId(0)), i64::MAX);
        assert_eq!(TickId(0).since(TickId(u64::MAX)), i64::MIN);
    }

    #[test]
    fn event_ids_order_by_insertion() {
        assert!(EventId(3) < EventId(4));
    }
}
