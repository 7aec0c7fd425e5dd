//! Validated tick rate.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AnimError;

/// Ticks per second of a timeline, validated finite and positive.
///
/// Converts tick counts to physical seconds for spring evaluation.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct FrameRate(f64);

impl FrameRate {
    /// 30 frames per second, the video rate.
    pub const VIDEO: FrameRate = FrameRate(30.0);

    /// One tick per millisecond, the incident simulation rate.
    pub const MILLIS: FrameRate = FrameRate(1000.0);

    /// Create a frame rate, rejecting NaN, infinite, zero, negative, and
    /// subnormal values (whose reciprocal would be infinite).
    pub fn new(fps: f64) -> Result<Self, AnimError> {
        if !fps.is_finite() || fps <= 0.0 || !(1.0 / fps).is_finite() {
            return Err(AnimError::InvalidFrameRate { value: fps });
        }
        Ok(Self(fps))
    }

    /// Ticks per second.
    pub fn get(self) -> f64 {
        self.0
    }

    /// Convert a (possibly negative) tick count to seconds.
    pub fn seconds(self, ticks: f64) -> f64 {
        ticks / self.0
    }
}

impl TryFrom<f64> for FrameRate {
    type Error = AnimError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FrameRate> for f64 {
    fn from(rate: FrameRate) -> Self {
        rate.0
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}fps", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_standard_rates() {
        assert_eq!(FrameRate::new(30.0).unwrap().get(), 30.0);
        assert_eq!(FrameRate::new(1000.0).unwrap().seconds(1500.0), 1.5);
        assert_eq!(FrameRate::new(30.0).unwrap(), FrameRate::VIDEO);
        assert_eq!(FrameRate::MILLIS.get(), 1000.0);
    }

    #[test]
    fn rejects_degenerate_rates() {
        for bad in [0.0, -30.0, f64::NAN, f64::INFINITY, f64::from_bits(1)] {
            match FrameRate::new(bad) {
                Err(AnimError::InvalidFrameRate { .. }) => {}
                other => panic!("expected InvalidFrameRate for {bad}, got {other:?}"),
            }
        }
    }
}
