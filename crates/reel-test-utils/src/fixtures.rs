//! Small shared fixtures.

use reel_core::{FrameRate, TickId};

/// The video frame rate.
pub fn fps30() -> FrameRate {
    FrameRate::VIDEO
}

/// The dashboard rate: one tick per millisecond.
pub fn millis() -> FrameRate {
    FrameRate::MILLIS
}

/// Whether `ticks` is strictly increasing.
pub fn strictly_increasing(ticks: &[TickId]) -> bool {
    ticks.windows(2).all(|w| w[0] < w[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strictly_increasing_rejects_ties() {
        assert!(strictly_increasing(&[TickId(1), TickId(2)]));
        assert!(!strictly_increasing(&[TickId(1), TickId(1)]));
        assert!(strictly_increasing(&[]));
    }
}
