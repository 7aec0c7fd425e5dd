//! Composable event-local clocks.
//!
//! A [`LocalClock`] is the elapsed tick count of one component relative
//! to its own zero point, plus the frame rate it runs at. Nesting is a
//! subtraction: a child declared `delay` ticks into its parent sees
//! `parent.delayed(delay)`. Every animated value is then a pure function
//! of `(local clock, static config)`.

use reel_core::{FrameRate, TickId};

use crate::interpolate::InterpolationWindow;
use crate::spring::{spring_value, SpringConfig};

/// Elapsed ticks relative to a component's zero point.
///
/// May be negative: a component evaluated before its delay has elapsed
/// sees a negative clock, and every primitive treats that as "not
/// started".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalClock {
    elapsed: i64,
    fps: FrameRate,
}

impl LocalClock {
    /// Clock at a global tick, zeroed at tick 0.
    pub fn root(tick: TickId, fps: FrameRate) -> Self {
        Self {
            elapsed: tick.since(TickId::ZERO),
            fps,
        }
    }

    /// Clock zeroed at `origin`, read at `tick`.
    pub fn since(tick: TickId, origin: TickId, fps: FrameRate) -> Self {
        Self {
            elapsed: tick.since(origin),
            fps,
        }
    }

    /// Clock with an explicit elapsed value.
    pub fn at(elapsed: i64, fps: FrameRate) -> Self {
        Self { elapsed, fps }
    }

    /// Child clock that starts `delay` ticks after this one.
    pub fn delayed(self, delay: i64) -> Self {
        Self {
            elapsed: self.elapsed.saturating_sub(delay),
            fps: self.fps,
        }
    }

    /// Elapsed ticks since this clock's zero point.
    pub fn elapsed(&self) -> i64 {
        self.elapsed
    }

    /// Frame rate of this clock.
    pub fn fps(&self) -> FrameRate {
        self.fps
    }

    /// Whether the zero point has been reached.
    pub fn started(&self) -> bool {
        self.elapsed >= 0
    }

    /// Evaluate `window` at this clock.
    pub fn interpolate(&self, window: &InterpolationWindow) -> f64 {
        window.eval(self.elapsed as f64)
    }

    /// Spring progress at this clock.
    pub fn spring(&self, config: &SpringConfig) -> f64 {
        spring_value(self.elapsed, self.fps, config)
    }

    /// Linear 0 to 1 ramp over `over` ticks, clamped.
    pub fn ramp(&self, over: u64) -> f64 {
        ramp(self.elapsed, over)
    }

    /// Fade in over the first `fade` ticks and out over the last `fade`
    /// ticks of a `duration`-tick window.
    pub fn fade_in_out(&self, duration: u64, fade: u64) -> f64 {
        fade_in_out(self.elapsed, duration, fade)
    }
}

/// Clamped linear ramp from 0 at `elapsed = 0` to 1 at `elapsed = over`.
///
/// A zero-length ramp is a step at 0.
pub fn ramp(elapsed: i64, over: u64) -> f64 {
    if elapsed <= 0 {
        return if over == 0 && elapsed == 0 { 1.0 } else { 0.0 };
    }
    if over == 0 || elapsed as u64 >= over {
        return 1.0;
    }
    elapsed as f64 / over as f64
}

/// Opacity of a window of `duration` ticks with symmetric fades.
///
/// The fade-in reaches 1 at `fade`; the fade-out starts at
/// `duration - fade` and reaches 0 at `duration`. The result is the
/// minimum of the two, so it is 0 at both ends of the window and 0
/// outside it. When the window is shorter than two fades the curves
/// meet below 1.
pub fn fade_in_out(elapsed: i64, duration: u64, fade: u64) -> f64 {
    let dur = i64::try_from(duration).unwrap_or(i64::MAX);
    if elapsed < 0 || elapsed >= dur {
        return 0.0;
    }
    if fade == 0 {
        return 1.0;
    }
    let fade_in = ramp(elapsed, fade);
    let fade_out = ramp(dur - elapsed, fade);
    fade_in.min(fade_out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fps30() -> FrameRate {
        FrameRate::new(30.0).unwrap()
    }

    #[test]
    fn nested_delays_compose() {
        let scene = LocalClock::since(TickId(1_000), TickId(960), fps30());
        assert_eq!(scene.elapsed(), 40);
        let group = scene.delayed(28);
        let child = group.delayed(4);
        assert_eq!(child.elapsed(), 8);
        assert_eq!(scene.delayed(32), child);
    }

    #[test]
    fn negative_clock_is_not_started() {
        let c = LocalClock::at(0, fps30()).delayed(60);
        assert!(!c.started());
        assert_eq!(c.elapsed(), -60);
        assert_eq!(c.ramp(12), 0.0);
        let w = InterpolationWindow::linear(0.0, 20.0, 40.0, 0.0).unwrap();
        assert_eq!(c.interpolate(&w), 40.0);
        let s = SpringConfig::new(20.0, 100.0, 0.5).unwrap();
        assert_eq!(c.spring(&s), 0.0);
    }

    #[test]
    fn ramp_shape() {
        assert_eq!(ramp(-1, 12), 0.0);
        assert_eq!(ramp(0, 12), 0.0);
        assert_eq!(ramp(6, 12), 0.5);
        assert_eq!(ramp(12, 12), 1.0);
        assert_eq!(ramp(400, 12), 1.0);
        assert_eq!(ramp(0, 0), 1.0);
        assert_eq!(ramp(-1, 0), 0.0);
    }

    #[test]
    fn fade_reaches_full_in_the_middle() {
        assert_eq!(fade_in_out(0, 150, 12), 0.0);
        assert_eq!(fade_in_out(6, 150, 12), 0.5);
        assert_eq!(fade_in_out(12, 150, 12), 1.0);
        assert_eq!(fade_in_out(75, 150, 12), 1.0);
        assert_eq!(fade_in_out(138, 150, 12), 1.0);
        assert_eq!(fade_in_out(144, 150, 12), 0.5);
        assert_eq!(fade_in_out(150, 150, 12), 0.0);
        assert_eq!(fade_in_out(-3, 150, 12), 0.0);
    }

    #[test]
    fn short_windows_never_reach_full() {
        let peak = (0..10)
            .map(|t| fade_in_out(t, 10, 12))
            .fold(0.0f64, f64::max);
        assert!(peak < 1.0);
        assert!(peak > 0.0);
    }

    #[test]
    fn zero_fade_is_a_hard_cut() {
        assert_eq!(fade_in_out(0, 10, 0), 1.0);
        assert_eq!(fade_in_out(9, 10, 0), 1.0);
        assert_eq!(fade_in_out(10, 10, 0), 0.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn fade_is_zero_outside_window(dur in 1u64..10_000, fade in 0u64..30, past in 0i64..10_000) {
                prop_assert_eq!(fade_in_out(dur as i64 + past, dur, fade), 0.0);
                prop_assert_eq!(fade_in_out(-1 - past, dur, fade), 0.0);
            }

            #[test]
            fn fade_is_a_unit_value(dur in 1u64..10_000, fade in 0u64..30, t in -100i64..11_000) {
                let v = fade_in_out(t, dur, fade);
                prop_assert!((0.0..=1.0).contains(&v));
            }
        }
    }
}
