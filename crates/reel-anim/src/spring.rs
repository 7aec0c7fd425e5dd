//! Closed-form damped spring progress.
//!
//! A spring here is a unit mass-spring-damper released at rest from
//! displacement 1 and settling towards 0. Progress is `1 - x(t)`, so it
//! starts at 0, approaches 1, and overshoots past 1 when underdamped.
//! The solution is analytic in elapsed time: there is no integrated
//! state, and evaluating any tick in any order gives the same value.

use serde::Serialize;

use reel_core::{AnimError, FrameRate};

/// Ratio band treated as critical damping.
const CRITICAL_EPSILON: f64 = 1e-9;

/// Physical constants of a spring.
///
/// `damping` may be zero (an undamped oscillator). `stiffness` and
/// `mass` must be strictly positive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SpringConfig {
    damping: f64,
    stiffness: f64,
    mass: f64,
}

impl SpringConfig {
    /// Validate and create a spring configuration.
    pub fn new(damping: f64, stiffness: f64, mass: f64) -> Result<Self, AnimError> {
        for (what, value) in [("damping", damping), ("stiffness", stiffness), ("mass", mass)] {
            if !value.is_finite() {
                return Err(AnimError::InvalidSpring {
                    reason: format!("{what} must be finite, got {value}"),
                });
            }
        }
        if damping < 0.0 {
            return Err(AnimError::InvalidSpring {
                reason: format!("damping must be non-negative, got {damping}"),
            });
        }
        if stiffness <= 0.0 {
            return Err(AnimError::InvalidSpring {
                reason: format!("stiffness must be positive, got {stiffness}"),
            });
        }
        if mass <= 0.0 {
            return Err(AnimError::InvalidSpring {
                reason: format!("mass must be positive, got {mass}"),
            });
        }
        Ok(Self {
            damping,
            stiffness,
            mass,
        })
    }

    /// Damping coefficient.
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Spring stiffness.
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// Oscillating mass.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Undamped angular frequency `sqrt(k / m)`.
    pub fn natural_frequency(&self) -> f64 {
        (self.stiffness / self.mass).sqrt()
    }

    /// Damping ratio `c / (2 sqrt(k m))`. Below 1 the spring overshoots.
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Whether this spring overshoots its target.
    pub fn is_underdamped(&self) -> bool {
        self.damping_ratio() < 1.0 - CRITICAL_EPSILON
    }

    /// Progress after `t` seconds. Negative `t` yields 0.
    pub fn progress_at(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        1.0 - self.displacement(t)
    }

    fn displacement(&self, t: f64) -> f64 {
        let w0 = self.natural_frequency();
        let zeta = self.damping_ratio();

        if (zeta - 1.0).abs() <= CRITICAL_EPSILON {
            let wt = w0 * t;
            return (-wt).exp() * (1.0 + wt);
        }
        if zeta < 1.0 {
            let wd = w0 * (1.0 - zeta * zeta).sqrt();
            let decay = (-zeta * w0 * t).exp();
            return decay * ((wd * t).cos() + zeta * w0 / wd * (wd * t).sin());
        }
        let root = (zeta * zeta - 1.0).sqrt();
        let r1 = -w0 * (zeta - root);
        let r2 = -w0 * (zeta + root);
        (r2 * (r1 * t).exp() - r1 * (r2 * t).exp()) / (r2 - r1)
    }
}

/// Spring progress `elapsed_ticks` after the animation's start.
///
/// Ticks become seconds through `fps`. Before the start (`elapsed_ticks
/// < 0`) progress is 0. The value is not clamped: underdamped springs
/// overshoot 1 before settling.
///
/// # Examples
///
/// ```
/// use reel_anim::{spring_value, SpringConfig};
/// use reel_core::FrameRate;
///
/// let fps = FrameRate::new(30.0).unwrap();
/// let cfg = SpringConfig::new(20.0, 100.0, 0.5).unwrap();
/// assert_eq!(spring_value(-3, fps, &cfg), 0.0);
/// assert!((spring_value(1_000_000, fps, &cfg) - 1.0).abs() < 1e-9);
/// ```
pub fn spring_value(elapsed_ticks: i64, fps: FrameRate, config: &SpringConfig) -> f64 {
    if elapsed_ticks < 0 {
        return 0.0;
    }
    config.progress_at(fps.seconds(elapsed_ticks as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fps30() -> FrameRate {
        FrameRate::new(30.0).unwrap()
    }

    #[test]
    fn rejects_degenerate_configs() {
        for (c, k, m) in [
            (10.0, 0.0, 1.0),
            (10.0, -1.0, 1.0),
            (10.0, 100.0, 0.0),
            (10.0, 100.0, -0.5),
            (-1.0, 100.0, 1.0),
            (f64::NAN, 100.0, 1.0),
            (10.0, f64::INFINITY, 1.0),
        ] {
            match SpringConfig::new(c, k, m) {
                Err(AnimError::InvalidSpring { .. }) => {}
                other => panic!("expected InvalidSpring for ({c}, {k}, {m}), got {other:?}"),
            }
        }
    }

    #[test]
    fn starts_at_zero() {
        let cfg = SpringConfig::new(15.0, 80.0, 0.6).unwrap();
        assert_eq!(spring_value(0, fps30(), &cfg), 0.0);
        assert_eq!(spring_value(-100, fps30(), &cfg), 0.0);
    }

    #[test]
    fn overdamped_text_spring_settles() {
        let cfg = SpringConfig::new(20.0, 100.0, 0.5).unwrap();
        assert!(cfg.damping_ratio() > 1.0);
        let v = spring_value(1_000_000, fps30(), &cfg);
        assert!((v - 1.0).abs() < 1e-9, "got {v}");
    }

    #[test]
    fn critical_spring_settles_without_overshoot() {
        // c = 2 sqrt(k m) = 2 sqrt(100 * 1) = 20
        let cfg = SpringConfig::new(20.0, 100.0, 1.0).unwrap();
        assert!((cfg.damping_ratio() - 1.0).abs() < 1e-12);
        let mut prev = 0.0;
        for tick in 0..300 {
            let v = spring_value(tick, fps30(), &cfg);
            assert!(v >= prev - 1e-12 && v <= 1.0 + 1e-12, "tick {tick}: {v}");
            prev = v;
        }
        assert!((prev - 1.0).abs() < 1e-6);
    }

    #[test]
    fn underdamped_spring_overshoots() {
        // Security block impact spring.
        let cfg = SpringConfig::new(8.0, 150.0, 0.5).unwrap();
        assert!(cfg.is_underdamped());
        let peak = (0..90)
            .map(|t| spring_value(t, fps30(), &cfg))
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(peak > 1.05, "expected visible overshoot, peak {peak}");
        assert!((spring_value(600, fps30(), &cfg) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn undamped_spring_is_bounded() {
        let cfg = SpringConfig::new(0.0, 100.0, 1.0).unwrap();
        for tick in 0..1000 {
            let v = spring_value(tick, fps30(), &cfg);
            assert!((0.0 - 1e-9..=2.0 + 1e-9).contains(&v), "tick {tick}: {v}");
        }
    }

    #[test]
    fn frame_rate_scales_time() {
        let cfg = SpringConfig::new(15.0, 100.0, 0.5).unwrap();
        let at30 = spring_value(15, fps30(), &cfg);
        let at60 = spring_value(30, FrameRate::new(60.0).unwrap(), &cfg);
        assert!((at30 - at60).abs() < 1e-12);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_valid_spring_is_finite_and_settles(
                c in 0.5f64..60.0,
                k in 1.0f64..400.0,
                m in 0.1f64..5.0,
                tick in 0i64..10_000,
            ) {
                let cfg = SpringConfig::new(c, k, m).unwrap();
                let v = spring_value(tick, fps30(), &cfg);
                prop_assert!(v.is_finite());
                let settled = spring_value(1_000_000, fps30(), &cfg);
                prop_assert!((settled - 1.0).abs() < 1e-6, "settled at {settled}");
            }

            #[test]
            fn pure_in_elapsed_ticks(tick in -100i64..5_000) {
                let cfg = SpringConfig::new(12.0, 80.0, 0.8).unwrap();
                prop_assert_eq!(spring_value(tick, fps30(), &cfg), spring_value(tick, fps30(), &cfg));
            }
        }
    }
}
