//! Piecewise-linear interpolation with configurable extrapolation.
//!
//! [`InterpolationWindow`] maps an input value (usually an event-local
//! tick) through matched breakpoints to an output value. Outside the
//! breakpoint range the [`Extrapolate`] policy for that side decides the
//! result. Windows are validated at construction: the input range must
//! be strictly increasing, both ranges must have the same cardinality,
//! and every breakpoint must be finite.
//!
//! The interpolator never rounds. Callers that display integers (tick
//! counters, percentages) round at the presentation layer.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use reel_core::AnimError;

/// Behaviour outside the input range, per side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolate {
    /// Hold the boundary output value.
    #[default]
    Clamp,
    /// Continue the slope of the outermost segment.
    Extend,
    /// Return the input unchanged.
    Identity,
}

/// Left and right extrapolation policies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extrapolation {
    /// Policy below the first breakpoint.
    pub left: Extrapolate,
    /// Policy above the last breakpoint.
    pub right: Extrapolate,
}

impl Extrapolation {
    /// Clamp on both sides.
    pub const CLAMP: Self = Self {
        left: Extrapolate::Clamp,
        right: Extrapolate::Clamp,
    };

    /// Extend on both sides.
    pub const EXTEND: Self = Self {
        left: Extrapolate::Extend,
        right: Extrapolate::Extend,
    };
}

type Breakpoints = SmallVec<[f64; 4]>;

/// A validated set of matched input/output breakpoints.
///
/// # Examples
///
/// ```
/// use reel_anim::InterpolationWindow;
///
/// let counter = InterpolationWindow::new(&[0.0, 60.0], &[0.0, 70.0]).unwrap();
/// let v = counter.eval(50.0);
/// assert!((v - 58.333).abs() < 1e-3);
/// assert_eq!(v.round(), 58.0);
/// assert_eq!(counter.eval(-100.0), 0.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct InterpolationWindow {
    input: Breakpoints,
    output: Breakpoints,
    extrapolation: Extrapolation,
}

impl InterpolationWindow {
    /// Create a window clamping on both sides.
    pub fn new(input: &[f64], output: &[f64]) -> Result<Self, AnimError> {
        Self::with_extrapolation(input, output, Extrapolation::CLAMP)
    }

    /// Two-breakpoint shorthand: `[start, end] -> [from, to]`, clamped.
    pub fn linear(start: f64, end: f64, from: f64, to: f64) -> Result<Self, AnimError> {
        Self::new(&[start, end], &[from, to])
    }

    /// Create a window with explicit extrapolation policies.
    pub fn with_extrapolation(
        input: &[f64],
        output: &[f64],
        extrapolation: Extrapolation,
    ) -> Result<Self, AnimError> {
        if input.len() < 2 {
            return Err(AnimError::EmptyRange { len: input.len() });
        }
        if input.len() != output.len() {
            return Err(AnimError::RangeLengthMismatch {
                input: input.len(),
                output: output.len(),
            });
        }
        if input.iter().any(|v| !v.is_finite()) {
            return Err(AnimError::NonFiniteValue {
                what: "input breakpoint",
            });
        }
        if output.iter().any(|v| !v.is_finite()) {
            return Err(AnimError::NonFiniteValue {
                what: "output breakpoint",
            });
        }
        if let Some(index) = (1..input.len()).find(|&i| input[i] <= input[i - 1]) {
            return Err(AnimError::NonMonotonicInput { index });
        }
        Ok(Self {
            input: input.iter().copied().collect(),
            output: output.iter().copied().collect(),
            extrapolation,
        })
    }

    /// Replace the left-side policy.
    pub fn extrapolate_left(mut self, policy: Extrapolate) -> Self {
        self.extrapolation.left = policy;
        self
    }

    /// Replace the right-side policy.
    pub fn extrapolate_right(mut self, policy: Extrapolate) -> Self {
        self.extrapolation.right = policy;
        self
    }

    /// Input breakpoints.
    pub fn input(&self) -> &[f64] {
        &self.input
    }

    /// Output breakpoints.
    pub fn output(&self) -> &[f64] {
        &self.output
    }

    /// Extrapolation policies.
    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    /// Evaluate the window at `x`.
    ///
    /// At an input breakpoint the matching output breakpoint is returned
    /// exactly. A NaN input yields NaN.
    pub fn eval(&self, x: f64) -> f64 {
        let last = self.input.len() - 1;

        if x < self.input[0] {
            return match self.extrapolation.left {
                Extrapolate::Clamp => self.output[0],
                Extrapolate::Identity => x,
                Extrapolate::Extend => self.segment(0, x),
            };
        }
        if x > self.input[last] {
            return match self.extrapolation.right {
                Extrapolate::Clamp => self.output[last],
                Extrapolate::Identity => x,
                Extrapolate::Extend => self.segment(last - 1, x),
            };
        }
        if x.is_nan() {
            return x;
        }

        // First breakpoint >= x; x lies in [input[i-1], input[i]].
        let i = self.input.partition_point(|&b| b < x);
        if self.input[i] == x {
            return self.output[i];
        }
        self.segment(i - 1, x)
    }

    /// Linear evaluation on segment `[i, i + 1]`, unclamped.
    fn segment(&self, i: usize, x: f64) -> f64 {
        let (x0, x1) = (self.input[i], self.input[i + 1]);
        let (y0, y1) = (self.output[i], self.output[i + 1]);
        y0 + (x - x0) / (x1 - x0) * (y1 - y0)
    }
}

/// One-off interpolation without keeping the window.
///
/// Validates the ranges on every call; hot paths should build an
/// [`InterpolationWindow`] once and reuse it.
pub fn interpolate(
    x: f64,
    input: &[f64],
    output: &[f64],
    extrapolation: Extrapolation,
) -> Result<f64, AnimError> {
    Ok(InterpolationWindow::with_extrapolation(input, output, extrapolation)?.eval(x))
}
