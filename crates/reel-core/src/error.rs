//! Error types for the Reel timeline engine.
//!
//! Organized by subsystem: animation primitives (interpolation, springs,
//! frame rates) and event scheduling. Both represent caller contract
//! violations that are rejected at construction rather than allowed to
//! surface later as NaN or silently reordered output.

use std::error::Error;
use std::fmt;

use crate::id::{EventId, TickId};

/// Errors from constructing animation primitives.
#[derive(Clone, Debug, PartialEq)]
pub enum AnimError {
    /// An interpolation range had fewer than two breakpoints.
    EmptyRange {
        /// Number of breakpoints supplied.
        len: usize,
    },
    /// Input and output ranges differ in length.
    RangeLengthMismatch {
        /// Length of the input range.
        input: usize,
        /// Length of the output range.
        output: usize,
    },
    /// Input range is not strictly increasing at `index`.
    NonMonotonicInput {
        /// Index of the first breakpoint that is not greater than its predecessor.
        index: usize,
    },
    /// A breakpoint or sample value was NaN or infinite.
    NonFiniteValue {
        /// Which value was rejected.
        what: &'static str,
    },
    /// Spring configuration is physically degenerate.
    InvalidSpring {
        /// Description of the violated constraint.
        reason: String,
    },
    /// Frame rate is NaN, infinite, zero, or negative.
    InvalidFrameRate {
        /// The invalid value.
        value: f64,
    },
}

impl fmt::Display for AnimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRange { len } => {
                write!(f, "interpolation range needs at least 2 breakpoints, got {len}")
            }
            Self::RangeLengthMismatch { input, output } => write!(
                f,
                "input range has {input} breakpoints but output range has {output}"
            ),
            Self::NonMonotonicInput { index } => {
                write!(f, "input range is not strictly increasing at index {index}")
            }
            Self::NonFiniteValue { what } => write!(f, "{what} must be finite"),
            Self::InvalidSpring { reason } => write!(f, "invalid spring: {reason}"),
            Self::InvalidFrameRate { value } => {
                write!(f, "frame rate must be finite and positive, got {value}")
            }
        }
    }
}

impl Error for AnimError {}

/// Errors from the event schedule and dispatcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScheduleError {
    /// A tick earlier than the last evaluated tick was requested.
    TickRewound {
        /// The most recent tick already evaluated.
        last: TickId,
        /// The rejected tick.
        requested: TickId,
    },
    /// The schedule is at capacity.
    QueueFull {
        /// The configured capacity.
        capacity: usize,
    },
    /// No event with this ID exists in the schedule.
    UnknownEvent(EventId),
    /// A duration-bound event was declared with zero duration.
    ZeroDuration,
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TickRewound { last, requested } => {
                write!(f, "tick {requested} rewinds past last evaluated tick {last}")
            }
            Self::QueueFull { capacity } => {
                write!(f, "event schedule full (capacity {capacity})")
            }
            Self::UnknownEvent(id) => write!(f, "unknown event {id}"),
            Self::ZeroDuration => write!(f, "event duration must be at least 1 tick"),
        }
    }
}

impl Error for ScheduleError {}
