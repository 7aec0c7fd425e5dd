//! Reel: a discrete-time event and animation engine.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Reel sub-crates. For most users, adding `reel` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use reel::prelude::*;
//!
//! // Schedule a counter that climbs from 0 to 70 over 60 frames.
//! struct Counter(InterpolationWindow);
//! impl Animate for Counter {
//!     type Output = f64;
//!     fn animate(&self, clock: LocalClock, _span: EventSpan) -> f64 {
//!         clock.interpolate(&self.0)
//!     }
//! }
//!
//! let window = InterpolationWindow::linear(0.0, 60.0, 0.0, 70.0).unwrap();
//! let mut dispatcher = Dispatcher::new(EventSchedule::new(), FrameRate::VIDEO);
//! dispatcher
//!     .schedule(ScheduledEvent::spanning(TickId(100), 120, Counter(window)))
//!     .unwrap();
//!
//! let active = dispatcher.evaluate(TickId(130));
//! assert_eq!(active.len(), 1);
//! assert_eq!(active[0].value, 35.0);
//! assert!(dispatcher.evaluate(TickId(220)).is_empty());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `reel-core` | Ticks, IDs, scheduled events, errors, core traits |
//! | [`anim`] | `reel-anim` | Interpolation, springs, local clocks, reveals |
//! | [`engine`] | `reel-engine` | Event schedule, dispatcher, lockstep and realtime drivers |
//! | [`incident`] | `reel-incident` | Incident-response dashboard simulation |
//! | [`video`] | `reel-video` | Scene plans, element trees, frame rendering |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`reel-core`).
///
/// Contains [`types::TickId`], [`types::ScheduledEvent`], the error enums,
/// and the two seams [`types::Clock`] and [`types::PresentationSink`].
pub use reel_core as types;

/// Pure animation primitives (`reel-anim`).
///
/// [`anim::InterpolationWindow`], [`anim::spring_value`] and the
/// composable [`anim::LocalClock`].
pub use reel_anim as anim;

/// Scheduling and drivers (`reel-engine`).
///
/// [`engine::Dispatcher`] for per-frame evaluation,
/// [`engine::LockstepDriver`] for deterministic reactor runs,
/// [`engine::RealtimeDriver`] for wall-clock playback on a thread.
pub use reel_engine as engine;

/// Incident-response dashboard simulation (`reel-incident`).
pub use reel_incident as incident;

/// Scene scheduler for the demo video (`reel-video`).
pub use reel_video as video;

/// Common imports for typical Reel usage.
///
/// ```rust
/// use reel::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use reel_core::{
        Clock, EventId, EventSpan, EventState, FrameRate, PresentationSink, ScheduledEvent,
        TickId,
    };

    // Errors
    pub use reel_core::{AnimError, ScheduleError};
    pub use reel_engine::ConfigError;
    pub use reel_video::VideoConfigError;

    // Animation
    pub use reel_anim::{InterpolationWindow, LocalClock, SpringConfig};

    // Engine
    pub use reel_engine::{
        Animate, Dispatcher, DriverConfig, EventSchedule, LockstepDriver, Reactor,
        RealtimeDriver, Timers,
    };

    // Instantiations
    pub use reel_incident::{simulate, RunState, SimulationEngine};
    pub use reel_video::{FrameTree, VideoConfig, VideoTimeline};
}
