//! Core types and traits for the Reel timeline engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions shared by both engine instantiations
//! (the incident simulation and the video scene scheduler): tick and
//! event identifiers, scheduled events, error types, and the clock and
//! presentation-sink traits.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod event;
pub mod id;
pub mod rate;
pub mod traits;

pub use error::{AnimError, ScheduleError};
pub use event::{EventSpan, EventState, ScheduledEvent};
pub use id::{ElementId, EventId, SceneId, TickId};
pub use rate::FrameRate;
pub use traits::{Clock, PresentationSink};
