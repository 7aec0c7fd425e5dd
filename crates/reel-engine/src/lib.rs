//! Event schedule, dispatcher and drivers for the Reel timeline engine.
//!
//! Provides the [`EventSchedule`] that orders timed events, the
//! [`Dispatcher`] that maps a tick to active events and their derived
//! values, and two drivers for push-style reactors: the synchronous
//! [`LockstepDriver`] and the wall-clock [`RealtimeDriver`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod clock;
pub mod config;
pub mod dispatcher;
pub mod lockstep;
pub mod metrics;
pub mod queue;
pub mod realtime;
pub mod schedule;

pub use clock::{ManualClock, WallClock};
pub use config::{ConfigError, DriverConfig};
pub use dispatcher::{Animate, Dispatched, Dispatcher};
pub use lockstep::{LockstepDriver, Reactor, Timers};
pub use metrics::DispatchMetrics;
pub use queue::PendingQueue;
pub use realtime::{RealtimeDriver, Snapshot};
pub use schedule::EventSchedule;
