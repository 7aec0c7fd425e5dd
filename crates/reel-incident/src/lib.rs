//! Incident-response dashboard simulation for the Reel timeline engine.
//!
//! A [`SimulationEngine`] plays three canned incidents into a dashboard
//! that already shows five baseline ones. Agent actions arrive one by one,
//! then a root cause is attached, then the next incident fires. Every step
//! is a timed event on the engine's queue, so the run is the same whether
//! it is driven against the wall clock or stepped by a test.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod model;
pub mod simulation;

pub use catalog::{Catalog, Scenario};
pub use model::{
    ActionStatus, AgentAction, DashboardStats, Incident, IncidentStatus, LogEntry, LogLevel,
    Resolution, Severity,
};
pub use simulation::{simulate, RunState, SimEvent, SimPhase, SimTiming, SimulationEngine};
