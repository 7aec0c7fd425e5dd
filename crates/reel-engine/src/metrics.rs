//! Dispatch counters for the scheduler.
//!
//! [`DispatchMetrics`] is updated by every stateful dispatch and read
//! by drivers and the CLI for reporting.

use reel_core::TickId;

/// Cumulative and last-tick dispatch counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchMetrics {
    /// Number of stateful dispatch calls.
    pub ticks_dispatched: u64,
    /// Cumulative number of one-shot events fired.
    pub one_shots_fired: u64,
    /// Duration-bound events active at the most recent dispatch.
    pub active_spans: u32,
    /// Most recent dispatched tick.
    pub last_tick: Option<TickId>,
    /// Cumulative number of events accepted into the schedule.
    pub events_scheduled: u64,
    /// Cumulative number of inserts rejected because the schedule was full.
    pub queue_full_rejections: u64,
    /// Cumulative number of rejected rewinds.
    pub rewind_rejections: u64,
}
