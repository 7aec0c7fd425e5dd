//! The dashboard simulation as a [`Reactor`].
//!
//! [`SimulationEngine`] owns the [`RunState`] the dashboard renders and
//! reacts to [`SimEvent`]s fired by a driver. Every delayed mutation of
//! the dashboard's timer chain (the first incident, each agent action, the
//! root-cause reveal, the auto-advance to the next incident) is a
//! follow-up event staged on [`Timers`], so the whole run is ordered by
//! absolute fire tick.
//!
//! ```text
//! Idle ──Start──▶ Running ──Trigger──▶ IncidentActive(0) ─▶ … ─▶ IncidentActive(n)
//!                                                                     │
//!                                            last Resolve ──▶ Complete
//! ```

use serde::Serialize;
use tracing::{debug, info, warn};

use reel_core::{PresentationSink, TickId};
use reel_engine::{ConfigError, DriverConfig, LockstepDriver, Reactor, Timers};

use crate::catalog::Catalog;
use crate::model::{ActionStatus, DashboardStats, Incident, IncidentStatus, LogEntry, LogLevel};

/// Characters of action text kept in a log line.
const LOG_ACTION_CHARS: usize = 60;

// ── Timing ──────────────────────────────────────────────────────

/// Delays between simulation steps, in engine ticks.
///
/// The defaults assume one tick per millisecond.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimTiming {
    /// From `Start` to the first incident.
    pub start_delay: u64,
    /// Between an incident and its first action, and between actions.
    pub action_interval: u64,
    /// From the last action to the root-cause reveal.
    pub resolve_delay: u64,
    /// From one incident to the next while simulating.
    pub auto_advance: u64,
}

impl Default for SimTiming {
    fn default() -> Self {
        Self {
            start_delay: 1_500,
            action_interval: 3_000,
            resolve_delay: 2_000,
            auto_advance: 15_000,
        }
    }
}

// ── Events and state ────────────────────────────────────────────

/// Events driving the simulation.
///
/// `incident` fields index the catalog's scenarios in trigger order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimEvent {
    /// Begin simulating. Ignored unless idle.
    Start,
    /// Insert the next scenario's incident now.
    Trigger,
    /// Record action `action` of scenario `incident`.
    Action {
        /// Scenario index.
        incident: usize,
        /// Action index within the scenario.
        action: usize,
    },
    /// Attach the scenario's resolution.
    Resolve {
        /// Scenario index.
        incident: usize,
    },
    /// Auto-advance timer scheduled when `sim_index` was `generation`.
    AutoAdvance {
        /// `sim_index` at scheduling time.
        generation: usize,
    },
}

/// Where the simulation is in its run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "incident", rename_all = "camelCase")]
pub enum SimPhase {
    /// Not started.
    Idle,
    /// Started, waiting for the first incident.
    Running,
    /// Scenario `n` was the last one triggered.
    IncidentActive(usize),
    /// Every scenario has triggered and been diagnosed.
    Complete,
}

/// Everything the dashboard renders.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunState {
    /// Incident cards, newest first.
    pub incidents: Vec<Incident>,
    /// Stat tiles.
    pub stats: DashboardStats,
    /// Scenarios triggered so far.
    pub sim_index: usize,
    /// Whether the auto-advance loop is live. Cleared once the last
    /// scenario is triggered.
    pub is_simulating: bool,
    /// Phase.
    pub phase: SimPhase,
    /// Log lines, oldest first.
    pub log: Vec<LogEntry>,
}

impl RunState {
    /// Incident with `id`, if present.
    pub fn incident(&self, id: &str) -> Option<&Incident> {
        self.incidents.iter().find(|i| i.id == id)
    }

    fn incident_mut(&mut self, id: &str) -> Option<&mut Incident> {
        self.incidents.iter_mut().find(|i| i.id == id)
    }
}

// ── SimulationEngine ────────────────────────────────────────────

/// Reactor owning the dashboard's run state.
///
/// # Example
///
/// ```
/// use reel_core::TickId;
/// use reel_engine::DriverConfig;
/// use reel_incident::{simulate, RunState, SimPhase, SimulationEngine};
///
/// fn ignore(_: TickId, _: &RunState) {}
///
/// let engine = simulate(SimulationEngine::canned(), &DriverConfig::default(), &mut ignore).unwrap();
/// assert_eq!(engine.state().phase, SimPhase::Complete);
/// assert_eq!(engine.state().sim_index, 3);
/// ```
#[derive(Clone, Debug)]
pub struct SimulationEngine {
    catalog: Catalog,
    timing: SimTiming,
    state: RunState,
    diagnosed: usize,
}

impl SimulationEngine {
    /// Engine over `catalog`, starting from its baseline.
    pub fn new(catalog: Catalog, timing: SimTiming) -> Self {
        let state = RunState {
            incidents: catalog.baseline.clone(),
            stats: catalog.stats.clone(),
            sim_index: 0,
            is_simulating: false,
            phase: SimPhase::Idle,
            log: Vec::new(),
        };
        Self {
            catalog,
            timing,
            state,
            diagnosed: 0,
        }
    }

    /// The stock catalog with default timing.
    pub fn canned() -> Self {
        Self::new(Catalog::canned(), SimTiming::default())
    }

    /// Current run state.
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Timing in use.
    pub fn timing(&self) -> &SimTiming {
        &self.timing
    }

    /// Scenario catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Whether another scenario is left to trigger.
    pub fn can_trigger(&self) -> bool {
        self.state.sim_index < self.catalog.len()
    }

    fn log(&mut self, entry: LogEntry) {
        self.state.log.push(entry);
    }

    fn set_phase(&mut self, phase: SimPhase) {
        if self.state.phase != phase {
            info!(from = ?self.state.phase, to = ?phase, "simulation phase");
            self.state.phase = phase;
        }
    }

    fn start(&mut self, now: TickId, timers: &mut Timers<SimEvent>) {
        if self.state.phase != SimPhase::Idle {
            debug!(phase = ?self.state.phase, "start ignored, already running");
            return;
        }
        self.state.is_simulating = true;
        self.state.log = vec![LogEntry::plain(
            now,
            "Simulation started. Listening for incidents...",
        )];
        self.set_phase(SimPhase::Running);
        timers.after(self.timing.start_delay, SimEvent::Trigger);
    }

    fn trigger(&mut self, now: TickId, timers: &mut Timers<SimEvent>) {
        let index = self.state.sim_index;
        let Some(scenario) = self.catalog.scenario(index) else {
            self.log(LogEntry::plain(now, "All simulation scenarios complete."));
            self.state.is_simulating = false;
            self.check_complete();
            return;
        };

        let mut incident = scenario.incident.clone();
        incident.detected_at = now;
        let actions = scenario.actions.len();

        self.log(LogEntry::plain(
            now,
            format!("New incident detected: {}", incident.title),
        ));
        debug!(incident = %incident.id, actions, "incident triggered");
        self.state.incidents.insert(0, incident);
        self.state.stats.total_incidents += 1;
        self.state.stats.active_incidents += 1;

        let interval = self.timing.action_interval;
        for action in 0..actions {
            timers.after(
                interval.saturating_mul(action as u64 + 1),
                SimEvent::Action {
                    incident: index,
                    action,
                },
            );
        }
        timers.after(
            interval
                .saturating_mul(actions as u64)
                .saturating_add(self.timing.resolve_delay),
            SimEvent::Resolve { incident: index },
        );

        self.state.sim_index += 1;
        self.set_phase(SimPhase::IncidentActive(index));
        if !self.can_trigger() {
            // Last scenario out; its actions still play.
            self.state.is_simulating = false;
        } else if self.state.is_simulating {
            timers.after(
                self.timing.auto_advance,
                SimEvent::AutoAdvance {
                    generation: self.state.sim_index,
                },
            );
        }
    }

    fn auto_advance(&mut self, now: TickId, generation: usize, timers: &mut Timers<SimEvent>) {
        if !self.state.is_simulating || generation != self.state.sim_index {
            warn!(
                generation,
                sim_index = self.state.sim_index,
                "stale auto-advance ignored"
            );
            return;
        }
        self.trigger(now, timers);
    }

    fn record_action(&mut self, now: TickId, incident: usize, action: usize) {
        let Some(scenario) = self.catalog.scenario(incident) else {
            warn!(incident, "action for unknown scenario ignored");
            return;
        };
        let Some(template) = scenario.actions.get(action) else {
            warn!(incident, action, "unknown action ignored");
            return;
        };
        let mut recorded = template.clone();
        recorded.at = now;

        let Some(card) = self.state.incident_mut(&scenario.incident.id) else {
            warn!(incident = %scenario.incident.id, "action for missing incident ignored");
            return;
        };
        card.status = IncidentStatus::Investigating;
        card.agent_actions.push(recorded.clone());

        self.state.stats.agent_actions += 1;
        if recorded.status == ActionStatus::Blocked {
            self.state.stats.security_blocked += 1;
        }

        let text: String = recorded.action.chars().take(LOG_ACTION_CHARS).collect();
        self.log(LogEntry {
            at: now,
            level: LogLevel::from(recorded.status),
            message: format!("{} → {text}...", recorded.vendor()),
        });
    }

    fn resolve(&mut self, now: TickId, incident: usize) {
        let Some(scenario) = self.catalog.scenario(incident) else {
            warn!(incident, "resolution for unknown scenario ignored");
            return;
        };
        let id = scenario.incident.id.clone();
        let resolution = scenario.resolution.clone();
        let Some(card) = self.state.incident_mut(&id) else {
            warn!(incident = %id, "resolution for missing incident ignored");
            return;
        };
        if card.is_diagnosed() {
            return;
        }
        card.diagnose(&resolution);
        self.diagnosed += 1;
        self.log(LogEntry::plain(
            now,
            format!("Root cause identified for {id}. Investigation complete."),
        ));
        self.check_complete();
    }

    fn check_complete(&mut self) {
        if !self.can_trigger() && self.diagnosed == self.catalog.len() {
            self.state.is_simulating = false;
            self.set_phase(SimPhase::Complete);
        }
    }
}

impl Reactor for SimulationEngine {
    type Event = SimEvent;
    type State = RunState;

    fn react(&mut self, now: TickId, event: &SimEvent, timers: &mut Timers<SimEvent>) {
        match event {
            SimEvent::Start => self.start(now, timers),
            SimEvent::Trigger => self.trigger(now, timers),
            SimEvent::AutoAdvance { generation } => self.auto_advance(now, *generation, timers),
            SimEvent::Action { incident, action } => self.record_action(now, *incident, *action),
            SimEvent::Resolve { incident } => self.resolve(now, *incident),
        }
    }

    fn state(&self) -> &RunState {
        &self.state
    }
}

/// Start `engine` at tick 0 and run it until nothing is pending.
///
/// `sink` sees the run state after every reaction.
pub fn simulate<S>(
    engine: SimulationEngine,
    config: &DriverConfig,
    sink: &mut S,
) -> Result<SimulationEngine, ConfigError>
where
    S: PresentationSink<RunState> + ?Sized,
{
    let mut driver = LockstepDriver::new(engine, config)?;
    driver.inject(SimEvent::Start)?;
    driver.run_until_idle(sink)?;
    Ok(driver.into_reactor())
}
