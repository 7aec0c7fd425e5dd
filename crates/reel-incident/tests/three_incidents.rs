//! End-to-end runs of the canned three-incident simulation.

use reel_core::TickId;
use reel_engine::{DriverConfig, LockstepDriver, RealtimeDriver};
use reel_incident::{simulate, Catalog, IncidentStatus, RunState, SimEvent, SimPhase, SimulationEngine};
use reel_test_utils::fixtures::strictly_increasing;
use reel_test_utils::{JitteredTimer, RecordingSink};

fn ignore(_: TickId, _: &RunState) {}

fn completed() -> RunState {
    simulate(SimulationEngine::canned(), &DriverConfig::default(), &mut ignore)
        .unwrap()
        .state()
        .clone()
}

#[test]
fn run_ends_with_three_diagnosed_incidents() {
    let state = completed();
    assert_eq!(state.sim_index, 3);
    assert!(!state.is_simulating);
    assert_eq!(state.phase, SimPhase::Complete);

    let baseline = Catalog::canned().baseline.len();
    assert_eq!(state.incidents.len(), baseline + 3);

    let new: Vec<_> = state.incidents.iter().take(3).collect();
    let ids: Vec<&str> = new.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["INC-008", "INC-007", "INC-006"]);
    let counts: Vec<usize> = new.iter().map(|i| i.agent_actions.len()).collect();
    assert_eq!(counts, vec![3, 2, 3]);
    for incident in new {
        assert!(incident.root_cause.is_some(), "{} undiagnosed", incident.id);
        assert!(incident.cost_saved > 0);
        assert_eq!(incident.status, IncidentStatus::Investigating);
    }
    assert_eq!(
        state.incident("INC-008").and_then(|i| i.root_cause.as_deref()),
        Some("Credential stuffing attack using leaked database credentials")
    );
}

#[test]
fn log_is_strictly_tick_ordered() {
    let state = completed();
    let ticks: Vec<TickId> = state.log.iter().map(|l| l.at).collect();
    assert!(strictly_increasing(&ticks), "{ticks:?}");
    assert_eq!(state.log.len(), 15);
    assert_eq!(
        state.log.last().map(ToString::to_string).as_deref(),
        Some("[00:42.500] Root cause identified for INC-008. Investigation complete.")
    );
}

#[test]
fn stats_only_grow() {
    let mut sink: RecordingSink<RunState> = RecordingSink::new();
    simulate(SimulationEngine::canned(), &DriverConfig::default(), &mut sink).unwrap();
    for pair in sink.frames.windows(2) {
        let (a, b) = (&pair[0].1.stats, &pair[1].1.stats);
        assert!(b.total_incidents >= a.total_incidents);
        assert!(b.agent_actions >= a.agent_actions);
        assert!(b.security_blocked >= a.security_blocked);
    }
    let last = sink.last().unwrap();
    assert_eq!(last.stats.total_incidents, 150);
    assert_eq!(last.stats.agent_actions, 1_283 + 8);
}

#[test]
fn late_polling_does_not_reorder_the_log() {
    let expected = completed().log;
    for seed in 0..6 {
        let mut driver =
            LockstepDriver::new(SimulationEngine::canned(), &DriverConfig::default()).unwrap();
        driver.inject(SimEvent::Start).unwrap();
        let mut timer = JitteredTimer::new(seed, 250, 4_000);
        let mut at = TickId::ZERO;
        while !driver.is_idle() {
            at = timer.next_after(at);
            driver.advance_to(at, &mut ignore).unwrap();
        }
        assert_eq!(driver.reactor().state().log, expected, "seed {seed}");
    }
}

#[test]
fn run_state_serializes_in_dashboard_shape() {
    let state = completed();
    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["simIndex"], 3);
    assert_eq!(json["isSimulating"], false);
    assert_eq!(json["phase"]["phase"], "complete");
    assert_eq!(json["incidents"][0]["id"], "INC-008");
    assert_eq!(json["incidents"][0]["agentActions"][2]["status"], "blocked");
    assert_eq!(json["stats"]["securityBlocked"], 24);
}

#[test]
fn realtime_run_matches_lockstep() {
    let config = DriverConfig {
        time_scale: 200.0,
        ..DriverConfig::default()
    };
    let driver = RealtimeDriver::spawn(SimulationEngine::canned(), &config, [SimEvent::Start])
        .unwrap();
    let snapshots = driver.snapshots().clone();
    let engine = driver.join().unwrap();
    assert_eq!(engine.state().log, completed().log);

    // The thread has exited, so every snapshot is already queued.
    let last = snapshots.try_iter().last().unwrap();
    assert_eq!(last.state.phase, SimPhase::Complete);
}

#[test]
fn largest_burst_fits_a_tight_schedule() {
    // Triggering INC-006 stages three actions, the resolve and the
    // auto-advance at once.
    let config = DriverConfig {
        max_pending: 5,
        ..DriverConfig::default()
    };
    let engine = simulate(SimulationEngine::canned(), &config, &mut ignore).unwrap();
    assert_eq!(engine.state(), &completed());

    let realtime = DriverConfig {
        time_scale: 200.0,
        ..config
    };
    let driver = RealtimeDriver::spawn(SimulationEngine::canned(), &realtime, [SimEvent::Start])
        .unwrap();
    assert_eq!(driver.join().unwrap().state().log, completed().log);
}
