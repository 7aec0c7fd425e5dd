//! `reel`: run the dashboard simulation or inspect the video timeline.
//!
//! Data goes to stdout; logs go to stderr, filtered by `REEL_LOG`, then
//! `RUST_LOG`, then `info`.

#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use reel_core::TickId;
use reel_engine::{DriverConfig, LockstepDriver, RealtimeDriver};
use reel_incident::{RunState, SimEvent, SimulationEngine};
use reel_video::{SceneBoundary, VideoConfig, VideoTimeline};

#[derive(Debug, Parser)]
#[command(
    name = "reel",
    version,
    about = "Discrete-time event engine: dashboard simulation and video timeline",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the three-incident dashboard simulation and print its log
    Simulate(SimulateArgs),
    /// Print the frame tree of one video frame as JSON
    Render(RenderArgs),
    /// List the scenes of a video plan with their boundaries
    Scenes(ScenesArgs),
    /// Check a video plan file without rendering it
    Validate {
        /// TOML plan to check
        path: PathBuf,
    },
}

#[derive(Debug, clap::Args)]
struct SimulateArgs {
    /// Stop after this many simulated milliseconds instead of running to completion
    #[arg(long, value_name = "MS", conflicts_with = "realtime")]
    until_ms: Option<u64>,

    /// Print the final run state as JSON instead of the log
    #[arg(long)]
    json: bool,

    /// Play against the wall clock on a driver thread
    #[arg(long)]
    realtime: bool,

    /// Wall-clock speed multiplier for --realtime
    #[arg(long, env = "REEL_TIME_SCALE", default_value_t = 1.0)]
    time_scale: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    /// 5400 frames at 30 fps
    ThreeMinute,
    /// 7200 frames at 30 fps
    FourMinute,
}

#[derive(Debug, clap::Args)]
struct PlanArgs {
    /// TOML plan; overrides --preset
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Built-in plan
    #[arg(long, value_enum, default_value_t = Preset::ThreeMinute)]
    preset: Preset,
}

#[derive(Debug, clap::Args)]
struct RenderArgs {
    /// Global frame number
    #[arg(long)]
    frame: u64,

    #[command(flatten)]
    plan: PlanArgs,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, clap::Args)]
struct ScenesArgs {
    #[command(flatten)]
    plan: PlanArgs,

    /// Print the boundaries as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Simulate(args) => simulate(&args),
        Command::Render(args) => render(&args),
        Command::Scenes(args) => scenes(&args),
        Command::Validate { path } => validate(&path),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("REEL_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ── simulate ────────────────────────────────────────────────────

fn simulate(args: &SimulateArgs) -> Result<()> {
    let state = if args.realtime {
        simulate_realtime(args.time_scale, !args.json)?
    } else {
        simulate_lockstep(args.until_ms)?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else if !args.realtime {
        for line in &state.log {
            println!("{line}");
        }
    }
    Ok(())
}

fn simulate_lockstep(until_ms: Option<u64>) -> Result<RunState> {
    let config = DriverConfig::default();
    let mut driver = LockstepDriver::new(SimulationEngine::canned(), &config)?;
    driver.inject(SimEvent::Start)?;

    let mut reactions = 0u64;
    let mut sink = |_: TickId, _: &RunState| reactions += 1;
    match until_ms {
        Some(ms) => driver.advance_to(TickId(ms), &mut sink)?,
        None => driver.run_until_idle(&mut sink)?,
    };
    info!(
        reactions,
        now_ms = driver.now().0,
        pending = driver.pending(),
        "simulation stopped"
    );
    Ok(driver.into_reactor().state().clone())
}

fn simulate_realtime(time_scale: f64, stream: bool) -> Result<RunState> {
    let config = DriverConfig {
        time_scale,
        ..DriverConfig::default()
    };
    let driver = RealtimeDriver::spawn(SimulationEngine::canned(), &config, [SimEvent::Start])?;

    // Print log lines as they appear; the channel closes when the
    // driver goes idle.
    let mut printed = 0;
    for snapshot in driver.snapshots().iter() {
        if stream {
            for line in snapshot.state.log.iter().skip(printed) {
                println!("{line}");
            }
        }
        printed = printed.max(snapshot.state.log.len());
    }
    let engine = driver.join().context("realtime simulation")?;
    Ok(engine.state().clone())
}

// ── video ───────────────────────────────────────────────────────

fn load_plan(plan: &PlanArgs) -> Result<VideoConfig> {
    match &plan.config {
        Some(path) => read_plan(path),
        None => Ok(match plan.preset {
            Preset::ThreeMinute => VideoConfig::three_minute(),
            Preset::FourMinute => VideoConfig::four_minute(),
        }),
    }
}

fn read_plan(path: &Path) -> Result<VideoConfig> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    VideoConfig::from_toml_str(&text).with_context(|| format!("loading {}", path.display()))
}

fn render(args: &RenderArgs) -> Result<()> {
    let config = load_plan(&args.plan)?;
    let timeline = VideoTimeline::new(&config)?;
    if args.frame >= timeline.total() {
        bail!(
            "frame {} is past the end of the plan ({} frames)",
            args.frame,
            timeline.total()
        );
    }
    let tree = timeline.render(TickId(args.frame));
    let json = if args.pretty {
        serde_json::to_string_pretty(&tree)?
    } else {
        serde_json::to_string(&tree)?
    };
    println!("{json}");
    Ok(())
}

#[derive(Serialize)]
struct PlanSummary<'a> {
    fps: f64,
    total: u64,
    scenes: &'a [SceneBoundary],
}

fn scenes(args: &ScenesArgs) -> Result<()> {
    let config = load_plan(&args.plan)?;
    config.validate()?;
    let boundaries = config.boundaries();
    if args.json {
        let summary = PlanSummary {
            fps: config.fps.get(),
            total: config.duration(),
            scenes: &boundaries,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{:>2}  {:<14} {:>6} {:>6} {:>6} {:>7}",
        "#", "scene", "start", "end", "frames", "seconds"
    );
    for b in &boundaries {
        println!(
            "{:>2}  {:<14} {:>6} {:>6} {:>6} {:>7.1}",
            b.id.0,
            b.name,
            b.start.0,
            b.end.0,
            b.duration(),
            config.fps.seconds(b.duration() as f64)
        );
    }
    println!(
        "total {} frames, {:.1} s at {} fps",
        config.duration(),
        config.fps.seconds(config.duration() as f64),
        config.fps.get()
    );
    Ok(())
}

fn validate(path: &Path) -> Result<()> {
    let config = read_plan(path)?;
    println!(
        "ok: {} scenes, {} frames at {} fps",
        config.scenes.len(),
        config.duration(),
        config.fps.get()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_takes_a_preset() {
        let cli =
            Cli::try_parse_from(["reel", "render", "--frame", "200", "--preset", "four-minute"])
                .unwrap();
        match cli.command {
            Command::Render(args) => {
                assert_eq!(args.frame, 200);
                assert_eq!(args.plan.preset, Preset::FourMinute);
                assert!(args.plan.config.is_none());
            }
            other => panic!("expected Render, got {other:?}"),
        }
    }

    #[test]
    fn until_ms_conflicts_with_realtime() {
        let err = Cli::try_parse_from(["reel", "simulate", "--realtime", "--until-ms", "5"]);
        assert!(err.is_err());
    }

    #[test]
    fn lockstep_run_completes() {
        let state = simulate_lockstep(None).unwrap();
        assert_eq!(state.sim_index, 3);
        assert!(!state.is_simulating);
        assert_eq!(state.log.len(), 15);
    }

    #[test]
    fn until_ms_stops_early() {
        let state = simulate_lockstep(Some(5_000)).unwrap();
        assert_eq!(state.sim_index, 1);
        assert_eq!(state.log.len(), 3);
    }

    #[test]
    fn quiet_realtime_run_returns_the_final_state() {
        let state = simulate_realtime(500.0, false).unwrap();
        assert_eq!(state.sim_index, 3);
        assert_eq!(state.log.len(), 15);
    }

    #[test]
    fn presets_resolve() {
        let plan = PlanArgs {
            config: None,
            preset: Preset::FourMinute,
        };
        assert_eq!(load_plan(&plan).unwrap().duration(), 7200);
    }
}
