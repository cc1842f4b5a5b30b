//! # Pendulum Simulator
//!
//! Headless host for the pendulum control session.
//!
//! Loads `pendulum.toml` (or built-in defaults), applies command-line
//! overrides, and drives the fixed-step cycle from an optional scenario
//! file. Runs until the tick limit, the end of a `quit_at_end` scenario,
//! or Ctrl-C. Optionally paces ticks to a host frame rate and streams each
//! tick as a JSON line on stdout.

use clap::Parser;
use pendulum_common::config::LogLevel;
use pendulum_common::consts::HOST_FPS_DEFAULT;
use pendulum_common::params::PendulumConfig;
use pendulum_common::state::TickOutput;
use pendulum_control::config::{ConfigOverrides, load_config};
use pendulum_control::cycle::{CycleRunner, IdleInput, RunOptions, RunSummary, Session};
use pendulum_control::scenario::{Scenario, ScenarioInput};
use std::io::Write;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::Ordering;
use tracing::{Level, error, info, info_span, warn};
use tracing_subscriber::EnvFilter;

/// Tick limit for unpaced runs without a scenario.
const DEFAULT_TICKS: u64 = 500;

/// Pendulum simulator: PID balancing on a travel-limited pivot
#[derive(Parser, Debug)]
#[command(name = "pendulum_sim")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Fixed-step inverted pendulum simulation with PID balancing")]
struct Args {
    /// Path to the simulation TOML (defaults are used when omitted).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Scenario TOML with scripted keyboard and pointer input.
    #[arg(short, long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Stop after this many ticks.
    #[arg(long)]
    ticks: Option<u64>,

    /// Override `simulation.dt` [s].
    #[arg(long)]
    dt: Option<f64>,

    /// Override `simulation.initial_angle` [rad].
    #[arg(long, allow_hyphen_values = true)]
    initial_angle: Option<f64>,

    /// Pace ticks to the host frame rate instead of running flat out.
    #[arg(long)]
    realtime: bool,

    /// Host frame rate used with --realtime.
    #[arg(long, default_value_t = HOST_FPS_DEFAULT)]
    fps: u32,

    /// Write every tick output as a JSON line to stdout.
    #[arg(long)]
    telemetry_json: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    let overrides = ConfigOverrides {
        dt: args.dt,
        initial_angle: args.initial_angle,
    };
    let loaded = load_config(args.config.as_deref(), &overrides);
    setup_tracing(
        &args,
        loaded.as_ref().map_or(LogLevel::Info, |l| l.config.shared.log_level),
    );

    info!("Pendulum simulator v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = loaded
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|loaded| {
            let service = loaded.config.shared.service_name.as_str();
            if let Some(ref path) = loaded.source {
                info!(service, "Loaded config from {}", path.display());
            } else {
                info!(service, "No config file given, using defaults");
            }
            let _span = info_span!("session", service).entered();
            run(&args, &loaded.config)
        });

    match result {
        Ok(summary) => report(&summary),
        Err(e) => {
            error!("FATAL: {e}");
            process::exit(1);
        }
    }
}

fn run(args: &Args, config: &PendulumConfig) -> Result<RunSummary, Box<dyn std::error::Error>> {
    let session = Session::new(config)?;
    let center_x = session.surface_center_x();

    let scenario = args.scenario.as_deref().map(Scenario::load).transpose()?;
    if let Some(ref s) = scenario {
        info!(
            name = %s.name,
            segments = s.segments.len(),
            ticks = s.total_ticks(),
            "scenario loaded"
        );
    }

    // Unpaced runs always terminate: default limit unless a scenario quits.
    let max_ticks = args.ticks.or_else(|| {
        let self_terminating = args.realtime || scenario.as_ref().is_some_and(|s| s.quit_at_end);
        (!self_terminating).then_some(DEFAULT_TICKS)
    });

    let options = RunOptions {
        max_ticks,
        realtime_fps: args.realtime.then_some(args.fps),
        telemetry_interval: config.simulation.telemetry_interval,
    };

    info!(
        "Session ready: dt={}s, initial_angle={:.4}rad, threshold={:.3}rad",
        config.simulation.dt, config.simulation.initial_angle, config.arbiter.threshold_angle,
    );

    let mut runner = CycleRunner::new(session, options);

    let running = runner.shutdown_flag();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        running.store(false, Ordering::SeqCst);
    })?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let emit_json = args.telemetry_json;
    let mut sink = |tick: &TickOutput| {
        if !emit_json {
            return;
        }
        match serde_json::to_string(tick) {
            Ok(line) => {
                if let Err(e) = writeln!(out, "{line}") {
                    warn!("telemetry write failed: {e}");
                }
            }
            Err(e) => warn!("telemetry encode failed: {e}"),
        }
    };

    let summary = match scenario {
        Some(s) => runner.run(&mut ScenarioInput::new(s, center_x), &mut sink),
        None => runner.run(&mut IdleInput { center_x }, &mut sink),
    };

    Ok(summary)
}

fn report(summary: &RunSummary) {
    let stats = &summary.stats;
    let last = &summary.last;
    info!(
        reason = ?summary.reason,
        ticks = stats.ticks,
        automatic_ticks = stats.automatic_ticks,
        mode_switches = stats.mode_switches,
        rail_saturations = stats.rail_saturations,
        peak_omega = format_args!("{:.4}", stats.peak_angular_velocity),
        avg_tick_ns = summary.timing.avg_ns(),
        "session summary"
    );
    info!(
        mode = %last.mode,
        angle = format_args!("{:.4}", last.angle),
        omega = format_args!("{:.4}", last.angular_velocity),
        pivot = format_args!("{:.1}", last.pivot_position),
        "final state"
    );
    if let Some(tick) = stats.diverged_at {
        warn!("Session diverged at tick {tick}");
    }
    if summary.timing.overruns > 0 {
        warn!("{} frames overran the pacing budget", summary.timing.overruns);
    }
}

/// Setup tracing subscriber from CLI arguments and the configured level.
fn setup_tracing(args: &Args, configured: LogLevel) {
    let filter = if args.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(configured.as_directive()))
    };

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}
