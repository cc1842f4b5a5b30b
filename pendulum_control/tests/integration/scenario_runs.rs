//! File-driven runs: config and scenario loaded from disk, driven by the
//! cycle runner.

use std::io::Write;

use pendulum_common::config::ConfigError;
use pendulum_common::state::ControlMode;
use pendulum_control::config::{ConfigOverrides, load_config};
use pendulum_control::cycle::{CycleRunner, RunOptions, Session, StopReason};
use pendulum_control::scenario::{Scenario, ScenarioError, ScenarioInput};
use tempfile::NamedTempFile;

fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

const CONFIG: &str = r#"
[shared]
log_level = "debug"

[simulation]
dt = 0.08
initial_angle = 0.0
telemetry_interval = 10

[pivot]
initial_x = 640.0
"#;

const SCENARIO: &str = r#"
name = "nudge"
quit_at_end = true

[[segment]]
ticks = 12
right = true

[[segment]]
ticks = 30
"#;

#[test]
fn scenario_run_stops_on_quit() {
    let config_file = temp_file(CONFIG);
    let scenario_file = temp_file(SCENARIO);

    let loaded = load_config(Some(config_file.path()), &ConfigOverrides::default()).unwrap();
    assert_eq!(loaded.config.simulation.telemetry_interval, 10);
    let scenario = Scenario::load(scenario_file.path()).unwrap();
    let total = scenario.total_ticks();

    let session = Session::new(&loaded.config).unwrap();
    let center = session.surface_center_x();
    let mut runner = CycleRunner::new(
        session,
        RunOptions {
            max_ticks: None,
            realtime_fps: None,
            telemetry_interval: loaded.config.simulation.telemetry_interval,
        },
    );

    let mut positions = Vec::new();
    let summary = runner.run(&mut ScenarioInput::new(scenario, center), |out| {
        positions.push(out.pivot_position)
    });

    assert_eq!(summary.reason, StopReason::QuitRequested);
    assert_eq!(summary.stats.ticks, total);
    assert_eq!(positions.len() as u64, total);
    assert_eq!(positions[11], 640.0 + 12.0 * 5.0);
    // Released keys leave the pivot parked in Manual mode.
    assert_eq!(summary.last.mode, ControlMode::Manual);
    assert_eq!(summary.last.pivot_position, 700.0);
}

#[test]
fn tick_limit_cuts_scenario_short() {
    let scenario = Scenario::from_toml(SCENARIO).unwrap();
    let session = Session::new(&load_config(None, &ConfigOverrides::default()).unwrap().config)
        .unwrap();
    let center = session.surface_center_x();
    let mut runner = CycleRunner::new(
        session,
        RunOptions {
            max_ticks: Some(5),
            realtime_fps: None,
            telemetry_interval: 25,
        },
    );
    let summary = runner.run(&mut ScenarioInput::new(scenario, center), |_| {});
    assert_eq!(summary.reason, StopReason::TickLimit);
    assert_eq!(summary.stats.ticks, 5);
}

#[test]
fn paced_run_sleeps_between_ticks() {
    let session = Session::new(&load_config(None, &ConfigOverrides::default()).unwrap().config)
        .unwrap();
    let center = session.surface_center_x();
    let mut runner = CycleRunner::new(
        session,
        RunOptions {
            max_ticks: Some(5),
            realtime_fps: Some(200),
            telemetry_interval: 25,
        },
    );
    let start = std::time::Instant::now();
    let summary = runner.run(&mut pendulum_control::cycle::IdleInput { center_x: center }, |_| {});
    assert_eq!(summary.stats.ticks, 5);
    // 5 frames at 5 ms each.
    assert!(start.elapsed() >= std::time::Duration::from_millis(20));
}

#[test]
fn command_line_override_is_revalidated() {
    let config_file = temp_file(CONFIG);
    let overrides = ConfigOverrides {
        dt: Some(0.0),
        initial_angle: None,
    };
    let err = load_config(Some(config_file.path()), &overrides).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)));
}

#[test]
fn override_sets_initial_angle() {
    let config_file = temp_file(CONFIG);
    let overrides = ConfigOverrides {
        dt: None,
        initial_angle: Some(-2.5),
    };
    let loaded = load_config(Some(config_file.path()), &overrides).unwrap();
    let session = Session::new(&loaded.config).unwrap();
    assert_eq!(session.pendulum().angle, -2.5);
}

#[test]
fn malformed_scenario_file_reports_parse_error() {
    let file = temp_file("[[segment]]\nticks = \"many\"\n");
    assert!(matches!(
        Scenario::load(file.path()),
        Err(ScenarioError::Parse(_))
    ));
}

#[test]
fn shipped_samples_are_valid() {
    let config = pendulum_control::config::load_config_from_str(
        include_str!("../../../config/pendulum.toml"),
        &ConfigOverrides::default(),
    )
    .unwrap();
    assert_eq!(config, pendulum_common::params::PendulumConfig::default());

    let scenario = Scenario::from_toml(include_str!("../../../config/scenario.toml")).unwrap();
    assert!(scenario.quit_at_end);
    assert_eq!(scenario.total_ticks(), 580);
}
