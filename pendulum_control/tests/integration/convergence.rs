//! Closed-loop balancing from the default initial condition.

use core::f64::consts::PI;

use pendulum_common::params::PendulumConfig;
use pendulum_common::state::{ControlMode, TickInput};

use super::{passive_config, run_idle, session};

#[test]
fn default_config_balances_within_500_ticks() {
    let config = PendulumConfig::default();
    let mut s = session(&config);
    let outputs = run_idle(&mut s, 500);

    assert!(outputs.iter().all(|o| o.mode == ControlMode::Automatic));
    assert!(outputs.iter().all(|o| o.is_finite()));
    assert!(
        outputs
            .iter()
            .all(|o| config.pivot.bounds().contains(o.pivot_position))
    );

    let last = outputs.last().expect("500 outputs");
    assert_eq!(last.tick, 500);
    assert!(
        (PI - last.angle.abs()).abs() < 0.01,
        "not upright: angle {}",
        last.angle
    );
    assert!(last.angular_velocity.abs() < 0.05);
    assert!(last.error.abs() < 0.01);

    let stats = s.stats();
    assert_eq!(stats.mode_switches, 1);
    assert_eq!(stats.automatic_ticks, 500);
    assert!(!stats.diverged());
}

#[test]
fn error_shrinks_over_the_run() {
    let mut s = session(&PendulumConfig::default());
    let outputs = run_idle(&mut s, 500);

    let early: f64 = outputs[..50].iter().map(|o| o.error.abs()).sum::<f64>() / 50.0;
    let late: f64 = outputs[450..].iter().map(|o| o.error.abs()).sum::<f64>() / 50.0;
    assert!(late < early / 4.0, "early {early}, late {late}");
}

#[test]
fn steady_pointer_offset_stays_balanced() {
    let mut s = session(&PendulumConfig::default());
    let mut input = TickInput::idle(s.surface_center_x());
    input.pointer_x = 700.0;

    for _ in 0..1000 {
        let out = s.tick(&input);
        assert_eq!(out.mode, ControlMode::Automatic, "fell at tick {}", out.tick);
        assert!(out.is_finite());
    }
}

#[test]
fn passive_controller_lets_pendulum_fall() {
    let mut s = session(&passive_config(PI - 0.4));
    let outputs = run_idle(&mut s, 300);

    let first_manual = outputs
        .iter()
        .position(|o| o.mode == ControlMode::Manual)
        .expect("pendulum falls below threshold");
    assert!((50..200).contains(&first_manual), "fell at index {first_manual}");
    // Gains are zero, so the pivot never moves.
    assert!(outputs.iter().all(|o| o.pivot_position == 640.0));
}

#[test]
fn hanging_rest_is_an_equilibrium() {
    let mut s = session(&passive_config(0.0));
    let outputs = run_idle(&mut s, 200);
    let last = outputs.last().expect("200 outputs");
    assert_eq!(last.angle, 0.0);
    assert_eq!(last.angular_velocity, 0.0);
    assert_eq!(last.mode, ControlMode::Manual);
}
