//! Mode arbitration across ticks: controller reset, re-entry and keyboard
//! handling.

use core::f64::consts::PI;

use pendulum_common::params::PendulumConfig;
use pendulum_common::state::{ControlMode, TickInput};
use pendulum_control::mode::select_mode;

use super::{passive_config, run_idle, session};

#[test]
fn manual_tick_resets_controller_state() {
    let mut s = session(&passive_config(PI - 0.4));
    let input = TickInput::idle(s.surface_center_x());

    let mut last_automatic_integral = 0.0;
    let mut reached_manual = false;
    for _ in 0..500 {
        let out = s.tick(&input);
        match out.mode {
            ControlMode::Automatic => last_automatic_integral = out.integral,
            ControlMode::Manual => {
                assert_eq!(s.pid_state().integral(), 0.0);
                assert_eq!(s.pid_state().prev_error(), 0.0);
                assert_eq!((out.error, out.integral, out.derivative), (0.0, 0.0, 0.0));
                reached_manual = true;
                break;
            }
        }
    }
    assert!(reached_manual);
    assert!(last_automatic_integral != 0.0);
}

#[test]
fn reentry_starts_from_fresh_controller() {
    let mut config = passive_config(PI - 0.4);
    config.arbiter.threshold_angle = 1.0;
    let dt = config.simulation.dt;
    let mut s = session(&config);
    let outputs = run_idle(&mut s, 3000);

    let reentry = outputs
        .windows(2)
        .find(|w| w[0].mode == ControlMode::Manual && w[1].mode == ControlMode::Automatic)
        .map(|w| w[1])
        .expect("pendulum swings back past the threshold");

    // First tick after reset: zero accumulator and zero previous error.
    assert_eq!(reentry.integral, reentry.error * dt);
    assert_eq!(reentry.derivative, reentry.error / dt);
}

#[test]
fn mode_follows_angle_before_each_tick() {
    let config = passive_config(PI - 0.4);
    let threshold = config.arbiter.threshold_angle;
    let mut s = session(&config);
    let mut input = TickInput::idle(s.surface_center_x());

    for tick in 0..2000u64 {
        input.key_right_held = (tick / 30) % 2 == 0;
        input.key_left_held = !input.key_right_held;
        let angle = s.pendulum().angle;
        let out = s.tick(&input);
        assert_eq!(out.mode, select_mode(angle, threshold), "tick {}", out.tick);
    }
}

#[test]
fn keyboard_ignored_in_automatic() {
    let config = PendulumConfig::default();
    let mut plain = session(&config);
    let mut pressed = session(&config);
    let idle = TickInput::idle(plain.surface_center_x());
    let mut both = idle;
    both.key_left_held = true;
    both.key_right_held = true;
    let mut left = idle;
    left.key_left_held = true;

    for tick in 0..200 {
        let a = plain.tick(&idle);
        let b = pressed.tick(if tick % 2 == 0 { &left } else { &both });
        assert_eq!(a.mode, ControlMode::Automatic);
        assert_eq!(a, b);
    }
}

#[test]
fn manual_keys_move_pivot_by_half_speed() {
    let mut s = session(&passive_config(0.0));
    let mut input = TickInput::idle(s.surface_center_x());
    input.key_left_held = true;

    for _ in 0..20 {
        let out = s.tick(&input);
        assert_eq!(out.mode, ControlMode::Manual);
    }
    assert_eq!(s.pivot_position(), 640.0 - 20.0 * 5.0);
}

#[test]
fn pivot_stops_at_rail_with_zero_velocity() {
    let mut config = passive_config(0.0);
    config.pivot.initial_x = 1170.0;
    let mut s = session(&config);
    let mut input = TickInput::idle(s.surface_center_x());
    input.key_right_held = true;

    let outputs: Vec<_> = (0..10).map(|_| s.tick(&input)).collect();
    assert_eq!(outputs[0].pivot_position, 1175.0);
    assert_eq!(outputs[1].pivot_position, 1180.0);
    for out in &outputs[2..] {
        assert_eq!(out.pivot_position, 1180.0);
        assert_eq!(out.pivot_velocity, 0.0);
    }
    assert_eq!(s.stats().rail_saturations, 8);
}
