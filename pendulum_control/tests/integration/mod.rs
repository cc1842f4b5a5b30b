mod convergence;
mod mode_switching;
mod scenario_runs;

use pendulum_common::params::PendulumConfig;
use pendulum_common::state::{TickInput, TickOutput};
use pendulum_control::cycle::Session;

/// Session from `config`, panicking on invalid parameters.
pub fn session(config: &PendulumConfig) -> Session {
    Session::new(config).expect("valid config")
}

/// Controller with every gain zero: the pivot never moves in Automatic.
pub fn passive_config(initial_angle: f64) -> PendulumConfig {
    let mut config = PendulumConfig::default();
    config.simulation.initial_angle = initial_angle;
    config.controller.kp = 0.0;
    config.controller.ki = 0.0;
    config.controller.kd = 0.0;
    config
}

/// Run `ticks` ticks with idle input and collect every output.
pub fn run_idle(session: &mut Session, ticks: usize) -> Vec<TickOutput> {
    let input = TickInput::idle(session.surface_center_x());
    (0..ticks).map(|_| session.tick(&input)).collect()
}
