//! # Pendulum Plant
//!
//! Equation of motion for a damped pendulum whose pivot slides
//! horizontally, advanced one fixed step at a time with semi-implicit
//! Euler.
//!
//! - [`physics`] - pure functions: force law, step, angle wrap, energy
//! - [`simulator`] - [`PendulumSimulator`], a stateful wrapper owning
//!   the [`PendulumState`]

pub mod physics;
pub mod simulator;

pub use pendulum_common::state::PendulumState;
pub use physics::{angular_acceleration, integrate, mechanical_energy, wrap_angle};
pub use simulator::PendulumSimulator;
