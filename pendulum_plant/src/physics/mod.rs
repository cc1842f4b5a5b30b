//! Physics module.
//!
//! Force law and integrator for the forced damped pendulum.

mod pendulum;

pub use pendulum::{angular_acceleration, integrate, mechanical_energy, wrap_angle};
