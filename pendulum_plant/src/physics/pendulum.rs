//! Forced damped pendulum dynamics.
//!
//! ```text
//! α = −(g/l)·sin θ − b·ω − v_pivot·cos θ / l
//! ```
//!
//! The last term couples horizontal pivot motion into the bob; it is the
//! only way the controller acts on the plant.

use core::f64::consts::{PI, TAU};

use pendulum_common::params::PhysicsParams;
use pendulum_common::state::PendulumState;

/// Angular acceleration for `state` with the pivot moving at
/// `pivot_velocity` [rad/s²].
#[inline]
pub fn angular_acceleration(
    state: &PendulumState,
    pivot_velocity: f64,
    params: &PhysicsParams,
) -> f64 {
    let theta = state.angle;
    -params.gravity_over_length() * theta.sin()
        - params.damping * state.angular_velocity
        - pivot_velocity * theta.cos() / params.length
}

/// Wrap an angle into (−π, π].
///
/// `rem_euclid` keeps the remainder non-negative for negative inputs, so
/// the shifted result lands in [−π, π); the lower edge is then folded onto
/// +π.
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { PI } else { wrapped }
}

/// Advance the plant by one step of `dt` seconds (semi-implicit Euler).
///
/// Velocity is updated first and the *new* velocity drives the angle
/// update. The returned angle is wrapped into (−π, π].
#[inline]
pub fn integrate(
    state: &PendulumState,
    pivot_velocity: f64,
    dt: f64,
    params: &PhysicsParams,
) -> PendulumState {
    debug_assert!(dt > 0.0, "dt must be positive, got {dt}");

    let alpha = angular_acceleration(state, pivot_velocity, params);
    let angular_velocity = state.angular_velocity + alpha * dt;
    let angle = wrap_angle(state.angle + angular_velocity * dt);

    PendulumState {
        angle,
        angular_velocity,
    }
}

/// Mechanical energy per unit `m·l²`: `0.5·ω² − (g/l)·cos θ`.
#[inline]
pub fn mechanical_energy(state: &PendulumState, params: &PhysicsParams) -> f64 {
    0.5 * state.angular_velocity * state.angular_velocity
        - params.gravity_over_length() * state.angle.cos()
}

// ─── Tests ──────────────────────────────────────────────────────────
