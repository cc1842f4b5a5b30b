//! Stateful plant wrapper.
//!
//! `PendulumSimulator` owns the [`PendulumState`] and the physics constants
//! and is the only thing in the workspace that mutates the pendulum.

use pendulum_common::params::PhysicsParams;
use pendulum_common::state::PendulumState;
use tracing::trace;

use crate::physics::{integrate, mechanical_energy, wrap_angle};

/// Pendulum plant driven one fixed step at a time.
#[derive(Debug, Clone)]
pub struct PendulumSimulator {
    params: PhysicsParams,
    state: PendulumState,
}

impl PendulumSimulator {
    /// Create a simulator at `initial`. The initial angle is wrapped into
    /// (−π, π] so the state invariant holds before the first step.
    pub fn new(params: PhysicsParams, initial: PendulumState) -> Self {
        Self {
            params,
            state: PendulumState {
                angle: wrap_angle(initial.angle),
                angular_velocity: initial.angular_velocity,
            },
        }
    }

    #[inline]
    pub fn state(&self) -> &PendulumState {
        &self.state
    }

    #[inline]
    pub fn params(&self) -> &PhysicsParams {
        &self.params
    }

    /// Add `delta` [rad] to the angle without touching the velocity.
    ///
    /// Used for the pointer disturbance, applied before [`Self::step`].
    /// The angle is left unwrapped; the next step wraps it.
    #[inline]
    pub fn perturb(&mut self, delta: f64) {
        self.state.angle += delta;
    }

    /// Integrate one step with the pivot moving at `pivot_velocity`.
    pub fn step(&mut self, pivot_velocity: f64, dt: f64) -> PendulumState {
        self.state = integrate(&self.state, pivot_velocity, dt, &self.params);
        trace!(
            angle = self.state.angle,
            omega = self.state.angular_velocity,
            pivot_velocity,
            "plant step"
        );
        self.state
    }

    /// Current mechanical energy (see [`mechanical_energy`]).
    #[inline]
    pub fn energy(&self) -> f64 {
        mechanical_energy(&self.state, &self.params)
    }
}
