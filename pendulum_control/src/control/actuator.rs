//! Pivot actuator: travel-limited horizontal slide.
//!
//! Applies a displacement to the pivot, clamps it to the rails and
//! derives the realized velocity from the clamped motion. Saturation is
//! silent: a command past a rail stops at the rail with reduced velocity.

use pendulum_common::params::PivotBounds;

/// Result of one actuator step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotStep {
    /// Position after clamping [px].
    pub position: f64,
    /// `(position − previous) / dt` [px/s].
    pub velocity: f64,
    /// The commanded position lay outside the rails.
    pub saturated: bool,
}

/// Move `position` by `displacement`, clamped to `bounds`.
#[inline]
pub fn advance(position: f64, displacement: f64, dt: f64, bounds: &PivotBounds) -> PivotStep {
    debug_assert!(dt > 0.0, "dt must be positive, got {dt}");

    let commanded = position + displacement;
    let clamped = bounds.clamp(commanded);

    PivotStep {
        position: clamped,
        velocity: (clamped - position) / dt,
        saturated: clamped != commanded,
    }
}

/// Pivot state owned by a session. Velocity is not stored; it is derived
/// by each [`PivotActuator::apply`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotActuator {
    position: f64,
    bounds: PivotBounds,
}

impl PivotActuator {
    /// Create an actuator at `initial_x`, clamped into `bounds`.
    pub fn new(initial_x: f64, bounds: PivotBounds) -> Self {
        Self {
            position: bounds.clamp(initial_x),
            bounds,
        }
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Apply `displacement` for one tick and return the realized motion.
    #[inline]
    pub fn apply(&mut self, displacement: f64, dt: f64) -> PivotStep {
        let step = advance(self.position, displacement, dt, &self.bounds);
        self.position = step.position;
        step
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
