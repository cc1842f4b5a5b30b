//! PID regulator holding the pendulum upright.
//!
//! The setpoint is the inverted position (angle = π). The error is the
//! signed shortest angular distance to π, so it stays continuous when the
//! angle wraps between +π and −π. Rectangular integration, raw backward
//! difference derivative, output clamped to `±move_speed`.
//!
//! Zero Ki disables integral action only through the gain: the accumulator
//! keeps integrating so the diagnostic value stays meaningful.

use core::f64::consts::PI;

use pendulum_common::params::ControllerParams;

/// Internal state of the PID controller.
///
/// Must be reset (via [`PidState::reset`]) whenever the controller is not
/// the active pivot source, so a later takeover starts from zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PidState {
    /// Integral accumulator `Σ error·dt`.
    integral: f64,
    /// Error of the previous invocation (for derivative).
    prev_error: f64,
}

impl PidState {
    /// Reset all internal state to zero.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn integral(&self) -> f64 {
        self.integral
    }

    #[inline]
    pub fn prev_error(&self) -> f64 {
        self.prev_error
    }
}

/// PID gains and output saturation, extracted from [`ControllerParams`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidGains {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain.
    pub ki: f64,
    /// Derivative gain.
    pub kd: f64,
    /// Command saturation `±move_speed` [px per tick].
    pub move_speed: f64,
    /// Optional accumulator clamp (`None` = unbounded integral).
    pub integral_limit: Option<f64>,
}

impl From<&ControllerParams> for PidGains {
    fn from(params: &ControllerParams) -> Self {
        Self {
            kp: params.kp,
            ki: params.ki,
            kd: params.kd,
            move_speed: params.move_speed,
            integral_limit: params.integral_limit,
        }
    }
}

/// Result of one PID invocation: saturated command plus diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PidOutput {
    /// Pivot displacement for this tick, within `±move_speed` [px].
    pub command: f64,
    /// Wrapped angular error [rad].
    pub error: f64,
    /// Integral accumulator after this tick [rad·s].
    pub integral: f64,
    /// Error rate [rad/s].
    pub derivative: f64,
}

/// Signed shortest angular distance from `angle` to the upright setpoint.
///
/// A plain `π − angle` jumps by 2π when the angle crosses the ±π wrap
/// point, which would send the pivot the wrong way.
#[inline]
pub fn angle_error(angle: f64) -> f64 {
    let raw = PI - angle;
    raw.sin().atan2(raw.cos())
}

/// Compute one PID tick for the measured `angle`.
///
/// Updates the accumulator and previous error on every call; call it only
/// while the controller drives the pivot.
///
/// # Arguments
/// - `state`: Mutable PID internal state.
/// - `gains`: Gains and saturation limit.
/// - `angle`: Current pendulum angle [rad].
/// - `dt`: Fixed tick period [s], strictly positive.
#[inline]
pub fn pid_compute(state: &mut PidState, gains: &PidGains, angle: f64, dt: f64) -> PidOutput {
    debug_assert!(dt > 0.0, "dt must be positive, got {dt}");

    let error = angle_error(angle);

    // ── I term (rectangular) ────────────────────────────────
    state.integral += error * dt;
    if let Some(limit) = gains.integral_limit {
        state.integral = state.integral.clamp(-limit, limit);
    }

    // ── D term (backward difference) ────────────────────────
    let derivative = (error - state.prev_error) / dt;
    state.prev_error = error;

    let raw = gains.kp * error + gains.ki * state.integral + gains.kd * derivative;

    PidOutput {
        command: raw.clamp(-gains.move_speed, gains.move_speed),
        error,
        integral: state.integral,
        derivative,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
