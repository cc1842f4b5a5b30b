//! Run parameters loaded from `pendulum.toml`.
//!
//! All sections use `serde::Deserialize` with per-field defaults, so an
//! empty document yields the reference configuration. Numeric fields are
//! checked against the `MIN`/`MAX` bounds in [`crate::consts`]. Parameters
//! are immutable once a session has been created from them.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SharedConfig};
use crate::consts::*;

// ─── Top-Level Config ───────────────────────────────────────────────

/// Complete configuration for one simulation run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PendulumConfig {
    #[serde(default)]
    pub shared: SharedConfig,
    #[serde(default)]
    pub simulation: SimulationParams,
    #[serde(default)]
    pub physics: PhysicsParams,
    #[serde(default)]
    pub controller: ControllerParams,
    #[serde(default)]
    pub pivot: PivotParams,
    #[serde(default)]
    pub arbiter: ArbiterParams,
    #[serde(default)]
    pub disturbance: DisturbanceParams,
}

impl PendulumConfig {
    /// Validate every section plus the cross-section rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.simulation.validate()?;
        self.physics.validate()?;
        self.controller.validate()?;
        self.pivot.validate()?;
        self.arbiter.validate()?;
        self.disturbance.validate()?;
        Ok(())
    }

    /// Keyboard displacement per tick in Manual mode [px].
    #[inline]
    pub fn manual_step(&self) -> f64 {
        self.arbiter.manual_step_fraction * self.controller.move_speed
    }
}

/// Reject `value` outside `[min, max]` (NaN is always rejected).
fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !(value >= min && value <= max) {
        return Err(ConfigError::ValidationError(format!(
            "{field} {value} out of range [{min}, {max}]"
        )));
    }
    Ok(())
}

fn check_finite(field: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::ValidationError(format!(
            "{field} must be finite, got {value}"
        )));
    }
    Ok(())
}

// ─── Simulation ─────────────────────────────────────────────────────

/// Host loop settings: step size, initial condition, diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationParams {
    /// Fixed time step [s]. Constant for the whole run.
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Initial pendulum angle [rad], 0 = hanging, π = upright.
    #[serde(default = "default_initial_angle")]
    pub initial_angle: f64,
    /// Initial angular velocity [rad/s].
    #[serde(default)]
    pub initial_angular_velocity: f64,
    /// Telemetry log interval [ticks].
    #[serde(default = "default_telemetry_interval")]
    pub telemetry_interval: u32,
    /// `|ω|` above which the run is flagged as diverged [rad/s].
    #[serde(default = "default_divergence_limit")]
    pub divergence_limit: f64,
}

fn default_dt() -> f64 {
    DT_DEFAULT
}
fn default_initial_angle() -> f64 {
    INITIAL_ANGLE_DEFAULT
}
fn default_telemetry_interval() -> u32 {
    TELEMETRY_INTERVAL_DEFAULT
}
fn default_divergence_limit() -> f64 {
    DIVERGENCE_LIMIT_DEFAULT
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            dt: DT_DEFAULT,
            initial_angle: INITIAL_ANGLE_DEFAULT,
            initial_angular_velocity: 0.0,
            telemetry_interval: TELEMETRY_INTERVAL_DEFAULT,
            divergence_limit: DIVERGENCE_LIMIT_DEFAULT,
        }
    }
}

impl SimulationParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("simulation.dt", self.dt, DT_MIN, DT_MAX)?;
        check_finite("simulation.initial_angle", self.initial_angle)?;
        check_finite(
            "simulation.initial_angular_velocity",
            self.initial_angular_velocity,
        )?;
        if self.telemetry_interval == 0 {
            return Err(ConfigError::ValidationError(
                "simulation.telemetry_interval must be at least 1".to_string(),
            ));
        }
        if !(self.divergence_limit > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "simulation.divergence_limit must be positive, got {}",
                self.divergence_limit
            )));
        }
        Ok(())
    }
}

// ─── Physics ────────────────────────────────────────────────────────

/// Plant constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhysicsParams {
    /// Gravitational acceleration `g`.
    #[serde(default = "default_gravity")]
    pub gravity: f64,
    /// Pendulum length `l` [px].
    #[serde(default = "default_length")]
    pub length: f64,
    /// Damping coefficient `b` [1/s].
    #[serde(default = "default_damping")]
    pub damping: f64,
}

fn default_gravity() -> f64 {
    GRAVITY_DEFAULT
}
fn default_length() -> f64 {
    LENGTH_DEFAULT
}
fn default_damping() -> f64 {
    DAMPING_DEFAULT
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity: GRAVITY_DEFAULT,
            length: LENGTH_DEFAULT,
            damping: DAMPING_DEFAULT,
        }
    }
}

impl PhysicsParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_finite("physics.gravity", self.gravity)?;
        check_range("physics.length", self.length, LENGTH_MIN, LENGTH_MAX)?;
        check_range("physics.damping", self.damping, 0.0, DAMPING_MAX)?;
        Ok(())
    }

    /// `g / l`, the gravity term coefficient.
    #[inline]
    pub fn gravity_over_length(&self) -> f64 {
        self.gravity / self.length
    }
}

// ─── Controller ─────────────────────────────────────────────────────

/// PID gains and actuation saturation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerParams {
    /// Proportional gain.
    #[serde(default = "default_kp")]
    pub kp: f64,
    /// Integral gain (0 = disabled).
    #[serde(default = "default_ki")]
    pub ki: f64,
    /// Derivative gain (0 = disabled).
    #[serde(default = "default_kd")]
    pub kd: f64,
    /// Command saturation `±move_speed` [px per tick].
    #[serde(default = "default_move_speed")]
    pub move_speed: f64,
    /// Optional clamp on the integral accumulator.
    ///
    /// Deviation from the reference controller, which lets the integral
    /// wind up freely. `None` keeps the reference behavior.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integral_limit: Option<f64>,
}

fn default_kp() -> f64 {
    KP_DEFAULT
}
fn default_ki() -> f64 {
    KI_DEFAULT
}
fn default_kd() -> f64 {
    KD_DEFAULT
}
fn default_move_speed() -> f64 {
    MOVE_SPEED_DEFAULT
}

impl Default for ControllerParams {
    fn default() -> Self {
        Self {
            kp: KP_DEFAULT,
            ki: KI_DEFAULT,
            kd: KD_DEFAULT,
            move_speed: MOVE_SPEED_DEFAULT,
            integral_limit: None,
        }
    }
}

impl ControllerParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("controller.kp", self.kp, 0.0, GAIN_MAX)?;
        check_range("controller.ki", self.ki, 0.0, GAIN_MAX)?;
        check_range("controller.kd", self.kd, 0.0, GAIN_MAX)?;
        if !(self.move_speed > 0.0 && self.move_speed <= MOVE_SPEED_MAX) {
            return Err(ConfigError::ValidationError(format!(
                "controller.move_speed {} out of range (0, {}]",
                self.move_speed, MOVE_SPEED_MAX
            )));
        }
        if let Some(limit) = self.integral_limit {
            if !(limit > 0.0 && limit.is_finite()) {
                return Err(ConfigError::ValidationError(format!(
                    "controller.integral_limit must be positive and finite, got {limit}"
                )));
            }
        }
        Ok(())
    }
}

// ─── Pivot ──────────────────────────────────────────────────────────

/// Pivot travel bounds `[min_x, max_x]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotBounds {
    pub min_x: f64,
    pub max_x: f64,
}

impl PivotBounds {
    #[inline]
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min_x, self.max_x)
    }

    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        x >= self.min_x && x <= self.max_x
    }
}

/// Pivot rails and start position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PivotParams {
    #[serde(default = "default_min_x")]
    pub min_x: f64,
    #[serde(default = "default_max_x")]
    pub max_x: f64,
    #[serde(default = "default_initial_x")]
    pub initial_x: f64,
}

fn default_min_x() -> f64 {
    PIVOT_MIN_X_DEFAULT
}
fn default_max_x() -> f64 {
    PIVOT_MAX_X_DEFAULT
}
fn default_initial_x() -> f64 {
    PIVOT_INITIAL_X_DEFAULT
}

impl Default for PivotParams {
    fn default() -> Self {
        Self {
            min_x: PIVOT_MIN_X_DEFAULT,
            max_x: PIVOT_MAX_X_DEFAULT,
            initial_x: PIVOT_INITIAL_X_DEFAULT,
        }
    }
}

impl PivotParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_finite("pivot.min_x", self.min_x)?;
        check_finite("pivot.max_x", self.max_x)?;
        if self.min_x >= self.max_x {
            return Err(ConfigError::ValidationError(format!(
                "pivot.min_x {} must be below pivot.max_x {}",
                self.min_x, self.max_x
            )));
        }
        check_range("pivot.initial_x", self.initial_x, self.min_x, self.max_x)?;
        Ok(())
    }

    #[inline]
    pub fn bounds(&self) -> PivotBounds {
        PivotBounds {
            min_x: self.min_x,
            max_x: self.max_x,
        }
    }
}

// ─── Arbiter ────────────────────────────────────────────────────────

/// Manual/Automatic switching settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArbiterParams {
    /// `|angle|` strictly above this selects Automatic [rad].
    #[serde(default = "default_threshold_angle")]
    pub threshold_angle: f64,
    /// Keyboard step as a fraction of `controller.move_speed`.
    #[serde(default = "default_manual_step_fraction")]
    pub manual_step_fraction: f64,
}

fn default_threshold_angle() -> f64 {
    THRESHOLD_ANGLE_DEFAULT
}
fn default_manual_step_fraction() -> f64 {
    MANUAL_STEP_FRACTION_DEFAULT
}

impl Default for ArbiterParams {
    fn default() -> Self {
        Self {
            threshold_angle: THRESHOLD_ANGLE_DEFAULT,
            manual_step_fraction: MANUAL_STEP_FRACTION_DEFAULT,
        }
    }
}

impl ArbiterParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(
            "arbiter.threshold_angle",
            self.threshold_angle,
            0.0,
            core::f64::consts::PI,
        )?;
        check_range(
            "arbiter.manual_step_fraction",
            self.manual_step_fraction,
            0.0,
            1.0,
        )?;
        Ok(())
    }
}

// ─── Disturbance ────────────────────────────────────────────────────

/// Pointer-driven angle perturbation applied in Automatic mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisturbanceParams {
    /// Angle offset per pixel of pointer offset [rad/px].
    #[serde(default = "default_pointer_gain")]
    pub pointer_gain: f64,
    /// Horizontal centre of the render surface [px].
    #[serde(default = "default_surface_center_x")]
    pub surface_center_x: f64,
}

fn default_pointer_gain() -> f64 {
    POINTER_GAIN_DEFAULT
}
fn default_surface_center_x() -> f64 {
    SURFACE_WIDTH_DEFAULT / 2.0
}

impl Default for DisturbanceParams {
    fn default() -> Self {
        Self {
            pointer_gain: POINTER_GAIN_DEFAULT,
            surface_center_x: SURFACE_WIDTH_DEFAULT / 2.0,
        }
    }
}

impl DisturbanceParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(
            "disturbance.pointer_gain",
            self.pointer_gain,
            -POINTER_GAIN_MAX,
            POINTER_GAIN_MAX,
        )?;
        check_finite("disturbance.surface_center_x", self.surface_center_x)?;
        Ok(())
    }

    /// Angle offset for a pointer at `pointer_x` [rad].
    #[inline]
    pub fn angle_offset(&self, pointer_x: f64) -> f64 {
        self.pointer_gain * (pointer_x - self.surface_center_x)
    }
}
