//! Workspace-wide constants: defaults and parameter bounds.
//!
//! Single source of truth for every numeric default and `MIN`/`MAX` bound
//! used by [`crate::params`] validation.

use static_assertions::const_assert;

// ─── Simulation ─────────────────────────────────────────────────────

/// Default fixed time step [s].
pub const DT_DEFAULT: f64 = 0.08;
/// Smallest accepted time step [s]. `dt` must be strictly positive.
pub const DT_MIN: f64 = 1.0e-6;
/// Largest accepted time step [s].
pub const DT_MAX: f64 = 1.0;

/// Default initial angle: near upright, 0.4 rad off the setpoint.
pub const INITIAL_ANGLE_DEFAULT: f64 = core::f64::consts::PI - 0.4;

/// Default telemetry log interval [ticks].
pub const TELEMETRY_INTERVAL_DEFAULT: u32 = 25;

/// Angular velocity magnitude treated as divergence [rad/s].
pub const DIVERGENCE_LIMIT_DEFAULT: f64 = 100.0;

/// Host frame rate used for real-time pacing [frames/s].
pub const HOST_FPS_DEFAULT: u32 = 120;

// ─── Physics ────────────────────────────────────────────────────────

/// Gravitational acceleration.
pub const GRAVITY_DEFAULT: f64 = 9.81;
/// Pendulum length [px].
pub const LENGTH_DEFAULT: f64 = 200.0;
pub const LENGTH_MIN: f64 = 1.0e-3;
pub const LENGTH_MAX: f64 = 1.0e6;
/// Viscous damping coefficient [1/s].
pub const DAMPING_DEFAULT: f64 = 0.042;
pub const DAMPING_MAX: f64 = 100.0;

// ─── Controller ─────────────────────────────────────────────────────

pub const KP_DEFAULT: f64 = 5.0;
pub const KI_DEFAULT: f64 = 0.1;
pub const KD_DEFAULT: f64 = 2.0;
/// Upper bound for any single PID gain.
pub const GAIN_MAX: f64 = 1.0e4;

/// Actuation saturation [px per tick].
pub const MOVE_SPEED_DEFAULT: f64 = 10.0;
pub const MOVE_SPEED_MAX: f64 = 1.0e4;

// ─── Pivot ──────────────────────────────────────────────────────────

/// Render surface width the default rails are laid out for [px].
pub const SURFACE_WIDTH_DEFAULT: f64 = 1280.0;
/// Left rail [px].
pub const PIVOT_MIN_X_DEFAULT: f64 = 100.0;
/// Right rail [px].
pub const PIVOT_MAX_X_DEFAULT: f64 = SURFACE_WIDTH_DEFAULT - 100.0;
/// Initial pivot position: surface centre [px].
pub const PIVOT_INITIAL_X_DEFAULT: f64 = SURFACE_WIDTH_DEFAULT / 2.0;

// ─── Arbiter ────────────────────────────────────────────────────────

/// `|angle|` above which the PID takes over [rad].
pub const THRESHOLD_ANGLE_DEFAULT: f64 = 2.0;
/// Keyboard step as a fraction of `move_speed`.
pub const MANUAL_STEP_FRACTION_DEFAULT: f64 = 0.5;

// ─── Disturbance ────────────────────────────────────────────────────

/// Angle offset per pixel of pointer offset from centre [rad/px].
pub const POINTER_GAIN_DEFAULT: f64 = 1.0e-4;
pub const POINTER_GAIN_MAX: f64 = 1.0;

const_assert!(TELEMETRY_INTERVAL_DEFAULT > 0);
const_assert!(HOST_FPS_DEFAULT > 0);
