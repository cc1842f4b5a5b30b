//! Prelude module for common re-exports.
//!
//! ```rust
//! use pendulum_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};
pub use crate::params::{
    ArbiterParams, ControllerParams, DisturbanceParams, PendulumConfig, PhysicsParams,
    PivotBounds, PivotParams, SimulationParams,
};

// ─── State ──────────────────────────────────────────────────────────
pub use crate::state::{ControlMode, PendulumState, TickInput, TickOutput};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{DT_DEFAULT, HOST_FPS_DEFAULT};
