//! Manual/Automatic mode arbitration.
//!
//! The mode is a direct function of the current `|angle|` against the
//! threshold, re-evaluated every tick with no latch or debounce. Near the
//! threshold the mode can flip every tick. `|angle| == threshold` selects
//! Manual.

use pendulum_common::state::{ControlMode, TickInput};

/// Outcome of one arbitration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeTransition {
    /// Mode unchanged from the previous tick.
    Held(ControlMode),
    /// Mode switched this tick.
    Entered(ControlMode),
}

impl ModeTransition {
    #[inline]
    pub const fn mode(&self) -> ControlMode {
        match *self {
            Self::Held(mode) | Self::Entered(mode) => mode,
        }
    }

    #[inline]
    pub const fn is_switch(&self) -> bool {
        matches!(self, Self::Entered(_))
    }
}

/// Mode for `angle` under `threshold_angle`.
#[inline]
pub fn select_mode(angle: f64, threshold_angle: f64) -> ControlMode {
    if angle.abs() > threshold_angle {
        ControlMode::Automatic
    } else {
        ControlMode::Manual
    }
}

/// Keyboard pivot displacement: `−step` for left, `+step` for right.
/// Both keys held cancel out.
#[inline]
pub fn manual_displacement(input: &TickInput, step: f64) -> f64 {
    let mut displacement = 0.0;
    if input.key_left_held {
        displacement -= step;
    }
    if input.key_right_held {
        displacement += step;
    }
    displacement
}

/// Two-state mode switch. Starts in Manual.
#[derive(Debug, Clone)]
pub struct ModeArbiter {
    mode: ControlMode,
    threshold_angle: f64,
}

impl ModeArbiter {
    pub const fn new(threshold_angle: f64) -> Self {
        Self {
            mode: ControlMode::Manual,
            threshold_angle,
        }
    }

    #[inline]
    pub const fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Re-evaluate the mode from the current angle.
    pub fn evaluate(&mut self, angle: f64) -> ModeTransition {
        let next = select_mode(angle, self.threshold_angle);
        if next == self.mode {
            ModeTransition::Held(next)
        } else {
            self.mode = next;
            ModeTransition::Entered(next)
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
