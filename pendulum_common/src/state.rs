//! State records and per-tick host I/O types.

use serde::{Deserialize, Serialize};

// ─── Plant State ────────────────────────────────────────────────────

/// Pendulum state: angle from the hanging position and its rate.
///
/// `angle` is kept in (−π, π] by every plant step; 0 is hanging down,
/// ±π is upright.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PendulumState {
    /// Angle [rad].
    pub angle: f64,
    /// Angular velocity [rad/s].
    pub angular_velocity: f64,
}

impl PendulumState {
    pub const fn new(angle: f64, angular_velocity: f64) -> Self {
        Self {
            angle,
            angular_velocity,
        }
    }

    /// Hanging at rest.
    pub const fn hanging() -> Self {
        Self::new(0.0, 0.0)
    }
}

// ─── Control Mode ───────────────────────────────────────────────────

/// Active source of pivot motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ControlMode {
    /// Keyboard drives the pivot; the PID is idle and held at zero.
    #[default]
    Manual,
    /// PID drives the pivot.
    Automatic,
}

impl ControlMode {
    #[inline]
    pub const fn is_automatic(&self) -> bool {
        matches!(self, Self::Automatic)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "Manual",
            Self::Automatic => "Automatic",
        }
    }
}

impl core::fmt::Display for ControlMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Host I/O ───────────────────────────────────────────────────────

/// Raw input sampled by the host between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TickInput {
    pub key_left_held: bool,
    pub key_right_held: bool,
    /// Pointer x in render-surface coordinates [px].
    pub pointer_x: f64,
    /// Ends the loop before the next tick.
    pub quit_requested: bool,
}

impl TickInput {
    /// No keys held, pointer at `center_x`.
    pub const fn idle(center_x: f64) -> Self {
        Self {
            key_left_held: false,
            key_right_held: false,
            pointer_x: center_x,
            quit_requested: false,
        }
    }
}

/// Values published to the host after each tick.
///
/// `error`, `integral` and `derivative` are zero in Manual mode.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TickOutput {
    /// Tick index, starting at 1 for the first completed tick.
    pub tick: u64,
    pub angle: f64,
    pub angular_velocity: f64,
    pub pivot_position: f64,
    /// Realized pivot velocity this tick [px/s].
    pub pivot_velocity: f64,
    pub mode: ControlMode,
    pub error: f64,
    pub integral: f64,
    pub derivative: f64,
    /// `0.5·ω² − (g/l)·cos(angle)` after the step.
    pub energy: f64,
}

impl TickOutput {
    /// Returns true if every numeric field is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.angle.is_finite()
            && self.angular_velocity.is_finite()
            && self.pivot_position.is_finite()
            && self.pivot_velocity.is_finite()
            && self.error.is_finite()
            && self.integral.is_finite()
            && self.derivative.is_finite()
            && self.energy.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_mode_default_is_manual() {
        assert_eq!(ControlMode::default(), ControlMode::Manual);
    }

    #[test]
    fn control_mode_serializes_by_name() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            mode: ControlMode,
        }
        let text = toml::to_string(&Wrapper {
            mode: ControlMode::Automatic,
        })
        .unwrap();
        assert!(text.contains("\"Automatic\""));
        let back: Wrapper = toml::from_str("mode = \"Manual\"").unwrap();
        assert_eq!(back.mode, ControlMode::Manual);
    }

    #[test]
    fn control_mode_display() {
        assert_eq!(ControlMode::Automatic.to_string(), "Automatic");
    }

    #[test]
    fn idle_input_has_no_keys() {
        let input = TickInput::idle(640.0);
        assert!(!input.key_left_held && !input.key_right_held);
        assert_eq!(input.pointer_x, 640.0);
        assert!(!input.quit_requested);
    }

    #[test]
    fn non_finite_output_detected() {
        let mut out = TickOutput::default();
        assert!(out.is_finite());
        out.angular_velocity = f64::INFINITY;
        assert!(!out.is_finite());
    }
}
