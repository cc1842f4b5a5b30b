//! Scripted host input for headless runs.
//!
//! A scenario is a TOML list of segments, each holding a key/pointer state
//! for a number of ticks:
//!
//! ```toml
//! name = "nudge and release"
//! quit_at_end = true
//!
//! [[segment]]
//! ticks = 40
//! right = true
//!
//! [[segment]]
//! ticks = 200
//! pointer_x = 700.0
//! ```
//!
//! After the last segment the host idles (no keys, pointer at the surface
//! centre) or requests quit when `quit_at_end` is set.

use std::path::Path;

use pendulum_common::state::TickInput;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cycle::InputSource;

/// Error type for scenario loading.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("scenario has no segments")]
    Empty,

    #[error("segment {index} has zero ticks")]
    ZeroLengthSegment { index: usize },

    #[error("segment {index} pointer_x must be finite")]
    InvalidPointer { index: usize },
}

/// One constant-input stretch of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputSegment {
    /// Duration [ticks].
    pub ticks: u64,
    /// Left arrow held.
    #[serde(default)]
    pub left: bool,
    /// Right arrow held.
    #[serde(default)]
    pub right: bool,
    /// Pointer position [px] (`None` = surface centre).
    #[serde(default)]
    pub pointer_x: Option<f64>,
}

/// Parsed scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    /// Request quit once every segment has played.
    #[serde(default)]
    pub quit_at_end: bool,
    #[serde(rename = "segment", default)]
    pub segments: Vec<InputSegment>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = toml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.segments.is_empty() {
            return Err(ScenarioError::Empty);
        }
        for (index, segment) in self.segments.iter().enumerate() {
            if segment.ticks == 0 {
                return Err(ScenarioError::ZeroLengthSegment { index });
            }
            if segment.pointer_x.is_some_and(|x| !x.is_finite()) {
                return Err(ScenarioError::InvalidPointer { index });
            }
        }
        Ok(())
    }

    /// Total scripted ticks.
    pub fn total_ticks(&self) -> u64 {
        self.segments.iter().map(|s| s.ticks).sum()
    }
}

/// [`InputSource`] replaying a [`Scenario`].
#[derive(Debug, Clone)]
pub struct ScenarioInput {
    scenario: Scenario,
    center_x: f64,
    segment: usize,
    remaining: u64,
}

impl ScenarioInput {
    pub fn new(scenario: Scenario, center_x: f64) -> Self {
        let remaining = scenario.segments.first().map_or(0, |s| s.ticks);
        Self {
            scenario,
            center_x,
            segment: 0,
            remaining,
        }
    }

    /// Every segment has been played.
    #[inline]
    pub fn finished(&self) -> bool {
        self.segment >= self.scenario.segments.len()
    }
}

impl InputSource for ScenarioInput {
    fn next_input(&mut self, _tick: u64) -> TickInput {
        while !self.finished() && self.remaining == 0 {
            self.segment += 1;
            self.remaining = self.scenario.segments.get(self.segment).map_or(0, |s| s.ticks);
        }

        let Some(segment) = self.scenario.segments.get(self.segment) else {
            let mut idle = TickInput::idle(self.center_x);
            idle.quit_requested = self.scenario.quit_at_end;
            return idle;
        };

        self.remaining -= 1;
        TickInput {
            key_left_held: segment.left,
            key_right_held: segment.right,
            pointer_x: segment.pointer_x.unwrap_or(self.center_x),
            quit_requested: false,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"
name = "test"
quit_at_end = true

[[segment]]
ticks = 2
right = true

[[segment]]
ticks = 1
pointer_x = 900.0
"#;

    #[test]
    fn parses_segments() {
        let s = Scenario::from_toml(SCRIPT).unwrap();
        assert_eq!(s.name, "test");
        assert_eq!(s.segments.len(), 2);
        assert_eq!(s.total_ticks(), 3);
        assert!(s.segments[0].right && !s.segments[0].left);
        assert_eq!(s.segments[1].pointer_x, Some(900.0));
    }

    #[test]
    fn replays_then_quits() {
        let mut input = ScenarioInput::new(Scenario::from_toml(SCRIPT).unwrap(), 640.0);
        let a = input.next_input(1);
        let b = input.next_input(2);
        let c = input.next_input(3);
        let d = input.next_input(4);
        assert!(a.key_right_held && b.key_right_held);
        assert_eq!(a.pointer_x, 640.0);
        assert!(!c.key_right_held);
        assert_eq!(c.pointer_x, 900.0);
        assert!(d.quit_requested);
        assert!(input.finished());
    }

    #[test]
    fn idles_after_end_without_quit() {
        let script = "[[segment]]\nticks = 1\nleft = true\n";
        let mut input = ScenarioInput::new(Scenario::from_toml(script).unwrap(), 640.0);
        assert!(input.next_input(1).key_left_held);
        let idle = input.next_input(2);
        assert_eq!(idle, TickInput::idle(640.0));
    }

    #[test]
    fn empty_scenario_rejected() {
        assert!(matches!(
            Scenario::from_toml("name = \"nothing\""),
            Err(ScenarioError::Empty)
        ));
    }

    #[test]
    fn zero_length_segment_rejected() {
        let script = "[[segment]]\nticks = 3\n[[segment]]\nticks = 0\n";
        assert!(matches!(
            Scenario::from_toml(script),
            Err(ScenarioError::ZeroLengthSegment { index: 1 })
        ));
    }

    #[test]
    fn unknown_field_is_parse_error() {
        let script = "[[segment]]\nticks = 3\njump = true\n";
        assert!(matches!(
            Scenario::from_toml(script),
            Err(ScenarioError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            Scenario::load(Path::new("/nonexistent/scenario.toml")),
            Err(ScenarioError::Io { .. })
        ));
    }
}
