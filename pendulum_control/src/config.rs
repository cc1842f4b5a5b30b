//! Run configuration: TOML file plus command-line overrides.
//!
//! Loads a [`PendulumConfig`] (every section optional, defaults filled in),
//! applies the overrides given on the command line, and validates the
//! merged result. Nothing reaches a [`Session`](crate::cycle::Session)
//! without passing validation.

use std::path::{Path, PathBuf};

use pendulum_common::config::{ConfigError, ConfigLoader};
use pendulum_common::params::PendulumConfig;
use tracing::debug;

// ─── Overrides ──────────────────────────────────────────────────────

/// Values given on the command line that replace file settings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfigOverrides {
    /// `simulation.dt` [s].
    pub dt: Option<f64>,
    /// `simulation.initial_angle` [rad].
    pub initial_angle: Option<f64>,
}

impl ConfigOverrides {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dt.is_none() && self.initial_angle.is_none()
    }

    /// Write the overrides into `config` (no validation).
    pub fn apply_to(&self, config: &mut PendulumConfig) {
        if let Some(dt) = self.dt {
            config.simulation.dt = dt;
        }
        if let Some(angle) = self.initial_angle {
            config.simulation.initial_angle = angle;
        }
    }
}

// ─── Loaded Config Bundle ───────────────────────────────────────────

/// Validated configuration, ready for a session.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: PendulumConfig,
    /// File the configuration came from (`None` = built-in defaults).
    pub source: Option<PathBuf>,
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load `path` (or the defaults when `None`), apply `overrides`, validate.
pub fn load_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<LoadedConfig, ConfigError> {
    let config = match path {
        Some(p) => PendulumConfig::load(p)?,
        None => PendulumConfig::default(),
    };
    let config = finalize(config, overrides)?;

    Ok(LoadedConfig {
        config,
        source: path.map(Path::to_path_buf),
    })
}

/// Load config from a TOML string (for testing).
pub fn load_config_from_str(
    content: &str,
    overrides: &ConfigOverrides,
) -> Result<PendulumConfig, ConfigError> {
    let config = PendulumConfig::from_toml(content)?;
    finalize(config, overrides)
}

fn finalize(
    mut config: PendulumConfig,
    overrides: &ConfigOverrides,
) -> Result<PendulumConfig, ConfigError> {
    if !overrides.is_empty() {
        debug!(?overrides, "applying command-line overrides");
        overrides.apply_to(&mut config);
    }
    config.validate()?;
    Ok(config)
}

// ─── Tests ──────────────────────────────────────────────────────────
