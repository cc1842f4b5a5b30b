//! TOML loading for simulator configuration files.
//!
//! [`ConfigLoader`] is blanket-implemented for every deserializable type,
//! so any section struct (or the whole [`PendulumConfig`]) can be read
//! straight from a file or string:
//!
//! ```rust,no_run
//! use pendulum_common::config::{ConfigError, ConfigLoader};
//! use pendulum_common::params::PendulumConfig;
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = PendulumConfig::load(Path::new("config/pendulum.toml"))?;
//!     config.validate()?;
//!     println!("dt = {} s", config.simulation.dt);
//!     Ok(())
//! }
//! ```
//!
//! Loading only parses; bounds are checked by each section's `validate()`.
//!
//! [`PendulumConfig`]: crate::params::PendulumConfig

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Failure while reading, parsing or validating a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// No file at the given path.
    #[error("config file not found")]
    FileNotFound,

    /// File exists but could not be read.
    #[error("config file unreadable: {0}")]
    ReadError(String),

    /// Invalid TOML, wrong type, or unknown key.
    #[error("config parse error: {0}")]
    ParseError(String),

    /// A value is out of its allowed range.
    #[error("config validation: {0}")]
    ValidationError(String),
}

/// Verbosity of the host's log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Per-tick state.
    Trace,
    /// Mode switches and applied overrides.
    Debug,
    /// Startup, periodic telemetry, run summary.
    #[default]
    Info,
    /// Divergence and rail contact.
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// `[shared]` section: settings not tied to the simulation itself.
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "pendulum-sim"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SharedConfig {
    #[serde(default)]
    pub log_level: LogLevel,

    /// Recorded on the host's startup log and its `session` span.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

fn default_service_name() -> String {
    "pendulum-sim".to_string()
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: default_service_name(),
        }
    }
}

impl SharedConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "shared.service_name must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

/// Read a configuration type from TOML.
///
/// - missing file ⇒ [`ConfigError::FileNotFound`]
/// - other I/O failure ⇒ [`ConfigError::ReadError`]
/// - bad syntax, wrong type, unknown key ⇒ [`ConfigError::ParseError`]
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::FileNotFound);
            }
            Err(e) => return Err(ConfigError::ReadError(format!("{}: {e}", path.display()))),
        };
        Self::from_toml(&content)
    }

    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
