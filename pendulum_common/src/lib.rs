//! Pendulum Common Library
//!
//! Shared parameters, state records and configuration loading for all
//! pendulum workspace crates.
//!
//! # Module Structure
//!
//! - [`config`] - Configuration loading trait, errors and log level
//! - [`consts`] - Defaults and parameter bounds
//! - [`params`] - Run parameters (`pendulum.toml` sections) with validation
//! - [`state`] - Pendulum state, control mode and host I/O records
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use pendulum_common::prelude::*;
//!
//! let config = PendulumConfig::default();
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod consts;
pub mod params;
pub mod prelude;
pub mod state;
