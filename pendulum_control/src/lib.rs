//! # Pendulum Control Library
//!
//! Fixed-step simulation of a pivot-driven pendulum with a PID balancer
//! and keyboard override. Every tick reads host input, arbitrates between
//! Manual and Automatic control, moves the travel-limited pivot and
//! integrates the pendulum dynamics.
//!
//! ## Layers
//!
//! 1. **Mode**: Manual/Automatic selection from the current angle
//! 2. **Control**: PID regulator and pivot actuator
//! 3. **Cycle**: Tick pipeline, session statistics and host loop
//! 4. **Scenario**: Scripted keyboard/pointer input for headless runs
//!
//! The tick path performs no heap allocation and never blocks; pacing and
//! telemetry live in the host loop around it.

pub mod config;
pub mod control;
pub mod cycle;
pub mod mode;
pub mod scenario;
