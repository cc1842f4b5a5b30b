//! Control engine root.
//!
//! PID regulator on the wrapped upright error, and the travel-limited
//! pivot actuator it drives.

pub mod actuator;
pub mod pid;
