//! # Rover library.
//!
//! This library allows other crates in the workspace to access items defined inside the rover
//! crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Arm control module - moves the arm between named poses with staged output limits
pub mod arm_ctrl;

/// Swerve control module - drives a single swerve wheel module to a desired speed and heading
pub mod swerve_ctrl;

/// Simulated equipment - implementations of the equipment interfaces for testing and the exec
pub mod sim;

/// Global data store of the executable
pub mod data_store;

/// Telemetry server - publishes module telemetry to the log and the session directory
pub mod tm_server;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Target period of one cycle.
pub const CYCLE_PERIOD_S: f64 = 0.02;

/// Number of cycles per second
pub const CYCLE_FREQUENCY_HZ: f64 = 1.0 / CYCLE_PERIOD_S;
