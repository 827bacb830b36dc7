//! # Communications interface crate.
//!
//! Provides all common interfaces between the control software and the things around it: the
//! equipment it drives, the telecommands it receives and the telemetry it publishes.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod tc;

/// Interfaces to equipment (actuators and sensors)
pub mod eqpt;

/// Telemetry output interface
pub mod tm;
