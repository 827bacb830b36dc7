//! # Swerve control telecommands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A command for the swerve modules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwerveCmd {
    /// Drive the wheel at the given speed and heading.
    SetState {
        /// Linear wheel speed in meters/second.
        ///
        /// Positive speeds are "forwards" along the heading.
        speed_ms: f64,

        /// Wheel heading in radians, in the module frame.
        heading_rad: f64,
    },

    /// Hold the current heading with zero speed.
    Stop,

    /// Zero the drive encoder and its accumulated distance.
    ZeroEncoders,
}
