//! Parameters structure for SwerveCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::mech::PidGains;
use serde::{Deserialize, Serialize};

use super::SwerveCtrlError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters shared by every swerve module.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Params {
    // ---- GEOMETRY ----
    /// Wheel rotations per drive motor rotation.
    pub drive_gear_ratio: f64,

    /// Units: meters
    pub wheel_circumference_m: f64,

    // ---- CONTROL ----
    /// Period at which the controllers are run.
    ///
    /// Units: seconds
    pub control_period_s: f64,

    /// Both motor commands are clamped to `[-max_voltage_v, max_voltage_v]`.
    ///
    /// Units: volts
    pub max_voltage_v: f64,

    /// Gains of the drive speed controller.
    pub drive_gains: PidGains,

    /// Units: volts, volts/(meter/second), volts/(meter/second^2)
    pub drive_ff: FeedforwardGains,

    /// Gains of the profiled turn controller.
    pub turn_gains: PidGains,

    /// Units: radians/second
    pub turn_max_ang_vel_rads: f64,

    /// Units: radians/second^2
    pub turn_max_ang_accel_radss: f64,

    /// Units: volts, volts/(radian/second), volts/(radian/second^2)
    pub turn_ff: FeedforwardGains,

    // ---- MODULES ----
    pub modules: Vec<ModuleParams>,
}

/// Parameters of one physical module.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ModuleParams {
    pub name: String,

    /// Reading of the absolute heading sensor when the wheel points forward.
    ///
    /// Units: degrees
    pub abs_zero_offset_deg: f64,
}

/// Gains of a permanent magnet DC motor feedforward.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeedforwardGains {
    pub k_s: f64,
    pub k_v: f64,
    #[serde(default)]
    pub k_a: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    pub fn validate(&self) -> Result<(), SwerveCtrlError> {
        let positive = [
            ("drive_gear_ratio", self.drive_gear_ratio),
            ("wheel_circumference_m", self.wheel_circumference_m),
            ("control_period_s", self.control_period_s),
            ("max_voltage_v", self.max_voltage_v),
            ("turn_max_ang_vel_rads", self.turn_max_ang_vel_rads),
            ("turn_max_ang_accel_radss", self.turn_max_ang_accel_radss),
        ];

        for (name, value) in positive.iter() {
            if !(value.is_finite() && *value > 0.0) {
                return Err(SwerveCtrlError::InvalidParams(format!(
                    "{} must be positive, found {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    /// Wheel travel per drive motor rotation.
    ///
    /// Units: meters/rotation
    pub fn meters_per_rot(&self) -> f64 {
        self.drive_gear_ratio * self.wheel_circumference_m
    }
}
