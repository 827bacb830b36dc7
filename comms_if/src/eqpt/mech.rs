//! # Mechanisms Equipment Interface

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A motor controller running its own closed-loop position control.
///
/// Positions are in motor rotations, outputs are normalised duty in [-1, 1].
pub trait PosActuator {
    /// Configure the closed-loop gains of the controller.
    fn configure_gains(&mut self, gains: &PidGains);

    /// Configure the motion profile constraints used when moving to a reference.
    fn configure_constraints(&mut self, constraints: &MotionConstraints);

    /// Invert the direction of the motor, used for mirrored followers.
    fn set_inverted(&mut self, inverted: bool);

    /// Set the closed-loop position reference.
    ///
    /// Units: rotations
    fn set_reference(&mut self, pos_rot: f64);

    /// Clamp the closed-loop controller output to `[min, max]`.
    fn set_output_range(&mut self, min: f64, max: f64);

    /// Command a raw open-loop duty, bypassing the closed-loop controller.
    fn set_duty(&mut self, duty: f64);

    /// Redefine the current position of the motor.
    ///
    /// Units: rotations
    fn set_position(&mut self, pos_rot: f64);

    /// Measured position of the motor.
    ///
    /// Units: rotations
    fn position(&self) -> f64;

    /// The output currently applied to the motor.
    fn applied_output(&self) -> f64;

    /// Current drawn by the motor.
    ///
    /// Units: amps
    fn output_current_a(&self) -> f64;

    /// Voltage of the supply bus.
    ///
    /// Units: volts
    fn bus_voltage_v(&self) -> f64;
}

/// A motor commanded directly in volts.
pub trait VoltageActuator {
    /// Apply the given voltage to the motor.
    fn set_voltage(&mut self, voltage_v: f64);

    /// The voltage last applied to the motor.
    fn voltage_v(&self) -> f64;
}

/// A two-state actuator, such as a double solenoid.
pub trait BinaryActuator {
    fn open(&mut self);

    fn close(&mut self);
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Gains for a closed-loop position controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    pub k_p: f64,
    pub k_i: f64,
    pub k_d: f64,

    /// Error magnitude below which the integral term is allowed to accumulate.
    ///
    /// Zero disables the zone.
    #[serde(default)]
    pub i_zone: f64,
}

/// Motion profile constraints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionConstraints {
    /// Units: rotations/minute
    pub max_vel: f64,

    /// Units: rotations/minute/second
    pub max_accel: f64,
}
