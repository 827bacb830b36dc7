//! # Simulated plants
//!
//! Groups of simulated equipment making up a complete mechanism, stepped
//! together once per cycle.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::mech::VoltageActuator;

use super::{SimAbsEncoder, SimBinaryActuator, SimPosActuator, SimRelEncoder, SimVoltageActuator};
use crate::{arm_ctrl::ArmEqpt, swerve_ctrl::SwerveEqpt};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Simulated arm, two dual-motor joints and a gripper.
#[derive(Debug, Clone, Default)]
pub struct SimArm {
    pub major_primary: SimPosActuator,
    pub major_follower: SimPosActuator,
    pub minor_primary: SimPosActuator,
    pub minor_follower: SimPosActuator,
    pub gripper: SimBinaryActuator,
}

/// Simulated swerve module.
#[derive(Debug, Clone)]
pub struct SimSwerveModule {
    pub drive_motor: SimVoltageActuator,
    pub turn_motor: SimVoltageActuator,
    pub drive_encoder: SimRelEncoder,
    pub turn_encoder: SimAbsEncoder,

    params: SimSwerveParams,
}

/// Plant constants of a simulated swerve module.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimSwerveParams {
    /// Steady state drive motor speed per volt.
    ///
    /// Units: rotations/minute/volt
    pub drive_rpm_per_v: f64,

    /// Steady state steering rate per volt.
    ///
    /// Units: degrees/second/volt
    pub turn_degs_per_v: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimArm {
    /// Equipment handles to give to `ArmCtrl`.
    pub fn eqpt(&self) -> ArmEqpt {
        ArmEqpt {
            major_primary: Box::new(self.major_primary.clone()),
            major_follower: Box::new(self.major_follower.clone()),
            minor_primary: Box::new(self.minor_primary.clone()),
            minor_follower: Box::new(self.minor_follower.clone()),
            gripper: Box::new(self.gripper.clone()),
        }
    }

    pub fn step(&self, dt_s: f64) {
        for motor in [
            &self.major_primary,
            &self.major_follower,
            &self.minor_primary,
            &self.minor_follower,
        ]
        .iter()
        {
            motor.step(dt_s);
        }
    }
}

impl Default for SimSwerveParams {
    fn default() -> Self {
        Self {
            drive_rpm_per_v: 480.0,
            turn_degs_per_v: 90.0,
        }
    }
}

impl SimSwerveModule {
    /// Create a new module with the wheel at `raw_heading_deg` as seen by
    /// the absolute sensor, before any offset.
    pub fn new(params: SimSwerveParams, raw_heading_deg: f64) -> Self {
        let turn_encoder = SimAbsEncoder::default();
        turn_encoder.set_raw_deg(raw_heading_deg);

        Self {
            drive_motor: SimVoltageActuator::default(),
            turn_motor: SimVoltageActuator::default(),
            drive_encoder: SimRelEncoder::default(),
            turn_encoder,
            params,
        }
    }

    /// Equipment handles to give to a `SwerveModule`.
    pub fn eqpt(&self) -> SwerveEqpt {
        SwerveEqpt {
            drive_motor: Box::new(self.drive_motor.clone()),
            turn_motor: Box::new(self.turn_motor.clone()),
            drive_encoder: Box::new(self.drive_encoder.clone()),
            turn_encoder: Box::new(self.turn_encoder.clone()),
        }
    }

    /// Advance the module by `dt_s`, with both motors responding
    /// instantly to their voltage.
    pub fn step(&self, dt_s: f64) {
        self.drive_encoder
            .set_velocity_rpm(self.drive_motor.voltage_v() * self.params.drive_rpm_per_v);
        self.drive_encoder.step(dt_s);

        let raw_deg = self.turn_encoder.state().raw_deg
            + self.turn_motor.voltage_v() * self.params.turn_degs_per_v * dt_s;
        self.turn_encoder.set_raw_deg(raw_deg.rem_euclid(360.0));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::eqpt::{mech::VoltageActuator, sens::RelEncoder};

    #[test]
    fn test_swerve_plant_step() {
        let sim = SimSwerveModule::new(SimSwerveParams::default(), 350.0);
        let mut eqpt = sim.eqpt();

        eqpt.drive_motor.set_voltage(2.0);
        eqpt.turn_motor.set_voltage(1.0);
        sim.step(0.5);

        assert_eq!(eqpt.drive_encoder.velocity(), 960.0);
        assert_eq!(eqpt.drive_encoder.position(), 8.0);
        assert_eq!(sim.turn_encoder.state().raw_deg, 35.0);
    }
}
