//! # Simulated equipment
//!
//! Implementations of the `comms_if::eqpt` traits backed by simple plant
//! models. Each item is a cheap handle to shared state, so a clone can be
//! kept to step the simulation or inspect what the controller commanded
//! after the first handle has been moved into a control module.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod plant;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{cell::RefCell, rc::Rc};

use comms_if::eqpt::{
    mech::{BinaryActuator, MotionConstraints, PidGains, PosActuator, VoltageActuator},
    sens::{AbsEncoder, AbsSensorRange, RelEncoder},
};
use util::maths::clamp_sym;

pub use plant::*;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Bus voltage reported by simulated motors.
pub const SIM_BUS_VOLTAGE_V: f64 = 12.0;

/// Current drawn by a simulated motor at full output.
pub const SIM_FULL_OUTPUT_CURRENT_A: f64 = 40.0;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Simulated closed-loop position motor controller.
#[derive(Debug, Clone, Default)]
pub struct SimPosActuator(Rc<RefCell<SimPosActuatorState>>);

/// State of a [`SimPosActuator`].
#[derive(Debug, Clone, Default)]
pub struct SimPosActuatorState {
    pub gains: Option<PidGains>,
    pub constraints: Option<MotionConstraints>,
    pub inverted: bool,

    /// `None` when the motor is being driven open-loop.
    pub reference_rot: Option<f64>,
    pub num_references: usize,
    pub output_min: f64,
    pub output_max: f64,
    pub duty: f64,

    pub position_rot: f64,
    pub applied_output: f64,
}

/// Simulated voltage-driven motor.
#[derive(Debug, Clone, Default)]
pub struct SimVoltageActuator(Rc<RefCell<f64>>);

/// Simulated binary actuator.
#[derive(Debug, Clone, Default)]
pub struct SimBinaryActuator(Rc<RefCell<SimBinaryActuatorState>>);

/// State of a [`SimBinaryActuator`].
#[derive(Debug, Clone, Default)]
pub struct SimBinaryActuatorState {
    /// `None` until the first command.
    pub is_open: Option<bool>,
    pub num_opens: usize,
    pub num_closes: usize,
}

/// Simulated absolute magnetic encoder.
#[derive(Debug, Clone)]
pub struct SimAbsEncoder(Rc<RefCell<SimAbsEncoderState>>);

/// State of a [`SimAbsEncoder`].
#[derive(Debug, Clone)]
pub struct SimAbsEncoderState {
    /// Units: degrees
    pub raw_deg: f64,
    /// Units: degrees
    pub offset_deg: f64,
    pub range: AbsSensorRange,
}

/// Simulated relative encoder.
#[derive(Debug, Clone, Default)]
pub struct SimRelEncoder(Rc<RefCell<SimRelEncoderState>>);

/// State of a [`SimRelEncoder`].
#[derive(Debug, Clone, Default)]
pub struct SimRelEncoderState {
    /// Units: rotations
    pub position_rot: f64,
    /// Units: rotations/minute
    pub velocity_rpm: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimPosActuator {
    /// Snapshot of the actuator state.
    pub fn state(&self) -> SimPosActuatorState {
        self.0.borrow().clone()
    }

    /// Force the measured position of the motor.
    pub fn set_measured(&self, pos_rot: f64) {
        self.0.borrow_mut().position_rot = pos_rot;
    }

    /// Advance the motor by `dt_s`.
    ///
    /// Under closed-loop control the output is the proportional term clamped
    /// to the output range, and the motor moves at that fraction of its
    /// constrained max velocity.
    pub fn step(&self, dt_s: f64) {
        let mut s = self.0.borrow_mut();

        let output = match s.reference_rot {
            Some(r) => {
                let k_p = s.gains.map(|g| g.k_p).unwrap_or(0.0);
                (k_p * (r - s.position_rot)).max(s.output_min).min(s.output_max)
            }
            None => s.duty,
        };

        let max_vel_rps = s.constraints.map(|c| c.max_vel).unwrap_or(0.0) / 60.0;

        s.applied_output = output;
        s.position_rot += output * max_vel_rps * dt_s;
    }
}

impl PosActuator for SimPosActuator {
    fn configure_gains(&mut self, gains: &PidGains) {
        self.0.borrow_mut().gains = Some(*gains);
    }

    fn configure_constraints(&mut self, constraints: &MotionConstraints) {
        self.0.borrow_mut().constraints = Some(*constraints);
    }

    fn set_inverted(&mut self, inverted: bool) {
        self.0.borrow_mut().inverted = inverted;
    }

    fn set_reference(&mut self, pos_rot: f64) {
        let mut s = self.0.borrow_mut();
        s.reference_rot = Some(pos_rot);
        s.num_references += 1;
    }

    fn set_output_range(&mut self, min: f64, max: f64) {
        let mut s = self.0.borrow_mut();
        s.output_min = min;
        s.output_max = max;
    }

    fn set_duty(&mut self, duty: f64) {
        let mut s = self.0.borrow_mut();
        s.reference_rot = None;
        s.duty = clamp_sym(duty, 1.0);
        s.applied_output = s.duty;
    }

    fn set_position(&mut self, pos_rot: f64) {
        self.0.borrow_mut().position_rot = pos_rot;
    }

    fn position(&self) -> f64 {
        self.0.borrow().position_rot
    }

    fn applied_output(&self) -> f64 {
        self.0.borrow().applied_output
    }

    fn output_current_a(&self) -> f64 {
        self.0.borrow().applied_output.abs() * SIM_FULL_OUTPUT_CURRENT_A
    }

    fn bus_voltage_v(&self) -> f64 {
        SIM_BUS_VOLTAGE_V
    }
}

impl VoltageActuator for SimVoltageActuator {
    fn set_voltage(&mut self, voltage_v: f64) {
        *self.0.borrow_mut() = voltage_v;
    }

    fn voltage_v(&self) -> f64 {
        *self.0.borrow()
    }
}

impl SimBinaryActuator {
    /// Snapshot of the actuator state.
    pub fn state(&self) -> SimBinaryActuatorState {
        self.0.borrow().clone()
    }
}

impl BinaryActuator for SimBinaryActuator {
    fn open(&mut self) {
        let mut s = self.0.borrow_mut();
        s.is_open = Some(true);
        s.num_opens += 1;
    }

    fn close(&mut self) {
        let mut s = self.0.borrow_mut();
        s.is_open = Some(false);
        s.num_closes += 1;
    }
}

impl Default for SimAbsEncoder {
    fn default() -> Self {
        Self(Rc::new(RefCell::new(SimAbsEncoderState {
            raw_deg: 0.0,
            offset_deg: 0.0,
            range: AbsSensorRange::Unsigned,
        })))
    }
}

impl SimAbsEncoder {
    /// Snapshot of the encoder state.
    pub fn state(&self) -> SimAbsEncoderState {
        self.0.borrow().clone()
    }

    /// Set the raw magnet angle, before the offset is applied.
    pub fn set_raw_deg(&self, raw_deg: f64) {
        self.0.borrow_mut().raw_deg = raw_deg;
    }
}

impl AbsEncoder for SimAbsEncoder {
    fn configure_magnet_offset(&mut self, offset_deg: f64) {
        self.0.borrow_mut().offset_deg = offset_deg;
    }

    fn configure_range(&mut self, range: AbsSensorRange) {
        self.0.borrow_mut().range = range;
    }

    fn abs_position_deg(&self) -> f64 {
        let s = self.0.borrow();
        s.range.wrap_deg(s.raw_deg + s.offset_deg)
    }
}

impl SimRelEncoder {
    /// Snapshot of the encoder state.
    pub fn state(&self) -> SimRelEncoderState {
        self.0.borrow().clone()
    }

    pub fn set_velocity_rpm(&self, velocity_rpm: f64) {
        self.0.borrow_mut().velocity_rpm = velocity_rpm;
    }

    /// Integrate the velocity over `dt_s`.
    pub fn step(&self, dt_s: f64) {
        let mut s = self.0.borrow_mut();
        s.position_rot += s.velocity_rpm / 60.0 * dt_s;
    }
}

impl RelEncoder for SimRelEncoder {
    fn position(&self) -> f64 {
        self.0.borrow().position_rot
    }

    fn velocity(&self) -> f64 {
        self.0.borrow().velocity_rpm
    }

    fn set_position(&mut self, pos_rot: f64) {
        self.0.borrow_mut().position_rot = pos_rot;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_pos_actuator_handle_shared() {
        let handle = SimPosActuator::default();
        let mut act = handle.clone();

        act.configure_gains(&PidGains { k_p: 1.0, ..Default::default() });
        act.configure_constraints(&MotionConstraints { max_vel: 60.0, max_accel: 0.0 });
        act.set_output_range(-0.5, 0.5);
        act.set_reference(10.0);

        // Output saturates at the range and moves 0.5 rot/s
        handle.step(1.0);
        assert_eq!(handle.state().applied_output, 0.5);
        assert_eq!(act.position(), 0.5);
        assert_eq!(act.output_current_a(), 20.0);

        act.set_duty(0.0);
        handle.step(1.0);
        assert_eq!(act.position(), 0.5);
    }

    #[test]
    fn test_abs_encoder_offset_and_range() {
        let handle = SimAbsEncoder::default();
        let mut enc = handle.clone();

        handle.set_raw_deg(350.0);
        assert_eq!(enc.abs_position_deg(), 350.0);

        enc.configure_range(AbsSensorRange::Signed);
        assert_eq!(enc.abs_position_deg(), -10.0);

        enc.configure_magnet_offset(-20.0);
        assert_eq!(enc.abs_position_deg(), -30.0);
    }
}
