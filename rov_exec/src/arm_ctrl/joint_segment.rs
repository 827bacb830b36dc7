//! Joint segment
//!
//! One mechanical joint driven by two motors, a primary and a follower. Both
//! motors are owned here and always receive the same reference and output
//! limit, so they can't drift out of sync through caller error.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};

// Internal
use super::JointParams;
use comms_if::eqpt::mech::PosActuator;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Closed-loop position control of a single dual-motor joint.
pub struct JointSegment {
    /// Name used in logs.
    name: &'static str,

    primary: Box<dyn PosActuator>,

    follower: Box<dyn PosActuator>,

    /// Units: rotations/degree
    rot_per_deg: f64,

    /// Units: degrees
    target_theta_deg: f64,

    /// Closed-loop output is clamped to `[-max_output, max_output]`.
    max_output: f64,

    /// Either +1 or -1, selects the mechanical direction convention.
    sign: f64,

    motors_enabled: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl JointSegment {
    /// Create a new joint, configuring gains and motion constraints on both
    /// motors.
    ///
    /// No reference is sent until [`JointSegment::set_reference`] is called.
    pub fn new(
        name: &'static str,
        mut primary: Box<dyn PosActuator>,
        mut follower: Box<dyn PosActuator>,
        params: &JointParams,
        max_output: f64,
    ) -> Self {
        primary.set_inverted(false);
        follower.set_inverted(params.follower_inverted);

        for motor in [&mut primary, &mut follower].iter_mut() {
            motor.configure_gains(&params.gains);
            motor.configure_constraints(&params.constraints);
        }

        let mut joint = Self {
            name,
            primary,
            follower,
            rot_per_deg: params.rot_per_deg,
            target_theta_deg: 0.0,
            max_output: 0.0,
            sign: 1.0,
            motors_enabled: true,
        };

        joint.set_max_output(max_output);

        joint
    }

    /// Set the target angle of the joint.
    ///
    /// The motors are not commanded until [`JointSegment::set_reference`] is
    /// called.
    pub fn set_target_theta(&mut self, theta_deg: f64) {
        self.target_theta_deg = theta_deg;
    }

    /// Push the target angle, in the current direction convention, to both
    /// motors.
    ///
    /// Does nothing while the motors are disabled.
    pub fn set_reference(&mut self) {
        if !self.motors_enabled {
            trace!("{} joint disabled, reference not sent", self.name);
            return;
        }

        let ref_rot = self.sign * self.target_theta_deg * self.rot_per_deg;

        self.apply_output_range();
        self.primary.set_reference(ref_rot);
        self.follower.set_reference(ref_rot);

        trace!(
            "{} joint reference {:.3} deg ({:.3} rot), max output {:.3}",
            self.name,
            self.sign * self.target_theta_deg,
            ref_rot,
            self.max_output
        );
    }

    /// Set the output ceiling of the closed-loop controllers.
    pub fn set_max_output(&mut self, limit: f64) {
        self.max_output = limit.abs();
        self.apply_output_range();
    }

    /// Set the direction convention, `+1` or `-1`. Any non-negative value is
    /// treated as `+1`.
    ///
    /// The motors are not re-commanded, call [`JointSegment::set_reference`]
    /// afterwards.
    pub fn set_sign(&mut self, sign: f64) {
        self.sign = if sign < 0.0 { -1.0 } else { 1.0 };
    }

    /// True if the measured angle is within `deadband_deg` of the target.
    pub fn get_at_target(&self, deadband_deg: f64) -> bool {
        (self.real_theta() - self.target_theta_deg).abs() <= deadband_deg
    }

    /// Enable or disable closed-loop output.
    ///
    /// Disabling commands zero output open-loop. Enabling re-sends the
    /// current reference.
    pub fn toggle_motors(&mut self) {
        self.motors_enabled = !self.motors_enabled;

        if self.motors_enabled {
            debug!("{} joint motors enabled", self.name);
            self.set_reference();
        }
        else {
            debug!("{} joint motors disabled", self.name);
            self.primary.set_duty(0.0);
            self.follower.set_duty(0.0);
        }
    }

    /// Redefine the current position of both motors as zero.
    pub fn reset_zeros(&mut self) {
        debug!("{} joint zeroed at {:.3} deg", self.name, self.real_theta());
        self.primary.set_position(0.0);
        self.follower.set_position(0.0);
    }

    // ---- ACCESSORS ----

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Units: degrees
    pub fn target_theta(&self) -> f64 {
        self.target_theta_deg
    }

    pub fn max_output(&self) -> f64 {
        self.max_output
    }

    pub fn sign(&self) -> f64 {
        self.sign
    }

    pub fn motors_enabled(&self) -> bool {
        self.motors_enabled
    }

    /// Measured angle of the joint, taken from the primary motor.
    ///
    /// Units: degrees
    pub fn real_theta(&self) -> f64 {
        self.primary_real_theta()
    }

    /// Units: degrees
    pub fn primary_real_theta(&self) -> f64 {
        self.motor_theta(self.primary.position())
    }

    /// Units: degrees
    pub fn follower_real_theta(&self) -> f64 {
        self.motor_theta(self.follower.position())
    }

    pub fn primary_output(&self) -> f64 {
        self.primary.applied_output()
    }

    pub fn follower_output(&self) -> f64 {
        self.follower.applied_output()
    }

    /// Combined power drawn by both motors.
    ///
    /// Units: watts
    pub fn power_draw_w(&self) -> f64 {
        [&self.primary, &self.follower]
            .iter()
            .map(|m| m.bus_voltage_v() * m.output_current_a())
            .sum()
    }

    // ---- PRIVATE ----

    fn motor_theta(&self, pos_rot: f64) -> f64 {
        self.sign * pos_rot / self.rot_per_deg
    }

    fn apply_output_range(&mut self) {
        let limit = self.max_output;
        self.primary.set_output_range(-limit, limit);
        self.follower.set_output_range(-limit, limit);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim::SimPosActuator;
    use comms_if::eqpt::mech::{MotionConstraints, PidGains};

    fn joint() -> (JointSegment, SimPosActuator, SimPosActuator) {
        let primary = SimPosActuator::default();
        let follower = SimPosActuator::default();
        let params = JointParams {
            gains: PidGains { k_p: 0.1, k_i: 0.0, k_d: 0.0, i_zone: 0.0 },
            constraints: MotionConstraints { max_vel: 3000.0, max_accel: 6000.0 },
            rot_per_deg: 0.5,
            follower_inverted: true,
        };

        let j = JointSegment::new(
            "test",
            Box::new(primary.clone()),
            Box::new(follower.clone()),
            &params,
            0.3,
        );

        (j, primary, follower)
    }

    #[test]
    fn test_construction_configures_both_motors() {
        let (j, primary, follower) = joint();

        for (s, inverted) in [(primary.state(), false), (follower.state(), true)].iter() {
            assert_eq!(s.gains.map(|g| g.k_p), Some(0.1));
            assert_eq!(s.constraints.map(|c| c.max_vel), Some(3000.0));
            assert_eq!(s.inverted, *inverted);
            assert_eq!((s.output_min, s.output_max), (-0.3, 0.3));
            assert_eq!(s.reference_rot, None);
        }
        assert_eq!(j.max_output(), 0.3);
        assert_eq!(j.sign(), 1.0);
    }

    #[test]
    fn test_target_and_reference() {
        let (mut j, primary, follower) = joint();

        j.set_target_theta(40.0);
        assert_eq!(primary.state().reference_rot, None);

        j.set_reference();
        assert_eq!(primary.state().reference_rot, Some(20.0));
        assert_eq!(follower.state().reference_rot, Some(20.0));

        j.set_max_output(0.8);
        assert_eq!(primary.state().output_max, 0.8);
        assert_eq!(follower.state().output_min, -0.8);

        j.set_sign(-1.0);
        assert_eq!(primary.state().reference_rot, Some(20.0));
        j.set_reference();
        assert_eq!(primary.state().reference_rot, Some(-20.0));
        assert_eq!(follower.state().reference_rot, Some(-20.0));
        assert_eq!(j.target_theta(), 40.0);
    }

    #[test]
    fn test_at_target() {
        let (mut j, primary, _) = joint();

        j.set_target_theta(40.0);
        primary.set_measured(17.5);
        assert_eq!(j.real_theta(), 35.0);
        assert!(j.get_at_target(5.0));
        assert!(!j.get_at_target(4.9));

        // Measured angles follow the direction convention
        j.set_sign(-1.0);
        assert_eq!(j.real_theta(), -35.0);
        assert!(!j.get_at_target(5.0));
        primary.set_measured(-20.0);
        assert!(j.get_at_target(0.0));
    }

    #[test]
    fn test_toggle_motors() {
        let (mut j, primary, follower) = joint();

        j.set_target_theta(10.0);
        j.set_reference();
        assert_eq!(primary.state().num_references, 1);

        j.toggle_motors();
        assert!(!j.motors_enabled());
        assert_eq!(primary.state().reference_rot, None);
        assert_eq!(follower.state().duty, 0.0);

        // References are held back while disabled
        j.set_target_theta(20.0);
        j.set_reference();
        assert_eq!(primary.state().num_references, 1);

        j.toggle_motors();
        assert!(j.motors_enabled());
        assert_eq!(primary.state().reference_rot, Some(10.0));
        assert_eq!(follower.state().num_references, 2);
    }

    #[test]
    fn test_reset_zeros_and_diagnostics() {
        let (mut j, primary, follower) = joint();

        primary.set_measured(4.0);
        follower.set_measured(4.5);
        assert_eq!(j.primary_real_theta(), 8.0);
        assert_eq!(j.follower_real_theta(), 9.0);

        j.reset_zeros();
        assert_eq!(j.primary_real_theta(), 0.0);
        assert_eq!(j.follower_real_theta(), 0.0);

        j.set_target_theta(100.0);
        j.set_reference();
        primary.step(0.02);
        follower.step(0.02);
        assert_eq!(j.primary_output(), 0.3);
        assert_eq!(j.follower_output(), 0.3);
        assert!((j.power_draw_w() - 2.0 * 12.0 * 12.0).abs() < 1e-9);
    }
}
