//! Implementations for the ArmCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};
use serde::Serialize;

// Internal
use super::{
    ArmCmd, ArmCtrlError, ArmPose, Gripper, GripperState, JointSegment, Params, PoseTable,
    ARM_AT_TARGET_DEADBAND_DEG, JOINT_AT_TARGET_DEADBAND_DEG, STAGE_END_DEADBAND_DEG,
};
use comms_if::{
    eqpt::mech::{BinaryActuator, PosActuator},
    tm::TmSink,
};
use util::module::State;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Arm control module state
pub struct ArmCtrl {
    params: Params,

    pose_table: PoseTable,

    /// The pose the arm was last commanded to.
    arm_state: ArmPose,

    side: Side,

    major_arm: JointSegment,

    minor_arm: JointSegment,

    gripper: Gripper,
}

/// The equipment driven by ArmCtrl.
pub struct ArmEqpt {
    pub major_primary: Box<dyn PosActuator>,
    pub major_follower: Box<dyn PosActuator>,
    pub minor_primary: Box<dyn PosActuator>,
    pub minor_follower: Box<dyn PosActuator>,
    pub gripper: Box<dyn BinaryActuator>,
}

/// Input data to Arm Control.
#[derive(Debug, Default, Clone)]
pub struct InputData {
    /// Commands received this cycle, executed in order.
    pub cmds: Vec<ArmCmd>,
}

/// Output of Arm Control, a summary of what the joints are being asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArmOutput {
    pub pose: ArmPose,
    pub side: Side,

    /// Units: degrees
    pub major_target_deg: f64,
    /// Units: degrees
    pub minor_target_deg: f64,

    pub major_max_output: f64,
    pub minor_max_output: f64,

    pub motors_enabled: bool,
}

/// Status report for ArmCtrl processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatusReport {
    /// Both joints within the arm deadband of their targets.
    pub at_target: bool,
    pub major_at_target: bool,
    pub minor_at_target: bool,

    /// True while either joint is still running on a staged output limit.
    pub limits_staged: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The face of the robot the arm currently treats as the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Front,
    Back,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Side {
    /// Direction convention the joints use on this side.
    pub fn sign(self) -> f64 {
        match self {
            Side::Front => 1.0,
            Side::Back => -1.0,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Side::Front => Side::Back,
            Side::Back => Side::Front,
        }
    }
}

impl State for ArmCtrl {
    type InitData = (Params, ArmEqpt);
    type InitError = ArmCtrlError;

    type InputData = InputData;
    type OutputData = ArmOutput;
    type StatusReport = StatusReport;
    type ProcError = ArmCtrlError;

    /// Initialise the ArmCtrl module.
    ///
    /// The pose table is validated before any equipment is touched, an
    /// incomplete table is a fatal error. On success the arm has been
    /// commanded to `TUCKED` on the front side.
    fn init(init_data: Self::InitData) -> Result<Self, Self::InitError> {
        let (params, eqpt) = init_data;

        let pose_table = PoseTable::from_raw(&params.poses)?;
        params.validate()?;

        let major_arm = JointSegment::new(
            "major",
            eqpt.major_primary,
            eqpt.major_follower,
            &params.major_joint,
            params.major_second_stage_output_limit,
        );

        let minor_arm = JointSegment::new(
            "minor",
            eqpt.minor_primary,
            eqpt.minor_follower,
            &params.minor_joint,
            params.minor_second_stage_output_limit,
        );

        let mut arm_ctrl = Self {
            params,
            pose_table,
            arm_state: ArmPose::Tucked,
            side: Side::Front,
            major_arm,
            minor_arm,
            gripper: Gripper::new(eqpt.gripper),
        };

        arm_ctrl.set_sequenced_arm_state(ArmPose::Tucked);

        info!("ArmCtrl initialised in {}", arm_ctrl.arm_state);

        Ok(arm_ctrl)
    }

    /// Perform cyclic processing of Arm Control.
    ///
    /// Executes each new command in the order received, then re-evaluates
    /// the staged output limits against the measured joint angles.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        for cmd in input_data.cmds.iter() {
            debug!("New ArmCtrl ArmCmd::{:?}", cmd);
            self.exec(*cmd);
        }

        self.update_output_limit();

        Ok((self.output(), self.status_report()))
    }
}

impl ArmCtrl {
    /// Execute a single arm command.
    pub fn exec(&mut self, cmd: ArmCmd) {
        match cmd {
            ArmCmd::Sequenced { pose } => self.set_sequenced_arm_state(pose),
            ArmCmd::Unsequenced { pose } => self.set_unsequenced_arm_state(pose),
            ArmCmd::ToggleSide => self.toggle_side(),
            ArmCmd::ToggleMotors => self.toggle_arm_motors(),
            ArmCmd::ZeroArms => self.zero_arms(),
            ArmCmd::OpenGripper => self.open_gripper(),
            ArmCmd::CloseGripper => self.close_gripper(),
        }
    }

    /// Function called when entering safe mode.
    ///
    /// Disables closed-loop output on both joints, leaving them unpowered.
    pub fn make_safe(&mut self) {
        for joint in [&mut self.major_arm, &mut self.minor_arm].iter_mut() {
            if joint.motors_enabled() {
                joint.toggle_motors();
            }
        }
    }

    /// Move to `pose` without staging.
    ///
    /// The minor joint takes the output limit stored against the pose the
    /// arm is leaving.
    pub fn set_unsequenced_arm_state(&mut self, pose: ArmPose) {
        self.minor_arm
            .set_max_output(self.pose_table.get(self.arm_state).minor_output_limit);

        self.set_target_arm_state(pose);
    }

    /// Move to `pose` with staged output limits.
    ///
    /// Moving out to any pose lets the minor joint lead while the major joint
    /// is held back. Tucking reverses this so the major joint leads.
    pub fn set_sequenced_arm_state(&mut self, pose: ArmPose) {
        if pose != ArmPose::Tucked {
            self.minor_arm
                .set_max_output(self.params.minor_first_stage_output_limit);
            self.major_arm
                .set_max_output(self.params.major_second_stage_output_limit);
        }
        else {
            self.minor_arm
                .set_max_output(self.params.minor_second_stage_output_limit);
            self.major_arm
                .set_max_output(self.params.major_first_stage_output_limit);
        }

        self.set_target_arm_state(pose);
    }

    /// Record `pose` as the current state and send its angles to both
    /// joints.
    ///
    /// Tucking always closes the gripper. The gripper is never opened here.
    pub fn set_target_arm_state(&mut self, pose: ArmPose) {
        debug!("ArmCtrl {} -> {}", self.arm_state, pose);

        self.arm_state = pose;

        if pose == ArmPose::Tucked {
            self.gripper.close();
        }

        let entry = *self.pose_table.get(pose);

        self.major_arm.set_target_theta(entry.major_deg);
        self.minor_arm.set_target_theta(entry.minor_deg);

        self.major_arm.set_reference();
        self.minor_arm.set_reference();
    }

    /// End the staged limit window once either joint is close to its target.
    ///
    /// Evaluated every cycle from the measured angles.
    pub fn update_output_limit(&mut self) {
        if self.major_arm.get_at_target(STAGE_END_DEADBAND_DEG)
            || self.minor_arm.get_at_target(STAGE_END_DEADBAND_DEG)
        {
            self.minor_arm
                .set_max_output(self.params.minor_second_stage_output_limit);
            self.major_arm
                .set_max_output(self.params.major_second_stage_output_limit);
        }
    }

    /// Swap the dominant side of the robot, mirroring both joints.
    pub fn toggle_side(&mut self) {
        self.side = self.side.toggled();

        debug!("ArmCtrl side now {:?}", self.side);

        self.major_arm.set_sign(self.side.sign());
        self.minor_arm.set_sign(self.side.sign());
        self.major_arm.set_reference();
        self.minor_arm.set_reference();
    }

    pub fn toggle_arm_motors(&mut self) {
        self.minor_arm.toggle_motors();
        self.major_arm.toggle_motors();
    }

    pub fn zero_arms(&mut self) {
        self.minor_arm.reset_zeros();
        self.major_arm.reset_zeros();
    }

    pub fn open_gripper(&mut self) {
        self.gripper.open();
    }

    pub fn close_gripper(&mut self) {
        self.gripper.close();
    }

    // ---- ACCESSORS ----

    /// True if both joints are within `deadband_deg` of their targets.
    pub fn get_at_target(&self, deadband_deg: f64) -> bool {
        self.major_arm.get_at_target(deadband_deg) && self.minor_arm.get_at_target(deadband_deg)
    }

    pub fn arm_state(&self) -> ArmPose {
        self.arm_state
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn is_front(&self) -> bool {
        self.side == Side::Front
    }

    /// Target angles of the (major, minor) joints.
    ///
    /// Units: degrees
    pub fn target_theta(&self) -> (f64, f64) {
        (self.major_arm.target_theta(), self.minor_arm.target_theta())
    }

    pub fn major_arm(&self) -> &JointSegment {
        &self.major_arm
    }

    pub fn minor_arm(&self) -> &JointSegment {
        &self.minor_arm
    }

    pub fn gripper_state(&self) -> Option<GripperState> {
        self.gripper.state()
    }

    /// Publish the arm telemetry.
    pub fn write_tm(&self, sink: &mut dyn TmSink) {
        sink.put_string("ArmState", self.arm_state.name());
        sink.put_bool("ArmIsFront", self.is_front());

        sink.put_number("major target", self.major_arm.target_theta());
        sink.put_number("minor target", self.minor_arm.target_theta());

        sink.put_number("major real theta", self.major_arm.real_theta());
        sink.put_number("minor real theta", self.minor_arm.real_theta());

        sink.put_number("major primary real theta", self.major_arm.primary_real_theta());
        sink.put_number("major follower real theta", self.major_arm.follower_real_theta());
        sink.put_number("minor primary real theta", self.minor_arm.primary_real_theta());
        sink.put_number("minor follower real theta", self.minor_arm.follower_real_theta());

        sink.put_number("major power draw", self.major_arm.power_draw_w());
        sink.put_number("minor power draw", self.minor_arm.power_draw_w());

        sink.put_bool("At target", self.get_at_target(ARM_AT_TARGET_DEADBAND_DEG));
        sink.put_bool(
            "At target major",
            self.major_arm.get_at_target(JOINT_AT_TARGET_DEADBAND_DEG),
        );
        sink.put_bool(
            "At target minor",
            self.minor_arm.get_at_target(JOINT_AT_TARGET_DEADBAND_DEG),
        );

        sink.put_number("PrimaryMajorOutput", self.major_arm.primary_output());
        sink.put_number("FollowerMajorOutput", self.major_arm.follower_output());
    }

    // ---- PRIVATE ----

    fn output(&self) -> ArmOutput {
        let (major_target_deg, minor_target_deg) = self.target_theta();

        ArmOutput {
            pose: self.arm_state,
            side: self.side,
            major_target_deg,
            minor_target_deg,
            major_max_output: self.major_arm.max_output(),
            minor_max_output: self.minor_arm.max_output(),
            motors_enabled: self.major_arm.motors_enabled() && self.minor_arm.motors_enabled(),
        }
    }

    fn status_report(&self) -> StatusReport {
        StatusReport {
            at_target: self.get_at_target(ARM_AT_TARGET_DEADBAND_DEG),
            major_at_target: self.major_arm.get_at_target(JOINT_AT_TARGET_DEADBAND_DEG),
            minor_at_target: self.minor_arm.get_at_target(JOINT_AT_TARGET_DEADBAND_DEG),
            limits_staged: self.major_arm.max_output() != self.params.major_second_stage_output_limit
                || self.minor_arm.max_output() != self.params.minor_second_stage_output_limit,
        }
    }
}
