//! Arm sequencing scenarios run against the simulated arm.

use std::collections::BTreeMap;

use comms_if::{
    eqpt::mech::{MotionConstraints, PidGains},
    tm::NullTmSink,
};
use rov_lib::{
    arm_ctrl::{ArmCmd, ArmCtrl, ArmPose, GripperState, InputData, JointParams, Params, Side},
    sim::SimArm,
    CYCLE_PERIOD_S,
};
use util::module::State;

fn joint_params() -> JointParams {
    JointParams {
        gains: PidGains { k_p: 0.05, k_i: 0.0, k_d: 0.0, i_zone: 0.0 },
        constraints: MotionConstraints { max_vel: 6000.0, max_accel: 12000.0 },
        rot_per_deg: 1.0,
        follower_inverted: true,
    }
}

fn table(entries: &[(&str, [f64; 3])]) -> BTreeMap<String, Vec<f64>> {
    let mut poses: BTreeMap<String, Vec<f64>> = ArmPose::ALL
        .iter()
        .map(|p| (p.name().to_string(), vec![45.0, 45.0, 0.25]))
        .collect();

    for (name, values) in entries {
        poses.insert(name.to_string(), values.to_vec());
    }

    poses
}

/// Run the arm until it reports being at target, returning the number of cycles taken and
/// whether the limits were ever staged on the way.
fn run_to_target(arm: &mut ArmCtrl, sim: &SimArm, max_cycles: usize) -> Option<(usize, bool)> {
    let mut staged = false;

    for cycle in 0..max_cycles {
        let (_, rpt) = arm.proc(&InputData::default()).unwrap();
        staged |= rpt.limits_staged;

        if rpt.at_target && rpt.major_at_target && rpt.minor_at_target {
            assert!(!rpt.limits_staged);
            return Some((cycle, staged));
        }

        sim.step(CYCLE_PERIOD_S);
    }

    None
}

#[test]
fn test_low_score_limits() {
    let params = Params {
        poses: table(&[("TUCKED", [0.0, 0.0, 5.0]), ("LOW_SCORE", [30.0, 60.0, 20.0])]),
        major_first_stage_output_limit: 50.0,
        major_second_stage_output_limit: 20.0,
        minor_first_stage_output_limit: 40.0,
        minor_second_stage_output_limit: 30.0,
        major_joint: joint_params(),
        minor_joint: joint_params(),
    };

    let sim = SimArm::default();
    let mut arm = ArmCtrl::init((params, sim.eqpt())).unwrap();
    sim.major_primary.set_measured(-100.0);
    sim.minor_primary.set_measured(-100.0);

    arm.open_gripper();
    arm.set_sequenced_arm_state(ArmPose::LowScore);

    assert_eq!(arm.minor_arm().max_output(), 40.0);
    assert_eq!(arm.major_arm().max_output(), 20.0);
    assert_eq!(arm.target_theta(), (30.0, 60.0));
    assert_eq!(arm.gripper_state(), Some(GripperState::Open));
    assert_eq!(sim.gripper.state().num_closes, 1);

    // Pushed to both motors of each joint
    assert_eq!(sim.minor_follower.state().output_max, 40.0);
    assert_eq!(sim.major_follower.state().reference_rot, Some(30.0));

    // Unsequenced out of LOW_SCORE takes its minor limit
    arm.set_unsequenced_arm_state(ArmPose::Tucked);
    assert_eq!(arm.minor_arm().max_output(), 20.0);
    assert_eq!(sim.gripper.state().num_closes, 2);
    assert_eq!(arm.gripper_state(), Some(GripperState::Closed));
}

#[test]
fn test_scoring_cycle_in_sim() {
    let params = Params {
        poses: table(&[
            ("TUCKED", [0.0, 0.0, 0.2]),
            ("LOW_SCORE", [30.0, 60.0, 0.3]),
            ("HIGH_SCORE", [80.0, 140.0, 0.3]),
        ]),
        major_first_stage_output_limit: 0.5,
        major_second_stage_output_limit: 0.2,
        minor_first_stage_output_limit: 0.4,
        minor_second_stage_output_limit: 0.3,
        major_joint: joint_params(),
        minor_joint: joint_params(),
    };

    let sim = SimArm::default();
    let mut arm = ArmCtrl::init((params, sim.eqpt())).unwrap();

    // Already tucked
    let (cycles, staged) = run_to_target(&mut arm, &sim, 10).unwrap();
    assert_eq!(cycles, 0);
    assert!(!staged);

    // Out to the high score pose, staged on the way
    arm.proc(&InputData {
        cmds: vec![ArmCmd::Sequenced { pose: ArmPose::HighScore }],
    })
    .unwrap();
    let (_, staged) = run_to_target(&mut arm, &sim, 1000).unwrap();
    assert!(staged);
    assert!(arm.get_at_target(5.0));

    // Mirror to the back, target angles don't change but the motors go the other way
    arm.proc(&InputData { cmds: vec![ArmCmd::ToggleSide] }).unwrap();
    assert_eq!(arm.side(), Side::Back);
    assert_eq!(arm.target_theta(), (80.0, 140.0));
    assert!(!arm.get_at_target(5.0));

    run_to_target(&mut arm, &sim, 2000).unwrap();
    assert!(sim.major_primary.state().position_rot <= -75.0);
    assert!(sim.minor_primary.state().position_rot <= -135.0);

    // Tuck again
    arm.proc(&InputData {
        cmds: vec![ArmCmd::Sequenced { pose: ArmPose::Tucked }],
    })
    .unwrap();
    run_to_target(&mut arm, &sim, 2000).unwrap();
    assert_eq!(arm.arm_state(), ArmPose::Tucked);
    assert_eq!(sim.gripper.state().num_closes, 2);

    arm.write_tm(&mut NullTmSink);
}

#[test]
fn test_disabled_arm_holds_still() {
    let params = Params {
        poses: table(&[("TUCKED", [0.0, 0.0, 0.2])]),
        major_first_stage_output_limit: 0.5,
        major_second_stage_output_limit: 0.2,
        minor_first_stage_output_limit: 0.4,
        minor_second_stage_output_limit: 0.3,
        major_joint: joint_params(),
        minor_joint: joint_params(),
    };

    let sim = SimArm::default();
    let mut arm = ArmCtrl::init((params, sim.eqpt())).unwrap();

    arm.proc(&InputData { cmds: vec![ArmCmd::ToggleMotors] }).unwrap();
    arm.proc(&InputData {
        cmds: vec![ArmCmd::Sequenced { pose: ArmPose::MidScore }],
    })
    .unwrap();

    assert!(run_to_target(&mut arm, &sim, 100).is_none());
    assert_eq!(sim.major_primary.state().position_rot, 0.0);

    // Re-enabling sends the held back reference
    arm.proc(&InputData { cmds: vec![ArmCmd::ToggleMotors] }).unwrap();
    assert_eq!(sim.major_primary.state().reference_rot, Some(45.0));
    assert!(run_to_target(&mut arm, &sim, 1000).is_some());
}
