//! Arm control module
//!
//! Drives a two-joint arm (a major joint at the shoulder and a minor joint at
//! the elbow, each driven by a primary and a mirrored follower motor) and a
//! gripper between a fixed set of named poses.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod gripper;
mod joint_segment;
mod params;
mod pose_table;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use comms_if::tc::arm_ctrl::{ArmCmd, ArmPose};
pub use gripper::*;
pub use joint_segment::*;
pub use params::*;
pub use pose_table::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of values stored against each pose in the parameter file:
/// major angle, minor angle, minor output limit.
pub const NUM_POSE_VALUES: usize = 3;

/// Deadband within which either joint being at its target ends the staged
/// output limit window.
///
/// Units: degrees
pub const STAGE_END_DEADBAND_DEG: f64 = 10.0;

/// Deadband used for the whole arm at-target status.
///
/// Units: degrees
pub const ARM_AT_TARGET_DEADBAND_DEG: f64 = 8.0;

/// Deadband used for the per-joint at-target status.
///
/// Units: degrees
pub const JOINT_AT_TARGET_DEADBAND_DEG: f64 = 5.0;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during ArmCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum ArmCtrlError {
    #[error(
        "Pose {0} does not have {} values in the pose table (found {1}), \
        every pose must be fully defined",
        NUM_POSE_VALUES
    )]
    IncompletePoseTable(ArmPose, usize),

    #[error("Pose {0} has a non-finite value in the pose table")]
    NonFinitePoseValue(ArmPose),

    #[error("The pose table contains an unknown pose \"{0}\"")]
    UnknownPose(String),

    #[error("Invalid arm parameter: {0}")]
    InvalidParams(String),

    #[error("Could not load the arm parameters: {0}")]
    Params(#[from] util::params::LoadError),
}
