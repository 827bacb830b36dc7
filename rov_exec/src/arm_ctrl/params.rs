//! Parameters structure for ArmCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::mech::{MotionConstraints, PidGains};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ArmCtrlError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Arm control.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Params {
    // ---- POSES ----
    /// The pose table, mapping each pose name to its
    /// `[major angle, minor angle, minor output limit]`.
    ///
    /// Every pose must be present, this is checked when `ArmCtrl` is
    /// initialised.
    ///
    /// Units: degrees, degrees, normalised output
    pub poses: BTreeMap<String, Vec<f64>>,

    // ---- STAGING ----
    /// Output limit of the major joint when it is allowed to lead a
    /// transition.
    pub major_first_stage_output_limit: f64,

    /// Output limit of the major joint when it is held back during a
    /// transition. This is also the major joint's final limit.
    pub major_second_stage_output_limit: f64,

    /// Output limit of the minor joint when it is allowed to lead a
    /// transition.
    pub minor_first_stage_output_limit: f64,

    /// Output limit of the minor joint when it is held back during a
    /// transition. This is also the minor joint's final limit.
    pub minor_second_stage_output_limit: f64,

    // ---- JOINTS ----
    pub major_joint: JointParams,

    pub minor_joint: JointParams,
}

/// Parameters for a single joint segment.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct JointParams {
    /// Closed-loop gains configured on both motors of the joint.
    pub gains: PidGains,

    /// Motion profile constraints configured on both motors of the joint.
    pub constraints: MotionConstraints,

    /// Motor rotations per degree of joint rotation, including the gearbox.
    ///
    /// Units: rotations/degree
    pub rot_per_deg: f64,

    /// True if the follower motor is mounted mirrored to the primary.
    #[serde(default)]
    pub follower_inverted: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Check the parameters which aren't covered by the pose table.
    pub fn validate(&self) -> Result<(), ArmCtrlError> {
        let limits = [
            ("major_first_stage_output_limit", self.major_first_stage_output_limit),
            ("major_second_stage_output_limit", self.major_second_stage_output_limit),
            ("minor_first_stage_output_limit", self.minor_first_stage_output_limit),
            ("minor_second_stage_output_limit", self.minor_second_stage_output_limit),
        ];

        for (name, limit) in limits.iter() {
            if !(limit.is_finite() && *limit >= 0.0) {
                return Err(ArmCtrlError::InvalidParams(format!(
                    "{} must be finite and non-negative, found {}",
                    name, limit
                )));
            }
        }

        for (name, joint) in [("major", &self.major_joint), ("minor", &self.minor_joint)].iter() {
            if !(joint.rot_per_deg.is_finite() && joint.rot_per_deg != 0.0) {
                return Err(ArmCtrlError::InvalidParams(format!(
                    "{} joint rot_per_deg must be finite and non-zero, found {}",
                    name, joint.rot_per_deg
                )));
            }
        }

        Ok(())
    }
}
