//! # Arm control telecommands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::fmt;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Named target configurations of the arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArmPose {
    /// Arm folded inside the frame perimeter, gripper closed.
    Tucked,
    LowScore,
    MidScore,
    HighScore,
    LowIntake,
    MidIntake,
    HighIntake,
}

/// A command that can be completed by arm control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmCmd {
    /// Move to the pose with the joint output limits staged so the joints
    /// don't fight the frame or each other.
    Sequenced { pose: ArmPose },

    /// Move to the pose without staging the output limits.
    Unsequenced { pose: ArmPose },

    /// Swap which face of the robot the arm treats as the front.
    ToggleSide,

    /// Enable or disable closed-loop output on both joints.
    ToggleMotors,

    /// Redefine the current joint positions as zero.
    ZeroArms,

    OpenGripper,

    CloseGripper,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ArmPose {
    /// Number of poses.
    pub const COUNT: usize = 7;

    /// Every pose, in declaration order.
    pub const ALL: [ArmPose; ArmPose::COUNT] = [
        ArmPose::Tucked,
        ArmPose::LowScore,
        ArmPose::MidScore,
        ArmPose::HighScore,
        ArmPose::LowIntake,
        ArmPose::MidIntake,
        ArmPose::HighIntake,
    ];

    /// Position of this pose in [`ArmPose::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The name of the pose as used in parameter files and telecommands.
    pub fn name(self) -> &'static str {
        match self {
            ArmPose::Tucked => "TUCKED",
            ArmPose::LowScore => "LOW_SCORE",
            ArmPose::MidScore => "MID_SCORE",
            ArmPose::HighScore => "HIGH_SCORE",
            ArmPose::LowIntake => "LOW_INTAKE",
            ArmPose::MidIntake => "MID_INTAKE",
            ArmPose::HighIntake => "HIGH_INTAKE",
        }
    }
}

impl fmt::Display for ArmPose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_pose_index() {
        for (i, pose) in ArmPose::ALL.iter().enumerate() {
            assert_eq!(pose.index(), i);
        }
    }

    #[test]
    fn test_pose_name_matches_serde() {
        for pose in ArmPose::ALL.iter() {
            assert_eq!(
                serde_json::to_string(pose).unwrap(),
                format!("\"{}\"", pose.name())
            );
        }
    }
}
