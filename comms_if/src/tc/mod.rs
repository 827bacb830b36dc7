//! # Telecommand module
//!
//! This module provides telecommand functionality to the communications
//! interface.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod arm_ctrl;
pub mod swerve_ctrl;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Internal
use arm_ctrl::ArmCmd;
use swerve_ctrl::SwerveCmd;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A telecommand, i.e. an instruction sent to the robot by an operator or a
/// script.
///
/// Serialised as `{"type": <TYPE>, "payload": <PAYLOAD>}`, where types without
/// a payload omit the `payload` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Tc {
    #[serde(rename = "SAFE")]
    MakeSafe,

    #[serde(rename = "UNSAFE")]
    MakeUnsafe,

    #[serde(rename = "ARM")]
    ArmCtrl(ArmCmd),

    #[serde(rename = "SWERVE")]
    SwerveCtrl(SwerveCmd),
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum TcParseError {
    #[error("TC contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Tc {
    /// Parse a new TC from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, TcParseError> {
        let tc: Self = serde_json::from_str(json_str).map_err(TcParseError::InvalidJson)?;

        trace!("Parsed TC {:?}", tc);

        Ok(tc)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use arm_ctrl::ArmPose;

    #[test]
    fn test_from_json() {
        assert_eq!(Tc::from_json(r#"{"type": "SAFE"}"#).unwrap(), Tc::MakeSafe);

        assert_eq!(
            Tc::from_json(r#"{"type": "ARM", "payload": {"sequenced": {"pose": "LOW_SCORE"}}}"#)
                .unwrap(),
            Tc::ArmCtrl(ArmCmd::Sequenced {
                pose: ArmPose::LowScore
            })
        );

        assert_eq!(
            Tc::from_json(r#"{"type": "ARM", "payload": "toggle_side"}"#).unwrap(),
            Tc::ArmCtrl(ArmCmd::ToggleSide)
        );

        assert_eq!(
            Tc::from_json(
                r#"{"type": "SWERVE", "payload": {"set_state": {"speed_ms": 1.0, "heading_rad": 0.5}}}"#
            )
            .unwrap(),
            Tc::SwerveCtrl(SwerveCmd::SetState {
                speed_ms: 1.0,
                heading_rad: 0.5
            })
        );

        assert!(Tc::from_json(r#"{"type": "MNVR"}"#).is_err());
        assert!(Tc::from_json(r#"{"type": "ARM", "payload": {"sequenced": {"pose": "UP"}}}"#)
            .is_err());
    }
}
