//! Pose table
//!
//! The raw table loaded from the parameter file is keyed by name and may be
//! incomplete. It is converted once, at start up, into a [`PoseTable`] which
//! holds exactly one entry for every [`ArmPose`], so lookups during operation
//! can't fail.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use std::collections::BTreeMap;

use super::{ArmCtrlError, ArmPose, NUM_POSE_VALUES};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The joint targets associated with a pose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PoseEntry {
    /// Units: degrees
    pub major_deg: f64,

    /// Units: degrees
    pub minor_deg: f64,

    /// Output limit applied to the minor joint by an unsequenced transition
    /// out of this pose.
    pub minor_output_limit: f64,
}

/// Immutable, complete mapping from pose to joint targets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseTable {
    entries: [PoseEntry; ArmPose::COUNT],
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PoseTable {
    /// Build the table from the raw name-keyed map in the parameters.
    ///
    /// Fails if any pose is missing, does not have exactly three values, or
    /// has a non-finite value, or if the map names a pose that doesn't exist.
    pub fn from_raw(raw: &BTreeMap<String, Vec<f64>>) -> Result<Self, ArmCtrlError> {
        if let Some(name) = raw
            .keys()
            .find(|name| !ArmPose::ALL.iter().any(|p| p.name() == name.as_str()))
        {
            return Err(ArmCtrlError::UnknownPose(name.clone()));
        }

        let mut entries = [PoseEntry::default(); ArmPose::COUNT];

        for pose in ArmPose::ALL.iter() {
            let values = match raw.get(pose.name()) {
                Some(v) if v.len() == NUM_POSE_VALUES => v,
                Some(v) => return Err(ArmCtrlError::IncompletePoseTable(*pose, v.len())),
                None => return Err(ArmCtrlError::IncompletePoseTable(*pose, 0)),
            };

            if values.iter().any(|v| !v.is_finite()) {
                return Err(ArmCtrlError::NonFinitePoseValue(*pose));
            }

            entries[pose.index()] = PoseEntry {
                major_deg: values[0],
                minor_deg: values[1],
                minor_output_limit: values[2],
            };
        }

        Ok(Self { entries })
    }

    /// Get the entry for a pose.
    pub fn get(&self, pose: ArmPose) -> &PoseEntry {
        &self.entries[pose.index()]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn full_raw_table() -> BTreeMap<String, Vec<f64>> {
        ArmPose::ALL
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let i = i as f64;
                (p.name().to_string(), vec![10.0 * i, 20.0 * i, 0.1 * (i + 1.0)])
            })
            .collect()
    }

    #[test]
    fn test_complete_table() {
        let table = PoseTable::from_raw(&full_raw_table()).unwrap();

        for (i, pose) in ArmPose::ALL.iter().enumerate() {
            let i = i as f64;
            assert_eq!(
                *table.get(*pose),
                PoseEntry {
                    major_deg: 10.0 * i,
                    minor_deg: 20.0 * i,
                    minor_output_limit: 0.1 * (i + 1.0)
                }
            );
        }
    }

    #[test]
    fn test_missing_pose() {
        for pose in ArmPose::ALL.iter() {
            let mut raw = full_raw_table();
            raw.remove(pose.name());

            match PoseTable::from_raw(&raw) {
                Err(ArmCtrlError::IncompletePoseTable(p, 0)) => assert_eq!(p, *pose),
                other => panic!("Expected missing {} to fail, got {:?}", pose, other),
            }
        }
    }

    #[test]
    fn test_wrong_value_count() {
        let mut raw = full_raw_table();
        raw.insert("MID_SCORE".into(), vec![1.0, 2.0]);
        assert!(matches!(
            PoseTable::from_raw(&raw),
            Err(ArmCtrlError::IncompletePoseTable(ArmPose::MidScore, 2))
        ));

        let mut raw = full_raw_table();
        raw.insert("TUCKED".into(), vec![1.0, 2.0, 3.0, 4.0]);
        assert!(matches!(
            PoseTable::from_raw(&raw),
            Err(ArmCtrlError::IncompletePoseTable(ArmPose::Tucked, 4))
        ));
    }

    #[test]
    fn test_bad_values_and_names() {
        let mut raw = full_raw_table();
        raw.insert("HIGH_INTAKE".into(), vec![1.0, std::f64::NAN, 3.0]);
        assert!(matches!(
            PoseTable::from_raw(&raw),
            Err(ArmCtrlError::NonFinitePoseValue(ArmPose::HighIntake))
        ));

        let mut raw = full_raw_table();
        raw.insert("SKY_SCORE".into(), vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            PoseTable::from_raw(&raw),
            Err(ArmCtrlError::UnknownPose(n)) if n == "SKY_SCORE"
        ));
    }
}
