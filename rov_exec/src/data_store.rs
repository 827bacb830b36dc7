//! # Data Store

use log::{info, warn};

use crate::{arm_ctrl, swerve_ctrl};

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

/// Gives the reason the rover has been put into safe mode
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum SafeModeCause {
    MakeSafeTc,
    ModuleInitFailed,
}

/// Result of a request to leave safe mode.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum MakeUnsafeResult {
    /// Safe mode was not active.
    NotSafe,

    /// Safe mode has been disabled.
    Cleared,

    /// The cause didn't match the one safe mode was entered with.
    CauseMismatch(SafeModeCause),
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Session elapsed time
    pub sim_time_s: f64,

    // Safe mode variables
    /// Determines if the rover is in safe mode.
    pub safe: bool,

    /// Gives the reason for the rover being in safe mode.
    pub safe_cause: Option<SafeModeCause>,

    /// Set when safe mode has just been entered, the modules must be made
    /// safe on this cycle.
    pub make_safe_pending: bool,

    // ArmCtrl
    pub arm_ctrl_input: arm_ctrl::InputData,
    pub arm_ctrl_output: Option<arm_ctrl::ArmOutput>,
    pub arm_ctrl_status_rpt: arm_ctrl::StatusReport,

    // SwerveCtrl, the same input is given to every module
    pub swerve_ctrl_input: swerve_ctrl::InputData,
    pub swerve_ctrl_outputs: Vec<swerve_ctrl::SwerveOutput>,
    pub swerve_ctrl_status_rpts: Vec<swerve_ctrl::StatusReport>,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Puts the rover into safe mode with the given cause.
    pub fn make_safe(&mut self, cause: SafeModeCause) {
        if !self.safe {
            warn!("Make safe requested, cause: {:?}", cause);
            self.safe = true;
            self.safe_cause = Some(cause);
            self.make_safe_pending = true;
        }
    }

    /// Attempts to disable the safe mode by clearing the given cause.
    ///
    /// To remove safe mode the provided cause must match the initial reason for safe mode being
    /// enabled.
    pub fn make_unsafe(&mut self, cause: SafeModeCause) -> MakeUnsafeResult {
        if !self.safe {
            return MakeUnsafeResult::NotSafe;
        }

        match self.safe_cause {
            Some(root_cause) if root_cause != cause => {
                MakeUnsafeResult::CauseMismatch(root_cause)
            }
            _ => {
                self.safe = false;
                self.safe_cause = None;
                info!("Make unsafe requested, root cause match, safe mode disabled");
                MakeUnsafeResult::Cleared
            }
        }
    }

    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, and sets the 1Hz cycle flag.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        self.is_1_hz_cycle = self.num_cycles % (cycle_frequency_hz as u128) == 0;

        self.arm_ctrl_input = arm_ctrl::InputData::default();
        self.arm_ctrl_output = None;
        self.arm_ctrl_status_rpt = arm_ctrl::StatusReport::default();

        self.swerve_ctrl_input = swerve_ctrl::InputData::default();
        self.swerve_ctrl_outputs.clear();
        self.swerve_ctrl_status_rpts.clear();

        self.sim_time_s = util::session::get_elapsed_seconds();
    }

    /// Perform actions required at the end of a cycle.
    pub fn cycle_end(&mut self) {
        self.make_safe_pending = false;
        self.num_cycles += 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::tc::arm_ctrl::ArmCmd;

    #[test]
    fn test_safe_mode() {
        let mut ds = DataStore::default();
        assert_eq!(ds.make_unsafe(SafeModeCause::MakeSafeTc), MakeUnsafeResult::NotSafe);

        ds.make_safe(SafeModeCause::ModuleInitFailed);
        assert!(ds.safe && ds.make_safe_pending);

        // Second cause doesn't replace the first
        ds.make_safe(SafeModeCause::MakeSafeTc);
        assert_eq!(ds.safe_cause, Some(SafeModeCause::ModuleInitFailed));

        assert_eq!(
            ds.make_unsafe(SafeModeCause::MakeSafeTc),
            MakeUnsafeResult::CauseMismatch(SafeModeCause::ModuleInitFailed)
        );
        assert!(ds.safe);

        assert_eq!(ds.make_unsafe(SafeModeCause::ModuleInitFailed), MakeUnsafeResult::Cleared);
        assert!(!ds.safe);
        assert_eq!(ds.safe_cause, None);
    }

    #[test]
    fn test_cycle_management() {
        let mut ds = DataStore::default();
        ds.arm_ctrl_input.cmds.push(ArmCmd::ToggleSide);
        ds.make_safe(SafeModeCause::MakeSafeTc);

        ds.cycle_start(50.0);
        assert!(ds.is_1_hz_cycle);
        assert!(ds.arm_ctrl_input.cmds.is_empty());

        ds.cycle_end();
        assert!(!ds.make_safe_pending);
        assert_eq!(ds.num_cycles, 1);

        ds.cycle_start(50.0);
        assert!(!ds.is_1_hz_cycle);
    }
}
