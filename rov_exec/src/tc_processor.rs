//! # Telecommand processor module
//!
//! The telecommand processor handles various TCs coming from any source.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};

// Internal
use comms_if::tc::Tc;
use rov_lib::data_store::{DataStore, MakeUnsafeResult, SafeModeCause};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a telecommand.
///
/// Mutates the datastore to send commands to different modules. While the rover is in safe mode
/// only `MakeUnsafe` is executed.
pub(crate) fn exec(ds: &mut DataStore, tc: &Tc) {
    if ds.safe && *tc != Tc::MakeUnsafe {
        warn!("Rover is in safe mode, ignoring {:?}", tc);
        return;
    }

    // Handle different Tcs
    match tc {
        Tc::MakeSafe => {
            debug!("Recieved MakeSafe command");
            ds.make_safe(SafeModeCause::MakeSafeTc);
        }
        Tc::MakeUnsafe => {
            debug!("Recieved MakeUnsafe command");
            if let MakeUnsafeResult::CauseMismatch(c) = ds.make_unsafe(SafeModeCause::MakeSafeTc) {
                warn!("Cannot leave safe mode with a TC, cause is {:?}", c);
            }
        }
        Tc::ArmCtrl(cmd) => ds.arm_ctrl_input.cmds.push(*cmd),
        Tc::SwerveCtrl(cmd) => ds.swerve_ctrl_input.cmds.push(*cmd),
    }
}
