//! Gripper end effector

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::mech::BinaryActuator;
use log::debug;
use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The gripper at the end of the arm.
///
/// Every call goes straight to the actuator; the last command is remembered
/// for telemetry only.
pub struct Gripper {
    actuator: Box<dyn BinaryActuator>,

    last_cmd: Option<GripperState>,
}

/// Commanded state of the gripper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GripperState {
    Open,
    Closed,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Gripper {
    pub fn new(actuator: Box<dyn BinaryActuator>) -> Self {
        Self {
            actuator,
            last_cmd: None,
        }
    }

    pub fn open(&mut self) {
        debug!("Opening gripper");
        self.actuator.open();
        self.last_cmd = Some(GripperState::Open);
    }

    pub fn close(&mut self) {
        debug!("Closing gripper");
        self.actuator.close();
        self.last_cmd = Some(GripperState::Closed);
    }

    /// The last commanded state, or `None` if never commanded.
    pub fn state(&self) -> Option<GripperState> {
        self.last_cmd
    }
}
