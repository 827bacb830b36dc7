//! Swerve module control
//!
//! Closed-loop control of a single swerve wheel module: a drive motor turning
//! the wheel and a turn motor steering it, with an absolute heading sensor on
//! the steering axis and a relative encoder on the drive motor.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod feedforward;
mod module_state;
mod params;
mod pid;
mod profile;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use comms_if::tc::swerve_ctrl::SwerveCmd;
pub use feedforward::*;
pub use module_state::*;
pub use params::*;
pub use pid::*;
pub use profile::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during SwerveCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum SwerveCtrlError {
    #[error("Invalid swerve parameter: {0}")]
    InvalidParams(String),

    #[error("Could not load the swerve parameters: {0}")]
    Params(#[from] util::params::LoadError),
}
