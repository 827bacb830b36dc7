//! # Equipment Interface
//!
//! This module defines the interfaces through which the control modules talk to the hardware
//! abstraction layer. Implementations live outside of the control core (drivers, or the
//! simulation in `rov_exec`).
//!
//! Reads are infallible by contract: on a bus or sensor fault an implementation shall return its
//! last known good value (or zero) rather than raising, since every control quantity is
//! recomputed on the next cycle anyway.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod mech;
pub mod sens;
