//! # Sensor Equipment Interface

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// An absolute angular position sensor (magnetic encoder).
pub trait AbsEncoder {
    /// Set the offset added to the raw magnet reading.
    ///
    /// Units: degrees
    fn configure_magnet_offset(&mut self, offset_deg: f64);

    /// Select the range the absolute position is reported in.
    fn configure_range(&mut self, range: AbsSensorRange);

    /// Absolute position of the sensor.
    ///
    /// Units: degrees
    fn abs_position_deg(&self) -> f64;
}

/// A relative position and velocity encoder.
pub trait RelEncoder {
    /// Units: rotations
    fn position(&self) -> f64;

    /// Units: rotations/minute
    fn velocity(&self) -> f64;

    /// Units: rotations
    fn set_position(&mut self, pos_rot: f64);
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Range an absolute sensor reports its position in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbsSensorRange {
    /// [-180, 180)
    Signed,

    /// [0, 360)
    Unsigned,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl AbsSensorRange {
    /// Wrap an angle in degrees into this range.
    pub fn wrap_deg(&self, angle_deg: f64) -> f64 {
        match self {
            AbsSensorRange::Signed => (angle_deg + 180.0).rem_euclid(360.0) - 180.0,
            AbsSensorRange::Unsigned => angle_deg.rem_euclid(360.0),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wrap_deg() {
        assert_eq!(AbsSensorRange::Signed.wrap_deg(190.0), -170.0);
        assert_eq!(AbsSensorRange::Signed.wrap_deg(180.0), -180.0);
        assert_eq!(AbsSensorRange::Signed.wrap_deg(-90.0), -90.0);
        assert_eq!(AbsSensorRange::Unsigned.wrap_deg(-90.0), 270.0);
        assert_eq!(AbsSensorRange::Unsigned.wrap_deg(360.0), 0.0);
    }
}
