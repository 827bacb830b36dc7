//! Module state and position types

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use std::f64::consts::{FRAC_PI_2, PI};
use util::maths::{ang_dist, wrap_pi};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Velocity of a module's wheel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ModuleState {
    /// Units: meters/second
    pub speed_ms: f64,

    /// Units: radians
    pub heading_rad: f64,
}

/// Position of a module's wheel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ModulePosition {
    /// Distance travelled by the wheel since the encoders were last reset.
    ///
    /// Units: meters
    pub distance_m: f64,

    /// Units: radians
    pub heading_rad: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ModuleState {
    pub fn new(speed_ms: f64, heading_rad: f64) -> Self {
        Self {
            speed_ms,
            heading_rad,
        }
    }

    /// Minimise the rotation needed to reach this state from
    /// `current_heading_rad`.
    ///
    /// If the heading is more than a quarter turn away the wheel is driven
    /// backwards instead, so a module never turns more than 90 degrees.
    pub fn optimize(self, current_heading_rad: f64) -> Self {
        if ang_dist(current_heading_rad, self.heading_rad).abs() > FRAC_PI_2 {
            Self {
                speed_ms: -self.speed_ms,
                heading_rad: wrap_pi(self.heading_rad + PI),
            }
        }
        else {
            self
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn deg(d: f64) -> f64 {
        d.to_radians()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_optimize_across_wrap() {
        let s = ModuleState::new(2.0, deg(-170.0)).optimize(deg(170.0));

        assert_eq!(s.speed_ms, 2.0);
        assert_close(s.heading_rad, deg(-170.0));
    }

    #[test]
    fn test_optimize_flip() {
        let s = ModuleState::new(2.0, deg(170.0)).optimize(0.0);

        assert_eq!(s.speed_ms, -2.0);
        assert_close(s.heading_rad, deg(-10.0));

        // Flipping again gets back to the commanded state
        let s = s.optimize(deg(180.0));
        assert_eq!(s.speed_ms, 2.0);
        assert_close(s.heading_rad, deg(170.0));
    }

    #[test]
    fn test_optimize_boundary() {
        let s = ModuleState::new(1.0, deg(89.0)).optimize(0.0);
        assert_eq!(s, ModuleState::new(1.0, deg(89.0)));

        let s = ModuleState::new(1.0, deg(91.0)).optimize(0.0);
        assert_eq!(s.speed_ms, -1.0);
        assert_close(s.heading_rad, deg(-89.0));
    }

    #[test]
    fn test_optimize_never_turns_more_than_quarter() {
        for current in (-180..180).step_by(15) {
            for desired in (-180..180).step_by(7) {
                let current = deg(current as f64);
                let s = ModuleState::new(1.0, deg(desired as f64)).optimize(current);

                assert!(ang_dist(current, s.heading_rad).abs() <= FRAC_PI_2 + 1e-9);
                assert_eq!(s.speed_ms.abs(), 1.0);
            }
        }
    }
}
