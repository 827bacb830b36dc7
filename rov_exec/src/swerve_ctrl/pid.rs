//! PID controllers
//!
//! Both controllers are run at a fixed period, set at construction, and
//! support continuous inputs (such as angles) where the ends of the input
//! range describe the same point.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::mech::PidGains;
use util::maths::wrap_to_range;

use super::{ProfileConstraints, ProfileState, TrapezoidProfile};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A PID controller.
#[derive(Debug, Clone)]
pub struct PidController {
    gains: PidGains,

    /// Units: seconds
    period_s: f64,

    /// `(min, max)` of the input if it is continuous.
    continuous_range: Option<(f64, f64)>,

    setpoint: f64,

    position_error: f64,

    velocity_error: f64,

    total_error: f64,

    /// False until the first call to calculate, so the derivative term
    /// doesn't kick on the first cycle.
    has_measurement: bool,
}

/// A PID controller following a trapezoidal profile to its goal.
#[derive(Debug, Clone)]
pub struct ProfiledPidController {
    controller: PidController,

    profile: TrapezoidProfile,

    goal: ProfileState,

    setpoint: ProfileState,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidController {
    pub fn new(gains: PidGains, period_s: f64) -> Self {
        Self {
            gains,
            period_s,
            continuous_range: None,
            setpoint: 0.0,
            position_error: 0.0,
            velocity_error: 0.0,
            total_error: 0.0,
            has_measurement: false,
        }
    }

    /// Treat the input as continuous over `[min, max)`, so the controller
    /// always takes the shorter way round.
    pub fn enable_continuous_input(&mut self, min: f64, max: f64) {
        self.continuous_range = Some((min, max));
    }

    pub fn continuous_range(&self) -> Option<(f64, f64)> {
        self.continuous_range
    }

    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }

    pub fn position_error(&self) -> f64 {
        self.position_error
    }

    pub fn velocity_error(&self) -> f64 {
        self.velocity_error
    }

    /// Clear the accumulated error and derivative history.
    pub fn reset(&mut self) {
        self.position_error = 0.0;
        self.velocity_error = 0.0;
        self.total_error = 0.0;
        self.has_measurement = false;
    }

    /// Calculate the output for the next period.
    pub fn calculate(&mut self, measurement: f64, setpoint: f64) -> f64 {
        self.setpoint = setpoint;

        let prev_error = self.position_error;
        self.position_error = self.error(measurement, setpoint);

        self.velocity_error = if self.has_measurement {
            (self.position_error - prev_error) / self.period_s
        }
        else {
            0.0
        };
        self.has_measurement = true;

        if self.gains.i_zone > 0.0 && self.position_error.abs() > self.gains.i_zone {
            self.total_error = 0.0;
        }
        else if self.gains.k_i != 0.0 {
            self.total_error += self.position_error * self.period_s;
        }

        self.gains.k_p * self.position_error
            + self.gains.k_i * self.total_error
            + self.gains.k_d * self.velocity_error
    }

    /// Error between a measurement and a setpoint, the shortest way round
    /// for a continuous input.
    fn error(&self, measurement: f64, setpoint: f64) -> f64 {
        match self.continuous_range {
            Some((min, max)) => {
                let bound = (max - min) / 2.0;
                wrap_to_range(setpoint - measurement, -bound, bound)
            }
            None => setpoint - measurement,
        }
    }
}

impl ProfiledPidController {
    pub fn new(gains: PidGains, constraints: ProfileConstraints, period_s: f64) -> Self {
        Self {
            controller: PidController::new(gains, period_s),
            profile: TrapezoidProfile::new(constraints),
            goal: ProfileState::default(),
            setpoint: ProfileState::default(),
        }
    }

    pub fn enable_continuous_input(&mut self, min: f64, max: f64) {
        self.controller.enable_continuous_input(min, max);
    }

    /// The current setpoint along the profile.
    pub fn setpoint(&self) -> ProfileState {
        self.setpoint
    }

    pub fn goal(&self) -> ProfileState {
        self.goal
    }

    pub fn position_error(&self) -> f64 {
        self.controller.position_error()
    }

    /// Restart the profile from `measurement` at rest.
    pub fn reset(&mut self, measurement: f64) {
        self.controller.reset();
        self.setpoint = ProfileState::new(measurement, 0.0);
    }

    /// Calculate the output for the next period towards a stationary goal.
    pub fn calculate(&mut self, measurement: f64, goal: f64) -> f64 {
        self.goal = ProfileState::new(goal, 0.0);

        // Move the goal and setpoint to within half a range of the
        // measurement, so the profile takes the shorter way round
        if let Some((min, max)) = self.controller.continuous_range() {
            let bound = (max - min) / 2.0;
            self.goal.position = measurement + wrap_to_range(self.goal.position - measurement, -bound, bound);
            self.setpoint.position =
                measurement + wrap_to_range(self.setpoint.position - measurement, -bound, bound);
        }

        self.setpoint = self
            .profile
            .calculate(self.controller.period_s, self.setpoint, self.goal);

        self.controller.calculate(measurement, self.setpoint.position)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_pid_terms() {
        let mut pid = PidController::new(
            PidGains { k_p: 2.0, k_i: 1.0, k_d: 0.5, i_zone: 0.0 },
            0.1,
        );

        // No derivative kick on the first call
        assert_close(pid.calculate(0.0, 1.0), 2.0 + 0.1);

        // Error drops to 0.5: P = 1.0, I = 1.0 * (0.1 + 0.05), D = 0.5 * -5.0
        assert_close(pid.calculate(0.5, 1.0), 1.0 + 0.15 - 2.5);
        assert_close(pid.velocity_error(), -5.0);

        pid.reset();
        assert_close(pid.calculate(0.0, 1.0), 2.1);
    }

    #[test]
    fn test_pid_i_zone() {
        let mut pid = PidController::new(
            PidGains { k_p: 0.0, k_i: 1.0, k_d: 0.0, i_zone: 0.5 },
            1.0,
        );

        assert_close(pid.calculate(0.0, 0.4), 0.4);
        assert_close(pid.calculate(0.0, 0.4), 0.8);

        // Outside the zone the integrator is cleared
        assert_close(pid.calculate(0.0, 2.0), 0.0);
    }

    #[test]
    fn test_pid_continuous() {
        let mut pid = PidController::new(PidGains { k_p: 1.0, ..Default::default() }, 0.02);
        pid.enable_continuous_input(-PI, PI);

        let from = 170f64.to_radians();
        let to = -170f64.to_radians();
        assert_close(pid.calculate(from, to), 20f64.to_radians());
        assert_close(pid.calculate(to, from), -20f64.to_radians());
    }

    #[test]
    fn test_profiled_follows_profile() {
        let mut pid = ProfiledPidController::new(
            PidGains { k_p: 1.0, ..Default::default() },
            ProfileConstraints { max_velocity: 1.0, max_acceleration: 10.0 },
            0.1,
        );
        pid.reset(0.0);

        // One period into the ramp the setpoint has only just moved
        assert_close(pid.calculate(0.0, 2.0), 0.05);
        assert_close(pid.setpoint().velocity, 1.0);
        assert_eq!(pid.goal(), ProfileState::new(2.0, 0.0));
    }

    #[test]
    fn test_profiled_continuous() {
        let mut pid = ProfiledPidController::new(
            PidGains { k_p: 1.0, ..Default::default() },
            ProfileConstraints { max_velocity: 100.0, max_acceleration: 100.0 },
            0.1,
        );
        pid.enable_continuous_input(-PI, PI);

        let start = 170f64.to_radians();
        pid.reset(start);

        // Goal across the wrap is approached the short way, increasing
        pid.calculate(start, -170f64.to_radians());
        assert!(pid.setpoint().velocity > 0.0);
        assert_close(pid.goal().position, 190f64.to_radians());
    }
}
