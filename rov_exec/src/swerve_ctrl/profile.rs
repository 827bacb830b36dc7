//! Trapezoidal motion profile

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Limits on a trapezoidal profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ProfileConstraints {
    pub max_velocity: f64,
    pub max_acceleration: f64,
}

/// A point along a motion profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ProfileState {
    pub position: f64,
    pub velocity: f64,
}

/// A trapezoidal motion profile.
///
/// Accelerates at the max acceleration until the max velocity is reached,
/// cruises, then decelerates into the goal. Short moves never reach the
/// cruise velocity and form a triangle instead.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrapezoidProfile {
    constraints: ProfileConstraints,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ProfileState {
    pub fn new(position: f64, velocity: f64) -> Self {
        Self { position, velocity }
    }

    fn scaled(self, direction: f64) -> Self {
        Self {
            position: self.position * direction,
            velocity: self.velocity * direction,
        }
    }
}

impl TrapezoidProfile {
    pub fn new(constraints: ProfileConstraints) -> Self {
        Self { constraints }
    }

    /// Get the state of the profile from `current` towards `goal` after
    /// `t_s` seconds.
    pub fn calculate(&self, t_s: f64, current: ProfileState, goal: ProfileState) -> ProfileState {
        let max_vel = self.constraints.max_velocity;
        let max_acc = self.constraints.max_acceleration;

        // Work as if moving in the positive direction
        let direction = if current.position > goal.position { -1.0 } else { 1.0 };
        let mut current = current.scaled(direction);
        let goal = goal.scaled(direction);

        if current.velocity > max_vel {
            current.velocity = max_vel;
        }

        // Pretend the profile started (and ends) at rest, so the initial and
        // goal velocities are just points along the ramps.
        let cutoff_begin = current.velocity / max_acc;
        let cutoff_dist_begin = cutoff_begin * cutoff_begin * max_acc / 2.0;

        let cutoff_end = goal.velocity / max_acc;
        let cutoff_dist_end = cutoff_end * cutoff_end * max_acc / 2.0;

        let full_trapezoid_dist =
            cutoff_dist_begin + (goal.position - current.position) + cutoff_dist_end;
        let mut accel_time = max_vel / max_acc;

        let mut full_speed_dist = full_trapezoid_dist - accel_time * accel_time * max_acc;

        // Triangular profile
        if full_speed_dist < 0.0 {
            accel_time = (full_trapezoid_dist / max_acc).sqrt();
            full_speed_dist = 0.0;
        }

        let end_accel = accel_time - cutoff_begin;
        let end_full_speed = end_accel + full_speed_dist / max_vel;
        let end_decel = end_full_speed + accel_time - cutoff_end;

        let mut result = current;

        if t_s < end_accel {
            result.velocity += t_s * max_acc;
            result.position += (current.velocity + t_s * max_acc / 2.0) * t_s;
        }
        else if t_s < end_full_speed {
            result.velocity = max_vel;
            result.position += (current.velocity + end_accel * max_acc / 2.0) * end_accel
                + max_vel * (t_s - end_accel);
        }
        else if t_s <= end_decel {
            let time_left = end_decel - t_s;
            result.velocity = goal.velocity + time_left * max_acc;
            result.position = goal.position - (goal.velocity + time_left * max_acc / 2.0) * time_left;
        }
        else {
            result = goal;
        }

        result.scaled(direction)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn profile() -> TrapezoidProfile {
        TrapezoidProfile::new(ProfileConstraints {
            max_velocity: 2.0,
            max_acceleration: 4.0,
        })
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_accel_phase() {
        let s = profile().calculate(0.25, ProfileState::default(), ProfileState::new(10.0, 0.0));

        assert_close(s.velocity, 1.0);
        assert_close(s.position, 0.125);
    }

    #[test]
    fn test_cruise_phase() {
        // Ramp takes 0.5 s and covers 0.5 m
        let s = profile().calculate(1.0, ProfileState::default(), ProfileState::new(10.0, 0.0));

        assert_close(s.velocity, 2.0);
        assert_close(s.position, 1.5);
    }

    #[test]
    fn test_reaches_goal_and_reverses() {
        let goal = ProfileState::new(-1.0, 0.0);
        let p = profile();

        // Triangle, 0.5 s to the peak and 0.5 s back down
        let s = p.calculate(0.5, ProfileState::default(), goal);
        assert_close(s.velocity, -2.0);
        assert_close(s.position, -0.5);

        let s = p.calculate(5.0, ProfileState::default(), goal);
        assert_eq!(s, goal);
    }

    #[test]
    fn test_stepping_never_exceeds_constraints() {
        let p = profile();
        let goal = ProfileState::new(3.0, 0.0);
        let mut s = ProfileState::default();

        for _ in 0..200 {
            let next = p.calculate(0.02, s, goal);
            assert!(next.velocity.abs() <= 2.0 + 1e-9);
            assert!((next.velocity - s.velocity).abs() <= 4.0 * 0.02 + 1e-9);
            s = next;
        }

        assert_close(s.position, 3.0);
        assert_close(s.velocity, 0.0);
    }
}
