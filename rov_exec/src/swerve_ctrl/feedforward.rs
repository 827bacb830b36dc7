//! Simple motor feedforward

use super::FeedforwardGains;

/// Feedforward for a permanent magnet DC motor.
///
/// `u = k_s * sgn(v) + k_v * v + k_a * a`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimpleMotorFeedforward {
    gains: FeedforwardGains,
}

impl SimpleMotorFeedforward {
    pub fn new(gains: FeedforwardGains) -> Self {
        Self { gains }
    }

    /// Feedforward for a constant velocity.
    pub fn calculate(&self, velocity: f64) -> f64 {
        self.calculate_with_accel(velocity, 0.0)
    }

    pub fn calculate_with_accel(&self, velocity: f64, accel: f64) -> f64 {
        // f64::signum(0.0) is 1.0, static friction only applies when moving
        let sgn = if velocity == 0.0 { 0.0 } else { velocity.signum() };

        self.gains.k_s * sgn + self.gains.k_v * velocity + self.gains.k_a * accel
    }
}
