//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Clamp `value` to `[-limit, limit]`.
///
/// A negative limit is treated as its magnitude.
pub fn clamp_sym<T>(value: T, limit: T) -> T
where
    T: Float
{
    let limit = limit.abs();

    value.max(-limit).min(limit)
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. Due to floating point round-off it can result in
/// `r == rhs.abs()` when `lhs` is much smaller than `rhs` in magnitude and
/// negative.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

/// Wrap `value` into the half-open range `[min, max)`.
///
/// Used for continuous inputs such as angles, where `min` and `max` describe
/// the same physical point.
pub fn wrap_to_range<T>(value: T, min: T, max: T) -> T
where
    T: Float
{
    let wrapped = min + rem_euclid(value - min, max - min);

    // Round-off in rem_euclid can land exactly on max
    if wrapped >= max { min } else { wrapped }
}

/// Wrap an angle in radians into `[-pi, pi)`.
pub fn wrap_pi<T>(angle: T) -> T
where
    T: Float
{
    let pi_t = T::from(std::f64::consts::PI).unwrap();

    wrap_to_range(angle, -pi_t, pi_t)
}

/// Get the signed shortest angular distance from `from` to `to`, in radians.
///
/// The result is in `[-pi, pi)`, positive when `to` lies anticlockwise of
/// `from`.
pub fn ang_dist<T>(from: T, to: T) -> T
where
    T: Float
{
    wrap_pi(to - from)
}
