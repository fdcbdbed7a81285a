//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::{Float, FloatConst};

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::zero() {
        r + rhs.abs()
    } else {
        r
    }
}

/// Wrap an angle into the range (-pi, pi].
///
/// Angles already inside the range are returned unchanged.
pub fn wrap_pi<T>(value: T) -> T
where
    T: Float + FloatConst,
{
    let pi = T::PI();
    let tau = pi + pi;

    if value > -pi && value <= pi {
        return value;
    }

    let wrapped = rem_euclid(value + pi, tau) - pi;

    // rem_euclid can land on either end of the range, both of which map to +pi
    if wrapped <= -pi || wrapped > pi {
        pi
    } else {
        wrapped
    }
}

/// Returns true if `a` and `b` differ by no more than `tol`.
pub fn approx_eq<T>(a: T, b: T, tol: T) -> bool
where
    T: Float,
{
    (a - b).abs() <= tol
}
