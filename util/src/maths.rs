//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
///
/// The ranges may be in either order, a reversed target range produces a
/// decreasing map. The source range must not be empty.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float,
{
    target_range.0
        + ((value - source_range.0) * (target_range.1 - target_range.0)
            / (source_range.1 - source_range.0))
}

/// Clamp `value` into `[min, max]`.
///
/// Unlike `f64::clamp` this does not panic when `min > max`, the upper bound
/// is applied first and the lower bound wins.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float,
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()` if `lhs` is much smaller than `rhs.abs()` in
/// magnitude and `lhs < 0.0`.
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

/// Wrap an angle in degrees into `(-180, 180]`.
///
/// Computed as `((a + 180) mod 360) - 180` with a non-negative remainder,
/// with the `-180` boundary folded onto `+180`.
pub fn wrap_deg_180<T>(angle_deg: T) -> T
where
    T: Float,
{
    let half_turn = T::from(180.0).unwrap_or_else(T::zero);
    let full_turn = half_turn + half_turn;

    let wrapped = rem_euclid(angle_deg + half_turn, full_turn) - half_turn;

    if wrapped <= -half_turn {
        wrapped + full_turn
    } else {
        wrapped
    }
}
