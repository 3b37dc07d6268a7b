//! Mathematical structs and functions.

use cgmath::Point2;

/// A 2D point
pub type Point2d = Point2<f64>;

/// Moves `value` a fixed `fraction` of the remaining distance towards `target`.
#[inline]
pub fn lerp_towards(value: f64, target: f64, fraction: f64) -> f64 {
    value + (target - value) * fraction
}

/// Multiplies `value` by `rate`, clamping the result to `bound`.
/// The bound is a floor when `rate < 1` and a ceiling otherwise.
#[inline]
pub fn geometric_towards(value: f64, rate: f64, bound: f64) -> f64 {
    let next = value * rate;
    if rate < 1.0 {
        f64::max(bound, next)
    } else {
        f64::min(bound, next)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn lerp_fraction() {
        assert_approx_eq!(lerp_towards(0.0, 100.0, 0.1), 10.0);
        assert_approx_eq!(lerp_towards(100.0, 0.0, 0.2), 80.0);
    }

    #[test]
    fn geometric_bounds() {
        assert_approx_eq!(geometric_towards(4.0, 0.98, 2.0), 3.92);
        assert_approx_eq!(geometric_towards(2.01, 0.98, 2.0), 2.0);
        assert_approx_eq!(geometric_towards(4.0, 1.02, 5.0), 4.08);
        assert_approx_eq!(geometric_towards(4.95, 1.02, 5.0), 5.0);
    }
}
