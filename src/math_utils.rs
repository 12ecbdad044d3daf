/// Mathematical utility functions for the particle simulation
///
/// Scalar interpolation helpers plus the few 2-D vector operations the
/// integrator and collision code share. Vectors are `glam::DVec2`.

use glam::DVec2;

/// Assert that the deviation between two values is less than a threshold
///
/// Calculates the percentage deviation between `actual` and `expected` and
/// panics when it is not below `max_deviation`.
#[macro_export]
macro_rules! assert_deviation {
    ($actual:expr, $expected:expr, $max_deviation:expr) => {
        {
            let actual_val = $actual;
            let expected_val = $expected;
            let max_dev = $max_deviation;
            let actual_deviation = $crate::math_utils::deviation(actual_val, expected_val);

            if actual_deviation >= max_dev {
                panic!(
                    "assertion failed: deviation {:.2}% >= {:.2}%\n  actual: {:?},\n  expected: {:?}",
                    actual_deviation, max_dev, actual_val, expected_val
                );
            }
        }
    };
    ($actual:expr, $expected:expr, $max_deviation:expr, $($arg:tt)+) => {
        {
            let actual_val = $actual;
            let expected_val = $expected;
            let max_dev = $max_deviation;
            let actual_deviation = $crate::math_utils::deviation(actual_val, expected_val);

            if actual_deviation >= max_dev {
                panic!(
                    "assertion failed: deviation {:.2}% >= {:.2}%: {}\n  actual: {:?},\n  expected: {:?}",
                    actual_deviation, max_dev, format_args!($($arg)+), actual_val, expected_val
                );
            }
        }
    };
}

/// Linear interpolation between two values
///
/// # Examples
/// ```
/// use chem_lab_sim::math_utils::lerp;
///
/// assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
/// assert_eq!(lerp(25.0, 100.0, 0.0), 25.0);
/// ```
pub fn lerp(a: f64, b: f64, ratio: f64) -> f64 {
    a + (b - a) * ratio
}

/// Inverse linear interpolation - the ratio that `lerp(a, b, ratio)` maps to `value`
///
/// Returns 0.0 when `a == b`.
///
/// # Examples
/// ```
/// use chem_lab_sim::math_utils::inverse_lerp;
///
/// assert_eq!(inverse_lerp(100.0, 200.0, 150.0), 0.5);
/// ```
pub fn inverse_lerp(a: f64, b: f64, value: f64) -> f64 {
    if (b - a).abs() < f64::EPSILON {
        0.0
    } else {
        (value - a) / (b - a)
    }
}

/// Clamp to the unit interval; NaN maps to 0.0
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Piecewise-linear lookup over control points sorted by `key`.
///
/// Values outside the table take the nearest end point. An empty table
/// yields `fallback`.
pub fn interpolate_by<T>(
    table: &[T],
    x: f64,
    key: impl Fn(&T) -> f64,
    value: impl Fn(&T) -> f64,
    fallback: f64,
) -> f64 {
    let (Some(first), Some(last)) = (table.first(), table.last()) else {
        return fallback;
    };
    if x <= key(first) {
        return value(first);
    }
    if x >= key(last) {
        return value(last);
    }
    for win in table.windows(2) {
        let (x1, x2) = (key(&win[0]), key(&win[1]));
        if x >= x1 && x <= x2 {
            return lerp(value(&win[0]), value(&win[1]), inverse_lerp(x1, x2, x));
        }
    }
    value(last)
}

/// Calculate the percentage deviation of `actual` from `expected`
///
/// # Examples
/// ```
/// use chem_lab_sim::math_utils::deviation;
///
/// assert_eq!(deviation(105.0, 100.0), 5.0);
/// assert_eq!(deviation(95.0, 100.0), 5.0);
/// ```
pub fn deviation(actual: f64, expected: f64) -> f64 {
    if expected.abs() < f64::EPSILON {
        if actual.abs() < f64::EPSILON {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        ((actual - expected).abs() / expected.abs()) * 100.0
    }
}

pub fn is_finite_vec(v: DVec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

/// Rescale `velocity` so its magnitude does not exceed `max_speed`.
///
/// Returns the clamped velocity and whether clamping happened. A zero or
/// negative cap stops the particle.
pub fn clamp_speed(velocity: DVec2, max_speed: f64) -> (DVec2, bool) {
    if max_speed <= 0.0 {
        return (DVec2::ZERO, velocity != DVec2::ZERO);
    }
    let speed = velocity.length();
    if speed > max_speed {
        (velocity * (max_speed / speed), true)
    } else {
        (velocity, false)
    }
}

/// Collision response against a surface with outward unit normal `normal`
/// (pointing from the surface toward the particle).
///
/// Only a velocity moving into the surface is reflected: the normal component
/// flips and is scaled by `restitution`, the tangential component is scaled
/// by `1 - friction`. Neither factor can increase the speed.
pub fn reflect_velocity(velocity: DVec2, normal: DVec2, restitution: f64, friction: f64) -> DVec2 {
    let vn = velocity.dot(normal);
    if vn >= 0.0 {
        return velocity;
    }
    let normal_part = normal * vn;
    let tangent_part = velocity - normal_part;
    tangent_part * (1.0 - clamp01(friction)) - normal_part * clamp01(restitution)
}
