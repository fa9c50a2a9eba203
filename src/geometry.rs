//! Planar angle and distance helpers.
//! Angles are radians in screen space (y grows downwards), normalised to
//! `(-PI, PI]`.
use std::f32::consts::{PI, TAU};

use glam::Vec2;

/// Wraps an angle into `(-PI, PI]`.
///
/// Non-finite input collapses to `0.0`.
///
/// # Examples
/// ```
/// use skirmish::geometry::normalize_angle;
/// use std::f32::consts::PI;
/// assert!((normalize_angle(1.5 * PI) + 0.5 * PI).abs() < 1e-5);
/// assert!((normalize_angle(-PI) - PI).abs() < 1e-5);
/// ```
#[must_use]
pub fn normalize_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Heading from `from` towards `to`.
///
/// Coincident points have no bearing; `0.0` is returned.
#[must_use]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    if delta == Vec2::ZERO || !delta.is_finite() {
        return 0.0;
    }
    delta.y.atan2(delta.x)
}

/// Absolute wrapped difference between two headings, in `[0, PI]`.
///
/// # Examples
/// ```
/// use skirmish::geometry::angle_between;
/// use std::f32::consts::PI;
/// let diff = angle_between(PI - 0.1, -PI + 0.1);
/// assert!((diff - 0.2).abs() < 1e-5);
/// ```
#[must_use]
pub fn angle_between(a: f32, b: f32) -> f32 {
    normalize_angle(a - b).abs()
}

/// Unit vector for a heading.
#[must_use]
pub fn heading_vector(angle: f32) -> Vec2 {
    Vec2::from_angle(angle)
}

/// Whether two circles intersect (touching does not count).
#[must_use]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a.distance_squared(b) < reach * reach
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::f32::consts::FRAC_PI_2;

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(TAU, 0.0)]
    #[case(-FRAC_PI_2, -FRAC_PI_2)]
    #[case(3.0 * FRAC_PI_2, -FRAC_PI_2)]
    #[case(-PI, PI)]
    fn normalizes_into_half_open_range(#[case] input: f32, #[case] expected: f32) {
        assert_relative_eq!(normalize_angle(input), expected, epsilon = 1e-5);
    }

    #[rstest]
    fn nan_angle_collapses_to_zero() {
        assert_eq!(normalize_angle(f32::NAN), 0.0);
    }

    #[rstest]
    fn bearing_points_down_the_screen() {
        let b = bearing(Vec2::ZERO, Vec2::new(0.0, 10.0));
        assert_relative_eq!(b, FRAC_PI_2, epsilon = 1e-6);
    }

    #[rstest]
    fn coincident_points_have_zero_bearing() {
        assert_eq!(bearing(Vec2::ONE, Vec2::ONE), 0.0);
    }

    #[rstest]
    fn touching_circles_do_not_overlap() {
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(9.9, 0.0), 5.0));
    }
}
