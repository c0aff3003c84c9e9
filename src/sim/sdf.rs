//! Signed distance helpers for the non-box collision shapes
//!
//! Beams are capsules (segment + half width) and pickups are circles; both
//! are tested against hitboxes through their signed distance.

use glam::Vec2;

use super::body::Aabb;

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Closest point to `p` on segment `a`-`b`
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Signed distance to an axis-aligned box (negative inside)
pub fn sd_box(p: Vec2, aabb: &Aabb) -> f32 {
    let d = (p - aabb.center()).abs() - aabb.half_extents();
    d.max(Vec2::ZERO).length() + d.x.max(d.y).min(0.0)
}

/// Capsule (segment with half width) against a box
///
/// Samples the segment at the point closest to the box centre, which is exact
/// for boxes smaller than the beam length.
pub fn capsule_hits_box(a: Vec2, b: Vec2, half_width: f32, aabb: &Aabb) -> bool {
    let probe = closest_point_on_segment(aabb.center(), a, b);
    sd_box(probe, aabb) <= half_width
}

/// Two circles touching or overlapping
#[inline]
pub fn circles_overlap(c1: Vec2, r1: f32, c2: Vec2, r2: f32) -> bool {
    sd_circle(c1, c2, r1 + r2) <= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sd_box_inside_and_outside() {
        let b = Aabb::from_center(Vec2::ZERO, Vec2::new(10.0, 5.0));
        assert!((sd_box(Vec2::new(15.0, 0.0), &b) - 5.0).abs() < 1e-5);
        assert!((sd_box(Vec2::ZERO, &b) + 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_closest_point_clamps_to_endpoints() {
        let end = Vec2::new(10.0, 0.0);
        assert_eq!(closest_point_on_segment(Vec2::new(-3.0, 4.0), Vec2::ZERO, end), Vec2::ZERO);
        let mid = closest_point_on_segment(Vec2::new(5.0, 2.0), Vec2::ZERO, end);
        assert!((mid - Vec2::new(5.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_capsule_hits_box() {
        let b = Aabb::from_center(Vec2::new(50.0, 20.0), Vec2::splat(8.0));
        let (a, e) = (Vec2::ZERO, Vec2::new(100.0, 0.0));
        assert!(!capsule_hits_box(a, e, 5.0, &b));
        assert!(capsule_hits_box(a, e, 12.5, &b));
    }

    #[test]
    fn test_degenerate_segment() {
        assert_eq!(closest_point_on_segment(Vec2::ONE, Vec2::ZERO, Vec2::ZERO), Vec2::ZERO);
    }
}
