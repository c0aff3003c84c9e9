//! Kinematic body shared by every mover
//!
//! A body is a centre point, a velocity and the half-extents of its
//! axis-aligned hitbox. Liveness is a flag: destruction only marks the body,
//! the owning arena sweeps it at the end of the tick.

use glam::Vec2;

use crate::consts::*;

/// Axis-aligned bounding box in screen space (y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Box with the same centre and both extents multiplied by `ratio`
    pub fn scaled(&self, ratio: f32) -> Self {
        Self::from_center(self.center(), self.half_extents() * ratio)
    }

    /// Strict overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Overlap after shrinking/growing both boxes by `ratio`
    pub fn overlaps_scaled(&self, other: &Aabb, ratio: f32) -> bool {
        self.scaled(ratio).overlaps(&other.scaled(ratio))
    }

    /// True when the box lies entirely outside the field grown by `margin`
    pub fn outside_field(&self, margin: f32) -> bool {
        self.max.x < -margin
            || self.min.x > FIELD_WIDTH + margin
            || self.max.y < -margin
            || self.min.y > FIELD_HEIGHT + margin
    }
}

/// Position/velocity record with a hitbox and liveness flag
#[derive(Debug, Clone)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub half: Vec2,
    pub alive: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            half: size * 0.5,
            alive: true,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, self.half)
    }

    /// Explicit Euler step
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.half.y
    }

    /// Keep the whole box inside the play field
    pub fn clamp_to_field(&mut self) {
        self.pos.x = self.pos.x.clamp(self.half.x, FIELD_WIDTH - self.half.x);
        self.pos.y = self.pos.y.clamp(self.half.y, FIELD_HEIGHT - self.half.y);
    }
}

/// Capabilities shared by every simulated entity kind
pub trait Entity {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    fn hitbox(&self) -> Aabb {
        self.body().aabb()
    }

    fn is_alive(&self) -> bool {
        self.body().alive
    }

    /// Mark for removal; the arena frees the slot on its next sweep
    fn destroy(&mut self) {
        self.body_mut().alive = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_overlap_is_strict() {
        let a = Aabb::from_center(Vec2::ZERO, Vec2::splat(5.0));
        let b = Aabb::from_center(Vec2::new(10.0, 0.0), Vec2::splat(5.0));
        assert!(!a.overlaps(&b));
        let c = Aabb::from_center(Vec2::new(9.0, 0.0), Vec2::splat(5.0));
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_scaled_overlap_shrinks_both_boxes() {
        let a = Aabb::from_center(Vec2::ZERO, Vec2::splat(16.0));
        let b = Aabb::from_center(Vec2::new(28.0, 0.0), Vec2::splat(16.0));
        assert!(a.overlaps(&b));
        // 0.7 ratio: half-extents 11.2 each, 22.4 < 28
        assert!(!a.overlaps_scaled(&b, 0.7));
    }

    #[test]
    fn test_outside_field_uses_margin() {
        let inside_margin = Aabb::from_center(Vec2::new(-50.0, 100.0), Vec2::splat(4.0));
        assert!(!inside_margin.outside_field(OFFSCREEN_MARGIN));
        let beyond = Aabb::from_center(Vec2::new(-150.0, 100.0), Vec2::splat(4.0));
        assert!(beyond.outside_field(OFFSCREEN_MARGIN));
    }

    #[test]
    fn test_clamp_to_field_keeps_box_inside() {
        let mut body = Body::new(Vec2::new(-20.0, FIELD_HEIGHT + 30.0), Vec2::splat(32.0));
        body.clamp_to_field();
        assert_eq!(body.pos, Vec2::new(16.0, FIELD_HEIGHT - 16.0));
    }
}
