//! Falling power-up pickups

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::body::{Body, Entity};
use super::projectile::Rgb;
use crate::consts::*;

pub const POWERUP_SIZE: f32 = 20.0;
pub const POWERUP_FALL_SPEED: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerupKind {
    /// Restore one health unit
    Health,
    /// One extra shield charge
    Shield,
    /// Timed fire-rate and damage boost
    Firepower,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 3] = [PowerupKind::Health, PowerupKind::Shield, PowerupKind::Firepower];

    pub fn color(self) -> Rgb {
        match self {
            PowerupKind::Health => [0, 255, 0],
            PowerupKind::Shield => [0, 0, 255],
            PowerupKind::Firepower => [255, 165, 0],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Powerup {
    pub body: Body,
    pub kind: PowerupKind,
}

impl Entity for Powerup {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Powerup {
    pub fn new(kind: PowerupKind, pos: Vec2) -> Self {
        Self {
            body: Body::new(pos, Vec2::splat(POWERUP_SIZE)).with_velocity(Vec2::new(0.0, POWERUP_FALL_SPEED)),
            kind,
        }
    }

    /// Roll the drop chance; on success pick a kind uniformly
    pub fn roll_drop<R: Rng + ?Sized>(rng: &mut R, pos: Vec2, chance: f32) -> Option<Self> {
        if !rng.random_bool(chance.clamp(0.0, 1.0) as f64) {
            return None;
        }
        PowerupKind::ALL.choose(rng).map(|&kind| Self::new(kind, pos))
    }

    pub fn advance(&mut self, dt: f32) {
        self.body.integrate(dt);
        if self.body.top() > FIELD_HEIGHT {
            self.body.alive = false;
        }
    }

    /// Radius used for the pickup overlap test
    pub fn pickup_radius(&self) -> f32 {
        self.body.half.length() * PICKUP_HIT_RATIO
    }
}
