//! Cosmetic effects: hit particles and floating damage numbers
//!
//! Nothing here feeds back into gameplay. Effects still draw from the run
//! RNG so a seeded run replays identically.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;

use super::projectile::Rgb;

pub const PARTICLE_LIFETIME: f32 = 0.3;
pub const PARTICLE_SPEED: f32 = 100.0;
/// Oldest particles are evicted beyond this
pub const MAX_PARTICLES: usize = 512;

pub const DAMAGE_TEXT_LIFETIME: f32 = 1.0;
pub const DAMAGE_TEXT_GRAVITY: f32 = 100.0;
pub const MAX_DAMAGE_TEXTS: usize = 64;

pub const HIT_PARTICLES: usize = 5;
pub const DEATH_PARTICLES: usize = 20;
pub const DEATH_COLOR: Rgb = [255, 165, 0];

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgb,
    pub age: f32,
}

impl Particle {
    /// Remaining opacity, 1 at spawn fading to 0
    pub fn alpha(&self) -> f32 {
        (1.0 - self.age / PARTICLE_LIFETIME).clamp(0.0, 1.0)
    }
}

/// Floating damage readout
#[derive(Debug, Clone)]
pub struct DamageText {
    pub pos: Vec2,
    pub vel: Vec2,
    pub amount: f32,
    pub critical: bool,
    pub age: f32,
}

impl DamageText {
    /// Text as shown on screen; crits get an exclamation mark
    pub fn label(&self) -> String {
        if self.critical {
            format!("{}!", self.amount)
        } else {
            format!("{}", self.amount)
        }
    }

    pub fn alpha(&self) -> f32 {
        (1.0 - self.age / DAMAGE_TEXT_LIFETIME).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Effects {
    /// Oldest first
    pub particles: VecDeque<Particle>,
    pub damage_texts: VecDeque<DamageText>,
}

impl Effects {
    /// Spawn `count` particles with random velocity at `pos`
    pub fn burst<R: Rng + ?Sized>(&mut self, rng: &mut R, pos: Vec2, color: Rgb, count: usize) {
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                self.particles.pop_front();
            }
            let vel = Vec2::new(
                rng.random_range(-PARTICLE_SPEED..=PARTICLE_SPEED),
                rng.random_range(-PARTICLE_SPEED..=PARTICLE_SPEED),
            );
            self.particles.push_back(Particle {
                pos,
                vel,
                color,
                age: 0.0,
            });
        }
    }

    pub fn damage_number<R: Rng + ?Sized>(&mut self, rng: &mut R, pos: Vec2, amount: f32, critical: bool) {
        if self.damage_texts.len() >= MAX_DAMAGE_TEXTS {
            self.damage_texts.pop_front();
        }
        let jitter = Vec2::new(rng.random_range(-15..=15) as f32, rng.random_range(-10..=10) as f32);
        let rise = if critical { -50.0 } else { -30.0 };
        self.damage_texts.push_back(DamageText {
            pos: pos + jitter,
            vel: Vec2::new(rng.random_range(-20..=20) as f32, rise),
            amount,
            critical,
            age: 0.0,
        });
    }

    pub fn advance(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.age += dt;
            p.pos += p.vel * dt;
        }
        self.particles.retain(|p| p.age < PARTICLE_LIFETIME);

        for t in &mut self.damage_texts {
            t.age += dt;
            t.vel.y += DAMAGE_TEXT_GRAVITY * dt;
            t.pos += t.vel * dt;
        }
        self.damage_texts.retain(|t| t.age < DAMAGE_TEXT_LIFETIME);
    }
}
