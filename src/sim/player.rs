//! Player ship: movement, damage gating, power-ups and firing

use glam::Vec2;
use rand::Rng;

use super::body::{Body, Entity};
use super::powerup::PowerupKind;
use super::projectile::Projectile;
use crate::consts::*;
use crate::tuning::PlayerTuning;

/// What a damage application did to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Invincible or already dead; nothing changed
    Ignored,
    /// A shield charge absorbed the hit
    Blocked,
    /// Health dropped and invincibility was armed
    Hurt,
    /// Health reached zero on this hit
    Died,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub health: u32,
    pub max_health: u32,
    pub shields: u32,
    pub invincible: bool,
    pub invincible_timer: f32,
    /// Elapsed time of the firepower boost, `None` when inactive
    pub boost_elapsed: Option<f32>,
    pub shot_cooldown: f32,
    shot_timer: f32,
    /// Kills so far; each one raises bolt damage
    pub kills: u32,
    pub dead: bool,
    tuning: PlayerTuning,
}

impl Entity for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn is_alive(&self) -> bool {
        !self.dead
    }

    fn destroy(&mut self) {
        self.dead = true;
    }
}

impl Player {
    pub fn new(tuning: &PlayerTuning) -> Self {
        let pos = Vec2::new(FIELD_WIDTH * 0.5, FIELD_HEIGHT - PLAYER_START_Y_OFFSET);
        Self {
            body: Body::new(pos, Vec2::splat(PLAYER_SIZE)),
            health: tuning.max_health,
            max_health: tuning.max_health,
            shields: 0,
            invincible: false,
            invincible_timer: 0.0,
            boost_elapsed: None,
            shot_cooldown: tuning.shot_cooldown,
            shot_timer: tuning.shot_cooldown,
            kills: 0,
            dead: false,
            tuning: tuning.clone(),
        }
    }

    /// Move along a normalized intent and keep the ship on the field
    pub fn steer(&mut self, intent: Vec2, dt: f32) {
        self.body.vel = intent * self.tuning.speed;
        self.body.integrate(dt);
        self.body.clamp_to_field();
    }

    /// Run the invincibility and boost timers
    pub fn update_timers(&mut self, dt: f32) {
        self.shot_timer += dt;

        if self.invincible {
            self.invincible_timer += dt;
            if self.invincible_timer >= self.tuning.invincible_duration {
                self.invincible = false;
                self.invincible_timer = 0.0;
            }
        }

        if let Some(elapsed) = self.boost_elapsed.as_mut() {
            *elapsed += dt;
            if *elapsed >= self.tuning.boost_duration {
                self.deactivate_boost();
            }
        }
    }

    /// Invincibility first, then shields, then health
    pub fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        if self.dead || self.invincible {
            return DamageOutcome::Ignored;
        }
        if self.shields > 0 {
            self.shields -= 1;
            return DamageOutcome::Blocked;
        }

        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.dead = true;
            DamageOutcome::Died
        } else {
            self.invincible = true;
            self.invincible_timer = 0.0;
            DamageOutcome::Hurt
        }
    }

    pub fn apply_powerup(&mut self, kind: PowerupKind) {
        match kind {
            PowerupKind::Health => self.health = (self.health + 1).min(self.max_health),
            PowerupKind::Shield => self.shields += 1,
            PowerupKind::Firepower => self.activate_boost(),
        }
    }

    /// Start the firepower boost, or restart its clock if already running
    pub fn activate_boost(&mut self) {
        self.boost_elapsed = Some(0.0);
        self.shot_cooldown = self.tuning.boosted_shot_cooldown;
    }

    fn deactivate_boost(&mut self) {
        self.boost_elapsed = None;
        self.shot_cooldown = self.tuning.shot_cooldown;
    }

    pub fn is_boosted(&self) -> bool {
        self.boost_elapsed.is_some()
    }

    /// Bolt damage before crits: grows with every kill
    pub fn base_damage(&self) -> f32 {
        1.0 + self.kills as f32 * self.tuning.kill_damage_bonus
    }

    pub fn collision_damage(&self) -> u32 {
        self.tuning.collision_damage
    }

    /// Fire one bolt if the cooldown allows
    pub fn try_fire<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Projectile> {
        if self.dead || self.shot_timer < self.shot_cooldown {
            return None;
        }
        self.shot_timer = 0.0;

        let mut damage = self.base_damage();
        let critical = rng.random::<f32>() < self.tuning.crit_chance;
        if critical {
            damage *= 2.0;
        }
        let powered = self.is_boosted();
        if powered {
            damage *= 3.0;
        }
        let muzzle = Vec2::new(self.body.pos.x, self.body.top());
        Some(Projectile::player_bolt(muzzle, damage, critical, powered))
    }
}
