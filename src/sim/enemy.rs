//! Enemy archetypes
//!
//! Enemies share one struct; the archetype lives in [`EnemyKind`] together
//! with its private state. The boss is a distinguished kind carrying a
//! [`BossState`].

use glam::Vec2;
use rand::Rng;

use super::body::{Body, Entity};
use super::boss::{self, BossState};
use super::projectile::{Projectile, Rgb};
use crate::consts::*;
use crate::tuning::BossTuning;
use crate::{heading_deg, heading_or, rotate_deg, signed_angle_deg};

/// Archetype tag used by the spawner's unlock tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archetype {
    Basic,
    Circle,
    Zigzag,
    HomingDrone,
    Shielded,
    Spiral,
    Carrier,
    Stealth,
}

pub const ZIGZAG_AMPLITUDE: f32 = 100.0;
pub const ZIGZAG_FREQUENCY: f32 = 2.0;
/// Circle enemies with no velocity still sink at this rate
pub const STATIONARY_DRIFT: f32 = 100.0;
pub const SHIELD_RECHARGE: f32 = 5.0;
pub const STEALTH_REVEAL_RADIUS: f32 = 300.0;
pub const STEALTH_FADE_SPEED: f32 = 200.0;
pub const CARRIER_DRONE_INTERVAL: f32 = 3.0;

#[derive(Debug, Clone)]
pub enum EnemyKind {
    Basic,
    Circle,
    Zigzag,
    HomingDrone { turn_rate: f32, max_life: f32 },
    Shielded { shield_up: bool, recharge_timer: f32 },
    Spiral { rotate_speed: f32 },
    Carrier { drone_timer: f32 },
    /// `alpha` is 0..=255; firing only while visible
    Stealth { alpha: f32, visible: bool },
    Boss(Box<BossState>),
}

/// Result of one damage application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyHit {
    /// Already destroyed this tick
    Ignored,
    /// Shield took the hit
    Absorbed,
    Damaged,
    /// This hit destroyed the enemy
    Killed,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: Body,
    pub health: f32,
    pub max_health: f32,
    pub score_value: u32,
    pub shoot_timer: f32,
    /// Player position snapshot from the last advance
    pub target: Option<Vec2>,
    /// Seconds since spawn, drives weaves and rotating patterns
    pub age: f32,
    pub kind: EnemyKind,
}

impl Entity for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Enemy {
    fn with_stats(pos: Vec2, size: Vec2, health: f32, score_value: u32, speed: f32, kind: EnemyKind) -> Self {
        Self {
            body: Body::new(pos, size).with_velocity(Vec2::new(0.0, speed)),
            health,
            max_health: health,
            score_value,
            shoot_timer: 0.0,
            target: None,
            age: 0.0,
            kind,
        }
    }

    /// Fresh enemy of `archetype` with its base stats
    pub fn new(archetype: Archetype, pos: Vec2) -> Self {
        let square = Vec2::splat(32.0);
        match archetype {
            Archetype::Basic => Self::with_stats(pos, square, 1.0, 100, 150.0, EnemyKind::Basic),
            Archetype::Circle => Self::with_stats(pos, square, 2.0, 200, 300.0, EnemyKind::Circle),
            Archetype::Zigzag => Self::with_stats(pos, square, 3.0, 150, 200.0, EnemyKind::Zigzag),
            Archetype::HomingDrone => Self::with_stats(
                pos,
                Vec2::splat(36.0),
                5.0,
                300,
                50.0,
                EnemyKind::HomingDrone {
                    turn_rate: 90.0,
                    max_life: 7.0,
                },
            ),
            Archetype::Shielded => Self::with_stats(
                pos,
                Vec2::splat(40.0),
                5.0,
                250,
                50.0,
                EnemyKind::Shielded {
                    shield_up: true,
                    recharge_timer: 0.0,
                },
            ),
            Archetype::Spiral => Self::with_stats(
                pos,
                square,
                2.0,
                200,
                300.0,
                EnemyKind::Spiral { rotate_speed: 180.0 },
            ),
            Archetype::Carrier => Self::with_stats(
                pos,
                Vec2::new(64.0, 32.0),
                20.0,
                500,
                50.0,
                EnemyKind::Carrier { drone_timer: 0.0 },
            ),
            Archetype::Stealth => Self::with_stats(
                pos,
                square,
                2.0,
                200,
                150.0,
                EnemyKind::Stealth {
                    alpha: 0.0,
                    visible: false,
                },
            ),
        }
    }

    /// Boss scaled for spawner phase `tier`
    pub fn boss(tier: u32, tuning: &BossTuning) -> Self {
        let tier = tier.max(1);
        let scale = (tier as f32).powf(tuning.health_exponent) * tuning.health_multiplier;
        let cadence = tuning.attack_cadence / (tier as f32).sqrt();
        let mut boss = Self::with_stats(
            Vec2::new(FIELD_WIDTH * 0.5, boss::BOSS_START_Y),
            boss::BOSS_SIZE,
            tuning.base_max_health * scale,
            tuning.base_score * tier,
            0.0,
            EnemyKind::Boss(Box::new(BossState::new(tier, cadence))),
        );
        boss.body.vel = Vec2::ZERO;
        boss
    }

    /// Apply spawner difficulty multipliers
    pub fn scaled(mut self, health_mult: f32, speed_mult: f32, score_mult: f32) -> Self {
        self.health *= health_mult;
        self.max_health *= health_mult;
        self.body.vel *= speed_mult;
        self.score_value = (self.score_value as f32 * score_mult) as u32;
        self
    }

    pub fn boss_state(&self) -> Option<&BossState> {
        match &self.kind {
            EnemyKind::Boss(b) => Some(b),
            _ => None,
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss(_))
    }

    /// Kamikaze enemies die on contact with the player
    pub fn is_kamikaze(&self) -> bool {
        matches!(
            self.kind,
            EnemyKind::Basic
                | EnemyKind::Circle
                | EnemyKind::Zigzag
                | EnemyKind::Shielded { .. }
                | EnemyKind::Spiral { .. }
                | EnemyKind::Stealth { .. }
        )
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            (self.health / self.max_health).clamp(0.0, 1.0)
        }
    }

    /// Cosmetic colour tag
    pub fn color(&self) -> Rgb {
        match &self.kind {
            EnemyKind::Basic => [100, 100, 100],
            EnemyKind::Circle => [255, 150, 0],
            EnemyKind::Zigzag => [0, 200, 100],
            EnemyKind::HomingDrone { .. } => [150, 50, 200],
            EnemyKind::Shielded { shield_up: true, .. } => [100, 100, 255],
            EnemyKind::Shielded { .. } => [0, 0, 200],
            EnemyKind::Spiral { .. } => [255, 100, 0],
            EnemyKind::Carrier { .. } => [80, 80, 80],
            EnemyKind::Stealth { alpha, .. } => {
                let a = (*alpha / 255.0).clamp(0.0, 1.0);
                [(100.0 * a) as u8, (100.0 * a) as u8, (100.0 * a) as u8]
            }
            EnemyKind::Boss(b) => b.color(),
        }
    }

    /// Movement and AI for one tick
    ///
    /// Enemies released this tick (carrier drones, boss minions) are pushed
    /// onto `spawned`.
    pub fn advance(&mut self, dt: f32, target: Option<Vec2>, spawned: &mut Vec<Enemy>) {
        if !self.body.alive {
            return;
        }
        self.target = target;
        self.age += dt;
        self.shoot_timer += dt;

        match &mut self.kind {
            EnemyKind::Basic | EnemyKind::Spiral { .. } => self.body.integrate(dt),

            EnemyKind::Circle => {
                if self.body.vel == Vec2::ZERO {
                    self.body.pos.y += STATIONARY_DRIFT * dt;
                } else {
                    self.body.integrate(dt);
                }
            }

            EnemyKind::Zigzag => {
                self.body.integrate(dt);
                self.body.pos.x += (self.age * ZIGZAG_FREQUENCY).sin() * ZIGZAG_AMPLITUDE * dt;
            }

            EnemyKind::HomingDrone { turn_rate, max_life } => {
                if let Some(target) = target {
                    let to_target = target - self.body.pos;
                    if to_target.length() > 0.0 {
                        let speed = self.body.vel.length();
                        let current = heading_or(self.body.vel, Vec2::Y);
                        let max_turn = turn_rate.max(0.0) * dt;
                        let turn = signed_angle_deg(current, to_target.normalize())
                            .clamp(-max_turn, max_turn);
                        self.body.vel = rotate_deg(current, turn) * speed;
                    }
                }
                self.body.integrate(dt);
                if self.age > *max_life {
                    self.body.alive = false;
                }
            }

            EnemyKind::Shielded {
                shield_up,
                recharge_timer,
            } => {
                self.body.integrate(dt);
                if !*shield_up {
                    *recharge_timer += dt;
                    if *recharge_timer >= SHIELD_RECHARGE {
                        *shield_up = true;
                        *recharge_timer = 0.0;
                    }
                }
            }

            EnemyKind::Carrier { drone_timer } => {
                self.body.integrate(dt);
                *drone_timer += dt;
                if *drone_timer >= CARRIER_DRONE_INTERVAL {
                    *drone_timer = 0.0;
                    for i in -1..=1 {
                        let pos = self.body.pos + Vec2::new(i as f32 * 20.0, 20.0);
                        let mut drone = Enemy::new(Archetype::Basic, pos);
                        drone.score_value = 50;
                        drone.body.vel = Vec2::new(0.0, 200.0);
                        spawned.push(drone);
                    }
                }
            }

            EnemyKind::Stealth { alpha, visible } => {
                if let Some(target) = target {
                    let step = STEALTH_FADE_SPEED * dt;
                    if target.distance(self.body.pos) < STEALTH_REVEAL_RADIUS {
                        *alpha = (*alpha + step).min(255.0);
                        *visible = true;
                    } else {
                        *alpha = (*alpha - step).max(0.0);
                        *visible = false;
                    }
                }
                self.body.integrate(dt);
            }

            EnemyKind::Boss(boss) => {
                boss.advance(&mut self.body, self.age, dt);
                if boss.take_minions() {
                    for side in [-1.0, 1.0] {
                        let offset = Vec2::new(side * boss::MINION_OFFSET.x, boss::MINION_OFFSET.y);
                        let mut minion = Enemy::new(Archetype::Circle, self.body.pos + offset);
                        minion.body.vel = Vec2::ZERO;
                        minion.health = boss::MINION_HEALTH;
                        minion.max_health = boss::MINION_HEALTH;
                        spawned.push(minion);
                    }
                }
                return;
            }
        }

        if self.body.top() > FIELD_HEIGHT {
            self.body.alive = false;
        }
    }

    /// Fire whatever the archetype's cadence allows this tick
    pub fn emit_fire<R: Rng + ?Sized>(&mut self, rng: &mut R, out: &mut Vec<Projectile>) {
        if !self.body.alive {
            return;
        }
        let origin = self.body.pos;

        match &mut self.kind {
            EnemyKind::Basic | EnemyKind::Shielded { .. } => {
                if self.shoot_timer >= 2.0 {
                    out.push(Projectile::enemy_bolt(origin, Vec2::Y, 300.0, [100, 100, 100]));
                    self.shoot_timer = 0.0;
                }
            }

            EnemyKind::Circle => {
                if self.shoot_timer > 1.5 {
                    self.shoot_timer = 0.0;
                    for i in 0..24 {
                        out.push(Projectile::enemy_bolt(origin, heading_deg(i as f32 * 15.0), 400.0, [255, 0, 0]));
                    }
                }
            }

            EnemyKind::Zigzag => {
                if self.shoot_timer >= 1.2 {
                    for angle in [-15.0, 0.0, 15.0] {
                        out.push(Projectile::enemy_bolt(origin, rotate_deg(Vec2::Y, angle), 300.0, [0, 200, 100]));
                    }
                    self.shoot_timer = 0.0;
                }
            }

            EnemyKind::HomingDrone { .. } => {
                if self.shoot_timer >= 1.8 {
                    out.push(Projectile::homing(origin, Vec2::Y, 200.0, [200, 100, 200]));
                    self.shoot_timer = 0.0;
                }
            }

            EnemyKind::Spiral { rotate_speed } => {
                if self.shoot_timer > 0.8 {
                    let base = self.age * *rotate_speed;
                    for i in 0..8 {
                        let dir = heading_deg(base + i as f32 * 45.0);
                        out.push(Projectile::enemy_bolt(origin, dir, 250.0, [255, 150, 0]));
                    }
                    self.shoot_timer = 0.0;
                }
            }

            EnemyKind::Carrier { .. } => {
                if self.shoot_timer >= 2.5 {
                    for side in [-1.0, 1.0] {
                        let pos = origin + Vec2::new(side * 24.0, 0.0);
                        out.push(Projectile::enemy_bolt(pos, Vec2::Y, 300.0, [100, 100, 100]));
                    }
                    self.shoot_timer = 0.0;
                }
            }

            EnemyKind::Stealth { visible, .. } => {
                if *visible && self.shoot_timer >= 1.0 {
                    for angle in [-5.0, 0.0, 5.0] {
                        out.push(Projectile::enemy_bolt(origin, rotate_deg(Vec2::Y, angle), 400.0, [100, 100, 100]));
                    }
                    self.shoot_timer = 0.0;
                }
            }

            EnemyKind::Boss(boss) => boss.emit_fire(origin, self.target, self.age, rng, out),
        }
    }

    /// Reduce health; destruction happens exactly once, on the first hit
    /// that takes health to zero or below
    pub fn take_damage(&mut self, amount: f32) -> EnemyHit {
        if !self.body.alive {
            return EnemyHit::Ignored;
        }
        if let EnemyKind::Shielded {
            shield_up,
            recharge_timer,
        } = &mut self.kind
            && *shield_up
        {
            *shield_up = false;
            *recharge_timer = 0.0;
            return EnemyHit::Absorbed;
        }

        self.health -= amount.max(0.0);
        if self.health <= 0.0 {
            self.body.alive = false;
            return EnemyHit::Killed;
        }
        if let EnemyKind::Boss(boss) = &mut self.kind {
            boss.check_thresholds(self.health, self.max_health);
        }
        EnemyHit::Damaged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::projectile::ProjectileKind;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn at(archetype: Archetype) -> Enemy {
        Enemy::new(archetype, Vec2::new(640.0, 200.0))
    }

    #[test]
    fn test_kill_happens_once() {
        let mut e = at(Archetype::Zigzag);
        assert_eq!(e.take_damage(2.0), EnemyHit::Damaged);
        assert_eq!(e.take_damage(2.0), EnemyHit::Killed);
        assert_eq!(e.take_damage(2.0), EnemyHit::Ignored);
        assert!(!e.is_alive());
    }

    #[test]
    fn test_shield_absorbs_one_hit_and_recharges() {
        let mut e = at(Archetype::Shielded);
        assert_eq!(e.take_damage(3.0), EnemyHit::Absorbed);
        assert_eq!(e.health, 5.0);
        assert_eq!(e.take_damage(3.0), EnemyHit::Damaged);
        assert_eq!(e.health, 2.0);

        let mut spawned = Vec::new();
        for _ in 0..5 {
            e.advance(1.0, None, &mut spawned);
            e.body.pos.y = 200.0;
        }
        assert_eq!(e.take_damage(3.0), EnemyHit::Absorbed);
    }

    #[test]
    fn test_zigzag_weaves_and_keeps_firing() {
        let mut e = at(Archetype::Zigzag);
        let mut spawned = Vec::new();
        e.advance(0.5, None, &mut spawned);
        assert!(e.body.pos.x > 640.0);
        e.advance(0.8, None, &mut spawned);

        let mut rng = Pcg32::seed_from_u64(1);
        let mut out = Vec::new();
        e.emit_fire(&mut rng, &mut out);
        assert_eq!(out.len(), 3);
        assert_eq!(e.shoot_timer, 0.0);
    }

    #[test]
    fn test_culled_below_field() {
        let mut e = Enemy::new(Archetype::Basic, Vec2::new(100.0, FIELD_HEIGHT + 10.0));
        e.advance(0.1, None, &mut Vec::new());
        assert!(!e.is_alive());
    }

    #[test]
    fn test_stealth_fires_only_when_revealed() {
        let mut e = at(Archetype::Stealth);
        let mut rng = Pcg32::seed_from_u64(2);
        let mut out = Vec::new();
        e.advance(1.5, Some(Vec2::new(640.0, 1200.0)), &mut Vec::new());
        e.emit_fire(&mut rng, &mut out);
        assert!(out.is_empty());

        let near = Some(e.body.pos + Vec2::new(0.0, 100.0));
        e.advance(0.1, near, &mut Vec::new());
        e.emit_fire(&mut rng, &mut out);
        assert_eq!(out.len(), 3);
        assert!(matches!(e.kind, EnemyKind::Stealth { alpha, visible: true } if alpha > 0.0));
    }

    #[test]
    fn test_homing_drone_turns_toward_player() {
        let mut e = at(Archetype::HomingDrone);
        e.advance(0.1, Some(Vec2::new(1000.0, 200.0)), &mut Vec::new());
        assert!(e.body.vel.x > 0.0);
        assert!((e.body.vel.length() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_carrier_releases_drones() {
        let mut e = at(Archetype::Carrier);
        let mut spawned = Vec::new();
        e.advance(3.0, None, &mut spawned);
        assert_eq!(spawned.len(), 3);
        assert!(spawned.iter().all(|d| d.score_value == 50 && d.body.vel.y == 200.0));
    }

    #[test]
    fn test_boss_scaling_for_phase_two() {
        let tuning = BossTuning::default();
        let boss = Enemy::boss(2, &tuning);
        let expected = 50.0 * 2f32.powf(1.3) * 5.0;
        assert!((boss.max_health - expected).abs() < 1e-3);
        assert_eq!(boss.health, boss.max_health);
        assert_eq!(boss.score_value, 2000);
        let state = boss.boss_state().unwrap();
        assert!((state.cadence - 0.8 / 2f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_boss_damage_advances_phase() {
        let mut boss = Enemy::boss(1, &BossTuning::default());
        let max = boss.max_health;
        boss.take_damage(max * 0.75);
        assert_eq!(boss.boss_state().unwrap().phase, 3);
    }

    #[test]
    fn test_boss_summons_stationary_minions() {
        let mut boss = Enemy::boss(1, &BossTuning::default());
        let max = boss.max_health;
        boss.take_damage(max * 0.6);
        let mut spawned = Vec::new();
        boss.advance(5.0, None, &mut spawned);
        assert_eq!(spawned.len(), 2);
        for m in &spawned {
            assert_eq!(m.body.vel, Vec2::ZERO);
            assert_eq!(m.health, 3.0);
        }
        // Minions sink even with zero velocity
        let mut minion = spawned.remove(0);
        let y = minion.body.pos.y;
        minion.advance(0.1, None, &mut Vec::new());
        assert!((minion.body.pos.y - y - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_boss_volley_fires_roster() {
        let mut boss = Enemy::boss(1, &BossTuning::default());
        let mut rng = Pcg32::seed_from_u64(9);
        let mut out = Vec::new();
        boss.advance(0.8, None, &mut Vec::new());
        boss.emit_fire(&mut rng, &mut out);
        assert_eq!(out.len(), 1);
        assert!(matches!(out[0].kind, ProjectileKind::Linear));
    }

    #[test]
    fn test_scaling_keeps_health_at_max() {
        let e = at(Archetype::Carrier).scaled(1.5, 1.2, 2.0);
        assert_eq!(e.health, e.max_health);
        assert_eq!(e.score_value, 1000);
        assert!((e.body.vel.y - 60.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_health_non_increasing(hits in prop::collection::vec(0.0f32..4.0, 1..30)) {
            let mut e = at(Archetype::Carrier);
            let mut last = e.health;
            let mut kills = 0;
            for hit in hits {
                if e.take_damage(hit) == EnemyHit::Killed {
                    kills += 1;
                }
                prop_assert!(e.health <= last);
                prop_assert!(e.health <= e.max_health);
                last = e.health;
            }
            prop_assert!(kills <= 1);
            prop_assert_eq!(kills == 1, !e.is_alive());
        }
    }
}
