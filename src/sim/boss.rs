//! Boss phase machine and attack patterns
//!
//! A boss walks through phases 1-4 as its health first drops to 50%, 30%
//! and 10% of max. Each threshold fires once and appends its unlocked
//! patterns to the roster; nothing is ever removed. On every cadence tick
//! the whole roster fires through [`fire_pattern`].

use glam::Vec2;
use rand::Rng;

use super::body::Body;
use super::projectile::{Projectile, Rgb};
use crate::consts::*;
use crate::{heading_deg, heading_or, rotate_deg};

/// Health fractions that advance the boss to phases 2, 3 and 4
pub const PHASE_THRESHOLDS: [f32; 3] = [0.5, 0.3, 0.1];
pub const MAX_PHASE: u8 = 4;

pub const BOSS_SIZE: Vec2 = Vec2::new(128.0, 64.0);
pub const BOSS_START_Y: f32 = 100.0;
pub const BOSS_MOVE_SPEED: f32 = 150.0;
/// Half width of the horizontal patrol around the field centre
pub const BOSS_PATROL_HALF_RANGE: f32 = 150.0;
pub const BOSS_BOB_AMPLITUDE: f32 = 20.0;

pub const LASER_COOLDOWN: f32 = 5.0;
pub const LASER_DURATION: f32 = 1.5;
pub const LASER_WIDTH: f32 = 15.0;
pub const MINION_INTERVAL: f32 = 5.0;
pub const MINION_OFFSET: Vec2 = Vec2::new(150.0, 80.0);
pub const MINION_HEALTH: f32 = 3.0;
pub const BLACK_HOLE_COOLDOWN: f32 = 15.0;

/// Attack pattern tags, resolved by [`fire_pattern`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackPattern {
    Spiral,
    Spread,
    Ring,
    Homing,
    Bounce,
    Shotgun,
    Minefield,
    CrossLasers,
    Matrix,
    HomingRing,
    Mirror,
    Dna,
    RotatingShield,
    Shockwave,
}

impl AttackPattern {
    /// Patterns that aim at the player and do nothing without a target
    pub fn targets_player(self) -> bool {
        matches!(
            self,
            AttackPattern::Spread | AttackPattern::Homing | AttackPattern::Shotgun | AttackPattern::Mirror
        )
    }
}

/// Read-only view handed to a pattern when it fires
#[derive(Debug, Clone, Copy)]
pub struct PatternContext {
    pub origin: Vec2,
    pub target: Option<Vec2>,
    pub phase: u8,
    /// Boss clock in milliseconds, drives the time-varying angles
    pub clock_ms: f32,
}

/// Fire one attack pattern into `out`
pub fn fire_pattern<R: Rng + ?Sized>(
    pattern: AttackPattern,
    ctx: &PatternContext,
    rng: &mut R,
    out: &mut Vec<Projectile>,
) {
    let origin = ctx.origin;
    match pattern {
        AttackPattern::Spiral => {
            let angle = (ctx.clock_ms % 360.0).floor() * 3.0;
            out.push(Projectile::enemy_bolt(origin, heading_deg(angle), 350.0, [50, 200, 255]));
        }

        AttackPattern::Spread => {
            let Some(dir) = aim(ctx) else { return };
            for angle in [-15.0, 0.0, 15.0] {
                out.push(Projectile::enemy_bolt(origin, rotate_deg(dir, angle), 400.0, [255, 0, 200]));
            }
        }

        AttackPattern::Ring => {
            for i in 0..24 {
                let dir = heading_deg(i as f32 * 15.0);
                out.push(Projectile::enemy_bolt(origin, dir, 250.0, [255, 150, 0]));
            }
        }

        AttackPattern::Homing => {
            if ctx.target.is_some() {
                out.push(Projectile::homing(origin, Vec2::Y, 200.0, [255, 0, 150]));
            }
        }

        AttackPattern::Bounce => {
            let angle = rng.random_range(-45.0f32..=45.0);
            out.push(Projectile::bounce(origin, heading_deg(angle), 300.0, [0, 0, 255]));
        }

        AttackPattern::Shotgun => {
            let Some(dir) = aim(ctx) else { return };
            for step in -4..=4 {
                let speed = 400.0 + rng.random_range(-50..=50) as f32;
                let red: u8 = rng.random_range(100..=255);
                out.push(Projectile::enemy_bolt(
                    origin,
                    rotate_deg(dir, step as f32 * 15.0),
                    speed,
                    [red, 0, 0],
                ));
            }
        }

        AttackPattern::Minefield => {
            for _ in 0..3 {
                let offset = Vec2::new(
                    rng.random_range(-200..=200) as f32,
                    rng.random_range(50..=150) as f32,
                );
                let delay = 1.5 + rng.random_range(0.0f32..=1.5);
                out.push(Projectile::mine(origin + offset, delay, [255, 255, 0]));
            }
        }

        AttackPattern::CrossLasers => {
            let rotation = if ctx.phase == 1 { 45.0 } else { 90.0 };
            for angle in [0.0, 90.0, 180.0, 270.0] {
                out.push(Projectile::rotating_laser(
                    origin,
                    heading_deg(angle),
                    rotation,
                    2.0,
                    [255, 100, 200],
                ));
            }
        }

        AttackPattern::Matrix => {
            const SPACING: f32 = 80.0;
            let offset = (ctx.clock_ms % 2000.0) / 2000.0 * SPACING;
            for col in 0..5u8 {
                for row in 0..3u8 {
                    let pos = Vec2::new(
                        col as f32 * SPACING + offset - 200.0 + origin.x - 200.0,
                        row as f32 * SPACING + offset + 50.0,
                    );
                    let dir = rotate_deg(Vec2::Y, rng.random_range(-5.0f32..=5.0));
                    out.push(Projectile::enemy_bolt(pos, dir, 250.0, [col * 50, row * 80, 150]));
                }
            }
        }

        AttackPattern::HomingRing => {
            let base = (ctx.clock_ms % 360.0).floor() * 0.5;
            for i in 0..12 {
                let dir = heading_deg(base + i as f32 * 30.0);
                out.push(Projectile::homing(origin, dir, 180.0, [255, 150, 0]).with_seek_delay(1.0));
            }
        }

        AttackPattern::Mirror => {
            let Some(target) = ctx.target else { return };
            for offset in [-50.0, 0.0, 50.0] {
                let pos = origin + Vec2::new(offset, 0.0);
                let dir = heading_or(target - pos, Vec2::Y);
                out.push(Projectile::mirror(pos, dir, 3, [200, 200, 0]));
            }
        }

        AttackPattern::Dna => {
            for i in 0..30u8 {
                let angle = i as f32 * 137.5;
                let pos = origin + heading_deg(angle) * (i as f32 * 3.0);
                let color: Rgb = [i * 8, 150u8.saturating_sub(i * 5), 200];
                out.push(Projectile::enemy_bolt(
                    pos,
                    heading_deg(angle + 90.0),
                    250.0 + i as f32 * 2.0,
                    color,
                ));
            }
        }

        AttackPattern::RotatingShield => {
            let base = (ctx.clock_ms % 360.0).floor() * 2.0;
            for i in 0..8 {
                let pos = origin + heading_deg(base + i as f32 * 45.0) * 80.0;
                out.push(Projectile::enemy_bolt(pos, Vec2::Y, 200.0, [0, 200, 200]));
            }
        }

        AttackPattern::Shockwave => {
            out.push(Projectile::shockwave(origin, 200.0, [150, 150, 255]));
        }
    }
}

/// Unit direction from the boss to the player, if there is one
fn aim(ctx: &PatternContext) -> Option<Vec2> {
    let to_target = ctx.target? - ctx.origin;
    let dir = to_target.normalize_or_zero();
    (dir != Vec2::ZERO).then_some(dir)
}

/// Roster at spawn plus the patterns unlocked on entering phases 2, 3 and 4
fn seed_roster(tier: u32) -> (Vec<AttackPattern>, [Vec<AttackPattern>; 3]) {
    use AttackPattern::*;

    let mut roster = vec![Spiral];
    let mut unlocks: [Vec<AttackPattern>; 3] = Default::default();
    if tier >= 2 {
        roster.push(Spread);
        unlocks[0].push(Ring);
        unlocks[1].push(Mirror);
    }
    if tier >= 3 {
        roster.push(Homing);
        unlocks[0].push(Bounce);
        unlocks[2].extend([Shotgun, Dna]);
    }
    if tier >= 4 {
        roster.push(Minefield);
        unlocks[0].push(RotatingShield);
        unlocks[1].push(CrossLasers);
        unlocks[2].extend([Matrix, HomingRing, Shockwave]);
    }
    (roster, unlocks)
}

/// Boss-only state carried by the boss enemy
#[derive(Debug, Clone)]
pub struct BossState {
    /// Spawner phase the boss was scaled for
    pub tier: u32,
    /// Current phase, 1..=4, never decreases
    pub phase: u8,
    thresholds_fired: [bool; 3],
    pub roster: Vec<AttackPattern>,
    unlocks: [Vec<AttackPattern>; 3],
    /// Seconds between roster volleys
    pub cadence: f32,
    attack_timer: f32,
    laser_timer: f32,
    minion_timer: f32,
    black_hole_timer: f32,
    direction: f32,
    volley_due: bool,
    laser_due: bool,
    minions_due: bool,
    black_hole_due: bool,
}

impl BossState {
    pub fn new(tier: u32, cadence: f32) -> Self {
        let (roster, unlocks) = seed_roster(tier);
        Self {
            tier,
            phase: 1,
            thresholds_fired: [false; 3],
            roster,
            unlocks,
            cadence,
            attack_timer: 0.0,
            laser_timer: 0.0,
            minion_timer: 0.0,
            black_hole_timer: 0.0,
            direction: 1.0,
            volley_due: false,
            laser_due: false,
            minions_due: false,
            black_hole_due: false,
        }
    }

    /// Advance through every threshold the current health has reached
    ///
    /// Returns how many phases were entered by this call.
    pub fn check_thresholds(&mut self, health: f32, max_health: f32) -> u8 {
        let mut entered = 0;
        for (i, fraction) in PHASE_THRESHOLDS.iter().enumerate() {
            if self.thresholds_fired[i] || health > max_health * fraction {
                continue;
            }
            self.thresholds_fired[i] = true;
            self.phase = (i as u8 + 2).max(self.phase);
            let unlocked = std::mem::take(&mut self.unlocks[i]);
            log::info!(
                "Boss entered phase {} ({:.0}/{:.0} hp), unlocked {:?}",
                self.phase,
                health.max(0.0),
                max_health,
                unlocked
            );
            self.roster.extend(unlocked);
            entered += 1;
        }
        entered
    }

    /// Patrol, bob, and run the attack timers
    pub fn advance(&mut self, body: &mut Body, age: f32, dt: f32) {
        let center = FIELD_WIDTH * 0.5;
        let (left, right) = (center - BOSS_PATROL_HALF_RANGE, center + BOSS_PATROL_HALF_RANGE);
        let mut x = body.pos.x + BOSS_MOVE_SPEED * self.direction * dt;
        if x < left {
            x = left;
            self.direction = 1.0;
        } else if x > right {
            x = right;
            self.direction = -1.0;
        }
        body.pos.x = x;
        body.pos.y = BOSS_START_Y + BOSS_BOB_AMPLITUDE * (age * 1000.0 / 300.0).sin();

        self.attack_timer += dt;
        self.laser_timer += dt;
        if self.phase >= 2 && self.laser_timer >= LASER_COOLDOWN {
            self.laser_due = true;
            self.laser_timer = 0.0;
        }
        if self.attack_timer >= self.cadence {
            self.volley_due = true;
            self.attack_timer = 0.0;
        }

        self.minion_timer += dt;
        self.black_hole_timer += dt;
        if self.phase >= 2 && self.minion_timer >= MINION_INTERVAL {
            self.minions_due = true;
            self.minion_timer = 0.0;
        }
        if self.phase >= 3 && self.black_hole_timer >= BLACK_HOLE_COOLDOWN {
            self.black_hole_due = true;
            self.black_hole_timer = 0.0;
        }
    }

    /// Consume a pending minion summon
    pub fn take_minions(&mut self) -> bool {
        std::mem::take(&mut self.minions_due)
    }

    /// Emit everything that came due during `advance`
    pub fn emit_fire<R: Rng + ?Sized>(
        &mut self,
        origin: Vec2,
        target: Option<Vec2>,
        age: f32,
        rng: &mut R,
        out: &mut Vec<Projectile>,
    ) {
        let ctx = PatternContext {
            origin,
            target,
            phase: self.phase,
            clock_ms: age * 1000.0,
        };

        if std::mem::take(&mut self.laser_due)
            && let Some(dir) = aim(&ctx)
        {
            out.push(Projectile::laser(origin, dir, LASER_DURATION, LASER_WIDTH, [255, 50, 50]));
        }
        if std::mem::take(&mut self.volley_due) {
            for &pattern in &self.roster {
                fire_pattern(pattern, &ctx, rng, out);
            }
        }
        if std::mem::take(&mut self.black_hole_due) {
            let dx = rng.random_range(-200..=200) as f32;
            out.push(Projectile::black_hole(origin + Vec2::new(dx, 150.0)));
        }
    }

    /// Health-bar colour for the current phase
    pub fn color(&self) -> Rgb {
        match self.phase {
            1 => [200, 50, 200],
            2 => [150, 0, 200],
            3 => [255, 255, 150],
            _ => [255, 0, 100],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::projectile::ProjectileKind;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx(target: Option<Vec2>) -> PatternContext {
        PatternContext {
            origin: Vec2::new(640.0, 100.0),
            target,
            phase: 1,
            clock_ms: 0.0,
        }
    }

    #[test]
    fn test_seed_roster_by_tier() {
        assert_eq!(BossState::new(1, 0.8).roster, vec![AttackPattern::Spiral]);
        let b = BossState::new(4, 0.8);
        assert_eq!(
            b.roster,
            vec![
                AttackPattern::Spiral,
                AttackPattern::Spread,
                AttackPattern::Homing,
                AttackPattern::Minefield
            ]
        );
    }

    #[test]
    fn test_threshold_cascade_fires_each_once() {
        let mut b = BossState::new(3, 0.8);
        // One hit from full to 20%: phases 2 and 3 together
        assert_eq!(b.check_thresholds(20.0, 100.0), 2);
        assert_eq!(b.phase, 3);
        assert!(b.roster.contains(&AttackPattern::Ring));
        assert!(b.roster.contains(&AttackPattern::Mirror));
        let len = b.roster.len();

        assert_eq!(b.check_thresholds(15.0, 100.0), 0);
        assert_eq!(b.roster.len(), len);
        assert_eq!(b.check_thresholds(10.0, 100.0), 1);
        assert_eq!(b.phase, 4);
        assert!(b.roster.contains(&AttackPattern::Dna));
    }

    #[test]
    fn test_phase_never_regresses_after_heal() {
        let mut b = BossState::new(1, 0.8);
        b.check_thresholds(40.0, 100.0);
        b.check_thresholds(100.0, 100.0);
        assert_eq!(b.phase, 2);
    }

    #[test]
    fn test_targeting_patterns_noop_without_target() {
        let mut rng = Pcg32::seed_from_u64(1);
        for pattern in [
            AttackPattern::Spread,
            AttackPattern::Homing,
            AttackPattern::Shotgun,
            AttackPattern::Mirror,
        ] {
            assert!(pattern.targets_player());
            let mut out = Vec::new();
            fire_pattern(pattern, &ctx(None), &mut rng, &mut out);
            assert!(out.is_empty(), "{pattern:?} fired without a target");
        }
    }

    #[test]
    fn test_pattern_volumes() {
        let mut rng = Pcg32::seed_from_u64(7);
        let target = Some(Vec2::new(640.0, 600.0));
        let count = |p: AttackPattern, rng: &mut Pcg32| {
            let mut out = Vec::new();
            fire_pattern(p, &ctx(target), rng, &mut out);
            out.len()
        };
        assert_eq!(count(AttackPattern::Ring, &mut rng), 24);
        assert_eq!(count(AttackPattern::Shotgun, &mut rng), 9);
        assert_eq!(count(AttackPattern::Matrix, &mut rng), 15);
        assert_eq!(count(AttackPattern::Dna, &mut rng), 30);
        assert_eq!(count(AttackPattern::HomingRing, &mut rng), 12);
        assert_eq!(count(AttackPattern::CrossLasers, &mut rng), 4);
        assert_eq!(count(AttackPattern::Minefield, &mut rng), 3);
    }

    #[test]
    fn test_cross_laser_rotation_depends_on_phase() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut out = Vec::new();
        let mut c = ctx(None);
        c.phase = 3;
        fire_pattern(AttackPattern::CrossLasers, &c, &mut rng, &mut out);
        assert!(out.iter().all(|p| matches!(
            p.kind,
            ProjectileKind::Laser { rotation_speed, .. } if rotation_speed == 90.0
        )));
    }

    #[test]
    fn test_patrol_stays_in_bounds() {
        let mut b = BossState::new(1, 0.8);
        let mut body = Body::new(Vec2::new(FIELD_WIDTH * 0.5, BOSS_START_Y), BOSS_SIZE);
        let mut age = 0.0;
        for _ in 0..600 {
            age += SIM_DT;
            b.advance(&mut body, age, SIM_DT);
            assert!((body.pos.x - FIELD_WIDTH * 0.5).abs() <= BOSS_PATROL_HALF_RANGE + 1e-3);
            assert!((body.pos.y - BOSS_START_Y).abs() <= BOSS_BOB_AMPLITUDE + 1e-3);
        }
    }

    #[test]
    fn test_laser_and_minions_wait_for_phase_two() {
        let mut b = BossState::new(1, 100.0);
        let mut body = Body::new(Vec2::new(640.0, 100.0), BOSS_SIZE);
        b.advance(&mut body, 6.0, 6.0);
        assert!(!b.take_minions());
        let mut rng = Pcg32::seed_from_u64(0);
        let mut out = Vec::new();
        b.emit_fire(body.pos, Some(Vec2::new(640.0, 600.0)), 6.0, &mut rng, &mut out);
        assert!(out.is_empty());

        b.check_thresholds(40.0, 100.0);
        b.advance(&mut body, 12.0, 6.0);
        assert!(b.take_minions());
        assert!(!b.take_minions());
        b.emit_fire(body.pos, Some(Vec2::new(640.0, 600.0)), 12.0, &mut rng, &mut out);
        assert_eq!(out.len(), 1);
        assert!(matches!(out[0].kind, ProjectileKind::Laser { .. }));
    }

    proptest! {
        #[test]
        fn prop_phase_is_monotonic(hits in prop::collection::vec(0.0f32..30.0, 1..40)) {
            let max = 200.0;
            let mut health = max;
            let mut b = BossState::new(4, 0.8);
            let mut fired = 0;
            let mut last_phase = b.phase;
            let mut last_roster = b.roster.len();
            for hit in hits {
                health -= hit;
                fired += b.check_thresholds(health, max) as usize;
                prop_assert!(b.phase >= last_phase);
                prop_assert!(b.roster.len() >= last_roster);
                last_phase = b.phase;
                last_roster = b.roster.len();
            }
            prop_assert!(fired <= 3);
            prop_assert_eq!(fired, (b.phase - 1) as usize);
        }
    }
}
