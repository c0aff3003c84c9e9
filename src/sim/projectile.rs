//! Projectile archetypes
//!
//! Every projectile is one struct with a behaviour tag carrying the
//! archetype's parameters. Movement rules are deliberately ad hoc per
//! archetype; there is no general physics.

use glam::Vec2;

use super::arena::Arena;
use super::body::{Aabb, Body, Entity};
use crate::consts::*;
use crate::{heading_deg, heading_or, rotate_deg, signed_angle_deg};

/// RGB colour tag (cosmetic only)
pub type Rgb = [u8; 3];

/// Which side fired the projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Enemy,
}

/// Logical population membership as a bitset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tags(u8);

impl Tags {
    /// Collides with the player
    pub const HOSTILE: Tags = Tags(1 << 0);
    /// Collides with enemies
    pub const FRIENDLY: Tags = Tags(1 << 1);
    /// Displaced by black holes
    pub const PULLABLE: Tags = Tags(1 << 2);

    pub const fn empty() -> Self {
        Tags(0)
    }

    pub const fn union(self, other: Tags) -> Tags {
        Tags(self.0 | other.0)
    }

    pub const fn contains(self, other: Tags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Tags {
    type Output = Tags;
    fn bitor(self, rhs: Tags) -> Tags {
        self.union(rhs)
    }
}

/// Homing bullets turn at this rate (degrees/second)
pub const HOMING_TURN_RATE: f32 = 120.0;
/// Homing bullets expire after this many seconds
pub const HOMING_MAX_LIFE: f32 = 3.0;
/// Homing bullets stop steering once closer than this
pub const HOMING_MIN_STEER_DIST: f32 = 10.0;
pub const BOUNCE_MAX: u32 = 3;
pub const MINE_RING_COUNT: u32 = 12;
pub const MINE_RING_SPEED: f32 = 350.0;
pub const BLACK_HOLE_MAX_RADIUS: f32 = 300.0;
pub const BLACK_HOLE_DURATION: f32 = 4.0;
pub const BLACK_HOLE_PULL: f32 = 800.0;
pub const BLACK_HOLE_MARGIN: f32 = 50.0;
/// Bullets are displaced at half the nominal pull
const BLACK_HOLE_BULLET_FACTOR: f32 = 0.5;
pub const LASER_DEFAULT_WIDTH: f32 = 10.0;
pub const SHOCKWAVE_HEIGHT: f32 = 30.0;

/// Archetype-specific behaviour state
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectileKind {
    /// Straight flight until it leaves the extended field
    Linear,
    /// Steers toward the target snapshot, capped at `turn_rate` deg/s
    Homing {
        turn_rate: f32,
        max_life: f32,
        /// No steering before this age
        seek_delay: f32,
    },
    /// Reflects off field edges until the budget is spent
    Bounce { bounces: u32, max_bounce: u32 },
    /// Fixed-origin beam through `origin`, optionally rotating
    Laser {
        heading: f32,
        rotation_speed: f32,
        duration: f32,
        half_width: f32,
        half_length: f32,
    },
    /// Stationary until the fuse runs out, then bursts into a ring
    Mine {
        delay: f32,
        ring_count: u32,
        ring_speed: f32,
        detonated: bool,
    },
    /// Growing field pulling nearby projectiles inward
    BlackHole {
        radius: f32,
        max_radius: f32,
        duration: f32,
        pull_force: f32,
    },
    /// Full-width band falling straight down
    Shockwave,
}

/// Collision shape of a projectile
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Box(Aabb),
    Beam { a: Vec2, b: Vec2, half_width: f32 },
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub body: Body,
    pub side: Side,
    pub damage: f32,
    /// Critical hits only come from the player
    pub critical: bool,
    pub tags: Tags,
    pub color: Rgb,
    /// Seconds since spawn
    pub age: f32,
    pub kind: ProjectileKind,
}

impl Entity for Projectile {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn hitbox(&self) -> Aabb {
        match self.shape() {
            Shape::Box(aabb) => aabb,
            Shape::Beam { a, b, half_width } => Aabb {
                min: a.min(b) - Vec2::splat(half_width),
                max: a.max(b) + Vec2::splat(half_width),
            },
        }
    }
}

impl Projectile {
    fn enemy(body: Body, color: Rgb, kind: ProjectileKind) -> Self {
        Self {
            body,
            side: Side::Enemy,
            damage: 1.0,
            critical: false,
            tags: Tags::HOSTILE | Tags::PULLABLE,
            color,
            age: 0.0,
            kind,
        }
    }

    fn bolt_body(pos: Vec2, dir: Vec2, speed: f32) -> Body {
        let dir = heading_or(dir, Vec2::Y);
        Body::new(pos, Vec2::splat(ENEMY_BULLET_SIZE)).with_velocity(dir * speed)
    }

    /// Straight enemy bolt; a zero direction falls back to straight down
    pub fn enemy_bolt(pos: Vec2, dir: Vec2, speed: f32, color: Rgb) -> Self {
        Self::enemy(Self::bolt_body(pos, dir, speed), color, ProjectileKind::Linear)
    }

    /// Player bolt flying straight up
    pub fn player_bolt(pos: Vec2, damage: f32, critical: bool, powered: bool) -> Self {
        let (size, speed, color) = if powered {
            (POWER_BOLT_SIZE, 1000.0, [255, 100, 255])
        } else {
            (PLAYER_BOLT_SIZE, 800.0, [100, 200, 255])
        };
        Self {
            body: Body::new(pos, Vec2::new(size.0, size.1)).with_velocity(Vec2::NEG_Y * speed),
            side: Side::Player,
            damage,
            critical,
            tags: Tags::FRIENDLY | Tags::PULLABLE,
            color,
            age: 0.0,
            kind: ProjectileKind::Linear,
        }
    }

    pub fn homing(pos: Vec2, dir: Vec2, speed: f32, color: Rgb) -> Self {
        Self::enemy(
            Self::bolt_body(pos, dir, speed),
            color,
            ProjectileKind::Homing {
                turn_rate: HOMING_TURN_RATE,
                max_life: HOMING_MAX_LIFE,
                seek_delay: 0.0,
            },
        )
    }

    /// Delay steering for homing projectiles; no effect on other kinds
    pub fn with_seek_delay(mut self, delay: f32) -> Self {
        if let ProjectileKind::Homing { seek_delay, .. } = &mut self.kind {
            *seek_delay = delay;
        }
        self
    }

    pub fn bounce(pos: Vec2, dir: Vec2, speed: f32, color: Rgb) -> Self {
        Self::enemy(
            Self::bolt_body(pos, dir, speed),
            color,
            ProjectileKind::Bounce {
                bounces: 0,
                max_bounce: BOUNCE_MAX,
            },
        )
    }

    /// Bouncing bolt with its own bounce budget, usually aimed at the player
    pub fn mirror(pos: Vec2, dir: Vec2, max_bounce: u32, color: Rgb) -> Self {
        Self::enemy(
            Self::bolt_body(pos, dir, 400.0),
            color,
            ProjectileKind::Bounce {
                bounces: 0,
                max_bounce,
            },
        )
    }

    pub fn laser(origin: Vec2, dir: Vec2, duration: f32, width: f32, color: Rgb) -> Self {
        let dir = heading_or(dir, Vec2::Y);
        let half_length = FIELD_WIDTH.max(FIELD_HEIGHT);
        let mut p = Self::enemy(
            Body::new(origin, Vec2::splat(width)),
            color,
            ProjectileKind::Laser {
                heading: dir.y.atan2(dir.x).to_degrees(),
                rotation_speed: 0.0,
                duration,
                half_width: width * 0.5,
                half_length,
            },
        );
        p.tags = Tags::HOSTILE;
        p
    }

    /// Beam sweeping at `rotation_speed` degrees/second
    pub fn rotating_laser(origin: Vec2, dir: Vec2, rotation_speed: f32, duration: f32, color: Rgb) -> Self {
        let mut p = Self::laser(origin, dir, duration, LASER_DEFAULT_WIDTH, color);
        if let ProjectileKind::Laser { rotation_speed: r, .. } = &mut p.kind {
            *r = rotation_speed;
        }
        p
    }

    pub fn mine(pos: Vec2, delay: f32, color: Rgb) -> Self {
        Self::enemy(
            Body::new(pos, Vec2::splat(ENEMY_BULLET_SIZE)),
            color,
            ProjectileKind::Mine {
                delay,
                ring_count: MINE_RING_COUNT,
                ring_speed: MINE_RING_SPEED,
                detonated: false,
            },
        )
    }

    pub fn black_hole(pos: Vec2) -> Self {
        let mut p = Self::enemy(
            Body::new(pos, Vec2::splat(ENEMY_BULLET_SIZE)),
            [118, 59, 191],
            ProjectileKind::BlackHole {
                radius: 0.0,
                max_radius: BLACK_HOLE_MAX_RADIUS,
                duration: BLACK_HOLE_DURATION,
                pull_force: BLACK_HOLE_PULL,
            },
        );
        p.tags = Tags::empty();
        p
    }

    pub fn shockwave(pos: Vec2, speed: f32, color: Rgb) -> Self {
        let body = Body::new(pos, Vec2::new(FIELD_WIDTH, SHOCKWAVE_HEIGHT))
            .with_velocity(Vec2::Y * speed.abs());
        Self::enemy(body, color, ProjectileKind::Shockwave)
    }

    /// Current collision shape (beams are recomputed from their heading)
    pub fn shape(&self) -> Shape {
        match self.kind {
            ProjectileKind::Laser {
                heading,
                half_width,
                half_length,
                ..
            } => {
                let dir = heading_deg(heading);
                Shape::Beam {
                    a: self.body.pos - dir * half_length,
                    b: self.body.pos + dir * half_length,
                    half_width,
                }
            }
            _ => Shape::Box(self.body.aabb()),
        }
    }

    /// Advance one tick. Returns the projectiles a mine bursts into.
    pub fn advance(&mut self, dt: f32, target: Option<Vec2>) -> Option<Vec<Projectile>> {
        if !self.body.alive {
            return None;
        }
        self.age += dt;

        match &mut self.kind {
            ProjectileKind::Linear => {
                self.body.integrate(dt);
                if self.body.aabb().outside_field(OFFSCREEN_MARGIN) {
                    self.body.alive = false;
                }
            }

            ProjectileKind::Homing {
                turn_rate,
                max_life,
                seek_delay,
            } => {
                self.body.integrate(dt);
                if let Some(target) = target
                    && self.age >= *seek_delay
                {
                    let to_target = target - self.body.pos;
                    if to_target.length() > HOMING_MIN_STEER_DIST {
                        let speed = self.body.vel.length();
                        let current = heading_or(self.body.vel, Vec2::Y);
                        let max_turn = turn_rate.max(0.0) * dt;
                        let turn = signed_angle_deg(current, to_target.normalize())
                            .clamp(-max_turn, max_turn);
                        self.body.vel = rotate_deg(current, turn).normalize() * speed;
                    }
                }
                if self.body.aabb().outside_field(OFFSCREEN_MARGIN) || self.age > *max_life {
                    self.body.alive = false;
                }
            }

            ProjectileKind::Bounce {
                bounces,
                max_bounce,
            } => {
                let before = self.body.pos;
                self.body.integrate(dt);
                let aabb = self.body.aabb();

                if aabb.min.x < 0.0 || aabb.max.x > FIELD_WIDTH {
                    self.body.vel.x = -self.body.vel.x;
                    *bounces += 1;
                    self.body.pos = before;
                }
                let aabb = self.body.aabb();
                if *bounces < *max_bounce && (aabb.min.y < 0.0 || aabb.max.y > FIELD_HEIGHT) {
                    self.body.vel.y = -self.body.vel.y;
                    *bounces += 1;
                    self.body.pos = before;
                }
                if *bounces >= *max_bounce {
                    self.body.alive = false;
                }
            }

            ProjectileKind::Laser {
                heading,
                rotation_speed,
                duration,
                ..
            } => {
                if *rotation_speed != 0.0 {
                    *heading = (*heading + *rotation_speed * dt) % 360.0;
                }
                if self.age >= *duration {
                    self.body.alive = false;
                }
            }

            ProjectileKind::Mine {
                delay,
                ring_count,
                ring_speed,
                detonated,
            } => {
                if self.age >= *delay && !*detonated {
                    *detonated = true;
                    self.body.alive = false;
                    let count = (*ring_count).max(1);
                    let step = 360.0 / count as f32;
                    let ring = (0..count)
                        .map(|i| {
                            let mut bolt = Projectile::enemy_bolt(
                                self.body.pos,
                                heading_deg(i as f32 * step),
                                *ring_speed,
                                self.color,
                            );
                            bolt.tags = self.tags;
                            bolt.side = self.side;
                            bolt
                        })
                        .collect();
                    return Some(ring);
                }
            }

            ProjectileKind::BlackHole {
                radius,
                max_radius,
                duration,
                ..
            } => {
                *radius = *max_radius * (self.age / *duration).min(1.0);
                if self.age >= *duration {
                    self.body.alive = false;
                }
            }

            ProjectileKind::Shockwave => {
                self.body.integrate(dt);
                if self.body.top() > FIELD_HEIGHT {
                    self.body.alive = false;
                }
            }
        }
        None
    }
}

/// Pull every pullable projectile toward each black hole in the arena
///
/// Displacement is applied to positions directly, scaled by
/// `1 - distance / (radius + margin)`. Coincident positions are skipped.
pub fn apply_black_hole_pull(projectiles: &mut Arena<Projectile>, dt: f32) {
    let fields: Vec<(Vec2, f32, f32)> = projectiles
        .values()
        .filter_map(|p| match p.kind {
            ProjectileKind::BlackHole {
                radius, pull_force, ..
            } => Some((p.body.pos, radius + BLACK_HOLE_MARGIN, pull_force)),
            _ => None,
        })
        .collect();
    if fields.is_empty() {
        return;
    }

    for p in projectiles.values_mut() {
        if !p.body.alive || !p.tags.contains(Tags::PULLABLE) {
            continue;
        }
        for &(center, reach, pull) in &fields {
            let to_center = center - p.body.pos;
            let distance = to_center.length();
            if distance == 0.0 || distance >= reach {
                continue;
            }
            let strength = pull * (1.0 - distance / reach) * BLACK_HOLE_BULLET_FACTOR;
            p.body.pos += to_center / distance * strength * dt;
        }
    }
}
