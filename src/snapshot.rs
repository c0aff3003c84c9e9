//! Read-only render snapshot
//!
//! Copies what a renderer or HUD needs out of a [`GameState`] so drawing
//! never touches simulation state directly.

use glam::Vec2;

use crate::sim::body::{Aabb, Entity};
use crate::sim::projectile::{Rgb, Shape};
use crate::sim::state::GameState;

/// Sprite category for asset lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Player,
    Enemy,
    Boss,
    PlayerBolt,
    EnemyBullet,
    Powerup,
}

/// Drawable shape of a sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteShape {
    Rect(Aabb),
    Beam { a: Vec2, b: Vec2, width: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub pos: Vec2,
    pub shape: SpriteShape,
    pub color: Rgb,
    /// 0..=1 opacity
    pub alpha: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossBar {
    pub phase: u8,
    pub health_fraction: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud {
    pub health: u32,
    pub max_health: u32,
    pub shields: u32,
    pub score: u64,
    pub combo: u32,
    pub wave: u32,
    pub boosted: bool,
    pub invincible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    pub sprites: Vec<Sprite>,
    /// (position, colour, alpha)
    pub particles: Vec<(Vec2, Rgb, f32)>,
    /// (position, label, critical, alpha)
    pub damage_texts: Vec<(Vec2, String, bool, f32)>,
    pub boss: Option<BossBar>,
    pub hud: Hud,
    pub game_over: bool,
}

/// Build a snapshot of every live entity plus HUD numbers
pub fn build_snapshot(state: &GameState) -> RenderSnapshot {
    let mut sprites = Vec::with_capacity(1 + state.enemies.len() + state.projectiles.len() + state.powerups.len());

    if state.player.is_alive() {
        // Blink while invincible
        let alpha = if state.player.invincible && (state.player.invincible_timer * 12.0) as u32 % 2 == 1 {
            0.4
        } else {
            1.0
        };
        sprites.push(Sprite {
            kind: SpriteKind::Player,
            pos: state.player.body.pos,
            shape: SpriteShape::Rect(state.player.hitbox()),
            color: [0, 200, 255],
            alpha,
        });
    }

    for enemy in state.enemies.alive() {
        sprites.push(Sprite {
            kind: if enemy.is_boss() { SpriteKind::Boss } else { SpriteKind::Enemy },
            pos: enemy.body.pos,
            shape: SpriteShape::Rect(enemy.hitbox()),
            color: enemy.color(),
            alpha: 1.0,
        });
    }

    for p in state.projectiles.alive() {
        let shape = match p.shape() {
            Shape::Box(aabb) => SpriteShape::Rect(aabb),
            Shape::Beam { a, b, half_width } => SpriteShape::Beam {
                a,
                b,
                width: half_width * 2.0,
            },
        };
        let kind = match p.side {
            crate::sim::projectile::Side::Player => SpriteKind::PlayerBolt,
            crate::sim::projectile::Side::Enemy => SpriteKind::EnemyBullet,
        };
        sprites.push(Sprite {
            kind,
            pos: p.body.pos,
            shape,
            color: p.color,
            alpha: 1.0,
        });
    }

    for powerup in state.powerups.alive() {
        sprites.push(Sprite {
            kind: SpriteKind::Powerup,
            pos: powerup.body.pos,
            shape: SpriteShape::Rect(powerup.hitbox()),
            color: powerup.kind.color(),
            alpha: 1.0,
        });
    }

    let particles = state
        .effects
        .particles
        .iter()
        .map(|p| (p.pos, p.color, p.alpha()))
        .collect();
    let damage_texts = state
        .effects
        .damage_texts
        .iter()
        .map(|t| (t.pos, t.label(), t.critical, t.alpha()))
        .collect();

    let boss = state.active_boss().and_then(|e| {
        e.boss_state().map(|b| BossBar {
            phase: b.phase,
            health_fraction: e.health_fraction(),
        })
    });

    let hud = Hud {
        health: state.player.health,
        max_health: state.player.max_health,
        shields: state.player.shields,
        score: state.score.score,
        combo: state.score.combo,
        wave: state.spawner.wave,
        boosted: state.player.is_boosted(),
        invincible: state.player.invincible,
    };

    RenderSnapshot {
        sprites,
        particles,
        damage_texts,
        boss,
        hud,
        game_over: state.is_game_over(),
    }
}
