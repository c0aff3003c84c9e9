//! Collision and resolution
//!
//! Runs once per tick after every population has advanced, in a fixed
//! order:
//! 1. player vs hostile projectiles
//! 2. player bolts vs enemies
//! 3. player vs enemy contact
//! 4. player vs power-ups
//!
//! Destroyed entities stay in their arena until the end-of-tick sweep but
//! are skipped by every later step.

use super::arena::EntityId;
use super::body::Entity;
use super::effects::{DEATH_COLOR, DEATH_PARTICLES, HIT_PARTICLES};
use super::enemy::EnemyHit;
use super::player::DamageOutcome;
use super::powerup::Powerup;
use super::projectile::{Shape, Tags};
use super::sdf::{capsule_hits_box, circles_overlap};
use super::state::{GameEvent, GameState};
use crate::consts::*;

const HIT_SHAKE: (f32, f32) = (3.0, 0.1);
const KILL_SHAKE: (f32, f32) = (8.0, 0.3);
const CONTACT_SHAKE: (f32, f32) = (5.0, 0.15);

fn shake(state: &mut GameState, (intensity, duration): (f32, f32)) {
    state.events.push(GameEvent::ScreenShake { intensity, duration });
}

/// Run all four resolution steps
pub fn resolve_collisions(state: &mut GameState) {
    player_vs_hostile(state);
    bolts_vs_enemies(state);
    player_vs_enemies(state);
    player_vs_powerups(state);
}

/// Every overlapping hostile projectile is removed; the player takes at most
/// one unit of damage for all of them
pub fn player_vs_hostile(state: &mut GameState) -> DamageOutcome {
    if !state.player.is_alive() {
        return DamageOutcome::Ignored;
    }
    let target = state.player.hitbox().scaled(BULLET_HIT_RATIO);

    let mut struck = false;
    for p in state.projectiles.values_mut() {
        if !p.is_alive() || !p.tags.contains(Tags::HOSTILE) {
            continue;
        }
        let hit = match p.shape() {
            Shape::Box(aabb) => aabb.scaled(BULLET_HIT_RATIO).overlaps(&target),
            Shape::Beam { a, b, half_width } => capsule_hits_box(a, b, half_width, &target),
        };
        if hit {
            p.destroy();
            struck = true;
        }
    }

    if struck {
        state.player.take_damage(1)
    } else {
        DamageOutcome::Ignored
    }
}

/// Each bolt hits at most one live enemy and is removed on that hit
pub fn bolts_vs_enemies(state: &mut GameState) {
    let bolts: Vec<EntityId> = state
        .projectiles
        .iter()
        .filter(|(_, p)| p.is_alive() && p.tags.contains(Tags::FRIENDLY))
        .map(|(id, _)| id)
        .collect();

    for bolt_id in bolts {
        let Some(bolt) = state.projectiles.get(bolt_id) else {
            continue;
        };
        let bolt_box = bolt.hitbox();
        let (bolt_pos, damage, critical) = (bolt.body.pos, bolt.damage, bolt.critical);

        let Some(enemy_id) = state
            .enemies
            .iter()
            .find(|(_, e)| e.is_alive() && e.hitbox().overlaps(&bolt_box))
            .map(|(id, _)| id)
        else {
            continue;
        };
        if let Some(bolt) = state.projectiles.get_mut(bolt_id) {
            bolt.destroy();
        }
        let Some(enemy) = state.enemies.get_mut(enemy_id) else {
            continue;
        };

        let phase_before = enemy.boss_state().map_or(0, |b| b.phase);
        let outcome = enemy.take_damage(damage);
        let phase_after = enemy.boss_state().map_or(0, |b| b.phase);
        let (enemy_pos, score_value, is_boss) = (enemy.body.pos, enemy.score_value, enemy.is_boss());

        for phase in (phase_before + 1)..=phase_after {
            state.events.push(GameEvent::BossPhase { phase });
        }

        state.effects.damage_number(&mut state.rng, enemy_pos, damage, critical);
        state.effects.burst(&mut state.rng, bolt_pos, [255, 0, 0], HIT_PARTICLES);
        shake(state, HIT_SHAKE);

        if outcome == EnemyHit::Killed {
            state.player.kills += 1;
            let awarded = state.score.add_score(score_value, state.time);
            state.events.push(GameEvent::ScoreAdded {
                base: score_value,
                awarded,
                combo: state.score.combo,
            });
            state.events.push(GameEvent::EnemyKilled {
                pos: enemy_pos,
                boss: is_boss,
            });
            state.effects.burst(&mut state.rng, enemy_pos, DEATH_COLOR, DEATH_PARTICLES);
            shake(state, KILL_SHAKE);

            let chance = state.tuning.powerup_drop_chance;
            if let Some(drop) = Powerup::roll_drop(&mut state.rng, enemy_pos, chance) {
                state.powerups.insert(drop);
            }
        }
    }
}

/// Contact damage from the first overlapping enemy only
pub fn player_vs_enemies(state: &mut GameState) -> DamageOutcome {
    if !state.player.is_alive() || state.player.invincible {
        return DamageOutcome::Ignored;
    }
    let player_box = state.player.hitbox();

    let Some(enemy_id) = state
        .enemies
        .iter()
        .find(|(_, e)| e.is_alive() && e.hitbox().overlaps_scaled(&player_box, CONTACT_HIT_RATIO))
        .map(|(id, _)| id)
    else {
        return DamageOutcome::Ignored;
    };

    let outcome = state.player.take_damage(state.player.collision_damage());
    if let Some(enemy) = state.enemies.get_mut(enemy_id)
        && enemy.is_kamikaze()
    {
        enemy.destroy();
    }
    shake(state, CONTACT_SHAKE);
    outcome
}

/// Circle overlap at [`PICKUP_HIT_RATIO`]; the pickup applies and is removed
pub fn player_vs_powerups(state: &mut GameState) {
    if !state.player.is_alive() {
        return;
    }
    let center = state.player.body.pos;
    let radius = state.player.body.half.length() * PICKUP_HIT_RATIO;

    for powerup in state.powerups.values_mut() {
        if powerup.is_alive() && circles_overlap(center, radius, powerup.body.pos, powerup.pickup_radius()) {
            state.player.apply_powerup(powerup.kind);
            powerup.destroy();
        }
    }
}
