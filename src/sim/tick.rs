//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically. Order
//! within a tick:
//! 1. run-over check (short-circuits everything else)
//! 2. player movement, timers and firing
//! 3. spawner
//! 4. enemies advance against the player snapshot, then fire
//! 5. projectiles advance, black-hole pull, mine detonations
//! 6. collision resolution
//! 7. power-ups and cosmetic effects
//! 8. sweep of destroyed entities, player death

use glam::Vec2;

use super::body::Entity;
use super::collision::resolve_collisions;
use super::projectile::apply_black_hole_pull;
use super::state::{GameEvent, GameState, RunPhase};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Hold to fire
    pub fire: bool,
}

impl TickInput {
    /// Normalized movement intent (diagonals are not faster)
    pub fn move_dir(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir.normalize_or_zero()
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Don't tick once the run is over
    if state.phase == RunPhase::GameOver {
        return;
    }
    if !state.player.is_alive() {
        end_run(state);
        return;
    }

    state.time_ticks += 1;
    state.time += dt;

    // Player
    state.player.steer(input.move_dir(), dt);
    state.player.update_timers(dt);
    if input.fire
        && let Some(bolt) = state.player.try_fire(&mut state.rng)
    {
        state.projectiles.insert(bolt);
    }

    // Spawner
    state
        .spawner
        .update(dt, &mut state.enemies, &mut state.rng, &mut state.events);

    // Enemies: the player snapshot is taken once, before any AI runs
    let target = state.player_target();
    let mut released = Vec::new();
    for enemy in state.enemies.values_mut() {
        enemy.advance(dt, target, &mut released);
    }
    state.enemies.extend(released);

    let mut fired = Vec::new();
    for enemy in state.enemies.values_mut() {
        enemy.emit_fire(&mut state.rng, &mut fired);
    }
    state.projectiles.extend(fired);

    // Projectiles
    let mut bursts = Vec::new();
    for p in state.projectiles.values_mut() {
        if let Some(ring) = p.advance(dt, target) {
            bursts.extend(ring);
        }
    }
    apply_black_hole_pull(&mut state.projectiles, dt);
    state.projectiles.extend(bursts);

    resolve_collisions(state);

    for powerup in state.powerups.values_mut() {
        powerup.advance(dt);
    }
    state.effects.advance(dt);

    state.sweep();

    if !state.player.is_alive() {
        end_run(state);
    }
}

/// Enter game over and announce it exactly once
fn end_run(state: &mut GameState) {
    if state.phase == RunPhase::GameOver {
        return;
    }
    state.phase = RunPhase::GameOver;
    log::info!(
        "Player died at wave {} with {} points",
        state.spawner.wave,
        state.score.score
    );
    state.events.push(GameEvent::PlayerDied {
        score: state.score.score,
        wave: state.spawner.wave,
    });
}
