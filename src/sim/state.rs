//! Game state and core simulation types
//!
//! Everything a run needs lives here: the populations (one arena per
//! entity kind), the run RNG, the sim clock and the event queue the host
//! drains after each tick.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::arena::Arena;
use super::body::Entity;
use super::effects::Effects;
use super::enemy::Enemy;
use super::player::Player;
use super::powerup::Powerup;
use super::projectile::Projectile;
use super::spawner::Spawner;
use crate::score::ScoreBoard;
use crate::tuning::Tuning;

/// Whether the run is still going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Playing,
    /// Run ended; ticks are no-ops
    GameOver,
}

/// Discrete outputs of a tick for the host (audio, camera, scene flow)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A kill was scored; `awarded` includes the combo multiplier
    ScoreAdded { base: u32, awarded: u64, combo: u32 },
    /// Screen-shake request (visual offset is the renderer's business)
    ScreenShake { intensity: f32, duration: f32 },
    EnemyKilled { pos: Vec2, boss: bool },
    BossSpawned { phase: u32, wave: u32 },
    BossPhase { phase: u8 },
    BossDefeated { wave: u32 },
    /// Emitted once, on the tick the run ends
    PlayerDied { score: u64, wave: u32 },
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Sim time in seconds
    pub time: f32,
    pub time_ticks: u64,
    pub phase: RunPhase,
    pub player: Player,
    pub enemies: Arena<Enemy>,
    /// Every projectile from either side; membership is in its tags
    pub projectiles: Arena<Projectile>,
    pub powerups: Arena<Powerup>,
    /// Visual particles and damage numbers (not gameplay-affecting)
    pub effects: Effects,
    pub spawner: Spawner,
    pub score: ScoreBoard,
    /// Events produced since the host last drained them
    pub events: Vec<GameEvent>,
    pub tuning: Tuning,
}

impl GameState {
    /// Create a new game state with the given seed and default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Values the simulation cannot run with are clamped first
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time: 0.0,
            time_ticks: 0,
            phase: RunPhase::Playing,
            player: Player::new(&tuning.player),
            enemies: Arena::new(),
            projectiles: Arena::new(),
            powerups: Arena::new(),
            effects: Effects::default(),
            spawner: Spawner::new(&tuning.spawner, &tuning.boss),
            score: ScoreBoard::new(tuning.combo_timeout),
            events: Vec::new(),
            tuning,
        }
    }

    /// Player position snapshot for AI and homing, `None` once dead
    pub fn player_target(&self) -> Option<Vec2> {
        self.player.is_alive().then_some(self.player.body.pos)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == RunPhase::GameOver
    }

    /// Hand the accumulated events to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// The live boss, if an encounter is running
    pub fn active_boss(&self) -> Option<&Enemy> {
        self.spawner
            .active_boss
            .and_then(|id| self.enemies.get(id))
            .filter(|e| e.is_alive())
    }

    /// Free every slot destroyed this tick
    pub fn sweep(&mut self) {
        self.enemies.sweep();
        self.projectiles.sweep();
        self.powerups.sweep();
    }
}
