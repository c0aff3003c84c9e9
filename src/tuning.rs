//! Game balance tuning
//!
//! Every balance number the simulation reads at runtime. Loaded from a JSON
//! file when one is present; missing fields take their defaults, and a
//! missing or unreadable file falls back to [`Tuning::default`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistError};

/// Default tuning file, relative to the working directory
pub const TUNING_PATH: &str = "data/tuning.json";

/// Player ship balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_health: u32,
    /// Pixels per second
    pub speed: f32,
    /// Seconds of invincibility after a damaging hit
    pub invincible_duration: f32,
    pub shot_cooldown: f32,
    pub boosted_shot_cooldown: f32,
    pub boost_duration: f32,
    pub crit_chance: f32,
    /// Bolt damage bonus per kill (fraction of base damage)
    pub kill_damage_bonus: f32,
    /// Damage taken from touching an enemy
    pub collision_damage: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 7,
            speed: 450.0,
            invincible_duration: 1.5,
            shot_cooldown: 0.2,
            boosted_shot_cooldown: 0.1,
            boost_duration: 10.0,
            crit_chance: 0.1,
            kill_damage_bonus: 0.5,
            collision_damage: 2,
        }
    }
}

/// Wave scheduler and difficulty curves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerTuning {
    /// Every n-th wave is a boss wave
    pub boss_interval: u32,
    /// Seconds between normal waves in phase 1 (divided by ln(phase + 1))
    pub base_spawn_interval: f32,
    pub base_enemies: u32,
    /// Enemy count grows as `base_enemies * phase^count_exponent`
    pub count_exponent: f32,
    /// Per-wave compound growth of enemy health
    pub hp_growth: f32,
    pub speed_growth: f32,
    pub score_growth: f32,
}

impl Default for SpawnerTuning {
    fn default() -> Self {
        Self {
            boss_interval: 5,
            base_spawn_interval: 10.0,
            base_enemies: 5,
            count_exponent: 1.5,
            hp_growth: 0.05,
            speed_growth: 0.03,
            score_growth: 0.1,
        }
    }
}

/// Boss scaling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    pub base_max_health: f32,
    pub base_score: u32,
    pub health_exponent: f32,
    pub health_multiplier: f32,
    /// Seconds between volleys before the `1/sqrt(phase)` speed-up
    pub attack_cadence: f32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            base_max_health: 50.0,
            base_score: 1000,
            health_exponent: 1.3,
            health_multiplier: 5.0,
            attack_cadence: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub spawner: SpawnerTuning,
    pub boss: BossTuning,
    /// Seconds within which consecutive scoring hits extend the combo
    pub combo_timeout: f32,
    pub powerup_drop_chance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player: PlayerTuning::default(),
            spawner: SpawnerTuning::default(),
            boss: BossTuning::default(),
            combo_timeout: 2.0,
            powerup_drop_chance: 0.3,
        }
    }
}

impl Tuning {
    /// Load tuning from `path`, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No tuning file at {}, using defaults", path.display());
            return Self::default();
        }
        match persistence::read_json::<Tuning>(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning.sanitized()
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        persistence::write_json(path, self)
    }

    /// Clamp values the simulation cannot run with
    pub fn sanitized(mut self) -> Self {
        self.spawner.boss_interval = self.spawner.boss_interval.max(1);
        self.player.max_health = self.player.max_health.max(1);
        self.powerup_drop_chance = self.powerup_drop_chance.clamp(0.0, 1.0);
        self.player.crit_chance = self.player.crit_chance.clamp(0.0, 1.0);
        if self.spawner.base_spawn_interval <= 0.0 {
            self.spawner.base_spawn_interval = SpawnerTuning::default().base_spawn_interval;
        }
        if self.boss.attack_cadence <= 0.0 {
            self.boss.attack_cadence = BossTuning::default().attack_cadence;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let tuning = Tuning::load(dir.path().join("nope.json"));
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tuning.json");
        std::fs::write(&path, r#"{ "combo_timeout": 3.5, "spawner": { "boss_interval": 3 } }"#).unwrap();
        let tuning = Tuning::load(&path);
        assert_eq!(tuning.combo_timeout, 3.5);
        assert_eq!(tuning.spawner.boss_interval, 3);
        assert_eq!(tuning.spawner.base_enemies, 5);
        assert_eq!(tuning.player, PlayerTuning::default());
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tuning.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(Tuning::load(&path), Tuning::default());
    }

    #[test]
    fn test_sanitize_rejects_zero_interval() {
        let mut t = Tuning::default();
        t.spawner.boss_interval = 0;
        t.powerup_drop_chance = 4.0;
        let t = t.sanitized();
        assert_eq!(t.spawner.boss_interval, 1);
        assert_eq!(t.powerup_drop_chance, 1.0);
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tuning.json");
        let mut t = Tuning::default();
        t.boss.base_score = 1234;
        t.save(&path).unwrap();
        assert_eq!(Tuning::load(&path), t);
    }
}
