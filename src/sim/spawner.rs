//! Wave and boss scheduler
//!
//! Two mutually exclusive modes keyed off `wave % boss_interval`: normal
//! waves on a shrinking interval, and a boss encounter during which normal
//! spawning and the wave counter are frozen.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::arena::{Arena, EntityId};
use super::enemy::{Archetype, Enemy};
use super::state::GameEvent;
use crate::consts::*;
use crate::tuning::{BossTuning, SpawnerTuning};

/// Spawn band above the visible field
pub const SPAWN_X_MARGIN: i32 = 50;
pub const SPAWN_Y_RANGE: (i32, i32) = (-300, -100);

/// Archetypes unlocked at a spawner phase
pub fn unlocked_archetypes(phase: u32) -> Vec<Archetype> {
    let mut types = vec![Archetype::Basic, Archetype::Shielded];
    if phase >= 2 {
        types.push(Archetype::Zigzag);
    }
    if phase >= 3 {
        types.extend([Archetype::HomingDrone, Archetype::Spiral, Archetype::Carrier]);
    }
    if phase >= 4 {
        types.extend([Archetype::Circle, Archetype::Stealth]);
    }
    types
}

/// Difficulty parameters for one normal wave
#[derive(Debug, Clone, PartialEq)]
pub struct WaveConfig {
    pub count: u32,
    pub archetypes: Vec<Archetype>,
    pub health_mult: f32,
    pub speed_mult: f32,
    pub score_mult: f32,
}

#[derive(Debug, Clone)]
pub struct Spawner {
    /// Waves completed so far, never decreases
    pub wave: u32,
    pub spawn_timer: f32,
    /// The live boss, if an encounter is running
    pub active_boss: Option<EntityId>,
    tuning: SpawnerTuning,
    boss_tuning: BossTuning,
}

impl Spawner {
    pub fn new(tuning: &SpawnerTuning, boss_tuning: &BossTuning) -> Self {
        Self {
            wave: 0,
            spawn_timer: 0.0,
            active_boss: None,
            tuning: tuning.clone(),
            boss_tuning: boss_tuning.clone(),
        }
    }

    /// `floor(wave / boss_interval) + 1`
    pub fn current_phase(&self) -> u32 {
        self.wave / self.tuning.boss_interval.max(1) + 1
    }

    pub fn is_boss_wave(&self) -> bool {
        self.wave > 0 && self.wave % self.tuning.boss_interval.max(1) == 0
    }

    /// Seconds between normal waves at `phase`
    pub fn spawn_interval(&self, phase: u32) -> f32 {
        self.tuning.base_spawn_interval / ((phase + 1) as f32).ln()
    }

    pub fn wave_config(&self, phase: u32) -> WaveConfig {
        let t = &self.tuning;
        let wave = self.wave as i32;
        WaveConfig {
            count: (t.base_enemies as f32 * (phase as f32).powf(t.count_exponent)).floor() as u32,
            archetypes: unlocked_archetypes(phase),
            health_mult: (1.0 + t.hp_growth).powi(wave),
            speed_mult: (1.0 + t.speed_growth).powi(wave),
            score_mult: (1.0 + t.score_growth).powi(wave),
        }
    }

    /// Run the scheduler for one tick
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        enemies: &mut Arena<Enemy>,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) {
        self.spawn_timer += dt;

        if let Some(id) = self.active_boss
            && enemies.is_alive(id)
        {
            return;
        }

        let phase = self.current_phase();
        if self.is_boss_wave() {
            if self.active_boss.is_none() {
                self.spawn_boss(phase, enemies, events);
            }
        } else if self.spawn_timer >= self.spawn_interval(phase) {
            let count = self.spawn_wave(phase, enemies, rng);
            self.spawn_timer = 0.0;
            self.wave += 1;
            log::debug!("Wave {} spawned {} enemies (phase {})", self.wave, count, phase);
        }

        if self.is_boss_wave()
            && let Some(id) = self.active_boss
            && !enemies.is_alive(id)
        {
            log::info!("Boss defeated, leaving wave {}", self.wave);
            events.push(GameEvent::BossDefeated { wave: self.wave });
            self.wave += 1;
            self.active_boss = None;
        }
    }

    fn spawn_wave<R: Rng + ?Sized>(&self, phase: u32, enemies: &mut Arena<Enemy>, rng: &mut R) -> u32 {
        let config = self.wave_config(phase);
        let mut spawned = 0;
        for _ in 0..config.count {
            let Some(&archetype) = config.archetypes.choose(rng) else {
                break;
            };
            let pos = Vec2::new(
                rng.random_range(SPAWN_X_MARGIN..=FIELD_WIDTH as i32 - SPAWN_X_MARGIN) as f32,
                rng.random_range(SPAWN_Y_RANGE.0..=SPAWN_Y_RANGE.1) as f32,
            );
            let enemy = Enemy::new(archetype, pos).scaled(config.health_mult, config.speed_mult, config.score_mult);
            enemies.insert(enemy);
            spawned += 1;
        }
        spawned
    }

    fn spawn_boss(&mut self, phase: u32, enemies: &mut Arena<Enemy>, events: &mut Vec<GameEvent>) {
        let boss = Enemy::boss(phase, &self.boss_tuning);
        log::info!(
            "Phase {} boss appears at wave {} ({:.0} hp)",
            phase,
            self.wave,
            boss.max_health
        );
        self.active_boss = Some(enemies.insert(boss));
        events.push(GameEvent::BossSpawned {
            phase,
            wave: self.wave,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Entity;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn spawner() -> Spawner {
        Spawner::new(&SpawnerTuning::default(), &BossTuning::default())
    }

    #[test]
    fn test_phase_and_interval() {
        let mut s = spawner();
        assert_eq!(s.current_phase(), 1);
        s.wave = 5;
        assert_eq!(s.current_phase(), 2);
        assert!((s.spawn_interval(1) - 10.0 / 2f32.ln()).abs() < 1e-4);
        assert!(s.spawn_interval(2) < s.spawn_interval(1));
    }

    #[test]
    fn test_first_wave_after_interval() {
        let mut s = spawner();
        let mut enemies = Arena::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut events = Vec::new();
        s.update(14.0, &mut enemies, &mut rng, &mut events);
        assert!(enemies.is_empty());
        s.update(0.5, &mut enemies, &mut rng, &mut events);
        assert_eq!(enemies.len(), 5);
        assert_eq!(s.wave, 1);
        assert_eq!(s.spawn_timer, 0.0);
        for e in enemies.values() {
            assert!(matches!(e.kind, crate::sim::enemy::EnemyKind::Basic | crate::sim::enemy::EnemyKind::Shielded { .. }));
            assert!(e.body.pos.y <= -100.0 && e.body.pos.y >= -300.0);
        }
    }

    #[test]
    fn test_boss_wave_spawns_one_scaled_boss() {
        let mut s = spawner();
        s.wave = 5;
        let mut enemies = Arena::new();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut events = Vec::new();
        s.update(0.1, &mut enemies, &mut rng, &mut events);

        assert_eq!(enemies.len(), 1);
        let boss = enemies.get(s.active_boss.unwrap()).unwrap();
        assert!(boss.is_boss());
        let expected = 50.0 * 2f32.powf(1.3) * 5.0;
        assert!((boss.max_health - expected).abs() < 1e-3);
        assert_eq!(events, vec![GameEvent::BossSpawned { phase: 2, wave: 5 }]);
    }

    #[test]
    fn test_no_spawning_while_boss_alive() {
        let mut s = spawner();
        s.wave = 5;
        let mut enemies = Arena::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut events = Vec::new();
        for _ in 0..100 {
            s.update(1.0, &mut enemies, &mut rng, &mut events);
        }
        assert_eq!(enemies.len(), 1);
        assert_eq!(s.wave, 5);
    }

    #[test]
    fn test_boss_death_advances_wave() {
        let mut s = spawner();
        s.wave = 5;
        let mut enemies = Arena::new();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut events = Vec::new();
        s.update(0.1, &mut enemies, &mut rng, &mut events);
        let id = s.active_boss.unwrap();
        enemies.get_mut(id).unwrap().destroy();
        enemies.sweep();

        events.clear();
        s.update(0.1, &mut enemies, &mut rng, &mut events);
        assert_eq!(s.wave, 6);
        assert!(s.active_boss.is_none());
        assert_eq!(events, vec![GameEvent::BossDefeated { wave: 5 }]);
    }

    #[test]
    fn test_wave_config_growth() {
        let mut s = spawner();
        s.wave = 10;
        let c = s.wave_config(3);
        assert_eq!(c.count, (5.0 * 3f32.powf(1.5)).floor() as u32);
        assert!((c.health_mult - 1.05f32.powi(10)).abs() < 1e-5);
        assert_eq!(c.archetypes.len(), 6);
        assert_eq!(unlocked_archetypes(4).len(), 8);
    }
}
