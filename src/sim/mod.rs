//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (arena slot order)
//! - No rendering or platform dependencies

pub mod arena;
pub mod body;
pub mod boss;
pub mod collision;
pub mod effects;
pub mod enemy;
pub mod player;
pub mod powerup;
pub mod projectile;
pub mod sdf;
pub mod spawner;
pub mod state;
pub mod tick;

pub use arena::{Arena, EntityId};
pub use body::{Aabb, Body, Entity};
pub use boss::{AttackPattern, BossState};
pub use enemy::{Archetype, Enemy, EnemyHit, EnemyKind};
pub use player::{DamageOutcome, Player};
pub use powerup::{Powerup, PowerupKind};
pub use projectile::{Projectile, ProjectileKind, Side, Tags};
pub use spawner::Spawner;
pub use state::{GameEvent, GameState, RunPhase};
pub use tick::{TickInput, tick};
