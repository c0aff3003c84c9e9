//! Bullet Storm - simulation core of a vertical bullet-hell shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, boss phases, spawner, collisions)
//! - `score`: Score and combo bookkeeping fed by simulation events
//! - `highscores`: Ranked leaderboard persisted as JSON
//! - `persistence`: File helpers shared by the persisted records
//! - `snapshot`: Read-only views for a renderer/HUD
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod persistence;
pub mod score;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use highscores::HighScores;
pub use score::ScoreBoard;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the native runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Play field dimensions (screen space, y grows downward)
    pub const FIELD_WIDTH: f32 = 1280.0;
    pub const FIELD_HEIGHT: f32 = 720.0;
    /// Projectiles survive this far outside the field before being culled
    pub const OFFSCREEN_MARGIN: f32 = 100.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 32.0;
    pub const PLAYER_START_Y_OFFSET: f32 = 80.0;

    /// Enemy bolt size (square)
    pub const ENEMY_BULLET_SIZE: f32 = 8.0;
    /// Player bolt sizes (width, height)
    pub const PLAYER_BOLT_SIZE: (f32, f32) = (5.0, 15.0);
    pub const POWER_BOLT_SIZE: (f32, f32) = (8.0, 20.0);

    /// Collision ratios applied to both boxes before the overlap test
    pub const BULLET_HIT_RATIO: f32 = 0.7;
    pub const CONTACT_HIT_RATIO: f32 = 0.6;
    pub const PICKUP_HIT_RATIO: f32 = 0.8;
}

/// Rotate a vector by `degrees` (counter-clockwise in math orientation)
#[inline]
pub fn rotate_deg(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Unit vector for a heading given in degrees from +x
#[inline]
pub fn heading_deg(degrees: f32) -> Vec2 {
    rotate_deg(Vec2::X, degrees)
}

/// Signed angle in degrees that rotates `from` onto `to`, in [-180, 180]
#[inline]
pub fn signed_angle_deg(from: Vec2, to: Vec2) -> f32 {
    from.perp_dot(to).atan2(from.dot(to)).to_degrees()
}

/// Normalize `dir`, falling back to `fallback` for degenerate input
#[inline]
pub fn heading_or(dir: Vec2, fallback: Vec2) -> Vec2 {
    let n = dir.normalize_or_zero();
    if n == Vec2::ZERO { fallback } else { n }
}
