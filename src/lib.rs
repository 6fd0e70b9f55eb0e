//! Star Swarm - a top-down arena shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, weapons, spawning, game state)
//! - `clock`: Frame timing for the driving loop
//! - `config`: Data-driven spawn tuning
//! - `highscores`: Session leaderboard

pub mod clock;
pub mod config;
pub mod highscores;
pub mod sim;

pub use clock::FrameClock;
pub use config::{ConfigError, GameConfig, SpawnerConfig};
pub use highscores::HighScores;

use glam::Vec2;

/// Game balance constants
pub mod consts {
    /// Player starting health
    pub const PLAYER_MAX_HEALTH: i32 = 4;
    /// Player movement speed per held axis (units/second)
    pub const PLAYER_SPEED: f32 = 108.0;
    /// Player collision radius
    pub const PLAYER_RADIUS: f32 = 7.0;

    /// Enemy starting health
    pub const ENEMY_MAX_HEALTH: i32 = 3;
    /// Enemy approach speed (units/second)
    pub const ENEMY_SPEED: f32 = 80.0;
    /// Enemy collision radius
    pub const ENEMY_RADIUS: f32 = 13.0;
    /// Seconds an enemy must wait between contact hits on the player
    pub const ENEMY_HIT_COOLDOWN: f32 = 1.0;
    /// Damage each party takes from a player/enemy contact
    pub const CONTACT_DAMAGE: i32 = 1;

    /// Knockback impulse added to an enemy's velocity on player contact
    pub const KNOCKBACK_FORCE: f32 = 800.0;
    /// Per-tick damping applied while knockback velocity is active
    pub const KNOCKBACK_DAMPING: f32 = 0.9;
    /// Squared speed below which knockback is considered spent
    pub const KNOCKBACK_REST_SQ: f32 = 0.001;

    /// Bullet defaults
    pub const BULLET_SPEED: f32 = 1000.0;
    pub const BULLET_LIFETIME_MS: f64 = 3000.0;
    pub const BULLET_DAMAGE: i32 = 1;
    /// Sniper rounds hit much harder
    pub const SNIPER_DAMAGE: i32 = 4;

    /// Weapon fire intervals
    pub const BASIC_FIRE_RATE_MS: f64 = 500.0;
    pub const AUTO_RIFLE_FIRE_RATE_MS: f64 = 100.0;
    pub const SNIPER_FIRE_RATE_MS: f64 = 1000.0;
    /// Auto rifle spread cone (radians, total width)
    pub const AUTO_RIFLE_SPREAD: f32 = 0.1;

    /// Score for landing a bullet on an enemy
    pub const SCORE_PER_HIT: u64 = 10;
    /// Extra score when the hit is the killing one
    pub const SCORE_PER_KILL: u64 = 50;

    /// Longest frame delta the clock reports (seconds). Caps catch-up after
    /// a stall so bullets cannot tunnel through enemies in one giant step.
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Unit vector pointing along the given angle (radians)
#[inline]
pub fn angle_to_dir(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Angle (radians) of the given direction vector
#[inline]
pub fn dir_to_angle(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x)
}

/// Normalize a direction, falling back to +X for degenerate input.
///
/// Two entities at the exact same position produce a zero delta; a fixed
/// fallback keeps seek/knockback directions finite.
#[inline]
pub fn normalize_dir(v: Vec2) -> Vec2 {
    v.normalize_or(Vec2::X)
}
