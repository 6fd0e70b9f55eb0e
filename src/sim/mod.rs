//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Delta-time driven, one tick per frame
//! - Seeded RNG only
//! - Stable iteration order (collection order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod weapon;

pub use collision::{circles_overlap, point_in_circle};
pub use spawner::EnemySpawner;
pub use state::{Bullet, BulletKind, Enemy, GameEvent, GamePhase, GameState, HudSnapshot, Player};
pub use tick::{TickInput, tick};
pub use weapon::{Weapon, WeaponKind};
