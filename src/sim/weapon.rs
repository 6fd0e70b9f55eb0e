//! Weapons: time-gated bullet factories
//!
//! A closed set of firing behaviors behind one `try_shoot` contract. A weapon
//! only gates and constructs; registering the bullet in the live world is the
//! simulation's job.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Bullet, BulletKind};
use crate::consts::*;
use crate::{angle_to_dir, dir_to_angle, normalize_dir};

/// Firing behavior variants
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeaponKind {
    /// Steady mid-rate fire, no spread
    Basic,
    /// Rapid fire with a random angular spread (radians, total cone width)
    AutoRifle { spread: f32 },
    /// Slow, high-damage, dead accurate
    Sniper,
}

/// A time-gated bullet factory
#[derive(Debug, Clone)]
pub struct Weapon {
    pub kind: WeaponKind,
    /// Minimum interval between accepted shots (ms)
    pub fire_rate_ms: f64,
    /// Timestamp of the last accepted shot; never decreases
    pub last_shot_ms: f64,
}

impl Weapon {
    pub fn basic() -> Self {
        Self {
            kind: WeaponKind::Basic,
            fire_rate_ms: BASIC_FIRE_RATE_MS,
            last_shot_ms: 0.0,
        }
    }

    pub fn auto_rifle() -> Self {
        Self {
            kind: WeaponKind::AutoRifle {
                spread: AUTO_RIFLE_SPREAD,
            },
            fire_rate_ms: AUTO_RIFLE_FIRE_RATE_MS,
            last_shot_ms: 0.0,
        }
    }

    pub fn sniper() -> Self {
        Self {
            kind: WeaponKind::Sniper,
            fire_rate_ms: SNIPER_FIRE_RATE_MS,
            last_shot_ms: 0.0,
        }
    }

    /// Display label for the HUD
    pub fn name(&self) -> &'static str {
        match self.kind {
            WeaponKind::Basic => "Basic",
            WeaponKind::AutoRifle { .. } => "Auto Rifle",
            WeaponKind::Sniper => "Sniper",
        }
    }

    /// Attempt to fire from `origin` toward `aim_dir`.
    ///
    /// Returns `None` while the fire interval has not elapsed - a normal
    /// rejection, not an error. On success the cooldown restarts and the
    /// constructed bullet is handed back, not yet registered anywhere.
    pub fn try_shoot(
        &mut self,
        origin: Vec2,
        aim_dir: Vec2,
        now_ms: f64,
        rng: &mut Pcg32,
    ) -> Option<Bullet> {
        if now_ms - self.last_shot_ms < self.fire_rate_ms {
            return None;
        }
        self.last_shot_ms = now_ms;

        let aim = normalize_dir(aim_dir);
        let bullet = match self.kind {
            WeaponKind::Basic => Bullet::new(origin, aim, BULLET_DAMAGE, BulletKind::Standard, now_ms),
            WeaponKind::AutoRifle { spread } => {
                // Fresh offset per shot: inaccuracy has no memory
                let offset = rng.random_range(-spread / 2.0..=spread / 2.0);
                let dir = angle_to_dir(dir_to_angle(aim) + offset);
                Bullet::new(origin, dir, BULLET_DAMAGE, BulletKind::Standard, now_ms)
            }
            WeaponKind::Sniper => Bullet::new(origin, aim, SNIPER_DAMAGE, BulletKind::Sniper, now_ms),
        };
        Some(bullet)
    }
}
