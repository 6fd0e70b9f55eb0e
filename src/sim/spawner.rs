//! Interval-gated enemy factory
//!
//! The spawner decides when and where an enemy appears; the cap on live
//! enemies is the simulation's check, made before it asks.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::Enemy;
use crate::angle_to_dir;
use crate::config::SpawnerConfig;

#[derive(Debug, Clone)]
pub struct EnemySpawner {
    /// Minimum interval between spawns (ms)
    pub spawn_interval_ms: f64,
    /// Closest allowed spawn distance from the player
    pub min_distance: f32,
    /// Farthest allowed spawn distance from the player
    pub max_distance: f32,
    /// Live-enemy cap, enforced by the caller
    pub max_enemies: usize,
    /// Timestamp of the last accepted spawn
    pub last_spawn_ms: f64,
}

impl EnemySpawner {
    pub fn new(config: &SpawnerConfig) -> Self {
        Self {
            spawn_interval_ms: config.spawn_interval_ms,
            min_distance: config.spawn_min_distance,
            max_distance: config.spawn_max_distance,
            max_enemies: config.max_enemies,
            last_spawn_ms: 0.0,
        }
    }

    /// Rewind the interval timer for a fresh run
    pub fn reset(&mut self) {
        self.last_spawn_ms = 0.0;
    }

    /// Attempt a spawn at `now_ms`. Returns `None` until a full interval has
    /// elapsed (an exactly-elapsed interval spawns); on acceptance the enemy
    /// is placed on a random ring around the player.
    pub fn try_spawn(&mut self, player_pos: Vec2, now_ms: f64, rng: &mut Pcg32) -> Option<Enemy> {
        if now_ms - self.last_spawn_ms < self.spawn_interval_ms {
            return None;
        }
        self.last_spawn_ms = now_ms;

        let angle = rng.random_range(0.0..TAU);
        let distance = rng.random_range(self.min_distance..=self.max_distance);
        Some(Enemy::new(player_pos + angle_to_dir(angle) * distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn spawner() -> EnemySpawner {
        EnemySpawner::new(&SpawnerConfig::default())
    }

    #[test]
    fn test_second_attempt_inside_interval_rejected() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut spawner = spawner();

        let first = spawner.try_spawn(Vec2::ZERO, 2000.0, &mut rng);
        let second = spawner.try_spawn(Vec2::ZERO, 2500.0, &mut rng);

        assert!(first.is_some());
        assert!(second.is_none());
    }

    #[test]
    fn test_exactly_elapsed_interval_spawns() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut spawner = spawner();

        assert!(spawner.try_spawn(Vec2::ZERO, 2000.0, &mut rng).is_some());
        assert!(spawner.try_spawn(Vec2::ZERO, 4000.0, &mut rng).is_some());
        assert_eq!(spawner.last_spawn_ms, 4000.0);
    }

    #[test]
    fn test_spawns_land_on_ring_around_player() {
        let mut rng = Pcg32::seed_from_u64(99);
        let mut spawner = spawner();
        let player_pos = Vec2::new(500.0, -200.0);

        for i in 1..=50 {
            let now = i as f64 * spawner.spawn_interval_ms;
            let enemy = spawner.try_spawn(player_pos, now, &mut rng).unwrap();
            let distance = enemy.pos.distance(player_pos);
            assert!(
                distance >= spawner.min_distance - 1e-3
                    && distance <= spawner.max_distance + 1e-3,
                "spawn {i} landed {distance} away"
            );
            assert!(!enemy.is_dead);
        }
    }

    #[test]
    fn test_reset_rewinds_timer() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut spawner = spawner();

        assert!(spawner.try_spawn(Vec2::ZERO, 2000.0, &mut rng).is_some());
        spawner.reset();
        assert!(spawner.try_spawn(Vec2::ZERO, 2000.0, &mut rng).is_some());
    }
}
