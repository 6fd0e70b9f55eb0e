//! Runtime configuration
//!
//! An optional JSON file tunes spawn pacing; anything omitted falls back to
//! the defaults, and a config that fails validation is rejected whole.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Enemy spawn pacing and placement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Minimum interval between spawns (ms)
    pub spawn_interval_ms: f64,
    /// Closest allowed spawn distance from the player
    pub spawn_min_distance: f32,
    /// Farthest allowed spawn distance from the player
    pub spawn_max_distance: f32,
    /// Cap on enemies alive at once
    pub max_enemies: usize,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 2000.0,
            spawn_min_distance: 300.0,
            spawn_max_distance: 400.0,
            max_enemies: 40,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub spawner: SpawnerConfig,
}

impl GameConfig {
    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let spawner = &self.spawner;
        if spawner.spawn_interval_ms <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "spawn_interval_ms must be positive, got {}",
                spawner.spawn_interval_ms
            )));
        }
        if spawner.spawn_min_distance < 0.0
            || spawner.spawn_min_distance > spawner.spawn_max_distance
        {
            return Err(ConfigError::Invalid(format!(
                "spawn distance band {}..{} is not ordered",
                spawner.spawn_min_distance, spawner.spawn_max_distance
            )));
        }
        if spawner.max_enemies == 0 {
            return Err(ConfigError::Invalid(
                "max_enemies must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
