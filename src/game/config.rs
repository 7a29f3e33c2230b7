use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::error::ConfigError;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,

    /// Score added for each food eaten
    pub food_reward: u32,

    /// Tick interval at the start of every game, in milliseconds
    pub initial_tick_ms: u64,
    /// How much the interval shrinks per food eaten, in milliseconds
    pub tick_step_ms: u64,
    /// The interval never drops below this, in milliseconds
    pub min_tick_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            food_reward: 10,
            initial_tick_ms: 150,
            tick_step_ms: 2,
            min_tick_ms: 80,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Read a JSON configuration file. Missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    pub fn initial_tick_interval(&self) -> Duration {
        Duration::from_millis(self.initial_tick_ms)
    }

    pub fn tick_step(&self) -> Duration {
        Duration::from_millis(self.tick_step_ms)
    }

    pub fn min_tick_interval(&self) -> Duration {
        Duration::from_millis(self.min_tick_ms)
    }

    /// Check the configuration before a game is built on it
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = (self.grid_width, self.grid_height);
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyGrid { width, height });
        }
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(ConfigError::GridTooLarge { width, height });
        }
        if self.food_reward == 0 {
            return Err(ConfigError::ZeroReward);
        }
        if self.initial_tick_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "initial tick interval",
            });
        }
        if self.min_tick_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "minimum tick interval",
            });
        }
        if self.min_tick_ms > self.initial_tick_ms {
            return Err(ConfigError::FloorAboveInitial {
                min_ms: self.min_tick_ms,
                initial_ms: self.initial_tick_ms,
            });
        }
        Ok(())
    }
}
