use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::ConfigError;

/// Which control source the driver instantiates
///
/// The engine never looks at this; it only consumes commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ControlMode {
    /// Play with the keyboard
    #[default]
    Manual,
    /// Run headless episodes through the agent's training hook
    AgentTrain,
    /// Watch the agent play
    AgentPlay,
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid in cells
    pub grid_width: usize,
    /// Height of the game grid in cells
    pub grid_height: usize,
    /// Number of obstacles generated for each episode
    pub obstacle_count: usize,
    /// Simulation ticks per second (used by the driving loop only)
    pub tick_rate_hz: u32,
    /// Rejection-sampling budget for obstacle and food placement
    pub max_placement_attempts: usize,
    /// Seed for the engine's random source; `None` draws from OS entropy
    pub seed: Option<u64>,
    pub mode: ControlMode,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 40,
            grid_height: 30,
            obstacle_count: 10,
            tick_rate_hz: 10,
            max_placement_attempts: 4096,
            seed: None,
            mode: ControlMode::Manual,
        }
    }
}

impl GameConfig {
    /// Fastest tick rate the driving loop can schedule (1 ms per tick)
    pub const MAX_TICK_RATE_HZ: u32 = 1000;

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

    /// Create a large grid
    pub fn large() -> Self {
        Self::new(60, 40)
    }

    pub fn with_obstacles(mut self, count: usize) -> Self {
        self.obstacle_count = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    pub fn cell_count(&self) -> usize {
        self.grid_width.saturating_mul(self.grid_height)
    }

    /// Check the configuration before an engine is built from it
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if i32::try_from(self.grid_width).is_err() || i32::try_from(self.grid_height).is_err() {
            return Err(ConfigError::GridTooLarge {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if self.tick_rate_hz > Self::MAX_TICK_RATE_HZ {
            return Err(ConfigError::TickRateTooHigh {
                hz: self.tick_rate_hz,
                max: Self::MAX_TICK_RATE_HZ,
            });
        }
        if self.max_placement_attempts == 0 {
            return Err(ConfigError::ZeroPlacementAttempts);
        }
        // Room for the starting head and the first food
        if self.obstacle_count.saturating_add(2) > self.cell_count() {
            return Err(ConfigError::TooManyObstacles {
                obstacles: self.obstacle_count,
                cells: self.cell_count(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 40);
        assert_eq!(config.grid_height, 30);
        assert_eq!(config.obstacle_count, 10);
        assert_eq!(config.tick_rate_hz, 10);
        assert_eq!(config.mode, ControlMode::Manual);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 15);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 15);
        assert_eq!(config.obstacle_count, 10);
    }

    #[test]
    fn test_validate_rejects_empty_grid() {
        let config = GameConfig::new(0, 5);
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyGrid {
                width: 0,
                height: 5
            })
        );
    }

    #[test]
    fn test_validate_rejects_crowded_grid() {
        let config = GameConfig::new(3, 3).with_obstacles(8);
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyObstacles {
                obstacles: 8,
                cells: 9
            })
        );

        let config = GameConfig::new(3, 3).with_obstacles(7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_tick_rate() {
        let mut config = GameConfig::small();
        config.tick_rate_hz = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickRate));
    }

    #[test]
    fn test_validate_caps_tick_rate() {
        let mut config = GameConfig::small();
        config.tick_rate_hz = GameConfig::MAX_TICK_RATE_HZ;
        assert!(config.validate().is_ok());

        config.tick_rate_hz = 2000;
        assert_eq!(
            config.validate(),
            Err(ConfigError::TickRateTooHigh {
                hz: 2000,
                max: 1000
            })
        );
    }

    #[test]
    fn test_mode_serde_kebab_case() {
        let json = serde_json::to_string(&ControlMode::AgentTrain).unwrap();
        assert_eq!(json, "\"agent-train\"");
        let mode: ControlMode = serde_json::from_str("\"agent-play\"").unwrap();
        assert_eq!(mode, ControlMode::AgentPlay);
    }

    #[test]
    fn test_from_json_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"grid_width": 12, "obstacle_count": 3, "mode": "agent-play"}}"#)
            .unwrap();

        let config = GameConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.grid_width, 12);
        assert_eq!(config.grid_height, 30);
        assert_eq!(config.obstacle_count, 3);
        assert_eq!(config.mode, ControlMode::AgentPlay);
    }
}
