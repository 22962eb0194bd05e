use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pacing::{Difficulty, SpeedPolicy};

pub const CONFIG_FILE: &str = "snake_config.json";

/// Largest board side accepted from a config file.
pub const MAX_TILE_COUNT: i32 = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parsing {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Game configuration, read from JSON with every field optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameConfig {
    /// Cells along each side of the square board.
    pub tile_count: i32,
    /// Pixels per cell.
    pub grid_pixel_size: u32,
    pub initial_length: usize,
    pub difficulty: Difficulty,
    pub speed_policy: SpeedPolicy,
    pub score_file: PathBuf,
    /// Shortest drag, in pixels, that counts as a swipe.
    pub swipe_min_distance: f32,
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_count: 30,
            grid_pixel_size: 20,
            initial_length: 4,
            difficulty: Difficulty::Medium,
            speed_policy: SpeedPolicy::Fixed,
            score_file: PathBuf::from("snake_scores.json"),
            swipe_min_distance: 30.0,
            log_level: "info".to_string(),
        }
    }
}

impl GameConfig {
    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|source| ConfigError::Json { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(4..=MAX_TILE_COUNT).contains(&self.tile_count) {
            return Err(ConfigError::Invalid(format!(
                "tileCount {} must be between 4 and {MAX_TILE_COUNT}",
                self.tile_count
            )));
        }
        if self.grid_pixel_size == 0 {
            return Err(ConfigError::Invalid("gridPixelSize must be non-zero".to_string()));
        }
        let half = (self.tile_count / 2) as usize;
        if self.initial_length == 0 || self.initial_length > half {
            return Err(ConfigError::Invalid(format!(
                "initialLength {} must be between 1 and {}",
                self.initial_length, half
            )));
        }
        if let SpeedPolicy::Escalating { every, step_ms, floor_ms } = self.speed_policy {
            if every == 0 {
                return Err(ConfigError::Invalid("speedPolicy.every must be non-zero".to_string()));
            }
            if floor_ms <= 0.0 || step_ms < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "speedPolicy needs floorMs > 0 and stepMs >= 0, got {floor_ms} and {step_ms}"
                )));
            }
        }
        Ok(())
    }

    /// Side length of the square canvas in pixels.
    pub fn board_pixels(&self) -> f32 {
        self.tile_count as f32 * self.grid_pixel_size as f32
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.tile_count, 30);
        assert_eq!(config.grid_pixel_size, 20);
        assert_eq!(config.initial_length, 4);
        assert_eq!(config.board_pixels(), 600.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{"tileCount": 20, "difficulty": "hard"}"#).unwrap();
        assert_eq!(config.tile_count, 20);
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.initial_length, 4);
        assert_eq!(config.speed_policy, SpeedPolicy::Fixed);
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("smooth_snake_no_such_config.json");
        assert_eq!(GameConfig::load(&path).unwrap(), GameConfig::default());
    }

    #[test]
    fn test_validation() {
        let tiny = GameConfig { tile_count: 3, ..Default::default() };
        assert!(matches!(tiny.validate(), Err(ConfigError::Invalid(_))));

        let huge = GameConfig { tile_count: 50_000, ..Default::default() };
        assert!(matches!(huge.validate(), Err(ConfigError::Invalid(_))));
        let largest = GameConfig { tile_count: MAX_TILE_COUNT, ..Default::default() };
        assert!(largest.validate().is_ok());

        let long = GameConfig { initial_length: 16, ..Default::default() };
        assert!(long.validate().is_err());

        let stalled = GameConfig {
            speed_policy: SpeedPolicy::Escalating { every: 0, step_ms: 5.0, floor_ms: 50.0 },
            ..Default::default()
        };
        assert!(stalled.validate().is_err());

        let frozen = GameConfig {
            speed_policy: SpeedPolicy::Escalating { every: 5, step_ms: 5.0, floor_ms: 0.0 },
            ..Default::default()
        };
        assert!(frozen.validate().is_err());
    }

    #[test]
    fn test_level_filter_fallback() {
        let config = GameConfig { log_level: "debug".to_string(), ..Default::default() };
        assert_eq!(config.level_filter(), LevelFilter::Debug);
        let config = GameConfig { log_level: "chatty".to_string(), ..Default::default() };
        assert_eq!(config.level_filter(), LevelFilter::Info);
    }
}
