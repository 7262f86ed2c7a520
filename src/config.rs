//! World Configuration
//!
//! The simulation core carries no process-wide constants. World bounds and
//! tuning values are loaded into a `WorldConfig` and threaded through entity
//! construction by the external factory.
//!
//! Configs are stored as RON, same as the rest of the tooling around this
//! core.

use std::path::Path;
use serde::{Serialize, Deserialize};
use crate::math::Vec2;

/// Error type for configuration loading/saving
#[derive(Debug)]
pub enum ConfigError {
    /// File I/O error
    Io(String),
    /// RON serialization/deserialization error
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "I/O error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

impl From<ron::Error> for ConfigError {
    fn from(e: ron::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// World bounds and gameplay tuning constants.
///
/// Every `PhysicsEntity` keeps a copy, so a factory can run several worlds
/// with different tuning side by side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Left world edge (side-scrolling wraps here)
    pub world_x_min: f32,
    /// Right world edge
    pub world_x_max: f32,
    /// Bottom world edge
    pub world_y_min: f32,
    /// Top world edge
    pub world_y_max: f32,

    /// Seconds between shots before `can_shoot` recovers
    pub bullet_delay: f32,

    /// Time to apex of the player jump, in seconds
    pub jump_dt: f32,
    /// Height of the player jump, in world units
    pub jump_height: f32,

    /// Multiplier a spring bonus applies on top of the player jump height
    pub spring_velocity_multiplier: f32,
}

impl WorldConfig {
    /// Upward launch velocity of the player jump arc: v = 2h/t.
    pub fn jump_velocity(&self) -> f32 {
        2.0 * self.jump_height / self.jump_dt
    }

    /// Parse a config from RON text.
    pub fn from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Load a config from a RON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_str(&text)?;
        log::debug!("loaded world config from {}", path.display());
        Ok(config)
    }

    /// Save the config as pretty-printed RON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let pretty = ron::ser::PrettyConfig::new();
        let text = ron::ser::to_string_pretty(self, pretty)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// World-space position wrapped across the x bounds (cyclic worlds).
    pub fn wrap_x(&self, position: Vec2) -> Vec2 {
        if position.x <= self.world_x_min {
            Vec2::new(self.world_x_max, position.y)
        } else if position.x >= self.world_x_max {
            Vec2::new(self.world_x_min, position.y)
        } else {
            position
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world_x_min: -2.0,
            world_x_max: 2.0,
            world_y_min: -1.0,
            world_y_max: 1.0,
            bullet_delay: 0.5,
            jump_dt: 0.2,
            jump_height: 0.3,
            spring_velocity_multiplier: 1.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorldConfig::default();
        assert_eq!(config.world_x_min, -2.0);
        assert_eq!(config.world_x_max, 2.0);
        assert!((config.jump_velocity() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = WorldConfig {
            bullet_delay: 0.25,
            ..WorldConfig::default()
        };

        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new()).unwrap();
        let parsed = WorldConfig::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_parse_error() {
        let result = WorldConfig::from_str("(world_x_min: \"not a float\")");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.ron");

        let config = WorldConfig::default();
        config.save(&path).unwrap();
        let loaded = WorldConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let result = WorldConfig::load(Path::new("/nonexistent/world.ron"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_wrap_x() {
        let config = WorldConfig::default();
        assert_eq!(config.wrap_x(Vec2::new(-2.5, 0.3)), Vec2::new(2.0, 0.3));
        assert_eq!(config.wrap_x(Vec2::new(2.0, 0.3)), Vec2::new(-2.0, 0.3));
        assert_eq!(config.wrap_x(Vec2::new(0.5, 0.3)), Vec2::new(0.5, 0.3));
    }
}
