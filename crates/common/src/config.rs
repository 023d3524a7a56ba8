//! Game configuration: one record for the physics constants, effect timings,
//! ring motion and the per-difficulty table.
//!
//! Every field has a default, so a JSON file only needs to name the values it
//! overrides.

use crate::types::{Difficulty, DifficultySettings};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Per-difficulty settings, one entry per [`Difficulty`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTable {
    pub easy: DifficultySettings,
    pub medium: DifficultySettings,
    pub hard: DifficultySettings,
}

impl DifficultyTable {
    pub fn get(&self, difficulty: Difficulty) -> &DifficultySettings {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            easy: DifficultySettings {
                ring_outer_radius: 8.0,
                ring_inner_radius: 0.5,
                max_force: 8000.0,
                scale: Vec3::new(120.0, 15.0, 30.0),
                lives: 8,
            },
            medium: DifficultySettings {
                ring_outer_radius: 6.0,
                ring_inner_radius: 0.5,
                max_force: 10000.0,
                scale: Vec3::new(100.0, 15.0, 25.0),
                lives: 5,
            },
            hard: DifficultySettings {
                ring_outer_radius: 4.5,
                ring_inner_radius: 0.5,
                max_force: 12000.0,
                scale: Vec3::new(80.0, 15.0, 20.0),
                lives: 3,
            },
        }
    }
}

/// Simulation constants shared by every difficulty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed simulation step in seconds.
    pub tick_seconds: f32,
    /// Quadratic air resistance coefficient.
    pub drag: f32,
    /// Force change per tick while a throttle key is held.
    pub force_increment: f32,
    /// Distance from the outermost rings to the corridor walls, in grid units
    /// (x rows, y height units, z columns).
    pub margins: Vec3,
    pub turbo_seconds: f32,
    /// Turbo force as a multiple of the difficulty's max force.
    pub turbo_force_factor: f32,
    /// Autopilot force as a multiple of the difficulty's max force.
    pub autopilot_force_factor: f32,
    pub rumble_seconds: f32,
    /// World units an oscillating ring moves per tick.
    pub oscillation_step: f32,
    /// Degrees a spinning ring turns per tick.
    pub spin_step_degrees: f32,
    pub difficulties: DifficultyTable,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_seconds: 0.01,
            drag: 0.2,
            force_increment: 100.0,
            margins: Vec3::new(2.0, 1.0, 10.0),
            turbo_seconds: 2.0,
            turbo_force_factor: 1.5,
            autopilot_force_factor: 0.5,
            rumble_seconds: 0.25,
            oscillation_step: 0.1,
            spin_step_degrees: 1.0,
            difficulties: DifficultyTable::default(),
        }
    }
}

impl GameConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn settings(&self, difficulty: Difficulty) -> &DifficultySettings {
        self.difficulties.get(difficulty)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_seconds.is_nan() || self.tick_seconds <= 0.0 {
            return Err(ConfigError::Invalid("tick_seconds must be positive".into()));
        }
        if self.drag < 0.0 {
            return Err(ConfigError::Invalid("drag must not be negative".into()));
        }
        for difficulty in Difficulty::ALL {
            let s = self.settings(difficulty);
            if !(s.ring_inner_radius > 0.0 && s.ring_inner_radius < s.ring_outer_radius) {
                return Err(ConfigError::Invalid(format!(
                    "{difficulty}: ring inner radius must be positive and below the outer radius"
                )));
            }
            if s.lives == 0 {
                return Err(ConfigError::Invalid(format!("{difficulty}: lives must be at least 1")));
            }
            if s.scale.min_element() <= 0.0 {
                return Err(ConfigError::Invalid(format!("{difficulty}: scale must be positive")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_validate() {
        GameConfig::default().validate().unwrap();
    }

    #[test]
    fn harder_means_fewer_lives_and_smaller_rings() {
        let table = DifficultyTable::default();
        assert!(table.easy.lives > table.medium.lives);
        assert!(table.medium.lives > table.hard.lives);
        assert!(table.easy.hole_radius() > table.hard.hole_radius());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, r#"{{ "drag": 0.5, "turbo_seconds": 3.0 }}"#).unwrap();
        let config = GameConfig::load(tmp.path()).unwrap();
        assert_eq!(config.drag, 0.5);
        assert_eq!(config.turbo_seconds, 3.0);
        assert_eq!(config.tick_seconds, 0.01);
    }

    #[test]
    fn invalid_values_rejected() {
        let mut config = GameConfig::default();
        config.difficulties.hard.ring_inner_radius = 10.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, r#"{{ "tick_seconds": 0.0 }}"#).unwrap();
        assert!(matches!(GameConfig::load(tmp.path()), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GameConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
