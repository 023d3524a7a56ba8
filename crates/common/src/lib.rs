//! Shared types for the ringflight workspace.
//!
//! # Invariants
//! - Angles crossing crate boundaries are in degrees.
//! - Difficulty settings are only read through [`GameConfig::settings`].

pub mod config;
pub mod types;
pub mod vector;

pub use config::{ConfigError, DifficultyTable, GameConfig};
pub use types::{Aabb, CameraMode, Difficulty, DifficultySettings};
