//! Run settings
//!
//! Loaded from JSON; every field is optional and falls back to its default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::sim::Arena;
use crate::tuning::Tuning;

/// Settings for one run of the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub arena_width: f32,
    pub arena_height: f32,
    /// RNG seed (same seed, same run)
    pub seed: u64,
    /// Length of the headless demo run
    pub demo_seconds: f64,
    /// Host frame step for the headless driver
    pub frame_ms: f64,
    /// Take the first offered upgrade automatically
    pub auto_pick_upgrades: bool,
    /// Optional balance overrides, relative to the settings file
    pub tuning_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: 800.0,
            arena_height: 600.0,
            seed: 1,
            demo_seconds: 60.0,
            frame_ms: 1000.0 / 60.0,
            auto_pick_upgrades: true,
            tuning_path: None,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let mut settings = Self::from_json(&json)?;
        if let (Some(tuning), Some(dir)) = (settings.tuning_path.as_mut(), path.parent()) {
            if tuning.is_relative() {
                *tuning = dir.join(&*tuning);
            }
        }
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.arena_width <= 0.0 || self.arena_height <= 0.0 {
            return Err(SimError::Config {
                source: format!(
                    "arena must have a positive size, got {}x{}",
                    self.arena_width, self.arena_height
                ),
            });
        }
        if self.frame_ms <= 0.0 {
            return Err(SimError::Config {
                source: format!("frame step must be positive, got {}", self.frame_ms),
            });
        }
        Ok(())
    }

    pub fn arena(&self) -> Arena {
        Arena::new(self.arena_width, self.arena_height)
    }

    /// Balance tables: the override file if configured, else defaults
    pub fn tuning(&self) -> Result<Tuning, SimError> {
        match &self.tuning_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                let tuning = Tuning::from_json(&json)?;
                log::info!("Loaded tuning from {}", path.display());
                Ok(tuning)
            }
            None => Ok(Tuning::default()),
        }
    }
}
