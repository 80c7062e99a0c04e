//! Runtime configuration, read from an optional JSON file

use std::path::Path;

use anyhow::Context;
use critter_core::animation::GAIT_FREQUENCY_HZ;
use critter_core::ProjectionMode;
use serde::{Deserialize, Serialize};

/// Environment variable naming a config file when no path is given on the command line
pub const CONFIG_ENV: &str = "CRITTER_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    Perspective,
    Orthographic,
}

impl From<Projection> for ProjectionMode {
    fn from(projection: Projection) -> Self {
        match projection {
            Projection::Perspective => ProjectionMode::Perspective,
            Projection::Orthographic => ProjectionMode::Orthographic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub target_fps: u32,
    pub animate_on_start: bool,
    pub gait_frequency_hz: f64,
    pub camera_distance: f32,
    pub projection: Projection,
    /// Degrees per key press for joint and camera sliders
    pub angle_step: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_fps: 30,
            animate_on_start: false,
            gait_frequency_hz: GAIT_FREQUENCY_HZ,
            camera_distance: 3.0,
            projection: Projection::Perspective,
            angle_step: 5.0,
        }
    }
}

impl Config {
    /// Parse a config document. Missing fields take their defaults.
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let config: Config = serde_json::from_str(content).context("invalid config JSON")?;
        anyhow::ensure!(config.target_fps > 0, "target_fps must be positive");
        anyhow::ensure!(
            config.camera_distance.is_finite() && config.camera_distance > 0.0,
            "camera_distance must be a positive number"
        );
        Ok(config)
    }

    /// Load from `path`, or return the defaults when there is none
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("in {}", path.display()))
    }
}
