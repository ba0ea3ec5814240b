use std::path::Path;

use anyhow::{ensure, Context, Result};
use construct::construct_lighting::{LightingConfig, SkyConfig};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Driver-only settings, the `[node]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSettings {
    pub ticks: u32,
    /// Rows of the baked sky panorama shown on the sky dome.
    pub background_height: u32,
    pub eye_position: Vec3,
    pub view_direction: Vec3,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            ticks: 600,
            background_height: 256,
            eye_position: Vec3::new(0.0, 0.0, 1.4),
            view_direction: Vec3::new(0.0, 1.0, -0.2),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub lighting: LightingConfig,
    pub sky: SkyConfig,
    pub node: NodeSettings,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let settings: Settings = toml::from_str(&text)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))?;

        settings
            .validate()
            .with_context(|| format!("Invalid settings in {}", path.display()))?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.lighting.validate()?;
        self.sky.validate()?;
        ensure!(
            self.node.background_height > 0,
            "node.background_height must be positive"
        );
        ensure!(
            self.node.view_direction.length_squared() > 0.0,
            "node.view_direction must be non-zero"
        );
        Ok(())
    }
}
