use anyhow::{ensure, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Tuning of the incremental irradiance cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Triangles refined per tick, the only per-frame budget knob.
    pub triangles_per_tick: usize,
    /// Hemisphere samples per vertex and update.
    pub samples_per_vertex: usize,
    /// Weight of a fresh estimate against the cached value.
    pub blend_rate: f32,
    /// Distance gather rays start above the surface.
    pub ray_offset: f32,
    /// Corners of one mesh closer than this share their lighting.
    pub weld_tolerance: f32,
    pub seed: u64,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            triangles_per_tick: 8,
            samples_per_vertex: 5,
            blend_rate: 0.5,
            ray_offset: 1e-3,
            weld_tolerance: 1e-3,
            seed: 0,
        }
    }
}

impl LightingConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.triangles_per_tick > 0,
            "lighting.triangles_per_tick must be positive"
        );
        ensure!(
            self.samples_per_vertex > 0,
            "lighting.samples_per_vertex must be positive"
        );
        ensure!(
            self.blend_rate > 0.0 && self.blend_rate <= 1.0,
            "lighting.blend_rate must be in (0, 1], got {}",
            self.blend_rate
        );
        ensure!(
            self.ray_offset >= 0.0 && self.ray_offset.is_finite(),
            "lighting.ray_offset must be a finite non-negative distance, got {}",
            self.ray_offset
        );
        ensure!(
            self.weld_tolerance >= 0.0 && self.weld_tolerance.is_finite(),
            "lighting.weld_tolerance must be a finite non-negative distance, got {}",
            self.weld_tolerance
        );
        Ok(())
    }
}

/// Parameters of the analytic [`crate::Sky`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    /// Direction towards the sun, normalized on use.
    pub sun_direction: Vec3,
    pub sun_power: Vec3,
    pub turbidity: f32,
    /// Replaces the sky with a test pattern.
    pub checkerboard: bool,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            sun_direction: Vec3::new(0.0, 20.0, 1.0).normalize(),
            sun_power: Vec3::splat(150e3),
            turbidity: 10.0,
            checkerboard: false,
        }
    }
}

impl SkyConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.turbidity >= 1.0,
            "sky.turbidity must be at least 1, got {}",
            self.turbidity
        );
        ensure!(
            self.sun_direction.length_squared() > 0.0 && self.sun_direction.is_finite(),
            "sky.sun_direction must be a finite non-zero vector"
        );
        ensure!(
            self.sun_power.cmpge(Vec3::ZERO).all(),
            "sky.sun_power must be non-negative, got {}",
            self.sun_power
        );
        Ok(())
    }
}
