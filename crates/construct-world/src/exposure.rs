use construct_lighting::Ray;
use construct_time::TICKS_PER_SECOND;

use crate::{HeadPose, Scene};

/// Time for the pupil to complete 90% of an adaptation.
const ADAPTATION_LATENCY: f32 = 0.25;
const MIN_LUMINANCE: f32 = 0.01;
const INITIAL_MAX_LUMINANCE: f32 = 150.0;

/// Slowly tracks the brightest radiance in view, which the display maps to white.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeAdaptation {
    max_luminance: f32,
}

impl Default for EyeAdaptation {
    fn default() -> Self {
        Self::new()
    }
}

impl EyeAdaptation {
    pub fn new() -> Self {
        Self {
            max_luminance: INITIAL_MAX_LUMINANCE,
        }
    }

    pub fn max_luminance(&self) -> f32 {
        self.max_luminance
    }

    /// Mean radiance norm of the brightest quarter of an 11x11 grid of view rays.
    pub fn estimate_max_radiance(scene: &Scene, head: &dyn HeadPose) -> f32 {
        construct_profiling::profile_function!();

        let eye = head.eye_position();
        let center = head.view_direction();
        let up = head.view_up();
        let right = head.view_right();

        let mut radiances = Vec::with_capacity(121);
        for i in -5..=5 {
            for j in -5..=5 {
                let direction = (center + up * (i as f32 / 5.0) + right * (j as f32 / 8.0))
                    .normalize();
                radiances.push(scene.radiance(&Ray::new(eye, direction)).norm());
            }
        }
        radiances.sort_by(f32::total_cmp);

        let brightest = &radiances[radiances.len() * 3 / 4..];
        brightest.iter().sum::<f32>() / brightest.len() as f32
    }

    /// Moves `max_luminance` towards the current estimate in log space, one tick's worth.
    pub fn adapt(&mut self, scene: &Scene, head: &dyn HeadPose) -> f32 {
        let target = Self::estimate_max_radiance(scene, head);
        self.adapt_towards(target)
    }

    pub fn adapt_towards(&mut self, luminance: f32) -> f32 {
        let luminance = luminance.max(MIN_LUMINANCE);

        let ticks = TICKS_PER_SECOND * ADAPTATION_LATENCY;
        let ratio = 1.0 - 0.1f32.powf(1.0 / ticks);
        self.max_luminance =
            ((1.0 - ratio) * self.max_luminance.ln() + ratio * luminance.ln()).exp();

        self.max_luminance
    }
}
