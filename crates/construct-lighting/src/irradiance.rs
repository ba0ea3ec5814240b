use core::f32::consts::PI;

use glam::Vec3;

use crate::{
    math::Rng, radiance_along, Environment, LightingConfig, Ray, Rgb, Triangle, TriangleSoup,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub triangles: usize,
    pub rays: usize,
    pub weld_groups: usize,
}

/// Spreads Monte-Carlo gathering over many ticks.
///
/// Every tick refines a fixed number of triangles, continuing where the previous
/// tick stopped. Each corner's cached value is an exponential moving average of
/// one-bounce estimates, so light propagates one bounce further per full pass.
#[derive(Debug, Clone)]
pub struct IrradianceCache {
    config: LightingConfig,
    rng: Rng,
    cursor: usize,
}

impl IrradianceCache {
    pub fn new(config: LightingConfig) -> Self {
        Self {
            rng: Rng::new(config.seed),
            config,
            cursor: 0,
        }
    }

    pub fn config(&self) -> &LightingConfig {
        &self.config
    }

    /// Index of the next triangle to refine.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn step(&mut self, soup: &mut TriangleSoup, environment: &dyn Environment) -> TickStats {
        construct_profiling::profile_function!();

        let len = soup.len();
        if len == 0 {
            self.cursor = 0;
            return TickStats::default();
        }

        let count = self.config.triangles_per_tick.min(len);
        let start = self.cursor % len;
        let updated: Vec<usize> = (0..count).map(|i| (start + i) % len).collect();

        for &index in &updated {
            let outgoing = {
                let triangle = &soup.triangles()[index];
                let mut outgoing = [Rgb::ZERO; 3];
                for (corner, radiance) in outgoing.iter_mut().enumerate() {
                    let irradiance =
                        self.gather(soup, environment, triangle.vertex(corner), triangle.normal);
                    *radiance = triangle.brdf() * irradiance;
                }
                outgoing
            };

            let blend_rate = self.config.blend_rate;
            let triangle: &mut Triangle = &mut soup.triangles_mut()[index];
            for (cached, fresh) in triangle.ir.iter_mut().zip(outgoing) {
                *cached = *cached * (1.0 - blend_rate) + fresh * blend_rate;
            }
        }

        self.cursor = (start + count) % len;
        let weld_groups = soup.reconcile_welds(updated.iter().copied());

        TickStats {
            triangles: count,
            rays: count * 3 * self.config.samples_per_vertex,
            weld_groups,
        }
    }

    /// Estimates irradiance at `position` from uniform hemisphere samples.
    fn gather(
        &mut self,
        soup: &TriangleSoup,
        environment: &dyn Environment,
        position: Vec3,
        normal: Vec3,
    ) -> Rgb {
        let origin = position + normal * self.config.ray_offset;
        let num_samples = self.config.samples_per_vertex;

        let mut sum = Rgb::ZERO;
        for _ in 0..num_samples {
            let direction = self.rng.sample_hemisphere(normal);
            let radiance = radiance_along(&Ray::new(origin, direction), soup, environment);
            sum += radiance * normal.dot(direction).max(0.0);
        }

        // Uniform hemisphere pdf is 1 / 2pi.
        sum * (2.0 * PI / num_samples as f32)
    }
}
