use core::f32::consts::PI;
use std::sync::Arc;

use construct_texture::{Texture, TextureSampleRepeat};
use glam::{Vec3, Vec4Swizzles};
use rayon::prelude::*;

use crate::{
    math::{spherical_direction, spherical_phi, spherical_theta, unit_vector_to_panorama_coords},
    Rgb, SkyConfig,
};

/// Radiance arriving from infinitely far away, used for rays that leave the scene.
pub trait Environment: Send + Sync {
    /// Radiance travelling against `direction`, i.e. seen when looking along it.
    fn radiance(&self, direction: Vec3) -> Rgb;
}

/// Representative wavelengths of the RGB channels, in meters.
const WAVELENGTHS: [f32; 3] = [650e-9, 510e-9, 475e-9];

/// Scale heights of the two particle populations, per kilometer.
const ALPHA_HAZE: f32 = 0.8333;
const ALPHA_MOLECULE: f32 = 0.1136;

const REFRACTIVE_INDEX_MINUS_ONE: f32 = 0.00003;
const MOLECULAR_DENSITY: f32 = 2.545e25;
const DEPOLARIZATION: f32 = 0.035;
const JUNGE_EXPONENT: f32 = 4.0;

/// Number of one kilometer steps marched along the view ray.
const NUM_STEPS: usize = 50;
const OUTPUT_SCALE: f32 = 1.0 / 100.0;

/// Clear sky lit by a single sun, single scattering only.
///
/// Marches the view ray through an exponential atmosphere, adding sun light
/// scattered by molecules (Rayleigh) and haze (Mie) at every step, attenuated
/// by everything scattered out between that step and the viewer.
#[derive(Debug, Clone)]
pub struct Sky {
    sun_direction: Vec3,
    sun_power: Rgb,
    turbidity: f32,
    checkerboard: bool,
}

impl Default for Sky {
    fn default() -> Self {
        Self::new()
    }
}

impl Sky {
    pub fn new() -> Self {
        Self::from_config(&SkyConfig::default())
    }

    pub fn from_config(config: &SkyConfig) -> Self {
        assert!(
            config.turbidity >= 1.0,
            "sky turbidity must be at least 1, got {}",
            config.turbidity
        );

        Self {
            sun_direction: config.sun_direction.normalize(),
            sun_power: Rgb(config.sun_power),
            turbidity: config.turbidity,
            checkerboard: config.checkerboard,
        }
    }

    pub fn sun_direction(&self) -> Vec3 {
        self.sun_direction
    }

    pub fn turbidity(&self) -> f32 {
        self.turbidity
    }

    /// Radiance seen in direction `(theta, phi)`, with `theta` measured from zenith.
    pub fn radiance_at(&self, theta: f32, phi: f32) -> Rgb {
        if self.checkerboard {
            return Self::checkerboard_at(theta, phi);
        }

        if theta > PI / 2.0 {
            return Rgb::ZERO;
        }

        let view_direction = spherical_direction(theta, phi);
        let cos_view_sun = view_direction.dot(self.sun_direction);

        let rayleigh = self.per_channel(|lambda| rayleigh(cos_view_sun, lambda));
        let mie = self.per_channel(|lambda| self.mie(cos_view_sun, lambda));
        let rayleigh_total = self.per_channel(rayleigh_total);
        let mie_total = self.per_channel(|lambda| self.mie_total(lambda));

        let mut radiance = Rgb::ZERO;
        let mut transmittance = Rgb::splat(1.0);
        for step in 0..NUM_STEPS {
            let distance = step as f32;
            let density_molecule = particle_density(ALPHA_MOLECULE, distance, theta);
            let density_haze = particle_density(ALPHA_HAZE, distance, theta);

            let scatter = rayleigh * density_molecule + mie * density_haze;
            radiance += self.sun_power * scatter * transmittance;

            let extinction = rayleigh_total * density_molecule + mie_total * density_haze;
            transmittance = Rgb((transmittance.0 * (Vec3::ONE - extinction.0)).max(Vec3::ZERO));
        }

        debug_assert!(radiance.is_non_negative(), "negative sky radiance {:?}", radiance);
        radiance * OUTPUT_SCALE
    }

    /// Debug pattern of `pi / 5` cells alternating between 150 and 100.
    fn checkerboard_at(theta: f32, phi: f32) -> Rgb {
        let x = (theta / (PI / 5.0)) as i32;
        let y = (phi / (PI / 5.0)) as i32;
        if (x ^ y) % 2 != 0 {
            Rgb::splat(150.0)
        } else {
            Rgb::splat(100.0)
        }
    }

    fn per_channel<F: Fn(f32) -> f32>(&self, f: F) -> Rgb {
        Rgb::new(f(WAVELENGTHS[0]), f(WAVELENGTHS[1]), f(WAVELENGTHS[2]))
    }

    /// Wavelength dependent part of the haze scattering coefficient.
    fn mie_base(&self, lambda: f32) -> f32 {
        let concentration = (0.6544 * self.turbidity - 0.6510) * 1e-16;
        0.434 * concentration * (2.0 * PI / lambda).powf(JUNGE_EXPONENT - 2.0) * 0.5
    }

    /// Haze scattering towards the viewer, with a sharp `(1 + cos^3)^2` forward lobe.
    fn mie(&self, cos: f32, lambda: f32) -> f32 {
        self.mie_base(lambda) * (1.0 + cos.powi(3)).powi(2)
    }

    fn mie_total(&self, lambda: f32) -> f32 {
        self.mie_base(lambda) * 0.67
    }
}

impl Environment for Sky {
    fn radiance(&self, direction: Vec3) -> Rgb {
        let direction = direction.normalize();
        self.radiance_at(spherical_theta(direction), spherical_phi(direction))
    }
}

fn rayleigh_base(lambda: f32) -> f32 {
    (2.0 * REFRACTIVE_INDEX_MINUS_ONE).powi(2) / (MOLECULAR_DENSITY * lambda.powi(4))
        * ((6.0 + 3.0 * DEPOLARIZATION) / (6.0 - 7.0 * DEPOLARIZATION))
}

fn rayleigh(cos: f32, lambda: f32) -> f32 {
    PI * PI / 2.0 * rayleigh_base(lambda) * (1.0 + cos * cos)
}

fn rayleigh_total(lambda: f32) -> f32 {
    8.0 * PI.powi(3) / 3.0 * rayleigh_base(lambda)
}

/// Relative particle density `distance` kilometers along a ray at polar angle `theta`.
fn particle_density(alpha: f32, distance: f32, theta: f32) -> f32 {
    (-alpha * distance * theta.cos()).exp()
}

/// Same radiance from every direction.
#[derive(Debug, Clone, Copy)]
pub struct UniformEnvironment(pub Rgb);

impl Environment for UniformEnvironment {
    fn radiance(&self, _direction: Vec3) -> Rgb {
        self.0
    }
}

/// Environment looked up from an equirectangular image, see [`bake_equirectangular`].
#[derive(Debug, Clone)]
pub struct BakedEnvironment {
    texture: Arc<Texture>,
}

impl BakedEnvironment {
    pub fn new(texture: Arc<Texture>) -> Self {
        Self { texture }
    }

    pub fn bake(environment: &dyn Environment, height: u32) -> Self {
        Self::new(Arc::new(bake_equirectangular(environment, height)))
    }

    pub fn texture(&self) -> &Arc<Texture> {
        &self.texture
    }
}

impl Environment for BakedEnvironment {
    fn radiance(&self, direction: Vec3) -> Rgb {
        let uv = unit_vector_to_panorama_coords(direction.normalize());
        Rgb(self
            .texture
            .sample(uv, TextureSampleRepeat::Panorama)
            .xyz())
    }
}

/// Renders `environment` into a `2 * height` by `height` RGB32F panorama.
///
/// Texel `(x, y)` holds the radiance at `theta = pi * y / height` and
/// `phi = 2 * pi * x / width`.
pub fn bake_equirectangular(environment: &dyn Environment, height: u32) -> Texture {
    construct_profiling::profile_function!();

    let width = height * 2;
    let texels: Vec<Vec3> = (0..height)
        .into_par_iter()
        .flat_map_iter(|y| {
            let theta = PI * y as f32 / height as f32;
            (0..width).map(move |x| {
                let phi = 2.0 * PI * x as f32 / width as f32;
                environment.radiance(spherical_direction(theta, phi)).0
            })
        })
        .collect();

    log::debug!("Baked {}x{} environment panorama", width, height);
    Texture::from_rgb32f("environment", width, height, &texels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sky_is_non_negative_everywhere() {
        let sky = Sky::new();
        for i in 0..=32 {
            for j in 0..64 {
                let theta = PI * i as f32 / 32.0;
                let phi = 2.0 * PI * j as f32 / 64.0;
                let radiance = sky.radiance_at(theta, phi);
                assert!(radiance.is_non_negative(), "{:?} at {} {}", radiance, theta, phi);
                assert!(radiance.is_finite());
            }
        }
    }

    #[test]
    fn below_horizon_is_black() {
        let sky = Sky::new();
        assert_eq!(sky.radiance_at(PI * 0.75, 1.0), Rgb::ZERO);
        assert_eq!(sky.radiance(Vec3::NEG_Z), Rgb::ZERO);
    }

    #[test]
    fn sky_is_brightest_towards_the_sun() {
        let sky = Sky::new();
        let towards_sun = sky.radiance(sky.sun_direction()).norm();
        let away_from_sun = sky.radiance(Vec3::new(0.0, -1.0, 0.3)).norm();
        assert!(towards_sun > away_from_sun);
        assert!(away_from_sun > 0.0);
    }

    #[test]
    fn checkerboard_alternates() {
        let sky = Sky::from_config(&SkyConfig {
            checkerboard: true,
            ..Default::default()
        });
        let cell = PI / 5.0;
        assert_eq!(sky.radiance_at(0.5 * cell, 0.5 * cell), Rgb::splat(100.0));
        assert_eq!(sky.radiance_at(1.5 * cell, 0.5 * cell), Rgb::splat(150.0));
        assert_eq!(sky.radiance_at(1.5 * cell, 1.5 * cell), Rgb::splat(100.0));
    }

    #[test]
    #[should_panic(expected = "turbidity")]
    fn turbidity_below_one_is_rejected() {
        Sky::from_config(&SkyConfig {
            turbidity: 0.5,
            ..Default::default()
        });
    }

    #[test]
    fn bake_matches_direct_evaluation() {
        let sky = Sky::new();
        let texture = bake_equirectangular(&sky, 16);
        assert_eq!(texture.width(), 32);
        assert_eq!(texture.height(), 16);

        let x = 5;
        let y = 3;
        let theta = PI * y as f32 / 16.0;
        let phi = 2.0 * PI * x as f32 / 32.0;
        let expected = sky.radiance(spherical_direction(theta, phi)).0;
        let texel = texture.load(glam::UVec2::new(x, y)).xyz();
        assert!((texel - expected).length() <= 1e-4 * expected.length().max(1.0));

        let baked = BakedEnvironment::new(Arc::new(texture));
        let looked_up = baked.radiance(spherical_direction(theta, phi)).0;
        assert!((looked_up - expected).length() <= 1e-3 * expected.length().max(1.0));
    }

    #[test]
    fn uniform_is_constant() {
        let environment = UniformEnvironment(Rgb::splat(2.0));
        assert_eq!(environment.radiance(Vec3::X), Rgb::splat(2.0));
        assert_eq!(environment.radiance(Vec3::NEG_Z), Rgb::splat(2.0));
    }
}
