use core::f32::consts::PI;

use glam::{Vec2, Vec3};

use super::safe_acos;

/// Direction for polar angle `theta` (from +Z) and azimuth `phi` (from +X towards +Y).
pub fn spherical_direction(theta: f32, phi: f32) -> Vec3 {
    let sin_theta = theta.sin();
    Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), theta.cos())
}

pub fn spherical_theta(v: Vec3) -> f32 {
    safe_acos(v.z)
}

pub fn spherical_phi(v: Vec3) -> f32 {
    let p = v.y.atan2(v.x);
    if p < 0.0 {
        p + 2.0 * PI
    } else {
        p
    }
}

/// Equirectangular coordinates of a unit vector, `u = phi / 2pi` and `v = theta / pi`.
pub fn unit_vector_to_panorama_coords(direction: Vec3) -> Vec2 {
    Vec2::new(
        spherical_phi(direction) / (2.0 * PI),
        spherical_theta(direction) / PI,
    )
}
