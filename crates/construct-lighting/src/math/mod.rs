use core::ops::Mul;

pub mod random;
pub use random::*;
pub mod spherical_geometry;
pub use spherical_geometry::*;

pub fn sqr<T: Mul<Output = T> + Clone + Copy>(x: T) -> T {
    x * x
}

pub fn safe_acos(x: f32) -> f32 {
    x.clamp(-1.0, 1.0).acos()
}
