use core::f32::consts::PI;

use construct_model::ObjectId;
use glam::{Vec2, Vec3};

use crate::{Ray, Rgb};

/// Default Lambertian reflectance of lit surfaces, slightly blue.
pub const DEFAULT_REFLECTANCE: Rgb = Rgb(Vec3::new(0.8, 0.8, 0.9));

/// Stable identity of an extracted triangle.
///
/// `revision` changes whenever the owning object's geometry is replaced, so
/// cached lighting of stale triangles is never carried over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TriangleKey {
    pub object: ObjectId,
    pub revision: u64,
    /// Triangle index inside the owning object's vertex buffer.
    pub index: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub t: f32,
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    /// Cached outgoing radiance interpolated at the hit point.
    pub radiance: Rgb,
    /// Object owning the hit triangle.
    pub attribute: ObjectId,
    /// Index of the hit triangle in its soup.
    pub triangle: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub p0: Vec3,
    pub d1: Vec3,
    pub d2: Vec3,
    pub normal: Vec3,
    pub reflectance: Rgb,
    /// Cached outgoing radiance per vertex, every channel >= 0.
    pub ir: [Rgb; 3],
    pub uv: [Vec2; 3],
    pub key: TriangleKey,
}

impl Triangle {
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3, key: TriangleKey) -> Self {
        let d1 = p1 - p0;
        let d2 = p2 - p0;

        Self {
            p0,
            d1,
            d2,
            normal: d1.cross(d2).normalize(),
            reflectance: DEFAULT_REFLECTANCE,
            ir: [Rgb::ZERO; 3],
            uv: [Vec2::ZERO; 3],
            key,
        }
    }

    pub fn with_uv(mut self, uv0: Vec2, uv1: Vec2, uv2: Vec2) -> Self {
        self.uv = [uv0, uv1, uv2];
        self
    }

    pub fn with_reflectance(mut self, reflectance: Rgb) -> Self {
        self.reflectance = reflectance;
        self
    }

    /// Zero area or non-finite corners leave the normal undefined.
    pub fn is_degenerate(&self) -> bool {
        !self.normal.is_finite()
            || !self.p0.is_finite()
            || !self.d1.is_finite()
            || !self.d2.is_finite()
    }

    pub fn vertex(&self, i: usize) -> Vec3 {
        match i {
            0 => self.p0,
            1 => self.p0 + self.d1,
            2 => self.p0 + self.d2,
            _ => panic!("triangle vertex index {} out of range", i),
        }
    }

    /// Lambertian BRDF, constant over all direction pairs.
    pub fn brdf(&self) -> Rgb {
        self.reflectance / PI
    }

    /// One-sided Moller-Trumbore test. Only rays arriving against the normal hit.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let s1 = ray.direction.cross(self.d2);
        let div = s1.dot(self.d1);
        // parallel or back-facing
        if div <= 0.0 {
            return None;
        }
        let div_inv = 1.0 / div;

        let s = ray.origin - self.p0;
        let a = s.dot(s1) * div_inv;
        if !(0.0..=1.0).contains(&a) {
            return None;
        }

        let s2 = s.cross(self.d1);
        let b = ray.direction.dot(s2) * div_inv;
        if b < 0.0 || a + b > 1.0 {
            return None;
        }

        let t = self.d2.dot(s2) * div_inv;
        if t < 0.0 {
            return None;
        }

        let w = 1.0 - a - b;
        Some(Intersection {
            t,
            position: ray.at(t),
            normal: self.normal,
            uv: self.uv[0] * w + self.uv[1] * a + self.uv[2] * b,
            radiance: self.ir[0] * w + self.ir[1] * a + self.ir[2] * b,
            attribute: self.key.object,
            triangle: 0,
        })
    }
}
