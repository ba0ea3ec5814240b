use core::ops::{Add, AddAssign, Div, Mul, Sub};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Linear RGB radiometric quantity (radiance, irradiance or reflectance).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb(pub Vec3);

impl From<Vec3> for Rgb {
    fn from(v: Vec3) -> Self {
        Rgb(v)
    }
}

impl From<Rgb> for Vec3 {
    fn from(val: Rgb) -> Self {
        val.0
    }
}

impl Rgb {
    pub const ZERO: Self = Self(Vec3::ZERO);

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self(Vec3::new(r, g, b))
    }

    pub fn splat(v: f32) -> Self {
        Self(Vec3::splat(v))
    }

    pub fn is_non_negative(&self) -> bool {
        self.0.cmpge(Vec3::ZERO).all()
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    /// Euclidean norm, used as a scalar brightness measure.
    pub fn norm(&self) -> f32 {
        self.0.length()
    }

    pub fn max_element(&self) -> f32 {
        self.0.max_element()
    }
}

impl Add for Rgb {
    type Output = Rgb;

    fn add(self, rhs: Rgb) -> Rgb {
        Rgb(self.0 + rhs.0)
    }
}

impl AddAssign for Rgb {
    fn add_assign(&mut self, rhs: Rgb) {
        self.0 += rhs.0;
    }
}

impl Sub for Rgb {
    type Output = Rgb;

    fn sub(self, rhs: Rgb) -> Rgb {
        Rgb(self.0 - rhs.0)
    }
}

impl Mul for Rgb {
    type Output = Rgb;

    fn mul(self, rhs: Rgb) -> Rgb {
        Rgb(self.0 * rhs.0)
    }
}

impl Mul<f32> for Rgb {
    type Output = Rgb;

    fn mul(self, rhs: f32) -> Rgb {
        Rgb(self.0 * rhs)
    }
}

impl Mul<Rgb> for f32 {
    type Output = Rgb;

    fn mul(self, rhs: Rgb) -> Rgb {
        Rgb(self * rhs.0)
    }
}

impl Div<f32> for Rgb {
    type Output = Rgb;

    fn div(self, rhs: f32) -> Rgb {
        Rgb(self.0 / rhs)
    }
}
