use glam::Vec3;

/// Use this as a good seed to initialize the xor_shift_u32 state
pub fn splitmix_64(state: &mut u64) -> u64 {
    *state = (*state).wrapping_add(0x9E3779B97F4A7C15);
    let mut result = *state;
    result = (result ^ (result >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    result = (result ^ (result >> 27)).wrapping_mul(0x94D049BB133111EB);
    result ^ (result >> 31)
}

/// Fast random number generator, the state must never be zero
pub fn xor_shift_u32(state: &mut u32) -> u32 {
    *state ^= *state << 13;
    *state ^= *state >> 17;
    *state ^= *state << 5;
    *state
}

/// Random f32 based on `xor_shift_u32` in the range of (0, 1]
pub fn random_f32(state: &mut u32) -> f32 {
    xor_shift_u32(state) as f32 * 2.328_306_4e-10_f32
}

/// Seeded generator owned by whoever needs reproducible sampling.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u32,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        let mut seed_state = seed;
        let mut state = splitmix_64(&mut seed_state) as u32;
        if state == 0 {
            state = 0x9E37_79B9;
        }

        Self { state }
    }

    pub fn next_u32(&mut self) -> u32 {
        xor_shift_u32(&mut self.state)
    }

    pub fn uniform_f32(&mut self, lo: f32, hi: f32) -> f32 {
        lo + random_f32(&mut self.state) * (hi - lo)
    }

    /// Gaussian sample using the Box-Muller transform.
    pub fn normal_f32(&mut self, mean: f32, std_dev: f32) -> f32 {
        let u1 = random_f32(&mut self.state);
        let u2 = random_f32(&mut self.state);
        let magnitude = (-2.0 * u1.ln()).max(0.0).sqrt();
        mean + std_dev * magnitude * (core::f32::consts::TAU * u2).cos()
    }

    /// Uniformly distributed unit vector in the hemisphere around `normal`.
    ///
    /// Draws points in the cube `[-1, 1]^3`, rejects those outside the unit ball,
    /// projects onto the sphere and mirrors into the hemisphere of `normal`.
    pub fn sample_hemisphere(&mut self, normal: Vec3) -> Vec3 {
        loop {
            let v = Vec3::new(
                self.uniform_f32(-1.0, 1.0),
                self.uniform_f32(-1.0, 1.0),
                self.uniform_f32(-1.0, 1.0),
            );

            let length = v.length();
            if length > 1.0 || length < 1e-4 {
                continue;
            }

            let v = v / length;
            return if v.dot(normal) > 0.0 { v } else { -v };
        }
    }
}
