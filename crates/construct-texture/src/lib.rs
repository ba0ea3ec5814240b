use glam::{UVec2, Vec2, Vec3, Vec4};

mod export;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    Rgba8Unorm,
    Rgb8Unorm,
    /// Linear HDR radiance, three little-endian `f32` per texel.
    Rgb32Float,
}

impl TextureFormat {
    pub fn num_channels(&self) -> usize {
        match self {
            Self::Rgb8Unorm | Self::Rgb32Float => 3,
            Self::Rgba8Unorm => 4,
        }
    }

    pub fn bytes_per_channel(&self) -> usize {
        match self {
            Self::Rgb8Unorm | Self::Rgba8Unorm => 1,
            Self::Rgb32Float => 4,
        }
    }

    pub fn bytes_per_texel(&self) -> usize {
        self.num_channels() * self.bytes_per_channel()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSampleRepeat {
    Repeat,
    Clamp,
    /// Wraps horizontally and clamps vertically, as needed by equirectangular maps.
    Panorama,
}

pub struct TextureCreateDesc {
    pub name: Option<String>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub data: Box<[u8]>,
}

#[derive(Debug)]
pub struct Texture {
    name: Option<String>,
    width: u32,
    height: u32,
    format: TextureFormat,
    data: Box<[u8]>,
}

impl Texture {
    pub fn new(create_desc: TextureCreateDesc) -> Self {
        let expected =
            create_desc.width as usize * create_desc.height as usize * create_desc.format.bytes_per_texel();
        assert_eq!(
            create_desc.data.len(),
            expected,
            "texture data of {}x{} {:?} must be {} bytes",
            create_desc.width,
            create_desc.height,
            create_desc.format,
            expected
        );

        Self {
            name: create_desc.name,
            width: create_desc.width,
            height: create_desc.height,
            format: create_desc.format,
            data: create_desc.data,
        }
    }

    pub fn from_rgb32f(name: &str, width: u32, height: u32, texels: &[Vec3]) -> Self {
        let floats: Vec<f32> = texels.iter().flat_map(|texel| texel.to_array()).collect();

        Self::new(TextureCreateDesc {
            name: Some(name.to_owned()),
            width,
            height,
            format: TextureFormat::Rgb32Float,
            data: bytemuck::cast_slice(&floats).to_vec().into_boxed_slice(),
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn stride(&self) -> usize {
        self.format.bytes_per_texel()
    }

    pub fn load(&self, id: UVec2) -> Vec4 {
        let offset = (id.y * self.width + id.x) as usize * self.stride();

        match self.format {
            TextureFormat::Rgb32Float => {
                let rgb: [f32; 3] =
                    bytemuck::pod_read_unaligned(&self.data[offset..offset + self.stride()]);
                Vec4::new(rgb[0], rgb[1], rgb[2], 1.0)
            }
            TextureFormat::Rgb8Unorm | TextureFormat::Rgba8Unorm => {
                let mut result = Vec4::W;
                for i in 0..self.format.num_channels() {
                    result[i] = self.data[offset + i] as f32 / 255.0;
                }
                result
            }
        }
    }

    pub fn sample(&self, uv: Vec2, repeat: TextureSampleRepeat) -> Vec4 {
        let x = uv.x * self.width as f32;
        let y = uv.y * self.height as f32;

        let tx = x - x.floor();
        let ty = y - y.floor();

        let x0 = x.floor() as i64;
        let y0 = y.floor() as i64;

        let (wrap_x, wrap_y) = match repeat {
            TextureSampleRepeat::Repeat => (true, true),
            TextureSampleRepeat::Clamp => (false, false),
            TextureSampleRepeat::Panorama => (true, false),
        };

        let ix0 = Self::address(x0, self.width, wrap_x);
        let ix1 = Self::address(x0 + 1, self.width, wrap_x);
        let iy0 = Self::address(y0, self.height, wrap_y);
        let iy1 = Self::address(y0 + 1, self.height, wrap_y);

        let c00 = self.load(UVec2::new(ix0, iy0));
        let c10 = self.load(UVec2::new(ix1, iy0));
        let c01 = self.load(UVec2::new(ix0, iy1));
        let c11 = self.load(UVec2::new(ix1, iy1));

        bilinear(tx, ty, c00, c10, c01, c11)
    }

    fn address(i: i64, size: u32, wrap: bool) -> u32 {
        if wrap {
            i.rem_euclid(size as i64) as u32
        } else {
            i.clamp(0, size as i64 - 1) as u32
        }
    }
}

fn bilinear(tx: f32, ty: f32, c00: Vec4, c10: Vec4, c01: Vec4, c11: Vec4) -> Vec4 {
    let a = c00 * (1.0 - tx) + c10 * tx;
    let b = c01 * (1.0 - tx) + c11 * tx;
    a * (1.0 - ty) + b * ty
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> Texture {
        let texels = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
            Vec3::new(2.0, 4.0, 8.0),
        ];
        Texture::from_rgb32f("gradient", 2, 2, &texels)
    }

    #[test]
    fn load_reads_float_texels() {
        let texture = gradient();
        assert_eq!(texture.stride(), 12);
        assert_eq!(texture.load(UVec2::new(1, 1)), Vec4::new(2.0, 4.0, 8.0, 1.0));
    }

    #[test]
    fn clamp_sampling_interpolates_between_texels() {
        let texture = gradient();
        let center = texture.sample(Vec2::new(0.25, 0.25), TextureSampleRepeat::Clamp);
        assert!((center.x - 1.0).abs() < 1e-5);
        assert!((center.y - 2.0).abs() < 1e-5);
        assert!((center.z - 2.0).abs() < 1e-5);
    }

    #[test]
    fn panorama_sampling_wraps_horizontally_only() {
        let texture = gradient();
        let wrapped = texture.sample(Vec2::new(0.75, 0.0), TextureSampleRepeat::Panorama);
        // Halfway between column 1 and the wrapped column 0 on the first row.
        assert!((wrapped.x - 1.0).abs() < 1e-5);

        let clamped = texture.sample(Vec2::new(0.0, 0.75), TextureSampleRepeat::Panorama);
        assert!((clamped.y - 4.0).abs() < 1e-5);
    }

    #[test]
    #[should_panic(expected = "texture data")]
    fn mismatched_data_size_is_rejected() {
        Texture::new(TextureCreateDesc {
            name: None,
            width: 4,
            height: 4,
            format: TextureFormat::Rgba8Unorm,
            data: vec![0; 3].into_boxed_slice(),
        });
    }
}
