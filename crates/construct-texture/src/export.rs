use std::{fs::File, io::BufWriter, path::Path};

use anyhow::{anyhow, Context, Result};
use glam::UVec2;
use image::{codecs::hdr::HdrEncoder, Rgb};

use crate::{Texture, TextureFormat};

impl Texture {
    /// Writes a float texture as a Radiance `.hdr` image.
    pub fn save_hdr(&self, path: &Path) -> Result<()> {
        construct_profiling::profile_function!();

        if self.format() != TextureFormat::Rgb32Float {
            return Err(anyhow!(
                "Only Rgb32Float textures can be exported as hdr, got {:?}.",
                self.format()
            ));
        }

        let mut pixels = Vec::with_capacity((self.width() * self.height()) as usize);
        for y in 0..self.height() {
            for x in 0..self.width() {
                let texel = self.load(UVec2::new(x, y));
                pixels.push(Rgb([texel.x, texel.y, texel.z]));
            }
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        HdrEncoder::new(BufWriter::new(file))
            .encode(&pixels, self.width() as usize, self.height() as usize)
            .with_context(|| format!("Failed to encode {}", path.display()))?;

        log::info!(
            "Exported {}x{} hdr texture to {}.",
            self.width(),
            self.height(),
            path.display()
        );
        Ok(())
    }
}
