//! Local color-key background removal
//!
//! Suited to product shots taken against a plain studio backdrop: pixels close
//! to the key color become transparent, a feather band around the threshold
//! fades out smoothly, and everything else keeps its original alpha.

use crate::{error::Result, remover::BackgroundRemover};
use async_trait::async_trait;
use image::{DynamicImage, Rgba, RgbaImage};
use tracing::debug;

/// Keys out a solid backdrop color
#[derive(Debug, Clone)]
pub struct ColorKeyRemover {
    key: [u8; 3],
    tolerance: u8,
    feather: u8,
}

impl ColorKeyRemover {
    /// Create a remover for `key` with the given per-channel tolerance and feather width
    #[must_use]
    pub fn new(key: [u8; 3], tolerance: u8, feather: u8) -> Self {
        Self {
            key,
            tolerance,
            feather,
        }
    }

    /// Key out a white or near-white backdrop
    #[must_use]
    pub fn white() -> Self {
        Self::new([255, 255, 255], 10, 25)
    }

    /// Alpha multiplier (0-255) for a pixel at `distance` from the key
    fn coverage(&self, distance: u8) -> u32 {
        if distance <= self.tolerance {
            0
        } else if self.feather == 0 || distance >= self.tolerance.saturating_add(self.feather) {
            255
        } else {
            u32::from(distance - self.tolerance) * 255 / u32::from(self.feather)
        }
    }

    /// Apply the key to a decoded image
    #[must_use]
    pub fn key_out(&self, image: &DynamicImage) -> RgbaImage {
        let mut rgba = image.to_rgba8();
        for pixel in rgba.pixels_mut() {
            let Rgba([r, g, b, a]) = *pixel;
            let distance = r
                .abs_diff(self.key[0])
                .max(g.abs_diff(self.key[1]))
                .max(b.abs_diff(self.key[2]));
            let coverage = self.coverage(distance);
            *pixel = Rgba([r, g, b, (u32::from(a) * coverage / 255) as u8]);
        }
        rgba
    }
}

impl Default for ColorKeyRemover {
    fn default() -> Self {
        Self::white()
    }
}

#[async_trait]
impl BackgroundRemover for ColorKeyRemover {
    fn name(&self) -> &str {
        "color-key"
    }

    async fn remove(&self, image: &DynamicImage) -> Result<RgbaImage> {
        debug!(key = ?self.key, tolerance = self.tolerance, "Keying out backdrop");
        Ok(self.key_out(image))
    }
}
