//! Sharpness and color enhancement
//!
//! Both enhancements interpolate between a "degenerate" version of the image
//! and the image itself: `out = degenerate + factor * (image - degenerate)`.
//! A factor of 1.0 returns the input, larger factors push away from the
//! degenerate. Alpha is never modified.

use crate::config::EnhancementSpec;
use image::{Rgba, RgbaImage};
use tracing::debug;

/// 3x3 smoothing kernel used as the sharpness degenerate (sum 13)
const SMOOTH_KERNEL: [[u32; 3]; 3] = [[1, 1, 1], [1, 5, 1], [1, 1, 1]];
const SMOOTH_KERNEL_SUM: u32 = 13;

/// Image enhancement operations applied to cut-out foregrounds
pub struct ImageEnhancer;

impl ImageEnhancer {
    /// Apply the sharpness boost followed by the color boost
    ///
    /// Order matters: the color boost operates on the sharpened pixels.
    #[must_use]
    pub fn enhance(image: &RgbaImage, spec: &EnhancementSpec) -> RgbaImage {
        debug!(
            sharpness = spec.sharpness,
            color = spec.color,
            "Enhancing {}x{} foreground",
            image.width(),
            image.height()
        );
        let sharpened = Self::sharpen(image, spec.sharpness);
        Self::saturate(&sharpened, spec.color)
    }

    /// Blend against a smoothed copy; border pixels have no smoothed counterpart
    #[must_use]
    pub fn sharpen(image: &RgbaImage, factor: f32) -> RgbaImage {
        if (factor - 1.0).abs() < f32::EPSILON {
            return image.clone();
        }
        let degenerate = Self::smooth(image);
        Self::blend(&degenerate, image, factor)
    }

    /// Blend against the grayscale luminance of each pixel
    #[must_use]
    pub fn saturate(image: &RgbaImage, factor: f32) -> RgbaImage {
        if (factor - 1.0).abs() < f32::EPSILON {
            return image.clone();
        }
        let (width, height) = image.dimensions();
        let degenerate = RgbaImage::from_fn(width, height, |x, y| {
            let p = image.get_pixel(x, y);
            // ITU-R 601-2 luma, rounded
            let luma = ((u32::from(p[0]) * 299 + u32::from(p[1]) * 587 + u32::from(p[2]) * 114
                + 500)
                / 1000) as u8;
            Rgba([luma, luma, luma, p[3]])
        });
        Self::blend(&degenerate, image, factor)
    }

    fn smooth(image: &RgbaImage) -> RgbaImage {
        let (width, height) = image.dimensions();
        let mut out = image.clone();
        if width < 3 || height < 3 {
            return out;
        }

        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let mut acc = [0u32; 3];
                for (ky, row) in SMOOTH_KERNEL.iter().enumerate() {
                    for (kx, weight) in row.iter().enumerate() {
                        let p = image.get_pixel(x + kx as u32 - 1, y + ky as u32 - 1);
                        for (channel, value) in acc.iter_mut().enumerate() {
                            *value += u32::from(p.0.get(channel).copied().unwrap_or(0)) * weight;
                        }
                    }
                }
                let alpha = image.get_pixel(x, y)[3];
                out.put_pixel(
                    x,
                    y,
                    Rgba([
                        ((acc[0] + SMOOTH_KERNEL_SUM / 2) / SMOOTH_KERNEL_SUM) as u8,
                        ((acc[1] + SMOOTH_KERNEL_SUM / 2) / SMOOTH_KERNEL_SUM) as u8,
                        ((acc[2] + SMOOTH_KERNEL_SUM / 2) / SMOOTH_KERNEL_SUM) as u8,
                        alpha,
                    ]),
                );
            }
        }
        out
    }

    fn blend(degenerate: &RgbaImage, image: &RgbaImage, factor: f32) -> RgbaImage {
        let (width, height) = image.dimensions();
        RgbaImage::from_fn(width, height, |x, y| {
            let d = degenerate.get_pixel(x, y);
            let p = image.get_pixel(x, y);
            let mix = |channel: usize| -> u8 {
                let base = f32::from(d[channel]);
                let target = f32::from(p[channel]);
                (base + factor * (target - base)).round().clamp(0.0, 255.0) as u8
            };
            Rgba([mix(0), mix(1), mix(2), p[3]])
        })
    }
}
