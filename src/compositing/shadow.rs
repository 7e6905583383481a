//! Soft drop shadow synthesis from a foreground's alpha silhouette

use super::alpha::{alpha_bbox, crop_to_bbox, extract_alpha, paste_masked_rgba};
use crate::{
    config::ShadowSpec,
    error::{Result, StudioError},
};
use image::{imageops, Rgba, RgbaImage};
use tracing::{debug, warn};

/// Builds drop shadows under cut-out foregrounds
pub struct ShadowSynthesizer;

impl ShadowSynthesizer {
    /// Render `foreground` over a blurred, offset copy of its own silhouette
    ///
    /// Never fails: when the shadow cannot be rendered, or the rendered result
    /// has no visible pixels, the original foreground is returned unchanged.
    #[must_use]
    pub fn synthesize(foreground: &RgbaImage, spec: &ShadowSpec) -> RgbaImage {
        Self::synthesize_with_outcome(foreground, spec).0
    }

    /// Like [`ShadowSynthesizer::synthesize`], also telling whether the shadow was kept
    #[must_use]
    pub fn synthesize_with_outcome(foreground: &RgbaImage, spec: &ShadowSpec) -> (RgbaImage, bool) {
        match Self::try_synthesize(foreground, spec) {
            Ok(Some(shadowed)) => (shadowed, true),
            Ok(None) => {
                debug!("Shadowed foreground is fully transparent, keeping original");
                (foreground.clone(), false)
            },
            Err(e) => {
                warn!("Drop shadow skipped: {}", e);
                (foreground.clone(), false)
            },
        }
    }

    /// Fallible rendering; `Ok(None)` when nothing visible remains
    ///
    /// # Errors
    /// - Empty foreground
    /// - Working canvas dimensions overflow
    pub fn try_synthesize(foreground: &RgbaImage, spec: &ShadowSpec) -> Result<Option<RgbaImage>> {
        let (width, height) = foreground.dimensions();
        if width == 0 || height == 0 {
            return Err(StudioError::processing_stage_error(
                "shadow",
                "foreground has no pixels",
                Some(&format!("{}x{}", width, height)),
            ));
        }

        let silhouette = Self::silhouette(foreground, spec);
        let shadow = imageops::blur(&silhouette, spec.blur_radius);

        let (dx, dy) = spec.offset;
        let canvas_width = width
            .checked_add(dx.unsigned_abs())
            .and_then(|w| w.checked_add(ShadowSpec::MARGIN))
            .ok_or_else(|| StudioError::processing("shadow canvas width overflows"))?;
        let canvas_height = height
            .checked_add(dy.unsigned_abs())
            .and_then(|h| h.checked_add(ShadowSpec::MARGIN))
            .ok_or_else(|| StudioError::processing("shadow canvas height overflows"))?;

        let mut canvas = RgbaImage::from_pixel(canvas_width, canvas_height, Rgba([0, 0, 0, 0]));
        let inset = i64::from(ShadowSpec::MARGIN / 2);

        paste_masked_rgba(
            &mut canvas,
            &shadow,
            inset + i64::from(dx),
            inset + i64::from(dy),
        );
        paste_masked_rgba(&mut canvas, foreground, inset, inset);

        debug!(
            canvas_width,
            canvas_height,
            blur_radius = spec.blur_radius,
            "Rendered drop shadow"
        );

        Ok(alpha_bbox(&canvas).map(|bbox| crop_to_bbox(&canvas, bbox)))
    }

    /// Solid shadow-colored layer whose alpha is the foreground's alpha
    fn silhouette(foreground: &RgbaImage, spec: &ShadowSpec) -> RgbaImage {
        let mask = extract_alpha(foreground);
        let [r, g, b, _] = spec.color;
        let (width, height) = foreground.dimensions();
        RgbaImage::from_fn(width, height, |x, y| Rgba([r, g, b, mask.get_pixel(x, y)[0]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_foreground(size: u32, inner: u32) -> RgbaImage {
        let mut image = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 0]));
        let start = (size - inner) / 2;
        for y in start..start + inner {
            for x in start..start + inner {
                image.put_pixel(x, y, Rgba([220, 30, 30, 255]));
            }
        }
        image
    }

    #[test]
    fn test_fully_transparent_foreground_is_returned_unchanged() {
        let image = RgbaImage::from_pixel(40, 30, Rgba([12, 34, 56, 0]));
        let result = ShadowSynthesizer::synthesize(&image, &ShadowSpec::default());
        assert_eq!(result, image);
    }

    #[test]
    fn test_empty_foreground_falls_back() {
        let image = RgbaImage::new(0, 0);
        assert!(ShadowSynthesizer::try_synthesize(&image, &ShadowSpec::default()).is_err());
        assert_eq!(
            ShadowSynthesizer::synthesize(&image, &ShadowSpec::default()).dimensions(),
            (0, 0)
        );
    }

    #[test]
    fn test_shadow_extends_below_foreground() {
        let foreground = square_foreground(60, 30);
        let spec = ShadowSpec {
            offset: (0, 20),
            color: [0, 0, 0, 100],
            blur_radius: 4.0,
        };
        let result = ShadowSynthesizer::synthesize(&foreground, &spec);
        let red = Rgba([220, 30, 30, 255]);

        // The foreground is drawn first in the crop; the shadow adds rows underneath
        let (column, last_red_row) = result
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == red)
            .map(|(x, y, _)| (x, y))
            .max_by_key(|(_, y)| *y)
            .unwrap();
        assert!(last_red_row + 1 < result.height());

        let below = result.get_pixel(column, last_red_row + 1);
        assert!(below[3] > 0);
        assert_eq!((below[0], below[1], below[2]), (0, 0, 0));

        // The blurred tail fades out instead of ending in a hard edge
        let bottom = result.height() - 1;
        let max_bottom_alpha = (0..result.width())
            .map(|x| result.get_pixel(x, bottom)[3])
            .max()
            .unwrap();
        assert!(max_bottom_alpha > 0);
        assert!(max_bottom_alpha < 255);
    }

    #[test]
    fn test_foreground_pixels_stay_on_top() {
        let foreground = square_foreground(50, 20);
        let result = ShadowSynthesizer::synthesize(&foreground, &ShadowSpec::default());
        assert!(result
            .pixels()
            .any(|p| *p == Rgba([220, 30, 30, 255])));
    }
}
