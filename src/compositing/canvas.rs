//! Scaling and centering foregrounds on a fixed-size opaque canvas

use super::alpha::{paste_masked_rgb, paste_opaque_rgb, premultiply, unpremultiply};
use crate::{
    config::{MAX_SCALE_FRACTION, MIN_SCALE_FRACTION},
    error::{Result, StudioError},
};
use image::{imageops::FilterType, DynamicImage, Rgb, RgbImage};
use tracing::debug;

/// Where the foreground landed on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Top-left corner of the pasted foreground
    pub offset: (u32, u32),
    /// Foreground dimensions after scaling
    pub size: (u32, u32),
}

/// Composes foregrounds onto solid canvases
pub struct CanvasComposer;

impl CanvasComposer {
    /// Compose `foreground` onto a `canvas_size` canvas filled with `background`
    ///
    /// # Errors
    /// - Zero canvas dimensions
    /// - Scale fraction outside 0.5-1.0
    pub fn compose(
        foreground: &DynamicImage,
        canvas_size: (u32, u32),
        background: [u8; 3],
        scale_fraction: f32,
    ) -> Result<RgbImage> {
        Self::compose_with_placement(foreground, canvas_size, background, scale_fraction)
            .map(|(canvas, _)| canvas)
    }

    /// Same as [`CanvasComposer::compose`], also reporting the placement
    ///
    /// # Errors
    /// - Zero canvas dimensions
    /// - Scale fraction outside 0.5-1.0
    pub fn compose_with_placement(
        foreground: &DynamicImage,
        canvas_size: (u32, u32),
        background: [u8; 3],
        scale_fraction: f32,
    ) -> Result<(RgbImage, Placement)> {
        let (canvas_width, canvas_height) = canvas_size;
        if canvas_width == 0 || canvas_height == 0 {
            return Err(StudioError::processing_stage_error(
                "composition",
                "canvas has zero area",
                Some(&format!("{}x{}", canvas_width, canvas_height)),
            ));
        }
        if !(MIN_SCALE_FRACTION..=MAX_SCALE_FRACTION).contains(&scale_fraction) {
            return Err(StudioError::config_value_error(
                "scale fraction",
                scale_fraction,
                "0.5-1.0",
                Some(0.75),
            ));
        }

        let mut canvas = RgbImage::from_pixel(canvas_width, canvas_height, Rgb(background));
        let target = Self::target_box(canvas_size, scale_fraction);
        let (fg_width, fg_height) = Self::fit_within(foreground.width(), foreground.height(), target);

        if fg_width == 0 || fg_height == 0 {
            debug!("Empty foreground, returning blank canvas");
            return Ok((
                canvas,
                Placement {
                    offset: (canvas_width / 2, canvas_height / 2),
                    size: (0, 0),
                },
            ));
        }

        let offset_x = (canvas_width - fg_width) / 2;
        let offset_y = (canvas_height - fg_height) / 2;
        let resize_needed = (fg_width, fg_height) != (foreground.width(), foreground.height());

        if foreground.color().has_alpha() {
            let rgba = foreground.to_rgba8();
            let scaled = if resize_needed {
                let premultiplied = premultiply(&rgba);
                unpremultiply(&image::imageops::resize(
                    &premultiplied,
                    fg_width,
                    fg_height,
                    FilterType::Lanczos3,
                ))
            } else {
                rgba
            };
            paste_masked_rgb(&mut canvas, &scaled, i64::from(offset_x), i64::from(offset_y));
        } else {
            let rgb = foreground.to_rgb8();
            let scaled = if resize_needed {
                image::imageops::resize(&rgb, fg_width, fg_height, FilterType::Lanczos3)
            } else {
                rgb
            };
            paste_opaque_rgb(&mut canvas, &scaled, i64::from(offset_x), i64::from(offset_y));
        }

        debug!(
            fg_width,
            fg_height,
            offset_x,
            offset_y,
            "Placed foreground on {}x{} canvas",
            canvas_width,
            canvas_height
        );

        Ok((
            canvas,
            Placement {
                offset: (offset_x, offset_y),
                size: (fg_width, fg_height),
            },
        ))
    }

    /// Largest box the foreground may occupy, `floor(canvas * fraction)` per axis
    #[must_use]
    pub fn target_box(canvas_size: (u32, u32), scale_fraction: f32) -> (u32, u32) {
        // Tolerate f32 representation error so 0.65 of 1080 stays 702
        let scale = f64::from(scale_fraction);
        let edge = |length: u32| (f64::from(length) * scale + 1e-4).floor() as u32;
        (edge(canvas_size.0), edge(canvas_size.1))
    }

    /// Shrink-to-fit dimensions preserving aspect ratio; never upscales
    ///
    /// Of the floor and ceiling candidates for the scaled edge, the one whose
    /// aspect ratio is closest to the source wins, with a minimum of one pixel.
    #[must_use]
    pub fn fit_within(width: u32, height: u32, target: (u32, u32)) -> (u32, u32) {
        let (target_width, target_height) = target;
        if width == 0 || height == 0 {
            return (0, 0);
        }
        if width <= target_width && height <= target_height {
            return (width, height);
        }

        let aspect = f64::from(width) / f64::from(height);
        let tw = f64::from(target_width);
        let th = f64::from(target_height);

        if tw / th >= aspect {
            let exact = th * aspect;
            let best = Self::closest_candidate(exact, |n| (aspect - n / th).abs());
            (best.min(target_width), target_height)
        } else {
            let exact = tw / aspect;
            let best = Self::closest_candidate(exact, |n| {
                if n == 0.0 {
                    0.0
                } else {
                    (aspect - tw / n).abs()
                }
            });
            (target_width, best.min(target_height))
        }
    }

    fn closest_candidate<F: Fn(f64) -> f64>(exact: f64, error: F) -> u32 {
        let floor = exact.floor();
        let ceil = exact.ceil();
        let chosen = if error(ceil) < error(floor) { ceil } else { floor };
        (chosen as u32).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_target_box() {
        assert_eq!(CanvasComposer::target_box((1080, 1080), 0.75), (810, 810));
        assert_eq!(CanvasComposer::target_box((1080, 1080), 0.65), (702, 702));
        assert_eq!(CanvasComposer::target_box((1080, 1080), 1.0), (1080, 1080));
        assert_eq!(CanvasComposer::target_box((1000, 500), 0.5), (500, 250));
    }

    #[test]
    fn test_fit_within_never_upscales() {
        assert_eq!(CanvasComposer::fit_within(100, 50, (810, 810)), (100, 50));
    }

    #[test]
    fn test_fit_within_preserves_aspect() {
        assert_eq!(CanvasComposer::fit_within(2000, 1000, (810, 810)), (810, 405));
        assert_eq!(CanvasComposer::fit_within(1000, 2000, (810, 810)), (405, 810));
        assert_eq!(CanvasComposer::fit_within(3000, 1, (810, 810)), (810, 1));
    }

    #[test]
    fn test_fit_within_property_holds() {
        let target = CanvasComposer::target_box((1080, 1080), 0.75);
        for (w, h) in [(1, 5000), (4000, 3001), (811, 810), (999, 1), (1234, 1235)] {
            let (fw, fh) = CanvasComposer::fit_within(w, h, target);
            assert!(fw <= target.0 && fh <= target.1, "{}x{} -> {}x{}", w, h, fw, fh);
            assert!(fw >= 1 && fh >= 1);
            let expected_h = f64::from(fw) * f64::from(h) / f64::from(w);
            let expected_w = f64::from(fh) * f64::from(w) / f64::from(h);
            assert!(
                (f64::from(fh) - expected_h).abs() <= 1.0
                    || (f64::from(fw) - expected_w).abs() <= 1.0
            );
        }
    }

    #[test]
    fn test_compose_centers_opaque_foreground() {
        let foreground = DynamicImage::ImageRgb8(RgbImage::from_pixel(11, 20, Rgb([0, 0, 255])));
        let (canvas, placement) =
            CanvasComposer::compose_with_placement(&foreground, (100, 100), [255, 255, 255], 0.5)
                .unwrap();

        assert_eq!(canvas.dimensions(), (100, 100));
        assert_eq!(placement.size, (11, 20));
        // (100 - 11) / 2 floors toward the top-left
        assert_eq!(placement.offset, (44, 40));
        assert_eq!(canvas.get_pixel(44, 40), &Rgb([0, 0, 255]));
        assert_eq!(canvas.get_pixel(43, 40), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_compose_respects_transparency() {
        let mut rgba = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 0]));
        rgba.put_pixel(5, 5, Rgba([10, 20, 30, 255]));
        let foreground = DynamicImage::ImageRgba8(rgba);

        let canvas = CanvasComposer::compose(&foreground, (40, 40), [255, 255, 255], 1.0).unwrap();
        assert_eq!(canvas.get_pixel(15, 15), &Rgb([255, 255, 255]));
        assert_eq!(canvas.get_pixel(20, 20), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_downscaled_cutout_has_no_dark_fringe() {
        let mut rgba = RgbaImage::from_pixel(400, 400, Rgba([0, 0, 0, 0]));
        for y in 100..300 {
            for x in 100..300 {
                rgba.put_pixel(x, y, Rgba([255, 0, 0, 255]));
            }
        }
        let foreground = DynamicImage::ImageRgba8(rgba);

        let (canvas, placement) =
            CanvasComposer::compose_with_placement(&foreground, (300, 300), [255, 255, 255], 0.5)
                .unwrap();
        assert_eq!(placement.size, (150, 150));
        // Red over white keeps full red at every coverage level
        assert!(canvas.pixels().all(|p| p[0] >= 250));
        assert_eq!(canvas.get_pixel(150, 150), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_compose_rejects_bad_inputs() {
        let foreground = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        assert!(CanvasComposer::compose(&foreground, (0, 10), [255, 255, 255], 0.75).is_err());
        assert!(CanvasComposer::compose(&foreground, (10, 10), [255, 255, 255], 0.3).is_err());
    }
}
