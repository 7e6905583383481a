//! Alpha-channel helpers: bounding boxes, crops and masked pastes
//!
//! Masked pastes blend every destination channel toward the source by the
//! source alpha (`dst * (1 - m) + src * m`), alpha included when the
//! destination carries one.

use crate::types::BoundingBox;
use image::{imageops, GrayImage, Luma, Rgb, Rgba32FImage, RgbImage, Rgba, RgbaImage};

/// Bounding box of pixels whose alpha is non-zero, `None` when fully transparent
#[must_use]
pub fn alpha_bbox(image: &RgbaImage) -> Option<BoundingBox> {
    let (width, height) = image.dimensions();
    let mut left = width;
    let mut top = height;
    let mut right = 0;
    let mut bottom = 0;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] > 0 {
            left = left.min(x);
            top = top.min(y);
            right = right.max(x + 1);
            bottom = bottom.max(y + 1);
        }
    }

    let bbox = BoundingBox::new(left, top, right, bottom);
    if right <= left || bottom <= top || bbox.is_empty() {
        None
    } else {
        Some(bbox)
    }
}

/// Copy out the region covered by `bbox`
#[must_use]
pub fn crop_to_bbox(image: &RgbaImage, bbox: BoundingBox) -> RgbaImage {
    imageops::crop_imm(image, bbox.left, bbox.top, bbox.width(), bbox.height()).to_image()
}

/// Crop to the non-transparent region, or return an unchanged copy when there is none
#[must_use]
pub fn crop_to_content(image: &RgbaImage) -> RgbaImage {
    match alpha_bbox(image) {
        Some(bbox) => crop_to_bbox(image, bbox),
        None => image.clone(),
    }
}

/// Extract the alpha channel as a grayscale mask
#[must_use]
pub fn extract_alpha(image: &RgbaImage) -> GrayImage {
    let (width, height) = image.dimensions();
    GrayImage::from_fn(width, height, |x, y| Luma([image.get_pixel(x, y)[3]]))
}

/// Convert to normalized float samples with color scaled by alpha
///
/// Resampling premultiplied color keeps transparent pixels, whose color is
/// arbitrary, from bleeding into visible edges.
#[must_use]
pub fn premultiply(image: &RgbaImage) -> Rgba32FImage {
    let (width, height) = image.dimensions();
    Rgba32FImage::from_fn(width, height, |x, y| {
        let p = image.get_pixel(x, y);
        let a = f32::from(p[3]) / 255.0;
        let c = |channel: usize| f32::from(p[channel]) / 255.0 * a;
        Rgba([c(0), c(1), c(2), a])
    })
}

/// Inverse of [`premultiply`]; pixels with no coverage become transparent black
#[must_use]
pub fn unpremultiply(image: &Rgba32FImage) -> RgbaImage {
    let (width, height) = image.dimensions();
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    RgbaImage::from_fn(width, height, |x, y| {
        let p = image.get_pixel(x, y);
        let a = p[3].clamp(0.0, 1.0);
        let alpha = to_u8(a);
        if alpha == 0 {
            return Rgba([0, 0, 0, 0]);
        }
        Rgba([to_u8(p[0] / a), to_u8(p[1] / a), to_u8(p[2] / a), alpha])
    })
}

#[inline]
fn blend_channel(dst: u8, src: u8, mask: u8) -> u8 {
    let m = u32::from(mask);
    ((u32::from(dst) * (255 - m) + u32::from(src) * m + 127) / 255) as u8
}

/// Visit the overlap of `src` placed at `(x, y)` on a `dst_width`x`dst_height` target
fn for_each_overlap<F>(dst_width: u32, dst_height: u32, src: &RgbaImage, x: i64, y: i64, mut f: F)
where
    F: FnMut(u32, u32, &Rgba<u8>),
{
    for (sx, sy, pixel) in src.enumerate_pixels() {
        let dx = x + i64::from(sx);
        let dy = y + i64::from(sy);
        if dx < 0 || dy < 0 || dx >= i64::from(dst_width) || dy >= i64::from(dst_height) {
            continue;
        }
        f(dx as u32, dy as u32, pixel);
    }
}

/// Paste `src` onto a transparent-capable canvas using its own alpha as mask
pub fn paste_masked_rgba(dst: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    let (width, height) = dst.dimensions();
    for_each_overlap(width, height, src, x, y, |dx, dy, pixel| {
        let mask = pixel[3];
        if mask == 0 {
            return;
        }
        let base = *dst.get_pixel(dx, dy);
        dst.put_pixel(
            dx,
            dy,
            Rgba([
                blend_channel(base[0], pixel[0], mask),
                blend_channel(base[1], pixel[1], mask),
                blend_channel(base[2], pixel[2], mask),
                blend_channel(base[3], pixel[3], mask),
            ]),
        );
    });
}

/// Paste `src` onto an opaque canvas using its alpha as mask
pub fn paste_masked_rgb(dst: &mut RgbImage, src: &RgbaImage, x: i64, y: i64) {
    let (width, height) = dst.dimensions();
    for_each_overlap(width, height, src, x, y, |dx, dy, pixel| {
        let mask = pixel[3];
        if mask == 0 {
            return;
        }
        let base = *dst.get_pixel(dx, dy);
        dst.put_pixel(
            dx,
            dy,
            Rgb([
                blend_channel(base[0], pixel[0], mask),
                blend_channel(base[1], pixel[1], mask),
                blend_channel(base[2], pixel[2], mask),
            ]),
        );
    });
}

/// Paste `src` onto an opaque canvas ignoring any transparency
pub fn paste_opaque_rgb(dst: &mut RgbImage, src: &RgbImage, x: i64, y: i64) {
    imageops::replace(dst, src, x, y);
}
