//! Core types for compositing and prompt-building operations

use crate::error::Result;
use image::{DynamicImage, RgbImage};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pixel bounds of the non-transparent region of an image
///
/// `right` and `bottom` are exclusive, so `right - left` is the width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl BoundingBox {
    #[must_use]
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// A degenerate box covers no pixels
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Per-stage timings of one compositing run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingTimings {
    /// External background removal call
    pub background_removal_ms: u64,

    /// Bounding-box crop
    pub crop_ms: u64,

    /// Sharpness and color boosts
    pub enhancement_ms: u64,

    /// Drop shadow synthesis
    pub shadow_ms: u64,

    /// Scaling and pasting onto the canvas
    pub composition_ms: u64,

    /// JPEG encoding (only when encoded through the result)
    pub encode_ms: Option<u64>,

    /// Total end-to-end processing time
    pub total_ms: u64,
}

impl ProcessingTimings {
    /// Share of the total spent waiting on the background remover
    #[must_use]
    pub fn removal_ratio(&self) -> f64 {
        if self.total_ms == 0 {
            0.0
        } else {
            self.background_removal_ms as f64 / self.total_ms as f64
        }
    }

    /// One-line summary for logs
    #[must_use]
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Total: {}ms | Removal: {}ms | Crop: {}ms | Enhance: {}ms | Shadow: {}ms | Compose: {}ms",
            self.total_ms,
            self.background_removal_ms,
            self.crop_ms,
            self.enhancement_ms,
            self.shadow_ms,
            self.composition_ms
        );
        if let Some(encode_ms) = self.encode_ms {
            summary.push_str(&format!(" | Encode: {}ms", encode_ms));
        }
        summary
    }
}

/// Result of a compositing operation
#[derive(Debug, Clone)]
pub struct CompositeResult {
    /// The opaque composite canvas
    pub image: RgbImage,

    /// Source image dimensions
    pub source_dimensions: (u32, u32),

    /// Dimensions of the foreground as pasted onto the canvas
    pub foreground_dimensions: (u32, u32),

    /// Whether a drop shadow ended up in the composite
    pub shadow_applied: bool,

    /// Stage timings
    pub timings: ProcessingTimings,
}

impl CompositeResult {
    /// Canvas dimensions
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Encode the composite as JPEG
    ///
    /// # Errors
    /// - JPEG encoder failures
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>> {
        crate::services::OutputFormatHandler::encode_jpeg(&self.image, quality)
    }

    /// Encode and write the composite as JPEG, recording encode time
    ///
    /// # Errors
    /// - JPEG encoder failures
    /// - File write failures
    pub fn save_jpeg<P: AsRef<Path>>(&mut self, path: P, quality: u8) -> Result<()> {
        let encode_start = instant::Instant::now();
        let bytes = self.to_jpeg_bytes(quality)?;
        let path = path.as_ref();
        std::fs::write(path, &bytes)
            .map_err(|e| crate::error::StudioError::file_io_error("write composite", path, &e))?;
        let encode_ms = encode_start.elapsed().as_millis() as u64;
        self.timings.encode_ms = Some(encode_ms);
        info!("Saved composite to {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    /// Consume into a `DynamicImage`
    #[must_use]
    pub fn into_dynamic(self) -> DynamicImage {
        DynamicImage::ImageRgb8(self.image)
    }
}

/// A labeled background style suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleOption {
    pub label: String,
    pub descriptor: String,
}

/// Ordered style suggestions; the first entry is the default choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleOptionSet {
    category: String,
    options: Vec<StyleOption>,
}

impl StyleOptionSet {
    /// Build a set from `(label, descriptor)` pairs, keeping their order
    #[must_use]
    pub fn from_pairs(category: &str, pairs: &[(&str, &str)]) -> Self {
        Self {
            category: category.to_string(),
            options: pairs
                .iter()
                .map(|(label, descriptor)| StyleOption {
                    label: (*label).to_string(),
                    descriptor: (*descriptor).to_string(),
                })
                .collect(),
        }
    }

    /// Name of the product category that produced this set
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Descriptor for a label, if present
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|option| option.label == label)
            .map(|option| option.descriptor.as_str())
    }

    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.options.iter().map(|option| option.label.as_str()).collect()
    }

    #[must_use]
    pub fn first(&self) -> Option<&StyleOption> {
        self.options.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleOption> {
        self.options.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Headline and subline rendered over a banner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOverlay {
    pub headline: String,
    pub subline: String,
}

/// One structured image-generation prompt, built per feature
///
/// Field order is the serialized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub product: String,
    pub layout: String,
    pub background: String,
    pub composition: String,
    pub visual_elements: String,
    pub text_overlay: TextOverlay,
    pub style: String,
}
