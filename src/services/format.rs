//! Output encoding service
//!
//! Keeps encoding and naming of deliverables out of the pipeline logic.

use crate::error::{Result, StudioError};
use image::{codecs::jpeg::JpegEncoder, RgbImage};
use std::path::{Path, PathBuf};

/// Prefix given to processed files
pub const OUTPUT_PREFIX: &str = "Pro_";

/// Service for encoding composites and naming output files
pub struct OutputFormatHandler;

impl OutputFormatHandler {
    /// Encode an opaque image as JPEG at `quality`
    ///
    /// # Errors
    /// - Quality outside 1-100
    /// - Encoder failures
    ///
    /// # Examples
    /// ```rust
    /// use pro_image_studio::services::OutputFormatHandler;
    /// use image::RgbImage;
    ///
    /// let bytes = OutputFormatHandler::encode_jpeg(&RgbImage::new(8, 8), 95)?;
    /// assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
        if quality == 0 || quality > 100 {
            return Err(StudioError::config_value_error(
                "JPEG quality",
                quality,
                "1-100",
                Some(95),
            ));
        }
        let mut buffer = Vec::new();
        {
            let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
            encoder.encode_image(image)?;
        }
        Ok(buffer)
    }

    /// Output file name for a processed input: `Pro_{file name}.jpg`
    ///
    /// The original extension is kept inside the name, so `shoe.png`
    /// becomes `Pro_shoe.png.jpg`.
    #[must_use]
    pub fn output_file_name(input_name: &str) -> String {
        format!("{}{}.jpg", OUTPUT_PREFIX, input_name)
    }

    /// Output path for `input_path` inside `output_dir`, or next to the input
    #[must_use]
    pub fn output_path(input_path: &Path, output_dir: Option<&Path>) -> PathBuf {
        let file_name = input_path
            .file_name()
            .map_or_else(|| "image".to_string(), |name| name.to_string_lossy().into_owned());
        let name = Self::output_file_name(&file_name);
        match output_dir {
            Some(dir) => dir.join(name),
            None => input_path
                .parent()
                .map_or_else(|| PathBuf::from(&name), |parent| parent.join(&name)),
        }
    }
}
