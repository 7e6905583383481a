//! Image I/O operations service
//!
//! This module separates file I/O operations from business logic,
//! making the system more testable and maintainable.

use crate::error::{Result, StudioError};
use image::DynamicImage;
use std::path::Path;

/// Input extensions accepted for product photos
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Service for handling image file input operations
pub struct ImageIOService;

impl ImageIOService {
    /// Load an image from a file path
    ///
    /// Falls back to content sniffing when the extension is missing or wrong.
    ///
    /// # Errors
    /// - File does not exist or cannot be read
    /// - Data is not a decodable image
    pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(StudioError::file_io_error(
                "read image file",
                path_ref,
                &std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
            ));
        }

        match image::open(path_ref) {
            Ok(img) => Ok(img),
            Err(e) => {
                log::debug!(
                    "Extension-based loading failed for {}: {}. Attempting content-based detection.",
                    path_ref.display(),
                    e
                );

                let data = std::fs::read(path_ref).map_err(|io_err| {
                    StudioError::file_io_error("read image data", path_ref, &io_err)
                })?;

                image::load_from_memory(&data).map_err(|content_err| {
                    StudioError::processing_stage_error(
                        "image loading",
                        &format!(
                            "Failed to decode image. Extension error: {}. Content error: {}",
                            e, content_err
                        ),
                        Some(&format!(
                            "path: {}, size: {} bytes",
                            path_ref.display(),
                            data.len()
                        )),
                    )
                })
            },
        }
    }

    /// Decode an image held in memory
    ///
    /// # Errors
    /// - Data is not a decodable image
    pub fn load_from_bytes(data: &[u8]) -> Result<DynamicImage> {
        image::load_from_memory(data).map_err(|e| {
            StudioError::processing_stage_error(
                "image loading",
                &e.to_string(),
                Some(&format!("{} bytes", data.len())),
            )
        })
    }

    /// Whether `path` has one of the supported photo extensions
    #[must_use]
    pub fn is_supported_image(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
    }
}
