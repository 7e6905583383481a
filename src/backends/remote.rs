//! HTTP background removal backend
//!
//! Sends the source image as PNG to a segmentation endpoint and expects the
//! cut-out foreground back as an image with alpha (PNG or WebP).

use crate::{
    error::{Result, StudioError},
    remover::BackgroundRemover,
};
use async_trait::async_trait;
use image::{DynamicImage, RgbaImage};
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, instrument};

/// Header carrying the API key, when one is configured
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Background remover backed by a remote segmentation service
pub struct RemoteBackgroundRemover {
    endpoint: Url,
    api_key: Option<String>,
    client: Client,
}

impl RemoteBackgroundRemover {
    /// Create a remover for `endpoint`
    ///
    /// # Errors
    /// - `endpoint` is not an absolute http(s) URL
    /// - HTTP client construction failures
    pub fn new(endpoint: &str, api_key: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            StudioError::invalid_config(format!("Invalid remover endpoint '{}': {}", endpoint, e))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(StudioError::invalid_config(format!(
                "Remover endpoint must use http or https, got '{}'",
                endpoint.scheme()
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            StudioError::dependency_unavailable(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            endpoint,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            client,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        image.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }
}

#[async_trait]
impl BackgroundRemover for RemoteBackgroundRemover {
    fn name(&self) -> &str {
        "remote"
    }

    #[instrument(skip(self, image), fields(endpoint = %self.endpoint))]
    async fn remove(&self, image: &DynamicImage) -> Result<RgbaImage> {
        let body = Self::encode_png(image)?;
        debug!("Uploading {} bytes for background removal", body.len());

        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header("Content-Type", "application/octet-stream");
        if let Some(ref key) = self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.body(body).send().await.map_err(|e| {
            StudioError::dependency_unavailable(format!("Background remover unreachable: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StudioError::dependency_unavailable(format!(
                "Background remover returned status {}",
                status
            )));
        }

        let bytes = response.bytes().await.map_err(|e| {
            StudioError::dependency_unavailable(format!("Failed to read remover response: {}", e))
        })?;

        let foreground = image::load_from_memory(&bytes).map_err(|e| {
            StudioError::dependency_unavailable(format!("Remover returned an undecodable image: {}", e))
        })?;

        debug!(
            width = foreground.width(),
            height = foreground.height(),
            "Received foreground"
        );
        Ok(foreground.to_rgba8())
    }
}
