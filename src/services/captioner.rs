//! Vision captioning collaborator
//!
//! A caption only enriches the classification context, so callers normally
//! go through [`caption_or_fallback`] and never see a captioning failure.

use crate::error::{Result, StudioError};
use async_trait::async_trait;
use image::DynamicImage;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Hosted BLIP base captioning model
pub const DEFAULT_CAPTION_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/Salesforce/blip-image-captioning-base";

/// Phrase substituted when captioning fails
pub const FALLBACK_CAPTION: &str = "product shot";

/// Describes an image in a short phrase
#[async_trait]
pub trait VisionCaptioner: Send + Sync {
    fn name(&self) -> &str;

    async fn caption(&self, image: &DynamicImage) -> Result<String>;
}

/// Caption `image`, degrading any failure to [`FALLBACK_CAPTION`]
pub async fn caption_or_fallback(captioner: &dyn VisionCaptioner, image: &DynamicImage) -> String {
    match captioner.caption(image).await {
        Ok(caption) => caption,
        Err(e) => {
            warn!(captioner = captioner.name(), "Captioning failed, using fallback: {}", e);
            FALLBACK_CAPTION.to_string()
        },
    }
}

/// Captioner backed by the Hugging Face inference API
pub struct HuggingFaceCaptioner {
    endpoint: String,
    token: String,
    client: Client,
}

impl HuggingFaceCaptioner {
    /// # Errors
    /// - `token` is empty or whitespace
    /// - HTTP client construction failures
    pub fn new(token: &str) -> Result<Self> {
        Self::with_endpoint(DEFAULT_CAPTION_ENDPOINT, token, Duration::from_secs(30))
    }

    /// # Errors
    /// - `token` is empty or whitespace
    /// - HTTP client construction failures
    pub fn with_endpoint(endpoint: &str, token: &str, timeout: Duration) -> Result<Self> {
        let token = token.trim();
        if token.is_empty() {
            return Err(StudioError::validation("Hugging Face API token is required"));
        }
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            StudioError::dependency_unavailable(format!("Failed to build HTTP client: {}", e))
        })?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            token: token.to_string(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CaptionResponse {
    generated_text: String,
}

#[async_trait]
impl VisionCaptioner for HuggingFaceCaptioner {
    fn name(&self) -> &str {
        "huggingface-blip"
    }

    #[instrument(skip(self, image), fields(endpoint = %self.endpoint))]
    async fn caption(&self, image: &DynamicImage) -> Result<String> {
        let mut bytes = Vec::new();
        image
            .to_rgb8()
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)?;

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| StudioError::dependency_unavailable(format!("Captioner unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(StudioError::dependency_unavailable(format!(
                "Captioning request failed: {}",
                response.status()
            )));
        }

        let result: Vec<CaptionResponse> = response.json().await.map_err(|e| {
            StudioError::dependency_unavailable(format!("Unexpected captioner response: {}", e))
        })?;

        let caption = result
            .into_iter()
            .next()
            .map(|r| r.generated_text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| StudioError::dependency_unavailable("No caption generated"))?;
        debug!(%caption, "Caption received");
        Ok(caption)
    }
}
