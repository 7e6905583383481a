//! Prompt studio session
//!
//! The prompt workflow keeps two results between steps: the last scraped
//! feature text and the last style classification (with the visual context it
//! was computed from). They live in an explicit [`SessionState`] owned by
//! [`PromptStudio`]. Each recomputation overwrites its slot; a failed step
//! leaves the previous values in place.

use crate::{
    context::{ContextClassifier, PromptAssembler},
    error::{Result, StudioError},
    services::{caption_or_fallback, PageScraper, VisionCaptioner},
    types::{PromptRecord, StyleOptionSet},
};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Product name offered when the user has not typed one
pub const DEFAULT_PRODUCT_NAME: &str = "QCY AilyBuds Pro+";

/// Feature list used until a page has been scraped
pub const DEFAULT_FEATURES: &str =
    "Adaptive ANC, Hi-Res Audio, 6-Mic AI Call, Bluetooth 5.3, Long Battery";

/// Results carried between workflow steps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Feature text from the last successful scrape
    pub scraped_features: Option<String>,
    /// Style options from the last analysis
    pub style_options: Option<StyleOptionSet>,
    /// Caption from the last analysis, empty when there was no image
    pub visual_context: String,
}

/// Scrape, analyze and generate prompt records for one product at a time
pub struct PromptStudio {
    scraper: Box<dyn PageScraper>,
    captioner: Option<Box<dyn VisionCaptioner>>,
    state: SessionState,
}

impl PromptStudio {
    #[must_use]
    pub fn new(scraper: Box<dyn PageScraper>, captioner: Option<Box<dyn VisionCaptioner>>) -> Self {
        Self {
            scraper,
            captioner,
            state: SessionState::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Scrape `url` and remember the feature text
    ///
    /// An empty result is returned but not stored: unlike overwriting the
    /// slot, the previous scrape (or the default list) stays in effect.
    ///
    /// # Errors
    /// - `Validation` for an empty URL, before any request is made
    /// - `Network` when the page cannot be fetched; state is left untouched
    #[instrument(skip(self))]
    pub async fn fetch_features(&mut self, url: &str) -> Result<String> {
        let url = url.trim();
        if url.is_empty() {
            return Err(StudioError::validation("A product link is required to fetch features"));
        }

        let features = self.scraper.scrape(url).await.map_err(|e| {
            warn!("Scrape of {} failed: {}", url, e);
            e
        })?;

        if features.is_empty() {
            info!("No features found at {}", url);
        } else {
            info!("Fetched features from {}", url);
            self.state.scraped_features = Some(features.clone());
        }
        Ok(features)
    }

    /// Feature text to prefill: the last scrape, or the default list
    #[must_use]
    pub fn features_text(&self) -> &str {
        self.state
            .scraped_features
            .as_deref()
            .unwrap_or(DEFAULT_FEATURES)
    }

    /// Caption the image (if any) and classify the product
    ///
    /// Captioning never fails the analysis: without a captioner the visual
    /// context is empty, and a failing captioner yields the fallback phrase.
    ///
    /// # Errors
    /// - `Validation` for an empty product name
    #[instrument(skip(self, image), fields(has_image = image.is_some()))]
    pub async fn analyze(
        &mut self,
        product_name: &str,
        link: &str,
        image: Option<&DynamicImage>,
    ) -> Result<StyleOptionSet> {
        let product_name = product_name.trim();
        if product_name.is_empty() {
            return Err(StudioError::validation("Product name is required"));
        }

        let visual_context = match (image, self.captioner.as_deref()) {
            (Some(image), Some(captioner)) => caption_or_fallback(captioner, image).await,
            (Some(_), None) => {
                debug!("No captioner configured, skipping visual analysis");
                String::new()
            },
            (None, _) => String::new(),
        };

        let context = format!("{} {} {}", product_name, link.trim(), visual_context);
        let styles = ContextClassifier::classify(product_name, &context);
        info!(
            category = styles.category(),
            visual_context = %visual_context,
            "Analysis complete"
        );

        self.state.visual_context = visual_context;
        self.state.style_options = Some(styles.clone());
        Ok(styles)
    }

    /// Build prompt records for the chosen style
    ///
    /// `style_label` defaults to the first suggested style.
    ///
    /// # Errors
    /// - `Validation` when no analysis has run or the label is unknown
    pub fn generate(
        &self,
        product_name: &str,
        style_label: Option<&str>,
        features_text: &str,
    ) -> Result<Vec<PromptRecord>> {
        let styles = self
            .state
            .style_options
            .as_ref()
            .ok_or_else(|| StudioError::validation("Analyze the product before generating prompts"))?;

        let background = match style_label {
            Some(label) => styles.get(label).ok_or_else(|| {
                StudioError::validation(format!(
                    "Unknown style '{}'. Available: {}",
                    label,
                    styles.labels().join(", ")
                ))
            })?,
            None => styles
                .first()
                .map(|option| option.descriptor.as_str())
                .ok_or_else(|| StudioError::validation("No style options available"))?,
        };

        Ok(PromptAssembler::assemble(
            product_name.trim(),
            background,
            &self.state.visual_context,
            features_text,
        ))
    }

    /// Pretty JSON for download
    ///
    /// # Errors
    /// - Serialization failures
    pub fn export_json(records: &[PromptRecord]) -> Result<String> {
        PromptAssembler::to_json(records)
    }
}
