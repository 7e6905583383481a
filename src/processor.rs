//! Compositing pipeline
//!
//! This module provides the `CompositingPipeline` that turns a product photo
//! into a studio composite: background removal, crop, enhancement, optional
//! drop shadow and placement on the canvas. The CLI and library callers share
//! it so every frontend produces identical output.

use crate::{
    compositing::{alpha_bbox, crop_to_bbox, CanvasComposer, ImageEnhancer, ShadowSynthesizer},
    config::CompositeConfig,
    error::{Result, StudioError},
    remover::BackgroundRemover,
    services::{ImageIOService, OutputFormatHandler, ProcessingStage, ProgressTracker},
    types::{CompositeResult, ProcessingTimings},
};
use image::{DynamicImage, RgbaImage};
use instant::Instant;
use log::{debug, info};
use std::path::{Path, PathBuf};
use tracing::{info as trace_info, instrument, span, warn, Level};

/// Runs source photos through removal, enhancement, shadow and composition
pub struct CompositingPipeline {
    remover: Box<dyn BackgroundRemover>,
    config: CompositeConfig,
    progress_tracker: Option<ProgressTracker>,
}

impl CompositingPipeline {
    /// Create a pipeline around `remover`
    ///
    /// # Errors
    /// - Invalid configuration values
    pub fn new(remover: Box<dyn BackgroundRemover>, config: CompositeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            remover,
            config,
            progress_tracker: None,
        })
    }

    /// Attach a progress tracker that receives per-stage updates
    #[must_use]
    pub fn with_progress_tracker(mut self, tracker: ProgressTracker) -> Self {
        self.progress_tracker = Some(tracker);
        self
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &CompositeConfig {
        &self.config
    }

    /// Name of the background remover in use
    #[must_use]
    pub fn remover_name(&self) -> &str {
        self.remover.name()
    }

    /// Composite a decoded image
    ///
    /// # Errors
    /// - `DependencyUnavailable` when the background remover fails
    /// - `Processing` when composition fails
    pub async fn process(&mut self, image: &DynamicImage) -> Result<CompositeResult> {
        self.restart_tracker();
        self.run(image).await
    }

    /// Load and composite an image file
    ///
    /// # Errors
    /// - File I/O and decoding failures
    /// - Any error from [`CompositingPipeline::process`]
    pub async fn process_file<P: AsRef<Path>>(&mut self, input_path: P) -> Result<CompositeResult> {
        self.restart_tracker();
        self.report_stage(ProcessingStage::ImageLoading);

        let image = match ImageIOService::load_image(input_path.as_ref()) {
            Ok(image) => image,
            Err(e) => {
                self.report_error(&e);
                return Err(e);
            },
        };
        self.run(&image).await
    }

    /// Decode and composite an in-memory image
    ///
    /// # Errors
    /// - Decoding failures
    /// - Any error from [`CompositingPipeline::process`]
    pub async fn process_bytes(&mut self, image_bytes: &[u8]) -> Result<CompositeResult> {
        self.restart_tracker();
        self.report_stage(ProcessingStage::ImageLoading);

        let image = ImageIOService::load_from_bytes(image_bytes)?;
        self.run(&image).await
    }

    /// Composite every input in sorted order, one at a time
    ///
    /// Each output lands next to its input (or in `output_dir`) as
    /// `Pro_{name}.jpg`. A failing item is recorded and the batch moves on.
    pub async fn process_batch(&mut self, inputs: &[PathBuf], output_dir: Option<&Path>) -> BatchReport {
        self.process_batch_with(inputs, output_dir, |_| {}).await
    }

    /// [`CompositingPipeline::process_batch`] with a callback after each item
    pub async fn process_batch_with<F>(
        &mut self,
        inputs: &[PathBuf],
        output_dir: Option<&Path>,
        mut on_item: F,
    ) -> BatchReport
    where
        F: FnMut(&BatchItem),
    {
        let mut ordered = inputs.to_vec();
        ordered.sort();

        let mut items = Vec::with_capacity(ordered.len());
        for input in ordered {
            let output = OutputFormatHandler::output_path(&input, output_dir);
            let outcome = self.process_to_file(&input, &output).await;
            match &outcome {
                Ok(done) => info!(
                    "✅ {} -> {} ({}ms)",
                    input.display(),
                    done.output.display(),
                    done.timings.total_ms
                ),
                Err(e) => warn!("❌ Failed to process {}: {}", input.display(), e),
            }
            let item = BatchItem { input, outcome };
            on_item(&item);
            items.push(item);
        }

        BatchReport { items }
    }

    async fn process_to_file(&mut self, input: &Path, output: &Path) -> Result<BatchSuccess> {
        let mut result = self.process_file(input).await?;

        self.report_stage(ProcessingStage::Encoding);
        result.save_jpeg(output, self.config.jpeg_quality)?;

        Ok(BatchSuccess {
            output: output.to_path_buf(),
            shadow_applied: result.shadow_applied,
            timings: result.timings,
        })
    }

    #[instrument(
        skip(self, image),
        fields(
            remover = %self.remover.name(),
            dimensions = %format!("{}x{}", image.width(), image.height())
        )
    )]
    async fn run(&mut self, image: &DynamicImage) -> Result<CompositeResult> {
        let result = self.run_stages(image).await;
        match &result {
            Ok(composite) => {
                self.report_stage(ProcessingStage::Completed);
                if let Some(ref tracker) = self.progress_tracker {
                    tracker.report_completion(composite.timings.clone());
                }
            },
            Err(e) => self.report_error(e),
        }
        result
    }

    async fn run_stages(&mut self, image: &DynamicImage) -> Result<CompositeResult> {
        let total_start = Instant::now();
        let mut timings = ProcessingTimings::default();
        let source_dimensions = (image.width(), image.height());

        trace_info!(
            remover = %self.remover.name(),
            add_shadow = self.config.add_shadow,
            enhance = self.config.enhance,
            scale = self.config.scale_fraction,
            "🎯 Starting composite"
        );

        // Background removal
        self.report_stage(ProcessingStage::BackgroundRemoval);
        let removal_start = Instant::now();
        let cutout = self.remove_background(image).await?;
        timings.background_removal_ms = removal_start.elapsed().as_millis() as u64;

        // Crop to visible pixels
        self.report_stage(ProcessingStage::Cropping);
        let crop_start = Instant::now();
        let mut foreground = {
            let _span = span!(Level::DEBUG, "crop").entered();
            match alpha_bbox(&cutout) {
                Some(bbox) => {
                    debug!("Cropping {:?} out of {:?}", bbox, cutout.dimensions());
                    crop_to_bbox(&cutout, bbox)
                },
                None => {
                    debug!("Cut-out is fully transparent, keeping uncropped");
                    cutout
                },
            }
        };
        timings.crop_ms = crop_start.elapsed().as_millis() as u64;

        if self.config.enhance {
            self.report_stage(ProcessingStage::Enhancement);
            let enhance_start = Instant::now();
            let _span = span!(Level::DEBUG, "enhance").entered();
            foreground = ImageEnhancer::enhance(&foreground, &self.config.enhancement);
            timings.enhancement_ms = enhance_start.elapsed().as_millis() as u64;
        }

        let mut shadow_applied = false;
        if self.config.add_shadow {
            self.report_stage(ProcessingStage::ShadowSynthesis);
            let shadow_start = Instant::now();
            let _span = span!(Level::DEBUG, "shadow").entered();
            let (shadowed, applied) =
                ShadowSynthesizer::synthesize_with_outcome(&foreground, &self.config.shadow);
            foreground = shadowed;
            shadow_applied = applied;
            timings.shadow_ms = shadow_start.elapsed().as_millis() as u64;
        }

        self.report_stage(ProcessingStage::Composition);
        let composition_start = Instant::now();
        let (canvas, placement) = {
            let _span = span!(Level::DEBUG, "compose").entered();
            CanvasComposer::compose_with_placement(
                &DynamicImage::ImageRgba8(foreground),
                self.config.canvas_size,
                self.config.background_color,
                self.config.scale_fraction,
            )?
        };
        timings.composition_ms = composition_start.elapsed().as_millis() as u64;
        timings.total_ms = total_start.elapsed().as_millis() as u64;

        trace_info!(
            total_ms = timings.total_ms,
            foreground = %format!("{}x{}", placement.size.0, placement.size.1),
            shadow_applied,
            "✅ Composite complete"
        );

        Ok(CompositeResult {
            image: canvas,
            source_dimensions,
            foreground_dimensions: placement.size,
            shadow_applied,
            timings,
        })
    }

    /// Single attempt; every failure surfaces as `DependencyUnavailable`
    async fn remove_background(&self, image: &DynamicImage) -> Result<RgbaImage> {
        self.remover.remove(image).await.map_err(|e| match e {
            StudioError::DependencyUnavailable(_) => e,
            other => StudioError::dependency_unavailable(format!(
                "Background remover '{}' failed: {}",
                self.remover.name(),
                other
            )),
        })
    }

    fn restart_tracker(&mut self) {
        if let Some(ref mut tracker) = self.progress_tracker {
            tracker.restart();
        }
    }

    fn report_stage(&mut self, stage: ProcessingStage) {
        if let Some(ref mut tracker) = self.progress_tracker {
            tracker.report_stage(stage);
        }
    }

    fn report_error(&self, error: &StudioError) {
        if let Some(ref tracker) = self.progress_tracker {
            tracker.report_error(&error.to_string());
        }
    }
}

/// A successfully written batch item
#[derive(Debug, Clone)]
pub struct BatchSuccess {
    /// Where the composite was written
    pub output: PathBuf,
    /// Whether the drop shadow made it into the composite
    pub shadow_applied: bool,
    /// Stage timings including encoding
    pub timings: ProcessingTimings,
}

/// Outcome of one batch input
#[derive(Debug)]
pub struct BatchItem {
    pub input: PathBuf,
    pub outcome: Result<BatchSuccess>,
}

impl BatchItem {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Per-item outcomes of a batch, in processing order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    /// Number of items written successfully
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|item| item.is_success()).count()
    }

    /// Number of items that failed
    #[must_use]
    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }

    /// Items that failed, with their errors
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &StudioError)> {
        self.items
            .iter()
            .filter_map(|item| item.outcome.as_ref().err().map(|e| (item.input.as_path(), e)))
    }
}
