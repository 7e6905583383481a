#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unused_async)]

//! # Pro Image Studio
//!
//! Turns ordinary product photos into studio-standard marketing composites,
//! and product context into structured prompts for image-generation tools.
//!
//! ## Features
//!
//! - **Compositing pipeline**: background removal, crop to product, sharpness
//!   and color boost, optional soft drop shadow, centered shrink-to-fit
//!   placement on a 1080x1080 white canvas, JPEG output
//! - **Pluggable background removal**: remote HTTP segmentation service or a
//!   local color-key remover for plain studio backdrops
//! - **Context classification**: rule-based background style suggestions and
//!   per-feature visual motifs
//! - **Prompt workflow**: page scraping, optional image captioning and JSON
//!   prompt export through an explicit session
//! - **CLI Integration**: Optional command-line interface (enable with `cli` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pro_image_studio::{ColorKeyRemover, CompositeConfig, CompositingPipeline};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = CompositeConfig::builder()
//!     .add_shadow(true)
//!     .scale_percent(80)
//!     .build()?;
//! let mut pipeline = CompositingPipeline::new(Box::new(ColorKeyRemover::white()), config)?;
//!
//! let mut result = pipeline.process_file("headphones.jpg").await?;
//! result.save_jpeg("Pro_headphones.jpg.jpg", 95)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Prompt generation
//!
//! ```rust
//! use pro_image_studio::context::{ContextClassifier, PromptAssembler};
//!
//! let styles = ContextClassifier::classify("QCY AilyBuds Pro+", "");
//! let background = styles.first().map(|s| s.descriptor.clone()).unwrap_or_default();
//! let records = PromptAssembler::assemble("QCY AilyBuds Pro+", &background, "", "Adaptive ANC, Bluetooth 5.3");
//! assert_eq!(records.len(), 2);
//! let json = PromptAssembler::to_json(&records)?;
//! # Ok::<(), pro_image_studio::StudioError>(())
//! ```
//!
//! ### Feature Flags
//!
//! - `cli` (default): Command-line interface, progress bars and tracing setup
//! - `webp-support` (default): WebP input support
//! - `tracing-json`: JSON log output for the CLI

pub mod backends;
#[cfg(feature = "cli")]
pub mod cli;
pub mod compositing;
pub mod config;
pub mod context;
pub mod error;
pub mod processor;
pub mod remover;
pub mod services;
pub mod session;
#[cfg(feature = "cli")]
pub mod tracing_config;
pub mod types;

// Public API exports
pub use backends::{ColorKeyRemover, RemoteBackgroundRemover};
pub use compositing::{CanvasComposer, ImageEnhancer, ShadowSynthesizer};
pub use config::{CompositeConfig, CompositeConfigBuilder, EnhancementSpec, ShadowSpec};
pub use context::{ContextClassifier, FeatureVisualMapper, PromptAssembler};
pub use error::{Result, StudioError};
pub use processor::{BatchItem, BatchReport, BatchSuccess, CompositingPipeline};
pub use remover::BackgroundRemover;
pub use services::{
    caption_or_fallback, ConsoleProgressReporter, HttpPageScraper, HuggingFaceCaptioner,
    ImageIOService, NoOpProgressReporter, OutputFormatHandler, PageScraper, ProcessingStage,
    ProgressReporter, ProgressTracker, ProgressUpdate, VisionCaptioner,
};
pub use session::{PromptStudio, SessionState};
pub use types::{
    BoundingBox, CompositeResult, ProcessingTimings, PromptRecord, StyleOption, StyleOptionSet,
    TextOverlay,
};

#[cfg(feature = "cli")]
pub use tracing_config::{init_cli_tracing, TracingConfig, TracingFormat};

/// Composite an in-memory image with a one-off pipeline
///
/// Convenient for servers and scripts that process a single upload; batch
/// callers should keep a [`CompositingPipeline`] around instead.
///
/// # Examples
/// ```rust,no_run
/// use pro_image_studio::{composite_from_bytes, ColorKeyRemover, CompositeConfig};
///
/// # async fn example(upload: Vec<u8>) -> anyhow::Result<()> {
/// let result = composite_from_bytes(&upload, Box::new(ColorKeyRemover::white()), CompositeConfig::default()).await?;
/// let jpeg = result.to_jpeg_bytes(95)?;
/// # Ok(())
/// # }
/// ```
pub async fn composite_from_bytes(
    image_bytes: &[u8],
    remover: Box<dyn BackgroundRemover>,
    config: CompositeConfig,
) -> Result<CompositeResult> {
    let mut pipeline = CompositingPipeline::new(remover, config)?;
    pipeline.process_bytes(image_bytes).await
}

/// Composite a decoded image with a one-off pipeline
pub async fn composite_from_image(
    image: &image::DynamicImage,
    remover: Box<dyn BackgroundRemover>,
    config: CompositeConfig,
) -> Result<CompositeResult> {
    let mut pipeline = CompositingPipeline::new(remover, config)?;
    pipeline.process(image).await
}
