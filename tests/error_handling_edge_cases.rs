//! Error conditions and boundary cases across the public API

use async_trait::async_trait;
use image::{DynamicImage, Rgba, RgbaImage, RgbImage};
use pro_image_studio::{
    compositing::{alpha_bbox, crop_to_content},
    BackgroundRemover, CanvasComposer, ColorKeyRemover, CompositeConfig, CompositingPipeline,
    HttpPageScraper, HuggingFaceCaptioner, OutputFormatHandler, PageScraper, PromptAssembler,
    PromptStudio, RemoteBackgroundRemover, Result, ShadowSynthesizer, StudioError,
};
use std::time::Duration;
use tempfile::TempDir;

enum Failure {
    Network,
    Processing,
    Unavailable,
}

struct FailingRemover(Failure);

#[async_trait]
impl BackgroundRemover for FailingRemover {
    fn name(&self) -> &str {
        "failing"
    }

    async fn remove(&self, _image: &DynamicImage) -> Result<RgbaImage> {
        Err(match self.0 {
            Failure::Network => StudioError::network("connection reset"),
            Failure::Processing => StudioError::processing("model crashed"),
            Failure::Unavailable => StudioError::dependency_unavailable("service offline"),
        })
    }
}

struct NeverScraped;

#[async_trait]
impl PageScraper for NeverScraped {
    async fn scrape(&self, url: &str) -> Result<String> {
        panic!("scraper must not be called for {:?}", url);
    }
}

fn photo() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 32, image::Rgb([90, 90, 90])))
}

#[test]
fn test_config_boundaries() {
    assert!(CompositeConfig::builder().scale_percent(50).build().is_ok());
    assert!(CompositeConfig::builder().scale_percent(100).build().is_ok());
    assert!(CompositeConfig::builder().jpeg_quality(1).build().is_ok());

    let mut config = CompositeConfig::default();
    config.scale_fraction = 0.49;
    assert!(matches!(config.validate(), Err(StudioError::InvalidConfig(_))));

    let mut config = CompositeConfig::default();
    config.scale_fraction = 1.01;
    assert!(config.validate().is_err());

    let mut config = CompositeConfig::default();
    config.jpeg_quality = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_pipeline_rejects_invalid_config() {
    let mut config = CompositeConfig::default();
    config.canvas_size = (1080, 0);
    let result = CompositingPipeline::new(Box::new(ColorKeyRemover::white()), config);
    assert!(matches!(result, Err(StudioError::InvalidConfig(_))));
}

#[tokio::test]
async fn test_remover_failures_surface_as_dependency_unavailable() {
    for failure in [Failure::Network, Failure::Processing, Failure::Unavailable] {
        let mut pipeline =
            CompositingPipeline::new(Box::new(FailingRemover(failure)), CompositeConfig::default())
                .unwrap();
        let err = pipeline.process(&photo()).await.unwrap_err();
        assert!(matches!(err, StudioError::DependencyUnavailable(_)), "got {:?}", err);
        assert!(err.is_dependency_failure());
    }
}

#[tokio::test]
async fn test_unreachable_remote_remover() {
    // Port 9 (discard) is closed on test hosts
    let remover = RemoteBackgroundRemover::new(
        "http://127.0.0.1:9/remove",
        None,
        Some(Duration::from_secs(2)),
    )
    .unwrap();
    let mut pipeline = CompositingPipeline::new(Box::new(remover), CompositeConfig::default()).unwrap();

    let err = pipeline.process(&photo()).await.unwrap_err();
    assert!(matches!(err, StudioError::DependencyUnavailable(_)));
}

#[test]
fn test_remote_remover_rejects_bad_endpoint() {
    assert!(matches!(
        RemoteBackgroundRemover::new("not a url", None, None),
        Err(StudioError::InvalidConfig(_))
    ));
}

#[tokio::test]
async fn test_undecodable_inputs() {
    let mut pipeline =
        CompositingPipeline::new(Box::new(ColorKeyRemover::white()), CompositeConfig::default())
            .unwrap();

    let err = pipeline.process_bytes(b"GIF89a-but-not-really").await.unwrap_err();
    assert!(matches!(err, StudioError::Processing(_)));

    let err = pipeline.process_bytes(&[]).await.unwrap_err();
    assert!(matches!(err, StudioError::Processing(_)));

    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.png");
    let err = pipeline.process_file(&missing).await.unwrap_err();
    assert!(matches!(err, StudioError::Io(_)));
    assert!(err.to_string().contains("nope.png"));
}

#[test]
fn test_jpeg_quality_limits() {
    let canvas = RgbImage::new(4, 4);
    assert!(OutputFormatHandler::encode_jpeg(&canvas, 0).is_err());
    assert!(OutputFormatHandler::encode_jpeg(&canvas, 101).is_err());
    assert!(OutputFormatHandler::encode_jpeg(&canvas, 100).is_ok());
}

#[test]
fn test_degenerate_foregrounds() {
    let empty = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 0]));
    assert!(alpha_bbox(&empty).is_none());
    assert_eq!(crop_to_content(&empty).dimensions(), (10, 10));
    assert!(ShadowSynthesizer::try_synthesize(&RgbaImage::new(0, 0), &Default::default()).is_err());

    // One opaque pixel in a corner
    let mut dot = empty.clone();
    dot.put_pixel(9, 9, Rgba([1, 2, 3, 255]));
    assert_eq!(crop_to_content(&dot).dimensions(), (1, 1));
}

#[test]
fn test_extreme_aspect_ratio_keeps_one_pixel() {
    let fit = CanvasComposer::fit_within(10_000, 2, (810, 810));
    assert_eq!(fit, (810, 1));

    let sliver = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4000, 1, Rgba([0, 0, 0, 255])));
    let canvas = CanvasComposer::compose(&sliver, (1080, 1080), [255, 255, 255], 0.75).unwrap();
    assert_eq!(canvas.dimensions(), (1080, 1080));
}

#[test]
fn test_compose_rejects_bad_arguments() {
    let fg = DynamicImage::ImageRgba8(RgbaImage::new(2, 2));
    assert!(CanvasComposer::compose(&fg, (0, 1080), [255, 255, 255], 0.75).is_err());
    assert!(CanvasComposer::compose(&fg, (1080, 1080), [255, 255, 255], 0.3).is_err());
}

#[tokio::test]
async fn test_prompt_workflow_validation() {
    let mut studio = PromptStudio::new(Box::new(NeverScraped), None);

    assert!(matches!(
        studio.fetch_features("  ").await,
        Err(StudioError::Validation(_))
    ));
    assert!(matches!(
        studio.generate("Widget", None, "A, B"),
        Err(StudioError::Validation(_))
    ));
    assert!(matches!(
        studio.analyze("   ", "https://example.com", None).await,
        Err(StudioError::Validation(_))
    ));

    studio.analyze("Widget", "", None).await.unwrap();
    let err = studio.generate("Widget", Some("Nonexistent"), "A").unwrap_err();
    assert!(err.to_string().contains("Clean Studio"));

    // Feature text with nothing but separators yields no records
    assert!(studio.generate("Widget", None, " , ,, ").unwrap().is_empty());
}

#[test]
fn test_captioner_requires_token() {
    assert!(matches!(
        HuggingFaceCaptioner::new("   "),
        Err(StudioError::Validation(_))
    ));
}

#[tokio::test]
async fn test_scraper_reports_network_errors() {
    let scraper = HttpPageScraper::with_timeout(Duration::from_secs(2)).unwrap();
    let err = scraper.scrape("http://127.0.0.1:9/product").await.unwrap_err();
    assert!(matches!(err, StudioError::Network(_)));
}

#[test]
fn test_malformed_prompt_json() {
    assert!(matches!(
        PromptAssembler::from_json("[{\"product\": 1}]"),
        Err(StudioError::Serialization(_))
    ));
    assert!(PromptAssembler::from_json("[]").unwrap().is_empty());
}
