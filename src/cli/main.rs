//! Pro Image Studio CLI
//!
//! `compose` turns product photos into studio composites, `scrape` previews
//! the feature text a product page yields, and `prompts` runs the full
//! analyze-and-generate prompt workflow.

use super::config::CliConfigBuilder;
use crate::{
    processor::CompositingPipeline,
    services::{HttpPageScraper, HuggingFaceCaptioner, ImageIOService, PageScraper, VisionCaptioner},
    session::{PromptStudio, DEFAULT_PRODUCT_NAME},
    tracing_config::{init_cli_tracing, spans, TracingFormat},
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::Instrument;

/// Studio composites and creative-brief prompts for product photos
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "pro-image-studio")]
pub struct Cli {
    /// Enable verbose logging (-v: DEBUG, -vv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = CliLogFormat::Console, global = true)]
    pub log_format: CliLogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum CliLogFormat {
    Console,
    Compact,
    #[cfg(feature = "tracing-json")]
    Json,
}

impl From<CliLogFormat> for TracingFormat {
    fn from(format: CliLogFormat) -> Self {
        match format {
            CliLogFormat::Console => TracingFormat::Console,
            CliLogFormat::Compact => TracingFormat::Compact,
            #[cfg(feature = "tracing-json")]
            CliLogFormat::Json => TracingFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Composite product photos onto a studio canvas
    Compose(ComposeArgs),
    /// Print the feature text extracted from a product page
    Scrape(ScrapeArgs),
    /// Suggest background styles and generate JSON prompts
    Prompts(PromptArgs),
}

/// Background remover choices
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum RemoverKind {
    /// Key out a near-white studio backdrop locally
    ColorKey,
    /// Call an HTTP segmentation service
    Remote,
}

#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct ComposeArgs {
    /// Input image files or directories
    #[arg(value_name = "INPUT", required = true)]
    pub input: Vec<PathBuf>,

    /// Output directory [default: next to each input]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Search directories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Add a soft drop shadow under the product
    #[arg(long)]
    pub shadow: bool,

    /// Skip the sharpness and color boost
    #[arg(long)]
    pub no_enhance: bool,

    /// Product size as percent of the canvas (50-100, steps of 5)
    #[arg(long, value_name = "PERCENT", value_parser = clap::value_parser!(u8).range(50..=100))]
    pub scale: Option<u8>,

    /// JSON file with compositing settings; flags override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Background remover to use
    #[arg(long, value_enum, default_value_t = RemoverKind::ColorKey)]
    pub remover: RemoverKind,

    /// Segmentation endpoint for the remote remover
    #[arg(long, env = "PRO_STUDIO_REMOVER_URL", value_name = "URL")]
    pub remover_url: Option<String>,

    /// API key sent to the remote remover
    #[arg(long, env = "PRO_STUDIO_REMOVER_API_KEY", hide_env_values = true)]
    pub remover_api_key: Option<String>,

    /// Remote remover timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub remover_timeout: u64,
}

#[derive(Args, Debug, Clone)]
pub struct ScrapeArgs {
    /// Product page URL
    pub url: String,
}

#[derive(Args, Debug, Clone)]
pub struct PromptArgs {
    /// Product name
    #[arg(long, default_value = DEFAULT_PRODUCT_NAME)]
    pub name: String,

    /// Official product link, scraped for features and used as context
    #[arg(long, default_value = "")]
    pub link: String,

    /// Product image for visual analysis
    #[arg(long, value_name = "FILE")]
    pub image: Option<PathBuf>,

    /// Comma-separated features [default: scraped from --link, else a sample list]
    #[arg(long)]
    pub features: Option<String>,

    /// Style label to use [default: first suggestion]
    #[arg(long)]
    pub style: Option<String>,

    /// Hugging Face token enabling image captioning
    #[arg(long, env = "HF_API_TOKEN", hide_env_values = true)]
    pub hf_token: Option<String>,

    /// Write the JSON prompts to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    let session_id = init_cli_tracing(cli.verbose, cli.log_format.into())
        .context("Failed to initialize tracing")?;

    match &cli.command {
        Command::Compose(args) => {
            compose(args)
                .instrument(spans::session(&session_id, "compose"))
                .await
        },
        Command::Scrape(args) => {
            scrape(args)
                .instrument(spans::session(&session_id, "scrape"))
                .await
        },
        Command::Prompts(args) => {
            prompts(args)
                .instrument(spans::session(&session_id, "prompts"))
                .await
        },
    }
}

async fn compose(args: &ComposeArgs) -> Result<()> {
    let config = CliConfigBuilder::composite_config(args).context("Invalid compositing settings")?;
    let remover = CliConfigBuilder::remover(args).context("Failed to set up background remover")?;
    let mut pipeline =
        CompositingPipeline::new(remover, config).context("Failed to create pipeline")?;

    let files = collect_inputs(&args.input, args.recursive)?;
    if files.is_empty() {
        warn!("No supported images found in the provided inputs");
        return Ok(());
    }

    if let Some(ref dir) = args.output {
        prepare_output_dir(dir)?;
    }

    info!(
        "Found {} image(s), remover: {}, shadow: {}, enhance: {}, size: {:.0}%",
        files.len(),
        pipeline.remover_name(),
        pipeline.config().add_shadow,
        pipeline.config().enhance,
        pipeline.config().scale_fraction * 100.0
    );

    let progress = (files.len() > 1).then(|| batch_progress_bar(files.len() as u64));
    let batch_start = Instant::now();
    let batch_span = spans::batch_processing(files.len(), pipeline.remover_name());

    let report = pipeline
        .process_batch_with(&files, args.output.as_deref(), |item| {
            if let Some(ref pb) = progress {
                pb.set_message(item.input.display().to_string());
                pb.inc(1);
            }
        })
        .instrument(batch_span)
        .await;

    if let Some(pb) = progress {
        pb.finish_with_message(format!(
            "Completed! Processed: {}, Failed: {}",
            report.succeeded(),
            report.failed()
        ));
    }

    for item in &report.items {
        match &item.outcome {
            Ok(done) => println!("✅ {} -> {}", item.input.display(), done.output.display()),
            Err(e) => println!("❌ {}: {}", item.input.display(), e),
        }
    }

    let total = batch_start.elapsed();
    if report.items.len() > 1 {
        info!("📊 Batch summary:");
        info!("  ├─ Files processed: {}", report.succeeded());
        info!("  ├─ Files failed: {}", report.failed());
        info!("  └─ Total time: {:.2}s", total.as_secs_f64());
    }

    if report.failed() > 0 {
        anyhow::bail!("{} of {} image(s) failed", report.failed(), report.items.len());
    }
    Ok(())
}

async fn scrape(args: &ScrapeArgs) -> Result<()> {
    let scraper = HttpPageScraper::new()?;
    let features = scraper.scrape(&args.url).await?;
    if features.is_empty() {
        warn!("No features found at {}", args.url);
    } else {
        println!("{}", features);
    }
    Ok(())
}

async fn prompts(args: &PromptArgs) -> Result<()> {
    let captioner = match args.hf_token.as_deref() {
        Some(token) => Some(Box::new(
            HuggingFaceCaptioner::new(token).context("Invalid Hugging Face token")?,
        ) as Box<dyn VisionCaptioner>),
        None => {
            if args.image.is_some() {
                warn!("No HF_API_TOKEN set, skipping visual analysis");
            }
            None
        },
    };
    let mut studio = PromptStudio::new(Box::new(HttpPageScraper::new()?), captioner);

    if args.features.is_none() && !args.link.trim().is_empty() {
        // A failed scrape keeps the sample features
        match studio.fetch_features(&args.link).await {
            Ok(features) if !features.is_empty() => info!("🌐 Features found: {}", features),
            Ok(_) => warn!("No features found at {}", args.link),
            Err(e) => warn!("❌ {}", e),
        }
    }

    let image = args
        .image
        .as_ref()
        .map(ImageIOService::load_image)
        .transpose()
        .context("Failed to load product image")?;

    let styles = studio.analyze(&args.name, &args.link, image.as_ref()).await?;
    if !studio.state().visual_context.is_empty() {
        info!("👁️  Visual detection: {}", studio.state().visual_context);
    }
    info!("🎨 Suggested styles ({}):", styles.category());
    for option in styles.iter() {
        info!("  • {}: {}", option.label, option.descriptor);
    }

    let features = args
        .features
        .clone()
        .unwrap_or_else(|| studio.features_text().to_string());
    let records = studio.generate(&args.name, args.style.as_deref(), &features)?;
    let json = PromptStudio::export_json(&records)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write prompts to {}", path.display()))?;
            println!("✅ Wrote {} prompt(s) to {}", records.len(), path.display());
        },
        None => println!("{}", json),
    }
    Ok(())
}

fn batch_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

fn prepare_output_dir(dir: &Path) -> Result<()> {
    if dir.is_file() {
        anyhow::bail!(
            "Output path exists and is a file, not a directory: {}",
            dir.display()
        );
    }
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))
}

/// Expand inputs into supported image files; processed outputs are skipped
fn collect_inputs(inputs: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in inputs {
        if path.is_file() {
            if ImageIOService::is_supported_image(path) {
                files.push(path.clone());
            } else {
                warn!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            files.extend(find_image_files(path, recursive)?);
        } else {
            anyhow::bail!(
                "Input path does not exist or is not accessible: {}",
                path.display()
            );
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn find_image_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(dir).max_depth(max_depth) {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file()
            && ImageIOService::is_supported_image(path)
            && !is_processed_output(path)
        {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

fn is_processed_output(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(crate::services::format::OUTPUT_PREFIX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collect_inputs_filters_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for name in ["b.png", "a.jpg", "notes.txt", "Pro_a.jpg.jpg"] {
            std::fs::write(root.join(name), b"x").unwrap();
        }
        std::fs::create_dir(root.join("nested")).unwrap();
        std::fs::write(root.join("nested").join("c.webp"), b"x").unwrap();

        let flat = collect_inputs(&[root.to_path_buf()], false).unwrap();
        assert_eq!(flat, vec![root.join("a.jpg"), root.join("b.png")]);

        let deep = collect_inputs(&[root.to_path_buf()], true).unwrap();
        assert_eq!(deep.len(), 3);
        assert!(deep.contains(&root.join("nested").join("c.webp")));
    }

    #[test]
    fn test_collect_inputs_missing_path() {
        assert!(collect_inputs(&[PathBuf::from("/no/such/input.png")], false).is_err());
    }

    #[test]
    fn test_cli_parses_compose() {
        let cli = Cli::try_parse_from([
            "pro-image-studio",
            "compose",
            "shoe.png",
            "--shadow",
            "--scale",
            "80",
            "-o",
            "out",
        ])
        .unwrap();
        match cli.command {
            Command::Compose(args) => {
                assert!(args.shadow);
                assert!(!args.no_enhance);
                assert_eq!(args.scale, Some(80));
                assert_eq!(args.output, Some(PathBuf::from("out")));
                assert_eq!(args.remover, RemoverKind::ColorKey);
            },
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_scale_out_of_range() {
        assert!(Cli::try_parse_from(["pro-image-studio", "compose", "a.png", "--scale", "40"]).is_err());
    }
}
