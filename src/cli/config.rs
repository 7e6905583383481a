//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::{ComposeArgs, RemoverKind};
use crate::{
    backends::{ColorKeyRemover, RemoteBackgroundRemover},
    config::{CompositeConfig, CompositeConfigBuilder},
    remover::BackgroundRemover,
};
use anyhow::{Context, Result};
use std::time::Duration;

/// Product size slider granularity, in percent
const SCALE_STEP: u8 = 5;

/// Convert CLI arguments into library configuration
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Settings file (if any) overridden by explicit flags
    pub(crate) fn composite_config(args: &ComposeArgs) -> Result<CompositeConfig> {
        let base = match &args.config {
            Some(path) => CompositeConfig::from_json_file(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => CompositeConfig::default(),
        };

        let mut builder = CompositeConfigBuilder::from_config(base);
        if args.shadow {
            builder = builder.add_shadow(true);
        }
        if args.no_enhance {
            builder = builder.enhance(false);
        }
        if let Some(percent) = args.scale {
            Self::validate_scale_percent(percent)?;
            builder = builder.scale_percent(percent);
        }

        builder.build().context("Invalid configuration")
    }

    /// Sizes move in steps of 5 between 50 and 100
    pub(crate) fn validate_scale_percent(percent: u8) -> Result<()> {
        if !(50..=100).contains(&percent) || percent % SCALE_STEP != 0 {
            anyhow::bail!(
                "Product size must be between 50 and 100 in steps of {}, got {}",
                SCALE_STEP,
                percent
            );
        }
        Ok(())
    }

    pub(crate) fn remover(args: &ComposeArgs) -> Result<Box<dyn BackgroundRemover>> {
        match args.remover {
            RemoverKind::ColorKey => Ok(Box::new(ColorKeyRemover::white())),
            RemoverKind::Remote => {
                let url = args
                    .remover_url
                    .as_deref()
                    .context("--remover-url (or PRO_STUDIO_REMOVER_URL) is required for the remote remover")?;
                let remover = RemoteBackgroundRemover::new(
                    url,
                    args.remover_api_key.clone(),
                    Some(Duration::from_secs(args.remover_timeout)),
                )?;
                Ok(Box::new(remover))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn compose_args() -> ComposeArgs {
        ComposeArgs {
            input: vec![PathBuf::from("shoe.png")],
            output: None,
            recursive: false,
            shadow: false,
            no_enhance: false,
            scale: None,
            config: None,
            remover: RemoverKind::ColorKey,
            remover_url: None,
            remover_api_key: None,
            remover_timeout: 60,
        }
    }

    #[test]
    fn test_defaults() {
        let config = CliConfigBuilder::composite_config(&compose_args()).unwrap();
        assert_eq!(config, CompositeConfig::default());
    }

    #[test]
    fn test_flags_override() {
        let mut args = compose_args();
        args.shadow = true;
        args.no_enhance = true;
        args.scale = Some(90);
        let config = CliConfigBuilder::composite_config(&args).unwrap();
        assert!(config.add_shadow);
        assert!(!config.enhance);
        assert!((config.scale_fraction - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_scale_step() {
        assert!(CliConfigBuilder::validate_scale_percent(75).is_ok());
        assert!(CliConfigBuilder::validate_scale_percent(77).is_err());
        assert!(CliConfigBuilder::validate_scale_percent(45).is_err());

        let mut args = compose_args();
        args.scale = Some(63);
        assert!(CliConfigBuilder::composite_config(&args).is_err());
    }

    #[test]
    fn test_settings_file_with_flag_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("studio.json");
        std::fs::write(&path, r#"{"add_shadow": true, "scale_fraction": 0.6, "jpeg_quality": 85}"#)
            .unwrap();

        let mut args = compose_args();
        args.config = Some(path);
        args.scale = Some(100);
        let config = CliConfigBuilder::composite_config(&args).unwrap();
        assert!(config.add_shadow);
        assert_eq!(config.jpeg_quality, 85);
        assert!((config.scale_fraction - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_remote_remover_requires_url() {
        let mut args = compose_args();
        args.remover = RemoverKind::Remote;
        assert!(CliConfigBuilder::remover(&args).is_err());

        args.remover_url = Some("https://segment.example.com/v1/remove".to_string());
        let remover = CliConfigBuilder::remover(&args).unwrap();
        assert_eq!(remover.name(), "remote");
        assert_eq!(CliConfigBuilder::remover(&compose_args()).unwrap().name(), "color-key");
    }
}
