//! Configuration types for compositing operations

use serde::{Deserialize, Serialize};

/// Default output canvas edge in pixels
pub const DEFAULT_CANVAS_EDGE: u32 = 1080;

/// Smallest accepted product scale fraction
pub const MIN_SCALE_FRACTION: f32 = 0.5;

/// Largest accepted product scale fraction
pub const MAX_SCALE_FRACTION: f32 = 1.0;

/// Drop shadow parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowSpec {
    /// Shadow displacement relative to the foreground (dx, dy)
    pub offset: (i32, i32),
    /// Shadow color including its alpha
    pub color: [u8; 4],
    /// Gaussian blur radius applied to the silhouette
    pub blur_radius: f32,
}

impl ShadowSpec {
    /// Transparent margin added around the foreground on each axis
    pub const MARGIN: u32 = 50;
}

impl Default for ShadowSpec {
    fn default() -> Self {
        Self {
            offset: (0, 20),
            color: [0, 0, 0, 100],
            blur_radius: 20.0,
        }
    }
}

/// Multiplicative enhancement factors applied before shadowing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnhancementSpec {
    /// Sharpness factor (1.0 = unchanged)
    pub sharpness: f32,
    /// Color saturation factor (1.0 = unchanged)
    pub color: f32,
}

impl Default for EnhancementSpec {
    fn default() -> Self {
        Self {
            sharpness: 1.2,
            color: 1.1,
        }
    }
}

/// Configuration for the compositing pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeConfig {
    /// Synthesize a soft drop shadow under the product
    pub add_shadow: bool,

    /// Apply sharpness and color boosts
    pub enhance: bool,

    /// Fraction of the canvas the product may occupy on each axis (0.5-1.0)
    pub scale_fraction: f32,

    /// Output canvas dimensions (width, height)
    pub canvas_size: (u32, u32),

    /// Opaque canvas fill color
    pub background_color: [u8; 3],

    /// JPEG quality of the encoded composite (1-100)
    pub jpeg_quality: u8,

    /// Drop shadow parameters
    pub shadow: ShadowSpec,

    /// Enhancement factors
    pub enhancement: EnhancementSpec,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            add_shadow: false,
            enhance: true,
            scale_fraction: 0.75,
            canvas_size: (DEFAULT_CANVAS_EDGE, DEFAULT_CANVAS_EDGE),
            background_color: [255, 255, 255],
            jpeg_quality: 95,
            shadow: ShadowSpec::default(),
            enhancement: EnhancementSpec::default(),
        }
    }
}

impl CompositeConfig {
    /// Create a new configuration builder for fluent API construction
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pro_image_studio::CompositeConfig;
    ///
    /// let config = CompositeConfig::builder()
    ///     .add_shadow(true)
    ///     .scale_fraction(0.8)
    ///     .build()
    ///     .unwrap();
    /// assert!(config.add_shadow);
    /// ```
    #[must_use]
    pub fn builder() -> CompositeConfigBuilder {
        CompositeConfigBuilder::default()
    }

    /// Validate all configuration parameters
    ///
    /// # Validation Rules
    ///
    /// - Scale fraction: 0.5-1.0 (inclusive)
    /// - Canvas dimensions: both non-zero
    /// - JPEG quality: 1-100 (inclusive)
    /// - Shadow blur radius: finite and non-negative
    ///
    /// # Errors
    /// - Any value outside the rules above
    pub fn validate(&self) -> crate::Result<()> {
        if !(MIN_SCALE_FRACTION..=MAX_SCALE_FRACTION).contains(&self.scale_fraction) {
            return Err(crate::error::StudioError::config_value_error(
                "scale fraction",
                self.scale_fraction,
                "0.5-1.0",
                Some(0.75),
            ));
        }

        if self.canvas_size.0 == 0 || self.canvas_size.1 == 0 {
            return Err(crate::error::StudioError::invalid_config(format!(
                "Canvas dimensions must be non-zero, got {}x{}",
                self.canvas_size.0, self.canvas_size.1
            )));
        }

        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(crate::error::StudioError::config_value_error(
                "JPEG quality",
                self.jpeg_quality,
                "1-100",
                Some(95),
            ));
        }

        if !self.shadow.blur_radius.is_finite() || self.shadow.blur_radius < 0.0 {
            return Err(crate::error::StudioError::invalid_config(format!(
                "Shadow blur radius must be a non-negative number, got {}",
                self.shadow.blur_radius
            )));
        }

        Ok(())
    }

    /// Load a configuration from a JSON file, missing fields take their defaults
    ///
    /// # Errors
    /// - File cannot be read
    /// - File is not valid JSON for this structure
    /// - Loaded values fail validation
    pub fn from_json_file<P: AsRef<std::path::Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::error::StudioError::file_io_error("read config file", path, &e)
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

/// Builder for `CompositeConfig`
#[derive(Debug, Default)]
pub struct CompositeConfigBuilder {
    config: CompositeConfig,
}

impl CompositeConfigBuilder {
    /// Start from an existing configuration
    #[must_use]
    pub fn from_config(config: CompositeConfig) -> Self {
        Self { config }
    }

    /// Enable or disable the drop shadow
    #[must_use]
    pub fn add_shadow(mut self, add_shadow: bool) -> Self {
        self.config.add_shadow = add_shadow;
        self
    }

    /// Enable or disable enhancement
    #[must_use]
    pub fn enhance(mut self, enhance: bool) -> Self {
        self.config.enhance = enhance;
        self
    }

    /// Set product scale fraction, clamped to 0.5-1.0
    #[must_use]
    pub fn scale_fraction(mut self, fraction: f32) -> Self {
        self.config.scale_fraction = fraction.clamp(MIN_SCALE_FRACTION, MAX_SCALE_FRACTION);
        self
    }

    /// Set product scale from a whole percentage (50-100)
    #[must_use]
    pub fn scale_percent(self, percent: u8) -> Self {
        self.scale_fraction(f32::from(percent) / 100.0)
    }

    /// Set canvas dimensions
    #[must_use]
    pub fn canvas_size(mut self, width: u32, height: u32) -> Self {
        self.config.canvas_size = (width, height);
        self
    }

    /// Set canvas fill color
    #[must_use]
    pub fn background_color(mut self, color: [u8; 3]) -> Self {
        self.config.background_color = color;
        self
    }

    /// Set JPEG quality
    #[must_use]
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.min(100);
        self
    }

    /// Set drop shadow parameters
    #[must_use]
    pub fn shadow(mut self, shadow: ShadowSpec) -> Self {
        self.config.shadow = shadow;
        self
    }

    /// Set enhancement factors
    #[must_use]
    pub fn enhancement(mut self, enhancement: EnhancementSpec) -> Self {
        self.config.enhancement = enhancement;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    /// - Configuration validation failures
    pub fn build(self) -> crate::Result<CompositeConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
