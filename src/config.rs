//! Configuration types for chroma-key background replacement

use serde::{Deserialize, Serialize};

/// Upper bound of the hue channel in the scaled HSV convention (0-179).
///
/// Saturation and value occupy the full 0-255 range of a `u8`.
pub const MAX_HUE: u8 = 179;

/// Inclusive HSV bounds selecting the chroma (background) color.
///
/// Each bound is clamped to its channel's legal range at construction.
/// `min <= max` is deliberately NOT enforced: a degenerate or inverted
/// range simply selects no pixels, which is documented behavior rather
/// than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRange {
    /// Minimum hue (0-179)
    pub hue_min: u8,
    /// Maximum hue (0-179)
    pub hue_max: u8,
    /// Minimum saturation (0-255)
    pub sat_min: u8,
    /// Maximum saturation (0-255)
    pub sat_max: u8,
    /// Minimum value (0-255)
    pub val_min: u8,
    /// Maximum value (0-255)
    pub val_max: u8,
}

impl ColorRange {
    /// Create a new color range, clamping hue bounds to [`MAX_HUE`].
    ///
    /// # Examples
    /// ```rust
    /// use chromakey::ColorRange;
    ///
    /// let range = ColorRange::new(35, 85, 40, 255, 40, 255);
    /// assert!(range.contains(60, 200, 200));
    ///
    /// // Hue bounds beyond the scaled convention are clamped
    /// let clamped = ColorRange::new(0, 255, 0, 255, 0, 255);
    /// assert_eq!(clamped.hue_max, 179);
    /// ```
    #[must_use]
    pub fn new(
        hue_min: u8,
        hue_max: u8,
        sat_min: u8,
        sat_max: u8,
        val_min: u8,
        val_max: u8,
    ) -> Self {
        Self {
            hue_min: hue_min.min(MAX_HUE),
            hue_max: hue_max.min(MAX_HUE),
            sat_min,
            sat_max,
            val_min,
            val_max,
        }
    }

    /// Per-pixel range test: true iff every channel lies within its bounds.
    #[must_use]
    pub fn contains(&self, h: u8, s: u8, v: u8) -> bool {
        h >= self.hue_min
            && h <= self.hue_max
            && s >= self.sat_min
            && s <= self.sat_max
            && v >= self.val_min
            && v <= self.val_max
    }
}

impl Default for ColorRange {
    fn default() -> Self {
        // Typical green screen values
        Self::new(35, 85, 40, 255, 40, 255)
    }
}

/// Mask cleanup parameters applied after HSV thresholding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphologyParams {
    /// Median filter window size. Values <= 1 skip the filter; even
    /// values are silently rounded up to the next odd number at use.
    pub blur_kernel: u32,

    /// Erosion passes with a 3x3 square structuring element (0 = skip)
    pub erode_iterations: u32,

    /// Dilation passes with the same element (0 = skip)
    pub dilate_iterations: u32,
}

impl MorphologyParams {
    /// Create new morphology parameters.
    #[must_use]
    pub fn new(blur_kernel: u32, erode_iterations: u32, dilate_iterations: u32) -> Self {
        Self {
            blur_kernel,
            erode_iterations,
            dilate_iterations,
        }
    }

    /// Disable all cleanup: no median filter, no erosion, no dilation.
    ///
    /// With these parameters mask construction reduces to the pure
    /// per-pixel HSV range test.
    #[must_use]
    pub fn none() -> Self {
        Self::new(1, 0, 0)
    }

    /// The median window actually applied: even kernels round up to odd.
    #[must_use]
    pub fn odd_blur_kernel(&self) -> u32 {
        if self.blur_kernel % 2 == 0 {
            self.blur_kernel + 1
        } else {
            self.blur_kernel
        }
    }
}

impl Default for MorphologyParams {
    fn default() -> Self {
        Self::new(5, 2, 2)
    }
}

/// A complete keying parameter snapshot: color range plus morphology.
///
/// This is the bundle the surrounding application passes into the core on
/// every call. The two named presets mirror common studio setups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyingParams {
    /// HSV bounds selecting the chroma color to replace
    pub color_range: ColorRange,
    /// Mask cleanup parameters
    pub morphology: MorphologyParams,
}

impl KeyingParams {
    /// Create keying parameters from explicit parts.
    #[must_use]
    pub fn new(color_range: ColorRange, morphology: MorphologyParams) -> Self {
        Self {
            color_range,
            morphology,
        }
    }

    /// Preset for green screen footage: hue 35-85, sat/val 40-255,
    /// blur 5, erode 2, dilate 2.
    #[must_use]
    pub fn green_screen() -> Self {
        Self::new(
            ColorRange::new(35, 85, 40, 255, 40, 255),
            MorphologyParams::new(5, 2, 2),
        )
    }

    /// Preset for blue screen footage: hue 100-130, sat/val 50-255,
    /// blur 5, erode 2, dilate 2.
    #[must_use]
    pub fn blue_screen() -> Self {
        Self::new(
            ColorRange::new(100, 130, 50, 255, 50, 255),
            MorphologyParams::new(5, 2, 2),
        )
    }
}

/// Output image format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// PNG (lossless)
    #[default]
    Png,
    /// JPEG with configurable quality
    Jpeg,
}

/// Configuration for a full background replacement run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementConfig {
    /// Keying parameter snapshot
    pub keying: KeyingParams,

    /// Output format
    pub output_format: OutputFormat,

    /// JPEG quality (0-100, only used for JPEG output)
    pub jpeg_quality: u8,

    /// Enable debug mode (additional logging)
    pub debug: bool,
}

impl Default for ReplacementConfig {
    fn default() -> Self {
        Self {
            keying: KeyingParams::default(),
            output_format: OutputFormat::default(),
            jpeg_quality: 90,
            debug: false,
        }
    }
}

impl ReplacementConfig {
    /// Create a new configuration builder for fluent API construction.
    ///
    /// # Examples
    /// ```rust
    /// use chromakey::{KeyingParams, OutputFormat, ReplacementConfig};
    ///
    /// let config = ReplacementConfig::builder()
    ///     .keying(KeyingParams::blue_screen())
    ///     .output_format(OutputFormat::Jpeg)
    ///     .jpeg_quality(95)
    ///     .build()
    ///     .unwrap();
    /// ```
    #[must_use]
    pub fn builder() -> ReplacementConfigBuilder {
        ReplacementConfigBuilder::default()
    }

    /// Validate all configuration parameters.
    ///
    /// Keying parameters are intentionally not range-validated here: the
    /// core accepts degenerate color ranges and arbitrary morphology
    /// iteration counts by contract.
    ///
    /// # Errors
    /// Returns [`crate::ChromaKeyError::InvalidConfig`] if `jpeg_quality`
    /// exceeds 100.
    pub fn validate(&self) -> crate::Result<()> {
        if self.jpeg_quality > 100 {
            return Err(crate::error::ChromaKeyError::invalid_config(
                "JPEG quality must be between 0-100",
            ));
        }

        Ok(())
    }
}

/// Builder for [`ReplacementConfig`]
#[derive(Debug, Default)]
pub struct ReplacementConfigBuilder {
    config: ReplacementConfig,
}

impl ReplacementConfigBuilder {
    /// Set the full keying parameter snapshot
    #[must_use]
    pub fn keying(mut self, keying: KeyingParams) -> Self {
        self.config.keying = keying;
        self
    }

    /// Set the color range only
    #[must_use]
    pub fn color_range(mut self, range: ColorRange) -> Self {
        self.config.keying.color_range = range;
        self
    }

    /// Set the morphology parameters only
    #[must_use]
    pub fn morphology(mut self, morphology: MorphologyParams) -> Self {
        self.config.keying.morphology = morphology;
        self
    }

    /// Set output format
    #[must_use]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// Set JPEG quality
    #[must_use]
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality;
        self
    }

    /// Enable debug mode
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    /// Returns [`crate::ChromaKeyError::InvalidConfig`] if validation fails.
    pub fn build(self) -> crate::Result<ReplacementConfig> {
        let config = self.config;
        config.validate()?;
        Ok(config)
    }
}
