//! # Chromakey
//!
//! A library for chroma-key ("green screen") background replacement:
//! build a binary foreground/background mask from an HSV color range with
//! morphological cleanup, then alpha-blend the original foreground over a
//! resized replacement background.
//!
//! The two core operations are pure, synchronous transforms with no
//! retained state; the surrounding application owns all images and
//! parameters and passes fresh snapshots on every call. A feature-gated
//! command-line driver (`cli`, on by default) plays that role here.
//!
//! ## Features
//!
//! - HSV range thresholding in the scaled convention (hue 0-179,
//!   saturation/value 0-255)
//! - Mask cleanup: median filtering, erosion, dilation (3x3 square
//!   structuring element)
//! - Edge-feathered compositing against an arbitrarily-sized background
//! - Named keying presets for green and blue screens
//! - Format support: JPEG, PNG, BMP, TIFF input; PNG, JPEG output
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chromakey::{replace_background, KeyingParams, ReplacementConfig};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = ReplacementConfig::builder()
//!     .keying(KeyingParams::green_screen())
//!     .build()?;
//! let result = replace_background("subject.jpg", "beach.png", &config)?;
//! result.save_png("composited.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Core functions only
//!
//! ```rust
//! use chromakey::{build_mask, composite, ColorRange, MorphologyParams};
//! use image::DynamicImage;
//!
//! let foreground = DynamicImage::new_rgb8(64, 48);
//! let background = DynamicImage::new_rgb8(640, 480);
//!
//! let range = ColorRange::new(35, 85, 40, 255, 40, 255);
//! let mask = build_mask(&foreground, &range, &MorphologyParams::default());
//! let output = composite(&foreground, &background, &mask).unwrap();
//! assert_eq!(output.dimensions(), (64, 48));
//! ```

pub mod composite;
pub mod config;
pub mod error;
pub mod mask;
pub mod processor;
pub mod services;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod tracing_config;

// Public API exports
pub use composite::composite;
pub use config::{
    ColorRange, KeyingParams, MorphologyParams, OutputFormat, ReplacementConfig,
    ReplacementConfigBuilder, MAX_HUE,
};
pub use error::{ChromaKeyError, Result};
pub use mask::{build_mask, rgb_to_hsv};
pub use processor::ChromaKeyProcessor;
pub use services::ImageIOService;
pub use types::{
    ChromaMask, MaskStatistics, ProcessingMetadata, ProcessingTimings, ReplacementResult,
};

#[cfg(feature = "cli")]
pub use tracing_config::init_cli_tracing;

/// Replace the background of a foreground image file.
///
/// This is the main entry point for file-based processing.
///
/// # Arguments
///
/// * `foreground_path` - Image with the solid-color backdrop
/// * `background_path` - Replacement background image
/// * `config` - Keying and output configuration
///
/// # Errors
/// Returns an error on invalid configuration, unreadable images, or
/// compositing failures.
///
/// # Examples
///
/// ```rust,no_run
/// use chromakey::{replace_background, ReplacementConfig};
///
/// # fn example() -> anyhow::Result<()> {
/// let result = replace_background("subject.jpg", "beach.png", &ReplacementConfig::default())?;
/// result.save_png("composited.png")?;
/// # Ok(())
/// # }
/// ```
pub fn replace_background<P: AsRef<std::path::Path>, Q: AsRef<std::path::Path>>(
    foreground_path: P,
    background_path: Q,
    config: &ReplacementConfig,
) -> Result<ReplacementResult> {
    let processor = ChromaKeyProcessor::new(config.clone())?;
    processor.process_files(foreground_path, background_path)
}

/// Replace the background of an in-memory foreground image.
///
/// # Errors
/// Returns an error on invalid configuration or compositing failures.
pub fn replace_background_from_images(
    foreground: &image::DynamicImage,
    background: &image::DynamicImage,
    config: &ReplacementConfig,
) -> Result<ReplacementResult> {
    let processor = ChromaKeyProcessor::new(config.clone())?;
    processor.process_images(foreground, background)
}

/// Build just the chroma mask for a foreground image file.
///
/// Useful for preview flows that tune thresholds before compositing.
///
/// # Errors
/// Returns an error if the image cannot be loaded.
pub fn segment_chroma<P: AsRef<std::path::Path>>(
    foreground_path: P,
    params: &KeyingParams,
) -> Result<ChromaMask> {
    let foreground = ImageIOService::load_image(foreground_path)?;
    Ok(build_mask(
        &foreground,
        &params.color_range,
        &params.morphology,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_compiles() {
        // Basic compilation test to ensure API is well-formed
        let _config = ReplacementConfig::default();
        let _params = KeyingParams::blue_screen();
    }

    #[test]
    fn test_replace_background_from_images() {
        let foreground = image::DynamicImage::new_rgb8(8, 8);
        let background = image::DynamicImage::new_rgb8(16, 16);

        let result = replace_background_from_images(
            &foreground,
            &background,
            &ReplacementConfig::default(),
        )
        .unwrap();
        assert_eq!(result.dimensions(), (8, 8));
    }
}
