//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::{Cli, CliOutputFormat, CliPreset};
use crate::config::{ColorRange, KeyingParams, MorphologyParams, OutputFormat, ReplacementConfig};
use anyhow::{Context, Result};

/// Convert CLI arguments to a [`ReplacementConfig`]
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build a [`ReplacementConfig`] from CLI arguments
    pub(crate) fn from_cli(cli: &Cli) -> Result<ReplacementConfig> {
        let output_format = match cli.format {
            CliOutputFormat::Png => OutputFormat::Png,
            CliOutputFormat::Jpeg => OutputFormat::Jpeg,
        };

        ReplacementConfig::builder()
            .keying(Self::resolve_keying(cli))
            .output_format(output_format)
            .jpeg_quality(cli.jpeg_quality)
            .debug(cli.verbose >= 2)
            .build()
            .context("Invalid configuration")
    }

    /// Start from the selected preset and apply per-field overrides.
    fn resolve_keying(cli: &Cli) -> KeyingParams {
        let base = match cli.preset {
            CliPreset::GreenScreen => KeyingParams::green_screen(),
            CliPreset::BlueScreen => KeyingParams::blue_screen(),
        };

        let color_range = ColorRange::new(
            cli.hue_min.unwrap_or(base.color_range.hue_min),
            cli.hue_max.unwrap_or(base.color_range.hue_max),
            cli.sat_min.unwrap_or(base.color_range.sat_min),
            cli.sat_max.unwrap_or(base.color_range.sat_max),
            cli.val_min.unwrap_or(base.color_range.val_min),
            cli.val_max.unwrap_or(base.color_range.val_max),
        );

        let morphology = MorphologyParams::new(
            cli.blur_kernel.unwrap_or(base.morphology.blur_kernel),
            cli.erode.unwrap_or(base.morphology.erode_iterations),
            cli.dilate.unwrap_or(base.morphology.dilate_iterations),
        );

        KeyingParams::new(color_range, morphology)
    }

    /// Validate CLI arguments for consistency
    pub(crate) fn validate_cli(cli: &Cli) -> Result<()> {
        if cli.jpeg_quality > 100 {
            anyhow::bail!("JPEG quality must be between 0-100");
        }

        if !cli.mask_only && cli.background.is_none() {
            anyhow::bail!(
                "a background image is required unless --mask-only is set (supply one with --background)"
            );
        }

        Ok(())
    }
}
