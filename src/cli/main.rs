//! Chroma-key background replacement CLI
//!
//! Command-line driver around the masking/compositing core: it owns the
//! parameter snapshot (preset plus per-flag overrides), loads the images,
//! invokes the core, and persists the results.

use super::config::CliConfigBuilder;
use crate::{processor::ChromaKeyProcessor, tracing_config::init_cli_tracing};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Chroma-key background replacement tool
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "chromakey")]
pub struct Cli {
    /// Foreground image with the solid-color backdrop
    #[arg(value_name = "FOREGROUND")]
    pub foreground: PathBuf,

    /// Replacement background image (required unless --mask-only)
    #[arg(short, long, value_name = "PATH")]
    pub background: Option<PathBuf>,

    /// Output file [default: <foreground stem>_replaced.<ext>]
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = CliOutputFormat::Png)]
    pub format: CliOutputFormat,

    /// Keying preset to start from
    #[arg(short, long, value_enum, default_value_t = CliPreset::GreenScreen)]
    pub preset: CliPreset,

    /// Minimum hue bound override (0-179)
    #[arg(long, value_name = "H")]
    pub hue_min: Option<u8>,

    /// Maximum hue bound override (0-179)
    #[arg(long, value_name = "H")]
    pub hue_max: Option<u8>,

    /// Minimum saturation bound override (0-255)
    #[arg(long, value_name = "S")]
    pub sat_min: Option<u8>,

    /// Maximum saturation bound override (0-255)
    #[arg(long, value_name = "S")]
    pub sat_max: Option<u8>,

    /// Minimum value bound override (0-255)
    #[arg(long, value_name = "V")]
    pub val_min: Option<u8>,

    /// Maximum value bound override (0-255)
    #[arg(long, value_name = "V")]
    pub val_max: Option<u8>,

    /// Median blur kernel override (1 disables; even values round up)
    #[arg(long, value_name = "K")]
    pub blur_kernel: Option<u32>,

    /// Erosion iterations override
    #[arg(long, value_name = "N")]
    pub erode: Option<u32>,

    /// Dilation iterations override
    #[arg(long, value_name = "N")]
    pub dilate: Option<u32>,

    /// Also write the mask preview PNG to this path
    #[arg(long, value_name = "PATH")]
    pub save_mask: Option<PathBuf>,

    /// Build and save only the mask; no background or compositing
    #[arg(long)]
    pub mask_only: bool,

    /// JPEG quality (0-100)
    #[arg(long, default_value_t = 90)]
    pub jpeg_quality: u8,

    /// Enable verbose logging (-v: INFO, -vv: DEBUG, -vvv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum CliOutputFormat {
    Png,
    Jpeg,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum CliPreset {
    GreenScreen,
    BlueScreen,
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();

    init_cli_tracing(cli.verbose).context("Failed to initialize tracing")?;

    CliConfigBuilder::validate_cli(&cli).context("Invalid CLI arguments")?;
    let config = CliConfigBuilder::from_cli(&cli).context("Failed to build configuration")?;

    let processor = ChromaKeyProcessor::new(config).context("Failed to create processor")?;
    let start_time = Instant::now();

    if cli.mask_only {
        return save_mask_only(&cli, &processor, start_time);
    }

    let Some(background) = cli.background.as_ref() else {
        anyhow::bail!("a background image is required unless --mask-only is set");
    };

    let mut result = processor
        .process_files(&cli.foreground, background)
        .context("Background replacement failed")?;

    if let Some(mask_path) = &cli.save_mask {
        result
            .mask
            .save_png(mask_path)
            .with_context(|| format!("Failed to save mask to {}", mask_path.display()))?;
        info!("Saved mask preview: {}", mask_path.display());
    }

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| derived_output_path(&cli.foreground, "_replaced", extension_for(cli.format)));
    result
        .save_with_timing(
            &output_path,
            processor.config().output_format,
            processor.config().jpeg_quality,
        )
        .with_context(|| format!("Failed to save result to {}", output_path.display()))?;

    info!(
        "Processed {} -> {} in {:.2}s",
        cli.foreground.display(),
        output_path.display(),
        start_time.elapsed().as_secs_f64()
    );
    info!("{}", result.timing_summary());

    Ok(())
}

fn save_mask_only(cli: &Cli, processor: &ChromaKeyProcessor, start_time: Instant) -> Result<()> {
    let mask = processor
        .mask_preview_from_file(&cli.foreground)
        .context("Failed to build mask")?;

    let mask_path = cli
        .save_mask
        .clone()
        .or_else(|| cli.output.clone())
        .unwrap_or_else(|| derived_output_path(&cli.foreground, "_mask", "png"));
    mask.save_png(&mask_path)
        .with_context(|| format!("Failed to save mask to {}", mask_path.display()))?;

    let stats = mask.statistics();
    info!(
        "Saved mask {} ({:.1}% chroma) in {:.2}s",
        mask_path.display(),
        stats.chroma_ratio * 100.0,
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

fn extension_for(format: CliOutputFormat) -> &'static str {
    match format {
        CliOutputFormat::Png => "png",
        CliOutputFormat::Jpeg => "jpg",
    }
}

fn derived_output_path(foreground: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = foreground
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    foreground.with_file_name(format!("{stem}{suffix}.{extension}"))
}
