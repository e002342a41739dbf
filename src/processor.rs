//! Replacement pipeline orchestration
//!
//! [`ChromaKeyProcessor`] is the synchronous entry point the surrounding
//! application calls: load images, build the mask, composite, and return
//! a result with per-stage timings. File I/O happens here and in
//! [`crate::services`], never inside the mask builder or compositor.

use crate::{
    composite::composite,
    config::ReplacementConfig,
    error::Result,
    mask::build_mask,
    services::ImageIOService,
    types::{ChromaMask, ProcessingMetadata, ProcessingTimings, ReplacementResult},
};
use image::DynamicImage;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Stateless processor bundling a configuration snapshot.
///
/// The processor retains no image handles between calls; every operation
/// receives and returns freshly-owned data.
pub struct ChromaKeyProcessor {
    config: ReplacementConfig,
}

impl ChromaKeyProcessor {
    /// Create a new processor with the given configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration fails validation.
    pub fn new(config: ReplacementConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ReplacementConfig {
        &self.config
    }

    /// Replace the background of a foreground image file with a
    /// background image file.
    ///
    /// # Errors
    /// - image loading failures (file not found, invalid format);
    /// - compositing failures (internal buffer errors).
    pub fn process_files<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        foreground_path: P,
        background_path: Q,
    ) -> Result<ReplacementResult> {
        let foreground_path_str = foreground_path.as_ref().display().to_string();
        let total_start = Instant::now();

        info!("Starting background replacement: {}", foreground_path_str);

        let decode_start = Instant::now();
        let foreground = ImageIOService::load_image(foreground_path)?;
        let background = ImageIOService::load_image(background_path)?;
        let image_decode_ms = decode_start.elapsed().as_millis() as u64;
        debug!(
            "Decoded {}x{} foreground and {}x{} background in {}ms",
            foreground.width(),
            foreground.height(),
            background.width(),
            background.height(),
            image_decode_ms
        );

        let mut result = self.run_pipeline(&foreground, &background, total_start, image_decode_ms)?;
        result.foreground_path = Some(foreground_path_str);
        Ok(result)
    }

    /// Replace the background of an in-memory foreground image.
    ///
    /// # Errors
    /// Returns an error if compositing fails.
    pub fn process_images(
        &self,
        foreground: &DynamicImage,
        background: &DynamicImage,
    ) -> Result<ReplacementResult> {
        // No decode stage for pre-loaded images
        self.run_pipeline(foreground, background, Instant::now(), 0)
    }

    /// Build just the chroma mask for a foreground image file, for
    /// preview purposes.
    ///
    /// # Errors
    /// Returns an error if the image cannot be loaded.
    pub fn mask_preview_from_file<P: AsRef<Path>>(&self, foreground_path: P) -> Result<ChromaMask> {
        let foreground = ImageIOService::load_image(foreground_path)?;
        Ok(self.mask_preview(&foreground))
    }

    /// Build just the chroma mask for an in-memory foreground image.
    #[must_use]
    pub fn mask_preview(&self, foreground: &DynamicImage) -> ChromaMask {
        build_mask(
            foreground,
            &self.config.keying.color_range,
            &self.config.keying.morphology,
        )
    }

    fn run_pipeline(
        &self,
        foreground: &DynamicImage,
        background: &DynamicImage,
        total_start: Instant,
        image_decode_ms: u64,
    ) -> Result<ReplacementResult> {
        let original_dimensions = (foreground.width(), foreground.height());

        let mask_start = Instant::now();
        let mask = build_mask(
            foreground,
            &self.config.keying.color_range,
            &self.config.keying.morphology,
        );
        let mask_ms = mask_start.elapsed().as_millis() as u64;
        if self.config.debug {
            let stats = mask.statistics();
            debug!(
                "Mask built in {}ms: {:.1}% chroma",
                mask_ms,
                stats.chroma_ratio * 100.0
            );
        }

        let composite_start = Instant::now();
        let image = composite(foreground, background, &mask)?;
        let composite_ms = composite_start.elapsed().as_millis() as u64;
        debug!("Composited in {}ms", composite_ms);

        let mut metadata = ProcessingMetadata::new();
        metadata.input_format = Self::detect_image_format(foreground);
        metadata.output_format = format!("{:?}", self.config.output_format).to_lowercase();
        metadata.set_timings(ProcessingTimings {
            image_decode_ms,
            mask_ms,
            composite_ms,
            image_encode_ms: None,
            total_ms: total_start.elapsed().as_millis() as u64,
        });

        Ok(ReplacementResult::new(
            image,
            mask,
            original_dimensions,
            metadata,
        ))
    }

    /// Detect image format from dynamic image
    fn detect_image_format(image: &DynamicImage) -> String {
        match image {
            DynamicImage::ImageRgb8(_) => "rgb8".to_string(),
            DynamicImage::ImageRgba8(_) => "rgba8".to_string(),
            DynamicImage::ImageLuma8(_) => "luma8".to_string(),
            DynamicImage::ImageLumaA8(_) => "luma_a8".to_string(),
            _ => "unknown".to_string(),
        }
    }
}
