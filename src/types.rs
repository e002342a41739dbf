//! Core types for chroma-key background replacement

use crate::{config::OutputFormat, error::Result};
use image::{GrayImage, ImageBuffer, RgbImage};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Binary chroma mask.
///
/// Pixel convention: 255 = chroma (background color) detected, to be
/// replaced; 0 = subject, to be kept. The mask always has the same
/// dimensions as the image it was built from and is recomputed from
/// scratch on every request, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromaMask {
    /// Mask data as grayscale values, row-major
    pub data: Vec<u8>,

    /// Mask dimensions (width, height)
    pub dimensions: (u32, u32),
}

impl ChromaMask {
    /// Create a new chroma mask from raw data
    #[must_use]
    pub fn new(data: Vec<u8>, dimensions: (u32, u32)) -> Self {
        Self { data, dimensions }
    }

    /// Create a mask from a grayscale image
    #[must_use]
    pub fn from_image(image: &GrayImage) -> Self {
        let (width, height) = image.dimensions();
        let data = image.as_raw().clone();

        Self::new(data, (width, height))
    }

    /// Convert the mask to a grayscale image
    ///
    /// # Errors
    /// Returns a processing error if the data length does not match the
    /// recorded dimensions.
    pub fn to_image(&self) -> Result<GrayImage> {
        let (width, height) = self.dimensions;
        ImageBuffer::from_raw(width, height, self.data.clone()).ok_or_else(|| {
            crate::error::ChromaKeyError::processing("Failed to create image from mask data")
        })
    }

    /// Invert the mask: chroma becomes 0, subject becomes 255.
    ///
    /// The compositor uses the inverted mask as its keep-weight source.
    #[must_use]
    pub fn invert(&self) -> ChromaMask {
        let data = self.data.iter().map(|&v| 255 - v).collect();
        ChromaMask::new(data, self.dimensions)
    }

    /// Get mask statistics
    #[must_use]
    pub fn statistics(&self) -> MaskStatistics {
        let total_pixels = self.data.len();
        let chroma_pixels = self.data.iter().filter(|&&v| v > 127).count();
        let subject_pixels = total_pixels - chroma_pixels;

        MaskStatistics {
            total_pixels,
            chroma_pixels,
            subject_pixels,
            chroma_ratio: chroma_pixels as f32 / total_pixels.max(1) as f32,
        }
    }

    /// Save the mask as a PNG (for preview purposes)
    ///
    /// # Errors
    /// Returns an error if the mask data is malformed or the file cannot
    /// be written.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let image = self.to_image()?;
        image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

/// Statistics about a chroma mask
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskStatistics {
    pub total_pixels: usize,
    pub chroma_pixels: usize,
    pub subject_pixels: usize,
    pub chroma_ratio: f32,
}

/// Result of a background replacement operation
#[derive(Debug, Clone)]
pub struct ReplacementResult {
    /// The composited output image
    pub image: RgbImage,

    /// The chroma mask used for compositing
    pub mask: ChromaMask,

    /// Foreground image dimensions (also the output dimensions)
    pub original_dimensions: (u32, u32),

    /// Processing metadata
    pub metadata: ProcessingMetadata,

    /// Original foreground path (for logging purposes)
    pub foreground_path: Option<String>,
}

impl ReplacementResult {
    /// Create a new replacement result
    #[must_use]
    pub fn new(
        image: RgbImage,
        mask: ChromaMask,
        original_dimensions: (u32, u32),
        metadata: ProcessingMetadata,
    ) -> Self {
        Self {
            image,
            mask,
            original_dimensions,
            metadata,
            foreground_path: None,
        }
    }

    /// Create a new replacement result tagged with the foreground path
    #[must_use]
    pub fn with_foreground_path(
        image: RgbImage,
        mask: ChromaMask,
        original_dimensions: (u32, u32),
        metadata: ProcessingMetadata,
        foreground_path: String,
    ) -> Self {
        Self {
            image,
            mask,
            original_dimensions,
            metadata,
            foreground_path: Some(foreground_path),
        }
    }

    /// Save the result as PNG
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    /// Save the result as JPEG with the given quality
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or encoding fails.
    pub fn save_jpeg<P: AsRef<Path>>(&self, path: P, quality: u8) -> Result<()> {
        let mut jpeg_encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
            std::fs::File::create(path)?,
            quality,
        );
        jpeg_encoder.encode_image(&self.image)?;
        Ok(())
    }

    /// Save in the specified format
    ///
    /// # Errors
    /// Returns an error if encoding or writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P, format: OutputFormat, quality: u8) -> Result<()> {
        match format {
            OutputFormat::Png => self.save_png(path),
            OutputFormat::Jpeg => self.save_jpeg(path, quality),
        }
    }

    /// Save and record the encoding time into the result's metadata
    ///
    /// # Errors
    /// Returns an error if encoding or writing fails.
    pub fn save_with_timing<P: AsRef<Path>>(
        &mut self,
        path: P,
        format: OutputFormat,
        quality: u8,
    ) -> Result<()> {
        let encode_start = std::time::Instant::now();
        self.save(&path, format, quality)?;
        let encode_ms = encode_start.elapsed().as_millis() as u64;

        self.metadata.timings.image_encode_ms = Some(encode_ms);
        debug!(
            "Encoded {} in {}ms",
            path.as_ref().display(),
            encode_ms
        );

        Ok(())
    }

    /// Get the image as encoded bytes in the specified format
    ///
    /// # Errors
    /// Returns an error if encoding fails.
    pub fn to_bytes(&self, format: OutputFormat, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        match format {
            OutputFormat::Png => {
                self.image.write_to(&mut cursor, image::ImageFormat::Png)?;
            },
            OutputFormat::Jpeg => {
                let mut jpeg_encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality);
                jpeg_encoder.encode_image(&self.image)?;
            },
        }
        Ok(buffer)
    }

    /// Get output dimensions
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Get detailed timing breakdown
    #[must_use]
    pub fn timings(&self) -> &ProcessingTimings {
        &self.metadata.timings
    }

    /// Get timing summary for display
    #[must_use]
    pub fn timing_summary(&self) -> String {
        let t = &self.metadata.timings;

        let mut summary = format!(
            "Total: {}ms | Decode: {}ms | Mask: {}ms | Composite: {}ms",
            t.total_ms, t.image_decode_ms, t.mask_ms, t.composite_ms
        );

        if let Some(encode_ms) = t.image_encode_ms {
            summary.push_str(&format!(" | Encode: {encode_ms}ms"));
        }

        summary
    }
}

/// Detailed timing breakdown for a replacement run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingTimings {
    /// Image loading and decoding from file (both images)
    pub image_decode_ms: u64,

    /// Mask construction (HSV threshold + morphological cleanup)
    pub mask_ms: u64,

    /// Compositing (background resize, feathering, blend)
    pub composite_ms: u64,

    /// Final image encoding (if saved to file)
    pub image_encode_ms: Option<u64>,

    /// Total end-to-end processing time
    pub total_ms: u64,
}

impl ProcessingTimings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Metadata about the replacement operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    /// Detailed timing breakdown
    pub timings: ProcessingTimings,

    /// Input image format (as detected by the decoder)
    pub input_format: String,

    /// Output image format
    pub output_format: String,
}

impl ProcessingMetadata {
    /// Create new processing metadata
    #[must_use]
    pub fn new() -> Self {
        Self {
            timings: ProcessingTimings::new(),
            input_format: "unknown".to_string(),
            output_format: "png".to_string(),
        }
    }

    /// Set the timing breakdown
    pub fn set_timings(&mut self, timings: ProcessingTimings) {
        self.timings = timings;
    }
}

impl Default for ProcessingMetadata {
    fn default() -> Self {
        Self::new()
    }
}
