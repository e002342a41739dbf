//! Image I/O operations service
//!
//! This module separates file I/O operations from the image transforms,
//! making the system more testable and maintainable. The core never
//! reads or writes files; this service does.

use crate::{
    config::OutputFormat,
    error::{ChromaKeyError, Result},
};
use image::{DynamicImage, RgbImage};
use std::path::Path;
use tracing::debug;

/// Service for handling image file input/output operations
pub struct ImageIOService;

impl ImageIOService {
    /// Load an image from a file path.
    ///
    /// Tries extension-based format detection first; if that fails, falls
    /// back to content-based detection on the raw bytes.
    ///
    /// # Errors
    /// Returns an error if the file does not exist or cannot be decoded
    /// by either detection method.
    pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(ChromaKeyError::file_io_error(
                "read image file",
                path_ref,
                &std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
            ));
        }

        match image::open(path_ref) {
            Ok(img) => Ok(img),
            Err(e) => {
                debug!(
                    "Extension-based loading failed for {}: {}. Attempting content-based detection.",
                    path_ref.display(),
                    e
                );

                let data = std::fs::read(path_ref).map_err(|io_err| {
                    ChromaKeyError::file_io_error("read image data", path_ref, &io_err)
                })?;

                image::load_from_memory(&data).map_err(|content_err| {
                    ChromaKeyError::processing(format!(
                        "Failed to load image '{}' with both extension-based and content-based detection. Extension error: {}. Content error: {}. Supported formats: JPEG, PNG, BMP, TIFF",
                        path_ref.display(),
                        e,
                        content_err
                    ))
                })
            },
        }
    }

    /// Load an image from bytes.
    ///
    /// # Errors
    /// Returns an error if the bytes cannot be decoded as an image.
    pub fn load_from_bytes(bytes: &[u8]) -> Result<DynamicImage> {
        image::load_from_memory(bytes).map_err(|e| {
            ChromaKeyError::processing(format!("Failed to decode image from bytes: {e}"))
        })
    }

    /// Save an image to a file with the specified format.
    ///
    /// Creates missing parent directories.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or encoding or
    /// writing fails.
    pub fn save_image<P: AsRef<Path>>(
        image: &RgbImage,
        path: P,
        format: OutputFormat,
        jpeg_quality: u8,
    ) -> Result<()> {
        let path_ref = path.as_ref();

        if let Some(parent) = path_ref.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ChromaKeyError::file_io_error("create output directory", parent, &e)
                })?;
            }
        }

        match format {
            OutputFormat::Png => {
                image.save_with_format(path_ref, image::ImageFormat::Png)?;
            },
            OutputFormat::Jpeg => {
                let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                    std::fs::File::create(path_ref)
                        .map_err(|e| ChromaKeyError::file_io_error("create output file", path_ref, &e))?,
                    jpeg_quality,
                );
                encoder.encode_image(image)?;
            },
        }

        Ok(())
    }

    /// Check if a file path has a supported input extension.
    pub fn is_supported_format<P: AsRef<Path>>(path: P) -> bool {
        let path_ref = path.as_ref();

        path_ref
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext_str| {
                matches!(
                    ext_str.to_lowercase().as_str(),
                    "jpg" | "jpeg" | "png" | "bmp" | "tiff" | "tif"
                )
            })
    }
}
