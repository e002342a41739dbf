//! Error types for chroma-key operations

use thiserror::Error;

/// Result type alias for chroma-key operations
pub type Result<T> = std::result::Result<T, ChromaKeyError>;

/// Error types for chroma-key background replacement
#[derive(Error, Debug)]
pub enum ChromaKeyError {
    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding errors
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// Mask dimensions do not match the foreground image
    #[error("Dimension mismatch: mask is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unsupported file format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Pixel buffer or layout errors
    #[error("Processing error: {0}")]
    Processing(String),
}

impl ChromaKeyError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new unsupported format error
    pub fn unsupported_format<S: Into<String>>(format: S) -> Self {
        Self::UnsupportedFormat(format.into())
    }

    /// Create a new processing error
    pub fn processing<S: Into<String>>(msg: S) -> Self {
        Self::Processing(msg.into())
    }

    /// Create a dimension mismatch error from two (width, height) pairs
    #[must_use]
    pub fn dimension_mismatch(expected: (u32, u32), actual: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            expected_width: expected.0,
            expected_height: expected.1,
            actual_width: actual.0,
            actual_height: actual.1,
        }
    }

    /// Create file I/O error with operation context
    pub fn file_io_error<P: AsRef<std::path::Path>>(
        operation: &str,
        path: P,
        error: &std::io::Error,
    ) -> Self {
        let path_display = path.as_ref().display();
        Self::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to {operation} '{path_display}': {error}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_error_creation() {
        let err = ChromaKeyError::invalid_config("test config error");
        assert!(matches!(err, ChromaKeyError::InvalidConfig(_)));

        let err = ChromaKeyError::unsupported_format("GIF");
        assert!(matches!(err, ChromaKeyError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_error_display() {
        let err = ChromaKeyError::invalid_config("JPEG quality must be between 0-100");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: JPEG quality must be between 0-100"
        );
    }

    #[test]
    fn test_dimension_mismatch_carries_both_sizes() {
        let err = ChromaKeyError::dimension_mismatch((100, 80), (50, 40));
        let msg = err.to_string();
        assert!(msg.contains("50x40"));
        assert!(msg.contains("100x80"));
    }

    #[test]
    fn test_file_io_error_context() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist");
        let err = ChromaKeyError::file_io_error(
            "read image file",
            Path::new("/tmp/missing.png"),
            &io_error,
        );
        let msg = err.to_string();
        assert!(msg.contains("read image file"));
        assert!(msg.contains("/tmp/missing.png"));
    }
}
