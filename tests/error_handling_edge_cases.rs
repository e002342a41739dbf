//! Error handling and edge case tests for the replacement pipeline

use chromakey::{
    build_mask, composite, replace_background, ChromaKeyError, ChromaMask, ColorRange,
    ImageIOService, KeyingParams, MorphologyParams, ReplacementConfig,
};
use image::{DynamicImage, Rgb, RgbImage};
use tempfile::TempDir;

fn green_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([43, 200, 43])))
}

#[test]
fn test_missing_foreground_file() {
    let temp_dir = TempDir::new().unwrap();
    let bg_path = temp_dir.path().join("background.png");
    green_image(10, 10).save(&bg_path).unwrap();

    let result = replace_background(
        temp_dir.path().join("missing.png"),
        &bg_path,
        &ReplacementConfig::default(),
    );

    let err = result.unwrap_err();
    assert!(matches!(err, ChromaKeyError::Io(_)));
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn test_missing_background_file() {
    let temp_dir = TempDir::new().unwrap();
    let fg_path = temp_dir.path().join("foreground.png");
    green_image(10, 10).save(&fg_path).unwrap();

    let result = replace_background(
        &fg_path,
        temp_dir.path().join("missing.png"),
        &ReplacementConfig::default(),
    );
    assert!(result.is_err());
}

#[test]
fn test_corrupt_image_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("corrupt.png");
    std::fs::write(&path, b"definitely not a PNG").unwrap();

    let result = ImageIOService::load_image(&path);
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("content-based detection"));
}

#[test]
fn test_invalid_config_fails_before_io() {
    // Validation runs before any file access, so nonexistent paths never
    // get touched.
    let config = ReplacementConfig {
        jpeg_quality: 150,
        ..Default::default()
    };

    let err = replace_background("nope.png", "also-nope.png", &config).unwrap_err();
    assert!(matches!(err, ChromaKeyError::InvalidConfig(_)));
}

#[test]
fn test_composite_rejects_foreign_mask() {
    let foreground = green_image(10, 10);
    let background = green_image(20, 20);
    let mask = ChromaMask::new(vec![0; 64], (8, 8));

    let err = composite(&foreground, &background, &mask).unwrap_err();
    assert!(matches!(err, ChromaKeyError::DimensionMismatch { .. }));
}

#[test]
fn test_degenerate_range_keeps_everything() {
    // min > max on every channel selects nothing: the mask is empty and
    // the composite returns the foreground unchanged (within feather
    // tolerance).
    let foreground = green_image(16, 16);
    let background = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([200, 0, 0])));

    let range = ColorRange::new(179, 0, 255, 0, 255, 0);
    let mask = build_mask(&foreground, &range, &MorphologyParams::none());
    assert!(mask.data.iter().all(|&v| v == 0));

    let output = composite(&foreground, &background, &mask).unwrap();
    let fg = foreground.to_rgb8();
    for (out_pixel, fg_pixel) in output.pixels().zip(fg.pixels()) {
        for channel in 0..3 {
            assert!(out_pixel[channel].abs_diff(fg_pixel[channel]) <= 1);
        }
    }
}

#[test]
fn test_single_pixel_image() {
    let foreground = green_image(1, 1);
    let background = DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 100, Rgb([0, 0, 200])));

    let mask = build_mask(
        &foreground,
        &KeyingParams::green_screen().color_range,
        &MorphologyParams::none(),
    );
    assert_eq!(mask.dimensions, (1, 1));
    assert_eq!(mask.data, vec![255]);

    let output = composite(&foreground, &background, &mask).unwrap();
    assert_eq!(output.dimensions(), (1, 1));
}

#[test]
fn test_oversized_iteration_counts_do_not_panic() {
    let foreground = green_image(12, 12);
    let mask = build_mask(
        &foreground,
        &KeyingParams::green_screen().color_range,
        &MorphologyParams::new(3, 1000, 1000),
    );
    assert_eq!(mask.dimensions, (12, 12));
}

#[test]
fn test_unsupported_extension_rejected() {
    assert!(!ImageIOService::is_supported_format("clip.mp4"));
    assert!(!ImageIOService::is_supported_format("vector.svg"));
    assert!(ImageIOService::is_supported_format("photo.jpeg"));
}

#[test]
fn test_mask_survives_serialization() {
    let mask = ChromaMask::new(vec![0, 255, 255, 0], (2, 2));
    let json = serde_json::to_string(&mask).unwrap();
    let restored: ChromaMask = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, mask);
}
