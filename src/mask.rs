//! Chroma mask construction: HSV thresholding plus morphological cleanup
//!
//! The builder is a pure, synchronous transform. It owns no state and
//! allocates fresh buffers on every call; the caller passes a parameter
//! snapshot each time.

use crate::config::{ColorRange, MorphologyParams};
use crate::types::ChromaMask;
use image::{DynamicImage, GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::filter::median_filter;
use imageproc::morphology;
use tracing::debug;

/// Convert an RGB triple to HSV in the scaled convention:
/// H in [0,179] (half-degrees), S and V in [0,255].
#[must_use]
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let r = f32::from(r) / 255.0;
    let g = f32::from(g) / 255.0;
    let b = f32::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };

    let h = if h < 0.0 { h + 360.0 } else { h };

    // Hue is circular: values rounding up to 180 wrap back to 0.
    let h_half = (h / 2.0).round();
    let h_byte = if h_half >= 180.0 { 0 } else { h_half as u8 };

    let s = if max == 0.0 { 0.0 } else { delta / max };
    let s_byte = (s * 255.0).round() as u8;
    let v_byte = (max * 255.0).round() as u8;

    (h_byte, s_byte, v_byte)
}

/// Build a binary chroma mask for `image`.
///
/// Pipeline, in order:
/// 1. per-pixel HSV range test (255 = chroma detected, 0 = subject);
/// 2. median filter if `blur_kernel > 1` (window rounded up to odd);
/// 3. erosion with a 3x3 square element, `erode_iterations` passes;
/// 4. dilation with the same element, `dilate_iterations` passes.
///
/// The result always has the same dimensions as `image`. Degenerate
/// color ranges (min > max) are not an error and produce an empty mask.
///
/// # Examples
/// ```rust
/// use chromakey::{build_mask, ColorRange, MorphologyParams};
/// use image::DynamicImage;
///
/// let image = DynamicImage::new_rgb8(64, 48);
/// let range = ColorRange::new(35, 85, 40, 255, 40, 255);
/// let mask = build_mask(&image, &range, &MorphologyParams::none());
/// assert_eq!(mask.dimensions, (64, 48));
/// ```
#[must_use]
pub fn build_mask(
    image: &DynamicImage,
    range: &ColorRange,
    morph: &MorphologyParams,
) -> ChromaMask {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut mask = GrayImage::new(width, height);
    for (x, y, pixel) in rgb.enumerate_pixels() {
        let (h, s, v) = rgb_to_hsv(pixel[0], pixel[1], pixel[2]);
        if range.contains(h, s, v) {
            mask.put_pixel(x, y, Luma([255u8]));
        }
    }

    let kernel = morph.odd_blur_kernel();
    if kernel > 1 {
        let radius = kernel / 2;
        mask = median_filter(&mask, radius, radius);
    }

    // A single pass at L-inf distance k is equivalent to k passes of the
    // 3x3 square structuring element on a binary mask.
    if morph.erode_iterations > 0 {
        mask = morphology::erode(&mask, Norm::LInf, iterations_u8(morph.erode_iterations));
    }

    if morph.dilate_iterations > 0 {
        mask = morphology::dilate(&mask, Norm::LInf, iterations_u8(morph.dilate_iterations));
    }

    debug!(
        "Built {}x{} mask: {} chroma pixels",
        width,
        height,
        mask.as_raw().iter().filter(|&&v| v > 127).count()
    );

    ChromaMask::from_image(&mask)
}

fn iterations_u8(iterations: u32) -> u8 {
    iterations.min(u32::from(u8::MAX)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    /// A color that lands on HSV (60, 200, 200) in the scaled convention.
    const GREEN: [u8; 3] = [43, 200, 43];
    /// A color that lands on HSV (0, 200, 200).
    const RED: [u8; 3] = [200, 43, 43];

    fn green_range() -> ColorRange {
        ColorRange::new(35, 85, 40, 255, 40, 255)
    }

    fn split_image(width: u32, height: u32) -> DynamicImage {
        let image = RgbImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                image::Rgb(GREEN)
            } else {
                image::Rgb(RED)
            }
        });
        DynamicImage::ImageRgb8(image)
    }

    #[test]
    fn test_rgb_to_hsv_primaries() {
        assert_eq!(rgb_to_hsv(255, 0, 0), (0, 255, 255));
        assert_eq!(rgb_to_hsv(0, 255, 0), (60, 255, 255));
        assert_eq!(rgb_to_hsv(0, 0, 255), (120, 255, 255));
    }

    #[test]
    fn test_rgb_to_hsv_achromatic() {
        assert_eq!(rgb_to_hsv(0, 0, 0), (0, 0, 0));
        assert_eq!(rgb_to_hsv(255, 255, 255), (0, 0, 255));
        assert_eq!(rgb_to_hsv(128, 128, 128), (0, 0, 128));
    }

    #[test]
    fn test_rgb_to_hsv_synthetic_chroma_colors() {
        assert_eq!(rgb_to_hsv(GREEN[0], GREEN[1], GREEN[2]), (60, 200, 200));
        assert_eq!(rgb_to_hsv(RED[0], RED[1], RED[2]), (0, 200, 200));
    }

    #[test]
    fn test_hue_wraps_instead_of_exceeding_range() {
        // Red-magenta hues approach 360 degrees; the scaled value must
        // stay within [0,179].
        for b in 0..=10u8 {
            let (h, _, _) = rgb_to_hsv(255, 0, b);
            assert!(h <= 179, "hue {h} out of range for b={b}");
        }
    }

    #[test]
    fn test_threshold_only_equals_per_pixel_range_test() {
        let image = split_image(16, 8);
        let range = green_range();
        let mask = build_mask(&image, &range, &MorphologyParams::none());

        let rgb = image.to_rgb8();
        for (x, y, pixel) in rgb.enumerate_pixels() {
            let (h, s, v) = rgb_to_hsv(pixel[0], pixel[1], pixel[2]);
            let expected = if range.contains(h, s, v) { 255 } else { 0 };
            let index = (y * 16 + x) as usize;
            assert_eq!(mask.data[index], expected, "pixel ({x},{y})");
        }
    }

    #[test]
    fn test_split_image_masks_exactly_at_boundary() {
        let mask = build_mask(&split_image(100, 100), &green_range(), &MorphologyParams::none());

        for y in 0..100u32 {
            for x in 0..100u32 {
                let index = (y * 100 + x) as usize;
                let expected = if x < 50 { 255 } else { 0 };
                assert_eq!(mask.data[index], expected, "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn test_even_blur_kernel_rounds_up_to_odd() {
        let image = split_image(32, 32);
        let range = green_range();

        let with_four = build_mask(&image, &range, &MorphologyParams::new(4, 0, 0));
        let with_five = build_mask(&image, &range, &MorphologyParams::new(5, 0, 0));

        assert_eq!(with_four, with_five);
    }

    #[test]
    fn test_degenerate_range_yields_empty_mask() {
        let image = split_image(16, 16);
        let inverted = ColorRange::new(85, 35, 40, 255, 40, 255);
        let mask = build_mask(&image, &inverted, &MorphologyParams::none());

        assert!(mask.data.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_mask_is_strictly_binary() {
        let image = split_image(33, 17);
        let mask = build_mask(&image, &green_range(), &MorphologyParams::new(5, 2, 2));

        assert!(mask.data.iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn test_median_filter_removes_salt_noise() {
        // A lone chroma pixel in a subject field disappears under a 3x3
        // median window.
        let mut image = RgbImage::from_pixel(15, 15, image::Rgb(RED));
        image.put_pixel(7, 7, image::Rgb(GREEN));
        let image = DynamicImage::ImageRgb8(image);

        let raw = build_mask(&image, &green_range(), &MorphologyParams::none());
        assert_eq!(raw.data[7 * 15 + 7], 255);

        let cleaned = build_mask(&image, &green_range(), &MorphologyParams::new(3, 0, 0));
        assert_eq!(cleaned.data[7 * 15 + 7], 0);
    }

    #[test]
    fn test_opening_never_adds_chroma_pixels() {
        // Square chroma region plus a thin sliver; erode+dilate with equal
        // counts must stay within the thresholded mask.
        let mut image = RgbImage::from_pixel(20, 20, image::Rgb(RED));
        for y in 6..14 {
            for x in 6..14 {
                image.put_pixel(x, y, image::Rgb(GREEN));
            }
        }
        image.put_pixel(2, 2, image::Rgb(GREEN));
        let image = DynamicImage::ImageRgb8(image);

        let range = green_range();
        let thresholded = build_mask(&image, &range, &MorphologyParams::none());
        let opened = build_mask(&image, &range, &MorphologyParams::new(1, 2, 2));

        let count_before = thresholded.statistics().chroma_pixels;
        let count_after = opened.statistics().chroma_pixels;
        assert!(count_after <= count_before);

        for (index, &value) in opened.data.iter().enumerate() {
            if value == 255 {
                assert_eq!(thresholded.data[index], 255, "pixel {index} appeared");
            }
        }

        // The lone sliver does not survive two erosion passes
        assert_eq!(opened.data[2 * 20 + 2], 0);
    }

    #[test]
    fn test_erosion_shrinks_dilation_regrows() {
        let mut image = RgbImage::from_pixel(20, 20, image::Rgb(RED));
        for y in 6..14 {
            for x in 6..14 {
                image.put_pixel(x, y, image::Rgb(GREEN));
            }
        }
        let image = DynamicImage::ImageRgb8(image);
        let range = green_range();

        let base = build_mask(&image, &range, &MorphologyParams::none())
            .statistics()
            .chroma_pixels;
        let eroded = build_mask(&image, &range, &MorphologyParams::new(1, 2, 0))
            .statistics()
            .chroma_pixels;
        let reopened = build_mask(&image, &range, &MorphologyParams::new(1, 2, 2))
            .statistics()
            .chroma_pixels;

        assert!(eroded < base);
        assert!(reopened >= eroded);
        assert!(reopened <= base);
    }

    #[test]
    fn test_mask_dimensions_match_source() {
        let mask = build_mask(&split_image(37, 21), &green_range(), &MorphologyParams::default());
        assert_eq!(mask.dimensions, (37, 21));
        assert_eq!(mask.data.len(), 37 * 21);
    }
}
