//! Foreground/background compositing using a chroma mask
//!
//! The compositor is the second half of the core: it never builds masks
//! and never touches files. The caller supplies both images and the mask
//! on every invocation.

use crate::error::{ChromaKeyError, Result};
use crate::types::ChromaMask;
use image::{imageops, DynamicImage, RgbImage};
use imageproc::filter::gaussian_blur_f32;
use tracing::debug;

/// Sigma of the fixed 5x5 edge-feathering kernel, matching the value a
/// 5-tap Gaussian derives when no explicit sigma is given:
/// `0.3 * ((5 - 1) * 0.5 - 1) + 0.8`.
///
/// This feather is independent of the user-configurable mask blur kernel;
/// mask noise removal and edge anti-aliasing stay two separate steps.
const FEATHER_SIGMA: f32 = 1.1;

/// Blend `foreground` over a resized `background` using `mask`.
///
/// Steps, in order:
/// 1. resize `background` to the foreground's exact dimensions (bilinear,
///    aspect ratio not preserved);
/// 2. invert `mask` so the subject carries weight 255;
/// 3. feather the inverted mask with the fixed Gaussian kernel and
///    normalize to per-pixel weights in [0.0, 1.0];
/// 4. per pixel and channel: `out = w * fg + (1 - w) * bg`, computed in
///    floating point and truncated back to 8 bits.
///
/// The output always has the foreground's dimensions. Deterministic for
/// fixed inputs; no side effects.
///
/// # Errors
/// Returns [`ChromaKeyError::DimensionMismatch`] if `mask` does not match
/// the foreground's dimensions.
pub fn composite(
    foreground: &DynamicImage,
    background: &DynamicImage,
    mask: &ChromaMask,
) -> Result<RgbImage> {
    let fg = foreground.to_rgb8();
    let (width, height) = fg.dimensions();

    if mask.dimensions != (width, height) {
        return Err(ChromaKeyError::dimension_mismatch(
            (width, height),
            mask.dimensions,
        ));
    }

    let bg = imageops::resize(
        &background.to_rgb8(),
        width,
        height,
        imageops::FilterType::Triangle,
    );
    debug!(
        "Resized background {}x{} -> {}x{}",
        background.width(),
        background.height(),
        width,
        height
    );

    // Subject pixels carry the keep weight; feathering softens the cutout
    // edge so the boundary is not hard-aliased.
    let keep = mask.invert().to_image()?;
    let feathered = gaussian_blur_f32(&keep, FEATHER_SIGMA);

    let mut output = RgbImage::new(width, height);
    for (x, y, out_pixel) in output.enumerate_pixels_mut() {
        let weight = f64::from(feathered.get_pixel(x, y)[0]) / 255.0;
        let fg_pixel = fg.get_pixel(x, y);
        let bg_pixel = bg.get_pixel(x, y);

        for channel in 0..3 {
            let blended = weight * f64::from(fg_pixel[channel])
                + (1.0 - weight) * f64::from(bg_pixel[channel]);
            out_pixel[channel] = blended.clamp(0.0, 255.0) as u8;
        }
    }

    Ok(output)
}
