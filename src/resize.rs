use crate::constants::MAX_IMAGE_DIMENSION;
use crate::error::{CompressionError, Result};
use crate::settings::ResizeSetting;
use image::imageops::FilterType;
use image::DynamicImage;

/// Computes the dimensions an image is scaled to.
///
/// Returns the originals when resizing is disabled or when `scale` does not
/// yield a usable size: text that is not a number, zero, negative or
/// non-finite values, and scales so small that a side truncates to zero.
///
/// # Example
/// ```
/// use hikari_compressor::calculate_resize_dimensions;
///
/// assert_eq!(calculate_resize_dimensions(1000, 800, "50", true), (500, 400));
/// assert_eq!(calculate_resize_dimensions(1000, 800, "invalid", true), (1000, 800));
/// assert_eq!(calculate_resize_dimensions(1000, 800, "50", false), (1000, 800));
/// ```
pub fn calculate_resize_dimensions(
    width: u32,
    height: u32,
    scale: &str,
    enabled: bool,
) -> (u32, u32) {
    if !enabled {
        return (width, height);
    }

    let Some(factor) = parse_scale(scale) else {
        return (width, height);
    };

    let new_width = scale_dimension(width, factor);
    let new_height = scale_dimension(height, factor);
    if new_width == 0 || new_height == 0 {
        return (width, height);
    }

    (new_width, new_height)
}

/// Scale percentage as a multiplier, or `None` when unusable
fn parse_scale(scale: &str) -> Option<f64> {
    let percent: f64 = scale.trim().parse().ok()?;
    if !percent.is_finite() || percent <= 0.0 {
        return None;
    }
    Some(percent / 100.0)
}

fn scale_dimension(dimension: u32, factor: f64) -> u32 {
    let scaled = (dimension as f64 * factor).floor();
    if scaled >= u32::MAX as f64 {
        u32::MAX
    } else {
        scaled as u32
    }
}

/// Resamples `img` to the configured scale with Lanczos3.
///
/// Returns `true` when the image was actually resized. Targets with a side
/// above [`MAX_IMAGE_DIMENSION`] are refused before any buffer is allocated.
pub fn resize_image(img: &mut DynamicImage, resize: &ResizeSetting) -> Result<bool> {
    let (width, height) = (img.width(), img.height());
    let (new_width, new_height) = resize.target_dimensions(width, height);

    if (new_width, new_height) == (width, height) {
        return Ok(false);
    }

    if new_width > MAX_IMAGE_DIMENSION || new_height > MAX_IMAGE_DIMENSION {
        return Err(CompressionError::InvalidDimensions(
            new_width,
            new_height,
            MAX_IMAGE_DIMENSION,
        ));
    }

    crate::verbose!(
        "Resizing {}x{} -> {}x{}",
        width,
        height,
        new_width,
        new_height
    );
    *img = img.resize_exact(new_width, new_height, FilterType::Lanczos3);
    Ok(true)
}
