//! Advisory output-size estimates.
//!
//! The numbers come from fixed per-tier and per-format multipliers, not from
//! encoding anything. They are meant for display next to each queued image
//! and say nothing about what the encoder will actually produce.

use crate::error::Result;
use crate::info::probe_image;
use crate::settings::CompressionSettings;
use crate::utils::{calculate_compression_ratio, format_file_size};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeEstimate {
    pub original_size: u64,
    pub estimated_size: u64,
    /// Percentage of the original size expected to be saved
    pub reduction_percent: f64,
}

impl fmt::Display for SizeEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Estimated: {} ({:.1}% reduction)",
            format_file_size(self.estimated_size),
            self.reduction_percent
        )
    }
}

/// Estimates the compressed size of an image.
///
/// `original_size × quality factor × format factor × resize factor`,
/// truncated to whole bytes. The resize factor is the ratio of target to
/// original pixel area and only applies when resizing is enabled and
/// `dimensions` are known and non-empty.
///
/// # Example
/// ```
/// use hikari_compressor::{estimate_size, CompressionSettings};
///
/// let estimate = estimate_size(2_000_000, Some((1000, 800)), &CompressionSettings::default());
/// assert_eq!(estimate.estimated_size, 840_000);
/// assert!((estimate.reduction_percent - 58.0).abs() < 1e-9);
/// ```
pub fn estimate_size(
    original_size: u64,
    dimensions: Option<(u32, u32)>,
    settings: &CompressionSettings,
) -> SizeEstimate {
    if original_size == 0 {
        return SizeEstimate {
            original_size: 0,
            estimated_size: 0,
            reduction_percent: 0.0,
        };
    }

    let resize_factor = dimensions
        .map(|(width, height)| resize_factor(width, height, settings))
        .unwrap_or(1.0);

    let estimated = original_size as f64
        * settings.quality.estimate_factor()
        * settings.format.estimate_factor()
        * resize_factor;
    let estimated_size = (estimated.max(0.0) as u64).min(original_size);

    SizeEstimate {
        original_size,
        estimated_size,
        reduction_percent: calculate_compression_ratio(original_size, estimated_size),
    }
}

fn resize_factor(width: u32, height: u32, settings: &CompressionSettings) -> f64 {
    if !settings.resize.enabled {
        return 1.0;
    }

    let original_pixels = width as f64 * height as f64;
    if original_pixels <= 0.0 {
        return 1.0;
    }

    let (new_width, new_height) = settings.resize.target_dimensions(width, height);
    (new_width as f64 * new_height as f64) / original_pixels
}

/// Estimates the compressed size of the image file at `path`.
///
/// Reads the file size and the pixel dimensions from the image header. A
/// header that cannot be read leaves the dimensions unknown, which only
/// matters when resizing is enabled.
pub fn estimate_for_path(path: &Path, settings: &CompressionSettings) -> Result<SizeEstimate> {
    let probe = probe_image(path)?;
    Ok(estimate_size(probe.file_size, probe.dimensions(), settings))
}
