//! Output file naming.
//!
//! Names look like `{stem}_compressed-{Tier}[-{scale}pct].{ext}`, so runs with
//! different settings never overwrite each other. Two sources sharing a stem
//! still map to the same name in one output folder; the image processed last
//! wins.

use crate::constants::OUTPUT_NAME_MARKER;
use crate::error::{CompressionError, Result};
use crate::formats::OutputFormat;
use crate::settings::{CompressionSettings, QualityTier, ResizeSetting};
use std::path::{Path, PathBuf};

/// Suffix naming the quality tier, e.g. `-High`
pub fn quality_suffix(tier: QualityTier) -> String {
    format!("-{}", tier.name())
}

/// Suffix naming the resize scale as entered, e.g. `-25pct`; empty when
/// resizing is off
pub fn resize_suffix(resize: &ResizeSetting) -> String {
    if resize.enabled {
        format!("-{}pct", resize.scale)
    } else {
        String::new()
    }
}

/// Builds the output file name for a source file stem.
///
/// # Example
/// ```
/// use hikari_compressor::{compose_file_name, OutputFormat, QualityTier, ResizeSetting};
///
/// let name = compose_file_name("photo", QualityTier::Low, &ResizeSetting::scaled("25"), OutputFormat::WebP);
/// assert_eq!(name, "photo_compressed-Low-25pct.webp");
/// ```
pub fn compose_file_name(
    stem: &str,
    tier: QualityTier,
    resize: &ResizeSetting,
    format: OutputFormat,
) -> String {
    format!(
        "{}{}{}{}.{}",
        stem,
        OUTPUT_NAME_MARKER,
        quality_suffix(tier),
        resize_suffix(resize),
        format.extension()
    )
}

/// Destination path of `source` inside `output_dir`
pub fn output_path_for(
    source: &Path,
    output_dir: &Path,
    settings: &CompressionSettings,
) -> Result<PathBuf> {
    let stem = source
        .file_stem()
        .ok_or_else(|| CompressionError::UnsupportedFormat(format!("Invalid file name: {:?}", source)))?;

    let file_name = compose_file_name(
        &stem.to_string_lossy(),
        settings.quality,
        &settings.resize,
        settings.format,
    );
    Ok(output_dir.join(file_name))
}
