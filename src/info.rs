use crate::error::{CompressionError, Result};
use crate::estimate::estimate_size;
use crate::naming::compose_file_name;
use crate::settings::CompressionSettings;
use crate::utils::format_file_size;
use image::{ColorType, ImageDecoder, ImageFormat, ImageReader};
use std::fs;
use std::path::{Path, PathBuf};

/// Attributes of a source image read without decoding its pixels
#[derive(Debug, Clone, PartialEq)]
pub struct ImageProbe {
    pub path: PathBuf,
    pub file_size: u64,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub color: Option<ColorType>,
    pub format: Option<ImageFormat>,
}

impl ImageProbe {
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }

    pub fn has_alpha(&self) -> bool {
        self.color.map(|c| c.has_alpha()).unwrap_or(false)
    }

    /// Whether the header could be parsed at all
    pub fn is_readable(&self) -> bool {
        self.dimensions().is_some()
    }
}

/// Reads the file size and, when the header parses, dimensions and color type.
///
/// A missing file is an error. An unreadable header is not: the probe is
/// returned with the image attributes left as `None`.
pub fn probe_image(path: &Path) -> Result<ImageProbe> {
    if !path.exists() {
        return Err(CompressionError::FileNotFound(path.to_path_buf()));
    }

    let file_size = fs::metadata(path)?.len();
    let mut probe = ImageProbe {
        path: path.to_path_buf(),
        file_size,
        width: None,
        height: None,
        color: None,
        format: None,
    };

    let reader = ImageReader::open(path)?.with_guessed_format()?;
    probe.format = reader.format();

    match reader.into_decoder() {
        Ok(decoder) => {
            let (width, height) = decoder.dimensions();
            probe.width = Some(width);
            probe.height = Some(height);
            probe.color = Some(decoder.color_type());
        }
        Err(e) => {
            crate::verbose!("Could not read image header of {:?}: {}", path, e);
        }
    }

    Ok(probe)
}

/// Prints what is known about an image and what the current settings would
/// make of it.
pub fn print_image_info(path: &Path, settings: &CompressionSettings) -> Result<()> {
    let probe = probe_image(path)?;

    println!("📋 Basic Information:");
    println!("  📁 File: {:?}", probe.path);
    println!(
        "  📦 File size: {} bytes ({})",
        probe.file_size,
        format_file_size(probe.file_size)
    );

    match probe.dimensions() {
        Some((width, height)) => {
            println!("  📏 Dimensions: {}x{} pixels", width, height);
            if let Some(color) = probe.color {
                println!("  🎨 Color type: {:?}", color);
            }
            println!("  🎭 Image format: {:?}", probe.format);
            println!(
                "  🫧 Transparency: {}",
                if probe.has_alpha() { "yes" } else { "no" }
            );
        }
        None => {
            crate::warn!("Image header could not be read, the file may be corrupt");
        }
    }

    println!("\n💡 With {} / {}:", settings.quality, settings.format);

    if let Some((width, height)) = probe.dimensions() {
        let (new_width, new_height) = settings.resize.target_dimensions(width, height);
        if (new_width, new_height) != (width, height) {
            println!("  📐 Resized to: {}x{}", new_width, new_height);
        }
        if probe.has_alpha() && !settings.format.supports_alpha() {
            println!("  🎨 Transparency will be flattened onto white");
        }
    }

    let estimate = estimate_size(probe.file_size, probe.dimensions(), settings);
    println!("  🎯 {}", estimate);

    if let Some(stem) = path.file_stem() {
        println!(
            "  📝 Output name: {}",
            compose_file_name(
                &stem.to_string_lossy(),
                settings.quality,
                &settings.resize,
                settings.format
            )
        );
    }

    Ok(())
}
