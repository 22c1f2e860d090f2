/// Output format handling
///
/// Type-safe output formats plus the input-side extension check used when
/// discovering images to load.
use crate::constants::{
    JPEG_FORMAT_FACTOR, PNG_FORMAT_FACTOR, SUPPORTED_IMAGE_EXTENSIONS, WEBP_FORMAT_FACTOR,
};
use crate::error::{CompressionError, Result};
use image::ImageFormat;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Formats a compressed copy can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Lossy, no transparency
    #[default]
    Jpeg,
    /// Lossy with alpha
    WebP,
    /// Lossless, quality is ignored
    Png,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Jpeg, OutputFormat::WebP, OutputFormat::Png];

    /// File extension written for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::WebP => "webp",
            OutputFormat::Png => "png",
        }
    }

    pub fn to_image_format(&self) -> ImageFormat {
        match self {
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::WebP => ImageFormat::WebP,
            OutputFormat::Png => ImageFormat::Png,
        }
    }

    /// Whether the format can store an alpha channel. Images headed for a
    /// format without one are flattened first.
    pub fn supports_alpha(&self) -> bool {
        !matches!(self, OutputFormat::Jpeg)
    }

    /// Whether the encoder takes a numeric quality parameter
    pub fn uses_quality(&self) -> bool {
        matches!(self, OutputFormat::Jpeg | OutputFormat::WebP)
    }

    /// Multiplier applied by the size estimator
    pub fn estimate_factor(&self) -> f64 {
        match self {
            OutputFormat::Jpeg => JPEG_FORMAT_FACTOR,
            OutputFormat::WebP => WEBP_FORMAT_FACTOR,
            OutputFormat::Png => PNG_FORMAT_FACTOR,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::WebP => "WebP",
            OutputFormat::Png => "PNG",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for OutputFormat {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "webp" => Ok(OutputFormat::WebP),
            "png" => Ok(OutputFormat::Png),
            _ => Err(CompressionError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Check whether a path has an extension the loader accepts
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
