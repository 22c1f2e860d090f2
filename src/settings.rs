//! Compression settings shared by every image of a batch.
//!
//! [`CompressionSettings`] is a plain value: a batch clones it when it starts
//! and never sees later edits.

use crate::constants::{
    DEFAULT_RESIZE_SCALE, HIGH_QUALITY, HIGH_QUALITY_FACTOR, LOW_QUALITY, LOW_QUALITY_FACTOR,
    MAXIMUM_QUALITY, MAXIMUM_QUALITY_FACTOR, MEDIUM_QUALITY, MEDIUM_QUALITY_FACTOR,
};
use crate::error::{CompressionError, Result};
use crate::formats::OutputFormat;
use crate::resize::calculate_resize_dimensions;
use std::fmt;
use std::str::FromStr;

/// Named quality preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QualityTier {
    Low,
    Medium,
    #[default]
    High,
    Maximum,
}

impl QualityTier {
    pub const ALL: [QualityTier; 4] = [
        QualityTier::Low,
        QualityTier::Medium,
        QualityTier::High,
        QualityTier::Maximum,
    ];

    /// Numeric quality handed to the JPEG and WebP encoders
    pub fn quality(&self) -> u8 {
        match self {
            QualityTier::Low => LOW_QUALITY,
            QualityTier::Medium => MEDIUM_QUALITY,
            QualityTier::High => HIGH_QUALITY,
            QualityTier::Maximum => MAXIMUM_QUALITY,
        }
    }

    /// Multiplier applied by the size estimator
    pub fn estimate_factor(&self) -> f64 {
        match self {
            QualityTier::Low => LOW_QUALITY_FACTOR,
            QualityTier::Medium => MEDIUM_QUALITY_FACTOR,
            QualityTier::High => HIGH_QUALITY_FACTOR,
            QualityTier::Maximum => MAXIMUM_QUALITY_FACTOR,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            QualityTier::Low => "Low",
            QualityTier::Medium => "Medium",
            QualityTier::High => "High",
            QualityTier::Maximum => "Maximum",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}%)", self.name(), self.quality())
    }
}

impl FromStr for QualityTier {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" | "30" => Ok(QualityTier::Low),
            "medium" | "60" => Ok(QualityTier::Medium),
            "high" | "80" => Ok(QualityTier::High),
            "maximum" | "max" | "95" => Ok(QualityTier::Maximum),
            _ => Err(CompressionError::InvalidQualityTier(s.to_string())),
        }
    }
}

/// Which backend decodes and encodes the images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Engine {
    /// Codecs of the `image` crate, `webp` for lossy WebP
    #[default]
    Image,
    /// Same as [`Engine::Image`], with an oxipng pass over PNG output
    Oxipng,
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::Image => write!(f, "image"),
            Engine::Oxipng => write!(f, "oxipng"),
        }
    }
}

impl FromStr for Engine {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "image" => Ok(Engine::Image),
            "oxipng" => Ok(Engine::Oxipng),
            _ => Err(CompressionError::InvalidEngine(s.to_string())),
        }
    }
}

/// Percentage resize applied to both dimensions.
///
/// `scale` is kept as entered: it is parsed when dimensions are computed and
/// echoed verbatim into output file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSetting {
    pub enabled: bool,
    pub scale: String,
}

impl Default for ResizeSetting {
    fn default() -> Self {
        Self {
            enabled: false,
            scale: DEFAULT_RESIZE_SCALE.to_string(),
        }
    }
}

impl ResizeSetting {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn scaled(scale: impl Into<String>) -> Self {
        Self {
            enabled: true,
            scale: scale.into(),
        }
    }

    pub fn target_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        calculate_resize_dimensions(width, height, &self.scale, self.enabled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompressionSettings {
    pub quality: QualityTier,
    pub format: OutputFormat,
    pub engine: Engine,
    pub resize: ResizeSetting,
}

impl CompressionSettings {
    pub fn new(
        quality: QualityTier,
        format: OutputFormat,
        engine: Engine,
        resize: ResizeSetting,
    ) -> Self {
        Self {
            quality,
            format,
            engine,
            resize,
        }
    }

    /// Build settings from loosely typed inputs, as a CLI or form would
    /// provide them. A `None` resize scale leaves resizing disabled.
    pub fn parse(
        quality: Option<&str>,
        format: Option<&str>,
        engine: Option<&str>,
        resize_scale: Option<&str>,
    ) -> Result<Self> {
        let quality = quality.map(QualityTier::from_str).transpose()?.unwrap_or_default();
        let format = format.map(OutputFormat::from_str).transpose()?.unwrap_or_default();
        let engine = engine.map(Engine::from_str).transpose()?.unwrap_or_default();
        let resize = resize_scale
            .map(ResizeSetting::scaled)
            .unwrap_or_default();

        Ok(Self::new(quality, format, engine, resize))
    }
}
