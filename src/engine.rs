//! Decode and encode backends.
//!
//! The pipeline only needs "decode a file" and "encode an image in a format
//! at a quality". [`ImageEngine`] is that seam; [`Engine`] picks one of the
//! two implementations.

use crate::constants::{
    LIBDEFLATER_HIGH_LEVEL, LIBDEFLATER_LOW_LEVEL, OXIPNG_PRESET, WEBP_MAX_DIMENSION,
    ZOPFLI_ITERATIONS,
};
use crate::error::{CompressionError, Result};
use crate::formats::OutputFormat;
use crate::processing::load_image_with_metadata;
use crate::settings::{Engine, QualityTier};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{ColorType, DynamicImage};
use oxipng::{Deflaters, Options, StripChunks};
use std::num::NonZeroU8;
use std::path::Path;

pub trait ImageEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// Decodes the file at `path`, returning the image and the file size
    fn decode(&self, path: &Path) -> Result<(DynamicImage, u64)> {
        load_image_with_metadata(path)
    }

    /// Encodes `img` into an in-memory file of `format`.
    ///
    /// JPEG expects an image without alpha; callers flatten first.
    fn encode(&self, img: &DynamicImage, format: OutputFormat, tier: QualityTier)
        -> Result<Vec<u8>>;
}

/// Codecs of the `image` crate, plus libwebp for lossy WebP
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateEngine;

/// [`ImageCrateEngine`] with an oxipng pass over PNG output
#[derive(Debug, Default, Clone, Copy)]
pub struct OxipngEngine;

static IMAGE_ENGINE: ImageCrateEngine = ImageCrateEngine;
static OXIPNG_ENGINE: OxipngEngine = OxipngEngine;

impl Engine {
    pub fn backend(&self) -> &'static dyn ImageEngine {
        match self {
            Engine::Image => &IMAGE_ENGINE,
            Engine::Oxipng => &OXIPNG_ENGINE,
        }
    }
}

impl ImageEngine for ImageCrateEngine {
    fn name(&self) -> &'static str {
        "image"
    }

    fn encode(
        &self,
        img: &DynamicImage,
        format: OutputFormat,
        tier: QualityTier,
    ) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Jpeg => encode_jpeg(img, tier.quality()),
            OutputFormat::WebP => encode_webp(img, tier.quality()),
            OutputFormat::Png => encode_png(img),
        }
    }
}

impl ImageEngine for OxipngEngine {
    fn name(&self) -> &'static str {
        "oxipng"
    }

    fn encode(
        &self,
        img: &DynamicImage,
        format: OutputFormat,
        tier: QualityTier,
    ) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Png => {
                let png = encode_png(img)?;
                optimize_png(&png, tier)
            }
            _ => IMAGE_ENGINE.encode(img, format, tier),
        }
    }
}

pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);

    match img.color() {
        ColorType::L8 | ColorType::Rgb8 => img.write_with_encoder(encoder)?,
        _ => DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)?,
    }

    Ok(buffer)
}

/// Lossy WebP through libwebp. Sides above [`WEBP_MAX_DIMENSION`] are
/// rejected up front; libwebp cannot represent them.
pub fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let (width, height) = (img.width(), img.height());
    if width > WEBP_MAX_DIMENSION || height > WEBP_MAX_DIMENSION {
        return Err(CompressionError::WebPEncoding(format!(
            "{}x{} exceeds the WebP limit of {}x{}",
            width, height, WEBP_MAX_DIMENSION, WEBP_MAX_DIMENSION
        )));
    }

    let encoded = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        webp::Encoder::from_rgba(rgba.as_raw(), width, height)
            .encode_simple(false, quality as f32)
    } else {
        let rgb = img.to_rgb8();
        webp::Encoder::from_rgb(rgb.as_raw(), width, height)
            .encode_simple(false, quality as f32)
    };

    encoded
        .map(|memory| memory.to_vec())
        .map_err(|e| CompressionError::WebPEncoding(format!("{:?}", e)))
}

/// Lossless PNG at the strongest zlib setting. Quality does not apply.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, PngFilter::Adaptive);

    match img.color() {
        ColorType::Rgb32F => DynamicImage::ImageRgb16(img.to_rgb16()).write_with_encoder(encoder)?,
        ColorType::Rgba32F => {
            DynamicImage::ImageRgba16(img.to_rgba16()).write_with_encoder(encoder)?
        }
        _ => img.write_with_encoder(encoder)?,
    }

    Ok(buffer)
}

/// Re-compresses PNG data with oxipng. Higher tiers spend more time on the
/// deflate stream.
pub fn optimize_png(png: &[u8], tier: QualityTier) -> Result<Vec<u8>> {
    let mut options = Options::from_preset(OXIPNG_PRESET);
    options.strip = StripChunks::Safe;
    options.deflate = png_deflater(tier);

    oxipng::optimize_from_memory(png, &options)
        .map_err(|e| CompressionError::PngOptimization(e.to_string()))
}

fn png_deflater(tier: QualityTier) -> Deflaters {
    let quality = tier.quality();
    if quality >= 90 {
        if let Some(iterations) = NonZeroU8::new(ZOPFLI_ITERATIONS) {
            return Deflaters::Zopfli { iterations };
        }
    }

    if quality >= 70 {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_HIGH_LEVEL,
        }
    } else {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_LOW_LEVEL,
        }
    }
}
