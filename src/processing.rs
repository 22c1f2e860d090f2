use crate::constants::{FLATTEN_BACKGROUND, MAX_FILE_SIZE, MAX_IMAGE_DIMENSION};
use crate::error::{CompressionError, Result};
use crate::formats::OutputFormat;
use crate::naming::output_path_for;
use crate::resize::resize_image;
use crate::settings::CompressionSettings;
use image::{imageops, DynamicImage, GenericImageView, ImageReader, Rgba, RgbaImage};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::Builder;

/// A source image written out successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedItem {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub original_size: u64,
    pub compressed_size: u64,
}

/// Validates that a file exists at the given path.
///
/// # Example
/// ```
/// use std::path::Path;
/// use hikari_compressor::validate_file_exists;
///
/// let result = validate_file_exists(Path::new("nonexistent.jpg"));
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(CompressionError::FileNotFound(path.to_path_buf()));
    }
    Ok(())
}

/// Loads an image file and returns it along with its size in bytes.
///
/// The format is sniffed from the file content, so a mislabelled extension
/// still decodes. Files above [`MAX_FILE_SIZE`] and images with a side above
/// [`MAX_IMAGE_DIMENSION`] are refused before they can exhaust memory.
pub fn load_image_with_metadata(input_path: &Path) -> Result<(DynamicImage, u64)> {
    validate_file_exists(input_path)?;

    let file_size = fs::metadata(input_path)?.len();
    if file_size > MAX_FILE_SIZE {
        return Err(CompressionError::FileTooLarge(file_size, MAX_FILE_SIZE));
    }

    let img = ImageReader::open(input_path)?
        .with_guessed_format()?
        .decode()?;

    let (width, height) = img.dimensions();
    if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
        return Err(CompressionError::InvalidDimensions(
            width,
            height,
            MAX_IMAGE_DIMENSION,
        ));
    }

    Ok((img, file_size))
}

/// Composites `img` onto an opaque background, using its alpha channel as
/// the blend mask.
pub fn flatten_alpha(img: &DynamicImage, background: [u8; 3]) -> DynamicImage {
    let [r, g, b] = background;
    let mut canvas = RgbaImage::from_pixel(img.width(), img.height(), Rgba([r, g, b, 255]));
    imageops::overlay(&mut canvas, &img.to_rgba8(), 0, 0);

    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
}

/// Prepares the pixel layout for `format`.
///
/// Formats without transparency get alpha images flattened onto white.
/// Palette sources reach this point already expanded to RGB(A) by the
/// decoder, so they take the same path.
pub fn normalize_for_format(img: DynamicImage, format: OutputFormat) -> DynamicImage {
    if format.supports_alpha() || !img.color().has_alpha() {
        return img;
    }

    crate::verbose!("Flattening transparency for {}", format);
    flatten_alpha(&img, FLATTEN_BACKGROUND)
}

/// Writes `data` to `destination` through a temporary file in the same
/// directory, so a failed write never leaves a truncated file behind.
///
/// On unix the file is created with mode 0644 filtered by the
/// process umask, like a plain `File::create`.
pub fn write_atomically(destination: &Path, data: &[u8]) -> Result<()> {
    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = Builder::new();
    builder.prefix(".hikari-");
    #[cfg(unix)]
    {
        use crate::constants::OUTPUT_FILE_MODE;
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(OUTPUT_FILE_MODE));
    }

    let mut temp = builder.tempfile_in(parent)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;
    temp.persist(destination)
        .map_err(|e| CompressionError::Io(e.error))?;

    Ok(())
}

/// Compresses one source image into `output_dir`.
///
/// decode -> resize -> color normalization -> encode -> write. The output
/// name comes from [`output_path_for`].
pub fn compress_image(
    source: &Path,
    output_dir: &Path,
    settings: &CompressionSettings,
) -> Result<CompressedItem> {
    let destination = output_path_for(source, output_dir, settings)?;
    let engine = settings.engine.backend();

    let (mut img, original_size) = engine.decode(source)?;
    crate::verbose!(
        "Decoded {:?}: {}x{} {:?}",
        source,
        img.width(),
        img.height(),
        img.color()
    );

    resize_image(&mut img, &settings.resize)?;
    let img = normalize_for_format(img, settings.format);

    let data = engine.encode(&img, settings.format, settings.quality)?;
    write_atomically(&destination, &data)?;

    Ok(CompressedItem {
        source: source.to_path_buf(),
        destination,
        original_size,
        compressed_size: data.len() as u64,
    })
}
