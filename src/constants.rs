// Encoder quality per tier (0-100 scale used by the JPEG and WebP encoders)
pub const LOW_QUALITY: u8 = 30;
pub const MEDIUM_QUALITY: u8 = 60;
pub const HIGH_QUALITY: u8 = 80;
pub const MAXIMUM_QUALITY: u8 = 95;

// Size estimator heuristics. Coarse multipliers, not measured ratios.
pub const LOW_QUALITY_FACTOR: f64 = 0.3;
pub const MEDIUM_QUALITY_FACTOR: f64 = 0.5;
pub const HIGH_QUALITY_FACTOR: f64 = 0.7;
pub const MAXIMUM_QUALITY_FACTOR: f64 = 0.9;

pub const JPEG_FORMAT_FACTOR: f64 = 0.6;
pub const WEBP_FORMAT_FACTOR: f64 = 0.4;
pub const PNG_FORMAT_FACTOR: f64 = 0.8;

pub const DEFAULT_RESIZE_SCALE: &str = "50";

/// Background used when flattening alpha for formats without transparency.
pub const FLATTEN_BACKGROUND: [u8; 3] = [255, 255, 255];

pub const OUTPUT_NAME_MARKER: &str = "_compressed";

/// Mode requested for written images on unix, before the umask applies
pub const OUTPUT_FILE_MODE: u32 = 0o644;

// Decode-time safety limits
pub const MAX_FILE_SIZE: u64 = 200 * 1024 * 1024;
pub const MAX_IMAGE_DIMENSION: u32 = 20_000;
pub const WEBP_MAX_DIMENSION: u32 = 16_383;

// oxipng tuning
pub const OXIPNG_PRESET: u8 = 4;
pub const ZOPFLI_ITERATIONS: u8 = 15;
pub const LIBDEFLATER_HIGH_LEVEL: u8 = 12;
pub const LIBDEFLATER_LOW_LEVEL: u8 = 8;

pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] =
    &["png", "jpg", "jpeg", "bmp", "tiff", "tif", "webp", "gif"];

pub const WORKER_THREAD_NAME: &str = "hikari-batch";

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";
pub const PROGRESS_SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";
