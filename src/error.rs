use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("WebP encoding error: {0}")]
    WebPEncoding(String),

    #[error("Invalid quality tier: {0}. Expected one of: low, medium, high, maximum")]
    InvalidQualityTier(String),

    #[error("Invalid engine: {0}. Expected one of: image, oxipng")]
    InvalidEngine(String),

    #[error("Invalid image dimensions: {0}x{1}. Maximum allowed: {2}x{2}")]
    InvalidDimensions(u32, u32, u32),

    #[error("File too large: {0} bytes. Maximum allowed: {1} bytes")]
    FileTooLarge(u64, u64),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),

    #[error("No images loaded. Add images before starting compression")]
    NoImagesLoaded,

    #[error("A compression batch is already running")]
    BatchInProgress,

    #[error("Compression worker stopped unexpectedly")]
    WorkerPanicked,

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),

    #[error("Invalid glob pattern: {0}")]
    InvalidPattern(#[from] glob::PatternError),
}

pub type Result<T> = std::result::Result<T, CompressionError>;
