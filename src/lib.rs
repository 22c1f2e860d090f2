pub mod batch;
pub mod catalog;
pub mod cli;
pub mod constants;
pub mod engine;
pub mod error;
pub mod estimate;
pub mod formats;
pub mod info;
pub mod job;
pub mod logger;
pub mod naming;
pub mod processing;
pub mod resize;
pub mod session;
pub mod settings;
pub mod utils;

pub use batch::{
    prepare_output_dir, run_batch, validate_batch_start, BatchEvent, BatchReport, FailedItem,
    NoProgress, ProgressSink,
};
pub use catalog::{collect_image_files, Catalog};
pub use engine::{ImageCrateEngine, ImageEngine, OxipngEngine};
pub use error::{CompressionError, Result};
pub use estimate::{estimate_for_path, estimate_size, SizeEstimate};
pub use formats::{is_image_file, OutputFormat};
pub use info::{print_image_info, probe_image, ImageProbe};
pub use job::{spawn_batch, JobHandle};
pub use naming::{compose_file_name, output_path_for};
pub use processing::{
    compress_image, flatten_alpha, load_image_with_metadata, normalize_for_format,
    validate_file_exists, CompressedItem,
};
pub use resize::{calculate_resize_dimensions, resize_image};
pub use session::Session;
pub use settings::{CompressionSettings, Engine, QualityTier, ResizeSetting};
