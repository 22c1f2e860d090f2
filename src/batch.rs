use crate::error::{CompressionError, Result};
use crate::processing::{compress_image, CompressedItem};
use crate::settings::CompressionSettings;
use crate::utils::calculate_compression_ratio;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

/// A source image that could not be compressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub index: usize,
    pub source: PathBuf,
    pub error: String,
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: Vec<CompressedItem>,
    pub failed: Vec<FailedItem>,
    /// Set when the run stopped early on request
    pub cancelled: bool,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn total_original_size(&self) -> u64 {
        self.succeeded.iter().map(|item| item.original_size).sum()
    }

    pub fn total_compressed_size(&self) -> u64 {
        self.succeeded.iter().map(|item| item.compressed_size).sum()
    }

    /// Overall size reduction of the successful items, in percent
    pub fn compression_ratio(&self) -> f64 {
        calculate_compression_ratio(self.total_original_size(), self.total_compressed_size())
    }

    pub fn is_complete_success(&self) -> bool {
        !self.cancelled && self.failed.is_empty() && self.succeeded.len() == self.total
    }
}

/// Events emitted while a batch runs, in order
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Started {
        total: usize,
        output_dir: PathBuf,
    },
    ItemDone {
        index: usize,
        item: CompressedItem,
    },
    ItemFailed(FailedItem),
    /// Sent after every item, successful or not
    Progress {
        completed: usize,
        total: usize,
    },
    Completed(BatchReport),
}

impl BatchEvent {
    /// Completed share of the batch in `0.0..=1.0`, for progress events
    pub fn fraction(&self) -> Option<f64> {
        match self {
            BatchEvent::Progress { completed, total } if *total > 0 => {
                Some(*completed as f64 / *total as f64)
            }
            BatchEvent::Progress { .. } => Some(1.0),
            _ => None,
        }
    }
}

/// Receiver of batch events
pub trait ProgressSink {
    fn on_event(&self, event: BatchEvent);
}

/// Forwards events over a channel. A dropped receiver is not an error: the
/// batch keeps running and writing files.
impl ProgressSink for Sender<BatchEvent> {
    fn on_event(&self, event: BatchEvent) {
        let _ = self.send(event);
    }
}

/// Discards every event
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_event(&self, _event: BatchEvent) {}
}

/// Creates the output directory when it does not exist yet.
pub fn prepare_output_dir(output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir)
        .map_err(|_| CompressionError::DirectoryCreationFailed(output_dir.to_path_buf()))?;

    if !output_dir.is_dir() {
        return Err(CompressionError::DirectoryCreationFailed(
            output_dir.to_path_buf(),
        ));
    }
    Ok(())
}

/// Checks the batch-start preconditions: at least one image, and an output
/// directory that exists or can be created.
pub fn validate_batch_start(paths: &[PathBuf], output_dir: &Path) -> Result<()> {
    if paths.is_empty() {
        return Err(CompressionError::NoImagesLoaded);
    }
    prepare_output_dir(output_dir)
}

/// Compresses `paths` into `output_dir`, one after another in the given
/// order.
///
/// A failing image is logged, reported as [`BatchEvent::ItemFailed`] and
/// skipped; the run never aborts because of one file. `cancel` is checked
/// before each image; once it is set no further image is started. Every
/// image is followed by a [`BatchEvent::Progress`], and the run ends with
/// [`BatchEvent::Completed`].
///
/// Callers are expected to have run [`validate_batch_start`].
pub fn run_batch(
    paths: &[PathBuf],
    settings: &CompressionSettings,
    output_dir: &Path,
    sink: &dyn ProgressSink,
    cancel: &AtomicBool,
) -> BatchReport {
    let start_time = Instant::now();
    let total = paths.len();
    let mut report = BatchReport {
        total,
        ..BatchReport::default()
    };

    crate::verbose!(
        "Batch of {} images: quality {}, format {}, engine {}",
        total,
        settings.quality,
        settings.format,
        settings.engine
    );
    sink.on_event(BatchEvent::Started {
        total,
        output_dir: output_dir.to_path_buf(),
    });

    for (index, source) in paths.iter().enumerate() {
        if cancel.load(Ordering::SeqCst) {
            crate::warn!(
                "Batch cancelled after {} of {} images",
                report.attempted(),
                total
            );
            report.cancelled = true;
            break;
        }

        match compress_image(source, output_dir, settings) {
            Ok(item) => {
                crate::verbose!("Compressed {:?} -> {:?}", item.source, item.destination);
                report.succeeded.push(item.clone());
                sink.on_event(BatchEvent::ItemDone { index, item });
            }
            Err(e) => {
                crate::error!("Failed to compress {:?}: {}", source, e);
                let failed = FailedItem {
                    index,
                    source: source.clone(),
                    error: e.to_string(),
                };
                report.failed.push(failed.clone());
                sink.on_event(BatchEvent::ItemFailed(failed));
            }
        }

        sink.on_event(BatchEvent::Progress {
            completed: index + 1,
            total,
        });
    }

    report.elapsed = start_time.elapsed();
    sink.on_event(BatchEvent::Completed(report.clone()));
    report
}
