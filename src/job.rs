//! Background compression job.
//!
//! One named worker thread runs [`run_batch`] over a snapshot of the queue
//! and settings; events come back over a channel in completion order.

use crate::batch::{run_batch, BatchEvent, BatchReport};
use crate::constants::WORKER_THREAD_NAME;
use crate::error::{CompressionError, Result};
use crate::settings::CompressionSettings;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Clears the shared running flag when the worker exits, panics included.
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Handle to a running batch
pub struct JobHandle {
    events: Receiver<BatchEvent>,
    cancel: Arc<AtomicBool>,
    worker: JoinHandle<BatchReport>,
}

impl JobHandle {
    /// Blocking iterator over the job's events. Ends after
    /// [`BatchEvent::Completed`], once the worker has dropped its sender.
    pub fn events(&self) -> mpsc::Iter<'_, BatchEvent> {
        self.events.iter()
    }

    /// Next event if one is pending
    pub fn try_next_event(&self) -> Option<BatchEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Asks the worker to stop before the next image. The image in flight
    /// is finished first.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Waits for the worker and returns its report
    pub fn wait(self) -> Result<BatchReport> {
        self.worker
            .join()
            .map_err(|_| CompressionError::WorkerPanicked)
    }
}

/// Starts a batch on a background thread.
///
/// `running` must already be set by the caller; it is cleared when the
/// worker exits or when the thread cannot be spawned.
pub fn spawn_batch(
    paths: Vec<PathBuf>,
    settings: CompressionSettings,
    output_dir: PathBuf,
    running: Arc<AtomicBool>,
) -> Result<JobHandle> {
    let (tx, rx) = mpsc::channel();
    let cancel = Arc::new(AtomicBool::new(false));
    let worker_cancel = Arc::clone(&cancel);
    let guard = RunningGuard(running);

    let worker = thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || {
            let _guard = guard;
            run_batch(&paths, &settings, &output_dir, &tx, &worker_cancel)
        })?;

    Ok(JobHandle {
        events: rx,
        cancel,
        worker,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use tempfile::TempDir;

    #[test]
    fn test_spawn_batch_reports_and_clears_flag() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("pic.png");
        RgbImage::new(10, 10).save(&source).unwrap();

        let running = Arc::new(AtomicBool::new(true));
        let job = spawn_batch(
            vec![source],
            CompressionSettings::default(),
            temp_dir.path().to_path_buf(),
            Arc::clone(&running),
        )
        .unwrap();

        let events: Vec<BatchEvent> = job.events().collect();
        assert!(matches!(events.last(), Some(BatchEvent::Completed(_))));

        let report = job.wait().unwrap();
        assert_eq!(report.succeeded.len(), 1);
        assert!(!running.load(Ordering::SeqCst));
        assert!(temp_dir.path().join("pic_compressed-High.jpg").exists());
    }

    #[test]
    fn test_cancel_flag_visible() {
        let temp_dir = TempDir::new().unwrap();
        let job = spawn_batch(
            Vec::new(),
            CompressionSettings::default(),
            temp_dir.path().to_path_buf(),
            Arc::new(AtomicBool::new(true)),
        )
        .unwrap();

        assert!(!job.is_cancelled());
        job.cancel();
        assert!(job.is_cancelled());

        let report = job.wait().unwrap();
        assert_eq!(report.total, 0);
    }
}
