use crate::batch::validate_batch_start;
use crate::catalog::Catalog;
use crate::error::{CompressionError, Result};
use crate::estimate::{estimate_for_path, SizeEstimate};
use crate::job::{spawn_batch, JobHandle};
use crate::settings::CompressionSettings;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Application state: the queue, the current settings and the output folder.
///
/// While a batch started from this session is running, the queue and the
/// output folder are locked. Settings may still change; the running batch
/// works on the copy taken when it started.
#[derive(Debug, Default)]
pub struct Session {
    catalog: Catalog,
    settings: CompressionSettings,
    output_dir: Option<PathBuf>,
    running: Arc<AtomicBool>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: CompressionSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &CompressionSettings {
        &self.settings
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.is_running() {
            return Err(CompressionError::BatchInProgress);
        }
        Ok(())
    }

    /// Queues `paths`. When no output folder is set yet, the folder of the
    /// first added image becomes the output folder.
    pub fn load<I, P>(&mut self, paths: I) -> Result<usize>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.ensure_idle()?;

        let first_new = self.catalog.len();
        let added = self.catalog.add(paths);

        if self.output_dir.is_none() {
            if let Some(first) = self.catalog.get(first_new) {
                let dir = source_directory(first);
                crate::verbose!("Output folder defaults to {:?}", dir);
                self.output_dir = Some(dir);
            }
        }

        Ok(added)
    }

    /// Removes the image at `index`; out-of-range indices are ignored.
    pub fn remove_at(&mut self, index: usize) -> Result<Option<PathBuf>> {
        self.ensure_idle()?;
        Ok(self.catalog.remove_at(index))
    }

    /// Empties the queue. Asking the user first is the caller's business.
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.catalog.clear();
        Ok(())
    }

    pub fn set_output_dir(&mut self, dir: impl Into<PathBuf>) -> Result<()> {
        self.ensure_idle()?;
        self.output_dir = Some(dir.into());
        Ok(())
    }

    pub fn set_settings(&mut self, settings: CompressionSettings) {
        self.settings = settings;
    }

    pub fn settings_mut(&mut self) -> &mut CompressionSettings {
        &mut self.settings
    }

    /// Output folder a batch would use: the chosen one, else the folder of
    /// the first queued image.
    pub fn resolved_output_dir(&self) -> Option<PathBuf> {
        self.output_dir
            .clone()
            .or_else(|| self.catalog.get(0).map(source_directory))
    }

    /// Advisory size estimate for the image at `index`
    pub fn estimate(&self, index: usize) -> Option<Result<SizeEstimate>> {
        self.catalog
            .get(index)
            .map(|path| estimate_for_path(path, &self.settings))
    }

    /// Estimates for every queued image, in queue order. Headers are read
    /// in parallel.
    pub fn estimates(&self) -> Vec<(PathBuf, Result<SizeEstimate>)> {
        self.catalog
            .paths()
            .par_iter()
            .map(|path| (path.clone(), estimate_for_path(path, &self.settings)))
            .collect()
    }

    /// Starts compressing the queue in the background.
    ///
    /// Fails without doing any work when a batch is already running, the
    /// queue is empty, or the output folder cannot be created. The queue
    /// and the settings are copied; later edits do not reach the batch.
    pub fn start_compression(&self) -> Result<JobHandle> {
        self.ensure_idle()?;

        let paths = self.catalog.paths().to_vec();
        let output_dir = self
            .resolved_output_dir()
            .ok_or(CompressionError::NoImagesLoaded)?;
        validate_batch_start(&paths, &output_dir)?;

        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(CompressionError::BatchInProgress);
        }

        crate::verbose!(
            "Starting batch of {} images into {:?}",
            paths.len(),
            output_dir
        );
        spawn_batch(
            paths,
            self.settings.clone(),
            output_dir,
            Arc::clone(&self.running),
        )
    }
}

fn source_directory(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
