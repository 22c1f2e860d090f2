use crate::error::{CompressionError, Result};
use crate::formats::is_image_file;
use glob::glob;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Ordered list of source images queued for compression.
///
/// Insertion order is kept and duplicates are allowed. Indices are always
/// `0..len()`; removing an entry shifts the ones after it down by one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    images: Vec<PathBuf>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `paths` and returns how many were added
    pub fn add<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let before = self.images.len();
        self.images.extend(paths.into_iter().map(Into::into));
        self.images.len() - before
    }

    /// Removes the entry at `index`. Out-of-range indices are ignored.
    pub fn remove_at(&mut self, index: usize) -> Option<PathBuf> {
        if index < self.images.len() {
            Some(self.images.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.images.get(index).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.images.iter().map(PathBuf::as_path)
    }
}

/// Expands command-line inputs into image paths.
///
/// Each input may be a file (kept as given, whatever its extension), a
/// directory (walked for files with an image extension; hidden entries are
/// skipped, subdirectories only with `recursive`) or a glob pattern.
/// Results keep the order of `inputs`; directory and glob matches are
/// sorted by name.
pub fn collect_image_files<S: AsRef<str>>(inputs: &[S], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut image_files = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        let input_path = Path::new(input);

        if input_path.is_file() {
            image_files.push(input_path.to_path_buf());
        } else if input_path.is_dir() {
            image_files.extend(collect_from_directory(input_path, recursive)?);
        } else {
            let matches = collect_from_glob(input)?;
            if matches.is_empty() {
                crate::warn!("No image files match {}", input);
            }
            image_files.extend(matches);
        }
    }

    Ok(image_files)
}

fn collect_from_directory(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut walker = WalkDir::new(dir).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
    {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && is_image_file(path) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

fn collect_from_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = glob(pattern)
        .map_err(CompressionError::InvalidPattern)?
        .flatten()
        .filter(|entry| entry.is_file() && is_image_file(entry))
        .collect();
    files.sort();
    Ok(files)
}
