//! Read-only access to a QMK firmware source tree.
//!
//! The catalog builder never touches the filesystem directly; it asks a
//! [`SourceTree`] whether files exist and for their text. Paths are relative to
//! the root of the QMK checkout (e.g., `keyboards/crkbd/rules.mk`).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

/// File-existence and read provider for source files.
pub trait SourceTree {
    /// Checks whether a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Returns the text of `path`, or `None` when it is missing or unreadable.
    fn read(&self, path: &Path) -> Option<String>;

    /// Lists files directly inside `dir` with the given extension, sorted.
    fn list_files(&self, dir: &Path, extension: &str) -> Vec<PathBuf>;
}

/// Source tree backed by a QMK checkout on disk.
#[derive(Debug, Clone)]
pub struct FsSourceTree {
    root: PathBuf,
}

impl FsSourceTree {
    /// Creates a source tree rooted at a QMK firmware directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root of the checkout.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceTree for FsSourceTree {
    fn exists(&self, path: &Path) -> bool {
        self.root.join(path).is_file()
    }

    fn read(&self, path: &Path) -> Option<String> {
        let full_path = self.root.join(path);
        if !full_path.is_file() {
            return None;
        }

        match fs::read(&full_path) {
            // Headers occasionally carry non-UTF-8 comments
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => {
                warn!("Failed to read {}: {}", full_path.display(), e);
                None
            }
        }
    }

    fn list_files(&self, dir: &Path, extension: &str) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(self.root.join(dir)) else {
            return Vec::new();
        };

        let mut files: Vec<PathBuf> = entries
            .flatten()
            .filter(|entry| entry.path().is_file())
            .map(|entry| dir.join(entry.file_name()))
            .filter(|path| path.extension().is_some_and(|ext| ext == extension))
            .collect();
        files.sort();
        files
    }
}

/// Source tree held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySourceTree {
    files: BTreeMap<PathBuf, String>,
}

impl MemorySourceTree {
    /// Creates an empty in-memory tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    /// Builder-style variant of [`MemorySourceTree::insert`].
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }
}

impl SourceTree for MemorySourceTree {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read(&self, path: &Path) -> Option<String> {
        self.files.get(path).cloned()
    }

    fn list_files(&self, dir: &Path, extension: &str) -> Vec<PathBuf> {
        // BTreeMap keys are already sorted
        self.files
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .filter(|path| path.extension().is_some_and(|ext| ext == extension))
            .cloned()
            .collect()
    }
}
