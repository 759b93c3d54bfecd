//! File-backed storage backend
//!
//! Stores each item as its own file inside a cache directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::Storage;
use crate::error::{CacheError, Result};

/// Persists items as `<dir>/<name>.json`.
///
/// The directory is created on first write. Writes go to a temporary file
/// that is then renamed over the target, so a crash mid-write leaves the
/// previous checkpoint intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a storage rooted at `dir`. Nothing is touched on disk yet.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn item_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, name: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.item_path(name)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::Storage(e.to_string())),
        }
    }

    fn set_item(&self, name: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| CacheError::Storage(e.to_string()))?;

        let path = self.item_path(name);
        let tmp = self.dir.join(format!("{}.json.tmp", name));
        fs::write(&tmp, value).map_err(|e| CacheError::Storage(e.to_string()))?;
        fs::rename(&tmp, &path).map_err(|e| CacheError::Storage(e.to_string()))
    }

    fn remove_item(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.item_path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Storage(e.to_string())),
        }
    }
}
