//! Enumeration of source units.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{io_error, BuildError};

/// Supplies the source units of one parse run.
pub trait UnitSource {
    /// Unit locations, in a stable order.
    fn list(&self) -> Result<Vec<PathBuf>, BuildError>;

    /// Raw bytes of one unit.
    fn read(&self, path: &Path) -> Result<Vec<u8>, BuildError>;
}

/// Every file under a directory whose extension is in a configured set.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DirectorySource {
    /// Walks `root` for files ending in one of `extensions` (without dot).
    pub fn new(root: impl Into<PathBuf>, extensions: &[String]) -> Self {
        Self {
            root: root.into(),
            extensions: extensions.to_vec(),
        }
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|wanted| wanted == ext))
    }
}

impl UnitSource for DirectorySource {
    fn list(&self) -> Result<Vec<PathBuf>, BuildError> {
        if !self.root.is_dir() {
            return Err(BuildError::Config(format!(
                "source directory {} does not exist",
                self.root.display()
            )));
        }
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| BuildError::Io {
                path: self.root.clone(),
                source: e.into(),
            })?;
            if entry.file_type().is_file() && self.matches(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        Ok(paths)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, BuildError> {
        std::fs::read(path).map_err(io_error(path))
    }
}

/// Units held in memory, listed in path order.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    units: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a unit.
    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.units.insert(path.into(), content.into());
    }

    /// Drops a unit.
    pub fn remove(&mut self, path: impl AsRef<Path>) {
        self.units.remove(path.as_ref());
    }
}

impl UnitSource for MemorySource {
    fn list(&self) -> Result<Vec<PathBuf>, BuildError> {
        Ok(self.units.keys().cloned().collect())
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, BuildError> {
        self.units.get(path).cloned().ok_or_else(|| BuildError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such unit"),
        })
    }
}
