//! One JSON file per class under the version's cache directory.
//!
//! Records live at `<cache_dir>/store/c_<hash>.json`, where `<hash>` is the
//! content hash of the class name. The name-derived key keeps file names
//! short and free of namespace separators.

use std::path::{Path, PathBuf};

use folio_common::ContentHash;
use folio_model::ClassEntity;

use crate::error::StoreError;
use crate::{Store, StoreScope};

/// Subdirectory of the cache directory holding class records.
const STORE_SUBDIR: &str = "store";

/// File-per-class JSON store.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonStore;

impl JsonStore {
    /// Creates the store. All state lives on disk.
    pub fn new() -> Self {
        Self
    }

    fn store_dir(scope: &StoreScope<'_>) -> PathBuf {
        scope.cache_dir.join(STORE_SUBDIR)
    }

    /// Returns the record path for a class name.
    pub fn class_path(scope: &StoreScope<'_>, name: &str) -> PathBuf {
        let key = ContentHash::from_bytes(name.as_bytes());
        Self::store_dir(scope).join(format!("c_{key}.json"))
    }

    fn decode(path: &Path, raw: &[u8]) -> Result<ClassEntity, StoreError> {
        let mut class: ClassEntity =
            serde_json::from_slice(raw).map_err(|e| StoreError::Corrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        class.from_cache = true;
        Ok(class)
    }
}

impl Store for JsonStore {
    fn read_class(&self, scope: &StoreScope<'_>, name: &str) -> Result<ClassEntity, StoreError> {
        let path = Self::class_path(scope, name);
        let raw = match std::fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    name: name.to_string(),
                })
            }
            Err(e) => return Err(StoreError::Io { path, source: e }),
        };
        Self::decode(&path, &raw)
    }

    fn write_class(&mut self, scope: &StoreScope<'_>, class: &ClassEntity) -> Result<(), StoreError> {
        let dir = Self::store_dir(scope);
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::Io {
            path: dir,
            source: e,
        })?;

        let path = Self::class_path(scope, &class.info.name);
        let json = serde_json::to_vec(class).map_err(|e| StoreError::Serialization {
            reason: e.to_string(),
        })?;
        std::fs::write(&path, json).map_err(|e| StoreError::Io {
            path: path.clone(),
            source: e,
        })?;
        tracing::debug!(class = %class.info.name, path = %path.display(), "stored class");
        Ok(())
    }

    fn remove_class(&mut self, scope: &StoreScope<'_>, name: &str) -> Result<(), StoreError> {
        let path = Self::class_path(scope, name);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound {
                name: name.to_string(),
            }),
            Err(e) => Err(StoreError::Io { path, source: e }),
        }
    }

    fn read_project(&self, scope: &StoreScope<'_>) -> Result<Vec<ClassEntity>, StoreError> {
        let dir = Self::store_dir(scope);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&dir).map_err(|e| StoreError::Io {
            path: dir.clone(),
            source: e,
        })?;

        let mut classes = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Io {
                path: dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let raw = std::fs::read(&path).map_err(|e| StoreError::Io {
                path: path.clone(),
                source: e,
            })?;
            classes.push(Self::decode(&path, &raw)?);
        }

        classes.sort_by(|a, b| a.info.name.cmp(&b.info.name));
        Ok(classes)
    }

    fn flush_project(&mut self, scope: &StoreScope<'_>) -> Result<(), StoreError> {
        let dir = Self::store_dir(scope);
        if dir.exists() {
            std::fs::remove_dir_all(&dir).map_err(|e| StoreError::Io {
                path: dir,
                source: e,
            })?;
        }
        Ok(())
    }
}
