//! In-memory store, for tests and throwaway builds.

use std::collections::{BTreeMap, HashMap};

use folio_model::ClassEntity;

use crate::error::StoreError;
use crate::{Store, StoreScope};

/// Keeps classes in a map per version. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    versions: HashMap<String, BTreeMap<String, ClassEntity>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of classes held for `version`.
    pub fn len(&self, version: &str) -> usize {
        self.versions.get(version).map_or(0, BTreeMap::len)
    }

    /// Whether nothing is held for `version`.
    pub fn is_empty(&self, version: &str) -> bool {
        self.len(version) == 0
    }
}

impl Store for MemoryStore {
    fn read_class(&self, scope: &StoreScope<'_>, name: &str) -> Result<ClassEntity, StoreError> {
        let mut class = self
            .versions
            .get(scope.version)
            .and_then(|classes| classes.get(name))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                name: name.to_string(),
            })?;
        class.from_cache = true;
        Ok(class)
    }

    fn write_class(&mut self, scope: &StoreScope<'_>, class: &ClassEntity) -> Result<(), StoreError> {
        self.versions
            .entry(scope.version.to_string())
            .or_default()
            .insert(class.info.name.clone(), class.clone());
        Ok(())
    }

    fn remove_class(&mut self, scope: &StoreScope<'_>, name: &str) -> Result<(), StoreError> {
        self.versions
            .get_mut(scope.version)
            .and_then(|classes| classes.remove(name))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound {
                name: name.to_string(),
            })
    }

    fn read_project(&self, scope: &StoreScope<'_>) -> Result<Vec<ClassEntity>, StoreError> {
        Ok(self
            .versions
            .get(scope.version)
            .map(|classes| {
                classes
                    .values()
                    .cloned()
                    .map(|mut class| {
                        class.from_cache = true;
                        class
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn flush_project(&mut self, scope: &StoreScope<'_>) -> Result<(), StoreError> {
        self.versions.remove(scope.version);
        Ok(())
    }

    fn seed(&mut self, from: &StoreScope<'_>, to: &StoreScope<'_>) -> Result<(), StoreError> {
        let copied = self.versions.get(from.version).cloned().unwrap_or_default();
        self.versions.insert(to.version.to_string(), copied);
        Ok(())
    }
}
