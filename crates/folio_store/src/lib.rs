//! Persistence of parsed classes between runs.
//!
//! A [`Store`] is a flat keyed blob store: one [`ClassEntity`] per fully
//! qualified class name, scoped to one version's cache directory. It never
//! looks at relationships between classes.

#![warn(missing_docs)]

pub mod error;
pub mod json;
pub mod memory;

use std::path::Path;

use folio_model::ClassEntity;

pub use error::StoreError;
pub use json::JsonStore;
pub use memory::MemoryStore;

/// The version a store operation applies to.
#[derive(Debug, Clone, Copy)]
pub struct StoreScope<'a> {
    /// Version name.
    pub version: &'a str,
    /// The version's prepared cache directory.
    pub cache_dir: &'a Path,
}

/// Backend for persisted classes.
///
/// `read_class` and `remove_class` must report a missing name as
/// [`StoreError::NotFound`]: callers treat that as "not a project class"
/// while any other error is fatal.
pub trait Store {
    /// Loads one class. The returned entity has `from_cache` set.
    fn read_class(&self, scope: &StoreScope<'_>, name: &str) -> Result<ClassEntity, StoreError>;

    /// Persists a class, replacing any previous record of the same name.
    fn write_class(&mut self, scope: &StoreScope<'_>, class: &ClassEntity) -> Result<(), StoreError>;

    /// Deletes one class.
    fn remove_class(&mut self, scope: &StoreScope<'_>, name: &str) -> Result<(), StoreError>;

    /// Every class currently persisted for the scope, ordered by name.
    fn read_project(&self, scope: &StoreScope<'_>) -> Result<Vec<ClassEntity>, StoreError>;

    /// Deletes everything persisted for the scope.
    fn flush_project(&mut self, scope: &StoreScope<'_>) -> Result<(), StoreError>;

    /// Called after `to`'s cache directory was mirrored from `from`'s.
    ///
    /// File-backed stores need nothing more; stores that keep data elsewhere
    /// copy their records here.
    fn seed(&mut self, from: &StoreScope<'_>, to: &StoreScope<'_>) -> Result<(), StoreError> {
        let _ = (from, to);
        Ok(())
    }
}
