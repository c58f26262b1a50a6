//! Post-parse passes over the whole class set.

use std::path::PathBuf;

use folio_model::ClassEntity;

/// A pass that needs every class of the version to be registered.
///
/// Returns whether the class changed; changed classes are written back to
/// the store.
pub trait ClassVisitor {
    /// Visits one class.
    fn visit(&mut self, class: &mut ClassEntity) -> bool;
}

/// Fills [`ClassEntity::relative_file`] from the absolute unit path.
#[derive(Debug, Clone)]
pub struct SourceRootVisitor {
    root: PathBuf,
}

impl SourceRootVisitor {
    /// Paths are made relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ClassVisitor for SourceRootVisitor {
    fn visit(&mut self, class: &mut ClassEntity) -> bool {
        let Some(relative) = class
            .file
            .as_deref()
            .and_then(|file| file.strip_prefix(&self.root).ok())
        else {
            return false;
        };
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if class.relative_file.as_deref() == Some(relative.as_str()) {
            return false;
        }
        class.relative_file = Some(relative);
        true
    }
}
