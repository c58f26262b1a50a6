//! Deferred class references.

use std::fmt;
use std::rc::Rc;

use folio_common::short_name;
use folio_model::ClassEntity;

use crate::error::BuildError;
use crate::project::Project;

/// A class referenced by name that may not have been loaded yet.
///
/// Parents, interfaces, parameter types and `@see` targets all reach other
/// classes through this handle, so referencing a class never forces the
/// whole inheritance graph to load. The handle is read-only: resolving it
/// yields the shared registered entity or `None` for types outside the
/// project.
#[derive(Clone)]
pub struct LazyClass<'p> {
    project: &'p Project,
    name: String,
}

impl<'p> LazyClass<'p> {
    pub(crate) fn new(project: &'p Project, name: String) -> Self {
        Self { project, name }
    }

    /// Fully qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unqualified name.
    pub fn short_name(&self) -> &str {
        short_name(&self.name)
    }

    /// Loads the class on first use.
    pub fn load(&self) -> Result<Option<Rc<ClassEntity>>, BuildError> {
        self.project.load_class(&self.name)
    }

    /// Whether the name belongs to a class parsed from the project sources.
    pub fn is_project_class(&self) -> Result<bool, BuildError> {
        Ok(self.load()?.is_some())
    }
}

impl fmt::Debug for LazyClass<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LazyClass").field(&self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use folio_store::MemoryStore;

    use super::*;
    use crate::project::BuildSettings;
    use crate::version::{Version, VersionCollection};

    #[test]
    fn resolves_registered_and_external_names() {
        let dir = tempfile::tempdir().unwrap();
        let settings = BuildSettings::new(
            dir.path().join("build").to_string_lossy(),
            dir.path().join("cache").to_string_lossy(),
        );
        let mut project = Project::new(
            Box::new(MemoryStore::new()),
            VersionCollection::single(Version::new("main")),
            settings,
        )
        .unwrap();
        project.add_class(ClassEntity::new("Acme\\Client", 1)).unwrap();

        let client = project.get_class("\\Acme\\Client");
        assert_eq!(client.short_name(), "Client");
        assert!(client.is_project_class().unwrap());
        assert_eq!(client.load().unwrap().unwrap().info.name, "Acme\\Client");

        let external = project.get_class("ArrayAccess");
        assert!(!external.is_project_class().unwrap());
        assert_eq!(format!("{external:?}"), "LazyClass(\"ArrayAccess\")");
    }
}
