//! Render snapshots.

use std::collections::BTreeMap;

use folio_common::ContentHash;
use serde::{Deserialize, Serialize};

use crate::project::Project;

/// What a render was based on: class hashes, versions and namespaces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    classes: BTreeMap<String, ContentHash>,
    versions: Vec<String>,
    namespaces: Vec<String>,
}

impl Index {
    /// Creates an index from its parts.
    pub fn new(
        classes: BTreeMap<String, ContentHash>,
        versions: Vec<String>,
        namespaces: Vec<String>,
    ) -> Self {
        Self {
            classes,
            versions,
            namespaces,
        }
    }

    /// Snapshot of the project's current version. Uses simulated namespaces
    /// when the project simulates them.
    pub fn from_project(project: &Project) -> Self {
        let classes = project
            .project_classes()
            .iter()
            .filter_map(|class| class.hash.map(|hash| (class.info.name.clone(), hash)))
            .collect();
        let namespaces = if project.settings().simulate_namespaces {
            project.simulated_namespaces()
        } else {
            project.namespaces()
        };
        Self::new(classes, project.versions().names(), namespaces)
    }

    /// Class name to content hash.
    pub fn classes(&self) -> &BTreeMap<String, ContentHash> {
        &self.classes
    }

    /// Version names.
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// Namespaces, sorted.
    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    /// The recorded hash of a class.
    pub fn hash(&self, class: &str) -> Option<&ContentHash> {
        self.classes.get(class)
    }
}
