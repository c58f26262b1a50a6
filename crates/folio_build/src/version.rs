//! Named build targets.

use std::collections::HashSet;
use std::fmt;

use folio_config::{FolioConfig, VersionConfig};

use crate::error::BuildError;

/// One build target: usually a tag or branch of the documented code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    name: String,
    long_name: String,
    frozen: bool,
}

impl Version {
    /// Creates an unfrozen version whose long name equals its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            long_name: name.clone(),
            name,
            frozen: false,
        }
    }

    /// Sets the human readable name.
    pub fn with_long_name(mut self, long_name: impl Into<String>) -> Self {
        self.long_name = long_name.into();
        self
    }

    /// Marks the version frozen: once parsed and rendered it is never redone.
    pub fn frozen(mut self, frozen: bool) -> Self {
        self.frozen = frozen;
        self
    }

    /// Short name, substituted for `%version%` in directory templates.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human readable name.
    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    /// Whether the version is frozen.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&VersionConfig> for Version {
    fn from(config: &VersionConfig) -> Self {
        Version::new(&config.name)
            .with_long_name(config.long_name())
            .frozen(config.frozen)
    }
}

/// The ordered, non-empty list of versions a project builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCollection {
    versions: Vec<Version>,
}

impl VersionCollection {
    /// Creates a collection. Fails when empty or when two versions share a name.
    pub fn new(versions: Vec<Version>) -> Result<Self, BuildError> {
        if versions.is_empty() {
            return Err(BuildError::Config("no versions to build".to_string()));
        }
        let mut seen = HashSet::new();
        for version in &versions {
            if !seen.insert(version.name()) {
                return Err(BuildError::Config(format!(
                    "version '{}' is listed twice",
                    version.name()
                )));
            }
        }
        Ok(Self { versions })
    }

    /// A collection holding one version.
    pub fn single(version: Version) -> Self {
        Self {
            versions: vec![version],
        }
    }

    /// Versions from a loaded configuration.
    pub fn from_config(config: &FolioConfig) -> Result<Self, BuildError> {
        Self::new(config.effective_versions().iter().map(Version::from).collect())
    }

    /// Keeps only the named version.
    pub fn only(&self, name: &str) -> Result<Self, BuildError> {
        self.versions
            .iter()
            .find(|v| v.name() == name)
            .cloned()
            .map(Self::single)
            .ok_or_else(|| BuildError::Config(format!("unknown version '{name}'")))
    }

    /// The first version.
    pub fn first(&self) -> &Version {
        &self.versions[0]
    }

    /// Number of versions; never zero.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Always false; a collection cannot be empty.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Versions in build order.
    pub fn iter(&self) -> std::slice::Iter<'_, Version> {
        self.versions.iter()
    }

    /// Version names in build order.
    pub fn names(&self) -> Vec<String> {
        self.versions.iter().map(|v| v.name().to_string()).collect()
    }
}

impl<'a> IntoIterator for &'a VersionCollection {
    type Item = &'a Version;
    type IntoIter = std::slice::Iter<'a, Version>;

    fn into_iter(self) -> Self::IntoIter {
        self.versions.iter()
    }
}
