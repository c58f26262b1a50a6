//! Bookkeeping for one parse run.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use folio_common::ContentHash;

use crate::project::Project;

/// Tracks which content hashes a parse run has seen.
///
/// Each known hash owns a bucket of class names. Several classes share a
/// bucket when one unit declares several classes, and also when two units
/// have identical bytes: such duplicates are parsed once and the second unit
/// is skipped as already known. A bucket that is never visited during the run
/// belongs to units that disappeared, so its classes are reported removed.
#[derive(Debug, Default)]
pub struct Transaction {
    hashes: BTreeMap<ContentHash, BTreeSet<String>>,
    classes: HashMap<String, ContentHash>,
    visited: HashSet<ContentHash>,
    modified: Vec<String>,
}

impl Transaction {
    /// Starts a run, seeded with the hashes of the classes already loaded in
    /// the project. Seeding marks nothing visited or modified.
    pub fn new(project: &Project) -> Self {
        let mut transaction = Self::default();
        for class in project.project_classes() {
            if let Some(hash) = class.hash {
                transaction.file(&class.info.name, hash);
            }
        }
        transaction
    }

    /// Returns true, and marks the hash visited, when a previous run already
    /// parsed a unit with this content.
    pub fn has_hash(&mut self, hash: &ContentHash) -> bool {
        if !self.hashes.contains_key(hash) {
            return false;
        }
        self.visited.insert(*hash);
        true
    }

    /// Records a freshly parsed class under the hash of its unit.
    pub fn add_class(&mut self, name: &str, hash: ContentHash) {
        self.file(name, hash);
        self.modified.push(name.to_string());
        self.visited.insert(hash);
    }

    fn file(&mut self, name: &str, hash: ContentHash) {
        if let Some(previous) = self.classes.insert(name.to_string(), hash) {
            if let Some(bucket) = self.hashes.get_mut(&previous) {
                bucket.remove(name);
                if bucket.is_empty() {
                    self.hashes.remove(&previous);
                }
            }
        }
        self.hashes.entry(hash).or_default().insert(name.to_string());
    }

    /// Classes parsed this run, in parse order. A class parsed twice appears twice.
    pub fn modified_classes(&self) -> &[String] {
        &self.modified
    }

    /// Classes filed under hashes that were not seen this run, sorted.
    pub fn removed_classes(&self) -> Vec<String> {
        let mut removed: Vec<String> = self
            .hashes
            .iter()
            .filter(|(hash, _)| !self.visited.contains(hash))
            .flat_map(|(_, names)| names.iter().cloned())
            .collect();
        removed.sort();
        removed
    }

    /// The hash a class is currently filed under.
    pub fn hash_of(&self, name: &str) -> Option<&ContentHash> {
        self.classes.get(name)
    }
}
