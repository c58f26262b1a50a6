//! What changed since the last render.
//!
//! The previous [`Index`] is stored in the build directory as
//! `renderer.index`: a 4-byte little-endian header length, a bincode header
//! (magic bytes, format version, tool version, payload checksum) and the
//! bincode-encoded index. Anything that fails to decode or verify counts as
//! "never rendered", which forces a full render instead of failing the build.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use folio_common::ContentHash;
use serde::{Deserialize, Serialize};

use crate::error::{io_error, BuildError};
use crate::index::Index;
use crate::namespace::{namespace_of, simulated_namespace};
use crate::project::Project;

/// File name of the snapshot inside the build directory.
pub const SNAPSHOT_FILE: &str = "renderer.index";

const SNAPSHOT_MAGIC: [u8; 4] = *b"FLIX";

/// Increment on breaking changes to the header or payload format.
const SNAPSHOT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotHeader {
    magic: [u8; 4],
    format_version: u32,
    tool_version: String,
    checksum: ContentHash,
}

/// The previous and current [`Index`] of one version's build directory.
#[derive(Debug, Clone)]
pub struct Diff {
    previous: Index,
    current: Index,
    path: PathBuf,
    tool_version: String,
    already_rendered: bool,
}

impl Diff {
    /// Compares `current` with the snapshot stored at `path`.
    pub fn new(current: Index, path: PathBuf, tool_version: &str) -> Self {
        let previous = load_snapshot(&path);
        Self {
            already_rendered: previous.is_some(),
            previous: previous.unwrap_or_default(),
            current,
            path,
            tool_version: tool_version.to_string(),
        }
    }

    /// Diff for the project's current version and build directory.
    pub fn for_project(project: &Project) -> Result<Self, BuildError> {
        let path = project.build_dir()?.join(SNAPSHOT_FILE);
        Ok(Self::new(
            Index::from_project(project),
            path,
            &project.settings().tool_version,
        ))
    }

    /// The snapshot left by the last render, or an empty index.
    pub fn previous(&self) -> &Index {
        &self.previous
    }

    /// The index of the project as it is now.
    pub fn current(&self) -> &Index {
        &self.current
    }

    /// Whether a readable snapshot existed.
    pub fn is_already_rendered(&self) -> bool {
        self.already_rendered
    }

    /// Whether the list of project versions changed.
    pub fn are_versions_modified(&self) -> bool {
        self.current.versions() != self.previous.versions()
    }

    /// True when nothing needs rendering: same versions, no class added,
    /// changed or removed.
    pub fn is_empty(&self) -> bool {
        !self.are_versions_modified()
            && self.modified_classes().is_empty()
            && self.removed_classes().is_empty()
    }

    /// Classes that are new or whose hash changed, sorted.
    pub fn modified_classes(&self) -> Vec<String> {
        self.current
            .classes()
            .iter()
            .filter(|(name, hash)| self.previous.hash(name) != Some(*hash))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Classes that were rendered before and no longer exist, sorted.
    pub fn removed_classes(&self) -> Vec<String> {
        self.previous
            .classes()
            .keys()
            .filter(|name| !self.current.classes().contains_key(*name))
            .cloned()
            .collect()
    }

    /// Namespaces that did not exist at the last render.
    pub fn modified_namespaces(&self) -> Vec<String> {
        difference(self.current.namespaces(), self.previous.namespaces())
    }

    /// Namespaces that no longer exist.
    pub fn removed_namespaces(&self) -> Vec<String> {
        difference(self.previous.namespaces(), self.current.namespaces())
    }

    /// Namespace pages to regenerate: new namespaces plus the surviving
    /// namespaces of every added, changed or removed class.
    pub fn namespaces_to_render(&self, simulated: bool) -> Vec<String> {
        let owner = |name: &str| {
            if simulated {
                simulated_namespace(name)
            } else {
                namespace_of(name).to_string()
            }
        };
        let current: BTreeSet<&String> = self.current.namespaces().iter().collect();
        let mut namespaces: BTreeSet<String> = self.modified_namespaces().into_iter().collect();
        for name in self
            .modified_classes()
            .iter()
            .chain(self.removed_classes().iter())
        {
            let namespace = owner(name);
            if current.contains(&namespace) {
                namespaces.insert(namespace);
            }
        }
        namespaces.into_iter().collect()
    }

    /// Stores the current index as the new snapshot.
    pub fn save(&self) -> Result<(), BuildError> {
        let bytes = encode_snapshot(&self.current, &self.tool_version)?;
        std::fs::write(&self.path, bytes).map_err(io_error(&self.path))
    }
}

fn difference(left: &[String], right: &[String]) -> Vec<String> {
    let right: BTreeSet<&String> = right.iter().collect();
    left.iter().filter(|n| !right.contains(n)).cloned().collect()
}

fn encode_snapshot(index: &Index, tool_version: &str) -> Result<Vec<u8>, BuildError> {
    let config = bincode::config::standard();
    let payload = bincode::serde::encode_to_vec(index, config)
        .map_err(|e| BuildError::Render(format!("cannot encode render snapshot: {e}")))?;
    let header = SnapshotHeader {
        magic: SNAPSHOT_MAGIC,
        format_version: SNAPSHOT_FORMAT_VERSION,
        tool_version: tool_version.to_string(),
        checksum: ContentHash::from_bytes(&payload),
    };
    let header_bytes = bincode::serde::encode_to_vec(&header, config)
        .map_err(|e| BuildError::Render(format!("cannot encode render snapshot: {e}")))?;

    let mut output = Vec::with_capacity(4 + header_bytes.len() + payload.len());
    output.extend_from_slice(&(header_bytes.len() as u32).to_le_bytes());
    output.extend_from_slice(&header_bytes);
    output.extend_from_slice(&payload);
    Ok(output)
}

/// Reads a snapshot. Any failure yields `None`.
fn load_snapshot(path: &Path) -> Option<Index> {
    let raw = std::fs::read(path).ok()?;
    let index = decode_snapshot(&raw);
    if index.is_none() {
        tracing::debug!(path = %path.display(), "unreadable render snapshot, rendering everything");
    }
    index
}

fn decode_snapshot(raw: &[u8]) -> Option<Index> {
    let config = bincode::config::standard();
    let header_len = u32::from_le_bytes(raw.get(..4)?.try_into().ok()?) as usize;
    let header_bytes = raw.get(4..4usize.checked_add(header_len)?)?;
    let (header, _): (SnapshotHeader, usize) =
        bincode::serde::decode_from_slice(header_bytes, config).ok()?;
    if header.magic != SNAPSHOT_MAGIC || header.format_version != SNAPSHOT_FORMAT_VERSION {
        return None;
    }

    let payload = &raw[4 + header_len..];
    if ContentHash::from_bytes(payload) != header.checksum {
        return None;
    }
    let (index, _): (Index, usize) = bincode::serde::decode_from_slice(payload, config).ok()?;
    Some(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(classes: &[(&str, &str)], namespaces: &[&str]) -> Index {
        Index::new(
            classes
                .iter()
                .map(|(name, content)| (name.to_string(), ContentHash::from_bytes(content.as_bytes())))
                .collect(),
            vec!["main".to_string()],
            namespaces.iter().map(|n| n.to_string()).collect(),
        )
    }

    fn diff_against(dir: &Path, previous: Option<&Index>, current: Index) -> Diff {
        let path = dir.join(SNAPSHOT_FILE);
        if let Some(previous) = previous {
            std::fs::write(&path, encode_snapshot(previous, "0.1.0").unwrap()).unwrap();
        }
        Diff::new(current, path, "0.1.0")
    }

    #[test]
    fn detects_modified_and_new() {
        let dir = tempfile::tempdir().unwrap();
        let previous = index(&[("A", "h1")], &["NS"]);
        let current = index(&[("A", "h2"), ("B", "h3")], &["NS", "NS2"]);
        let diff = diff_against(dir.path(), Some(&previous), current);

        assert!(diff.is_already_rendered());
        assert_eq!(diff.modified_classes(), ["A", "B"]);
        assert!(diff.removed_classes().is_empty());
        assert_eq!(diff.modified_namespaces(), ["NS2"]);
        assert!(diff.removed_namespaces().is_empty());
        assert!(!diff.is_empty());
    }

    #[test]
    fn detects_removed() {
        let dir = tempfile::tempdir().unwrap();
        let previous = index(&[("NS\\A", "h1"), ("Old\\B", "h2")], &["NS", "Old"]);
        let current = index(&[("NS\\A", "h1")], &["NS"]);
        let diff = diff_against(dir.path(), Some(&previous), current);

        assert_eq!(diff.removed_classes(), ["Old\\B"]);
        assert_eq!(diff.removed_namespaces(), ["Old"]);
        assert!(diff.modified_classes().is_empty());
        assert!(!diff.is_empty());
    }

    #[test]
    fn unchanged_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let previous = index(&[("A", "h1")], &[""]);
        let diff = diff_against(dir.path(), Some(&previous), previous.clone());
        assert!(diff.is_empty());
    }

    #[test]
    fn version_change_is_not_empty() {
        let dir = tempfile::tempdir().unwrap();
        let previous = index(&[("A", "h1")], &[""]);
        let current = Index::new(
            previous.classes().clone(),
            vec!["main".to_string(), "2.0".to_string()],
            vec![String::new()],
        );
        let diff = diff_against(dir.path(), Some(&previous), current);
        assert!(diff.are_versions_modified());
        assert!(!diff.is_empty());
    }

    #[test]
    fn missing_snapshot_means_never_rendered() {
        let dir = tempfile::tempdir().unwrap();
        let diff = diff_against(dir.path(), None, index(&[("A", "h1")], &[""]));
        assert!(!diff.is_already_rendered());
        assert_eq!(diff.modified_classes(), ["A"]);
        assert_eq!(diff.previous(), &Index::default());
    }

    #[test]
    fn corrupt_snapshot_means_never_rendered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SNAPSHOT_FILE);
        let mut bytes = encode_snapshot(&index(&[("A", "h1")], &[""]), "0.1.0").unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        std::fs::write(&path, &bytes).unwrap();
        assert!(!Diff::new(Index::default(), path.clone(), "0.1.0").is_already_rendered());

        std::fs::write(&path, b"garbage").unwrap();
        assert!(!Diff::new(Index::default(), path.clone(), "0.1.0").is_already_rendered());

        std::fs::write(&path, []).unwrap();
        assert!(!Diff::new(Index::default(), path, "0.1.0").is_already_rendered());
    }

    #[test]
    fn save_then_reload() {
        let dir = tempfile::tempdir().unwrap();
        let current = index(&[("A", "h1")], &[""]);
        let diff = diff_against(dir.path(), None, current.clone());
        diff.save().unwrap();

        let again = Diff::new(current, dir.path().join(SNAPSHOT_FILE), "0.1.0");
        assert!(again.is_already_rendered());
        assert!(again.is_empty());
    }

    #[test]
    fn namespaces_to_render_include_changed_class_owners() {
        let dir = tempfile::tempdir().unwrap();
        let previous = index(&[("NS\\A", "h1"), ("NS\\Gone", "h1"), ("Old\\X", "h1")], &["NS", "Old"]);
        let current = index(&[("NS\\A", "h2"), ("New\\B", "h3")], &["NS", "New"]);
        let diff = diff_against(dir.path(), Some(&previous), current);

        assert_eq!(diff.namespaces_to_render(false), ["NS", "New"]);
    }
}
