//! Namespace indices derived from the class registry.
//!
//! The index is a cache: everything in it can be recomputed from the set of
//! registered classes. Removal re-derives the namespace sets from the
//! remaining entries, so any sequence of inserts and removals leaves the
//! index equal to one built from scratch.

use std::collections::{BTreeMap, BTreeSet};

use folio_common::{namespace_ancestors, NAMESPACE_SEPARATOR};

/// How a class is filed within its namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    /// Classes and traits.
    Class,
    /// Interfaces.
    Interface,
    /// Classes descending from the exception root.
    Exception,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    namespace: String,
    kind: ClassKind,
}

/// Namespace to class-name mappings for one version of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceIndex {
    simulate: bool,
    entries: BTreeMap<String, Entry>,
    namespaces: BTreeSet<String>,
    classes: BTreeMap<String, BTreeSet<String>>,
    interfaces: BTreeMap<String, BTreeSet<String>>,
    exceptions: BTreeMap<String, BTreeSet<String>>,
    simulated: BTreeMap<String, BTreeSet<String>>,
}

/// The namespace `Foo_Bar_Baz` style names are filed under: `Foo\Bar`.
/// Names without an underscore belong to the global namespace.
pub fn simulated_namespace(name: &str) -> String {
    match name.rfind('_') {
        Some(pos) => name[..pos].replace('_', "\\"),
        None => String::new(),
    }
}

/// The namespace part of a fully qualified class name.
pub fn namespace_of(name: &str) -> &str {
    name.rsplit_once(NAMESPACE_SEPARATOR)
        .map_or("", |(namespace, _)| namespace)
}

impl NamespaceIndex {
    /// Creates an empty index. With `simulate`, underscore-separated class
    /// names are additionally filed under simulated namespaces.
    pub fn new(simulate: bool) -> Self {
        Self {
            simulate,
            ..Self::default()
        }
    }

    /// Files a class, replacing any previous filing of the same name.
    pub fn insert(&mut self, name: &str, namespace: &str, kind: ClassKind) {
        if self.entries.contains_key(name) {
            self.remove(name);
        }
        self.entries.insert(
            name.to_string(),
            Entry {
                namespace: namespace.to_string(),
                kind,
            },
        );
        self.kind_map(kind)
            .entry(namespace.to_string())
            .or_default()
            .insert(name.to_string());
        Self::add_namespace(&mut self.namespaces, namespace);

        if self.simulate {
            let simulated = simulated_namespace(name);
            for ancestor in namespace_ancestors(&simulated) {
                self.simulated.entry(ancestor.to_string()).or_default();
            }
            self.simulated
                .entry(simulated)
                .or_default()
                .insert(name.to_string());
        }
    }

    /// Drops a class from every mapping. Returns whether it was filed.
    pub fn remove(&mut self, name: &str) -> bool {
        let Some(entry) = self.entries.remove(name) else {
            return false;
        };
        let map = self.kind_map(entry.kind);
        if let Some(names) = map.get_mut(&entry.namespace) {
            names.remove(name);
            if names.is_empty() {
                map.remove(&entry.namespace);
            }
        }

        self.namespaces.clear();
        for entry in self.entries.values() {
            Self::add_namespace(&mut self.namespaces, &entry.namespace);
        }

        if self.simulate {
            if let Some(names) = self.simulated.get_mut(&simulated_namespace(name)) {
                names.remove(name);
            }
            self.simulated.retain(|_, names| !names.is_empty());
            let filled: Vec<String> = self.simulated.keys().cloned().collect();
            for namespace in &filled {
                for ancestor in namespace_ancestors(namespace) {
                    self.simulated.entry(ancestor.to_string()).or_default();
                }
            }
        }
        true
    }

    fn add_namespace(namespaces: &mut BTreeSet<String>, namespace: &str) {
        namespaces.insert(namespace.to_string());
        for ancestor in namespace_ancestors(namespace) {
            namespaces.insert(ancestor.to_string());
        }
    }

    fn kind_map(&mut self, kind: ClassKind) -> &mut BTreeMap<String, BTreeSet<String>> {
        match kind {
            ClassKind::Class => &mut self.classes,
            ClassKind::Interface => &mut self.interfaces,
            ClassKind::Exception => &mut self.exceptions,
        }
    }

    /// Every namespace holding a class, plus their ancestors, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        self.namespaces.iter().cloned().collect()
    }

    /// Simulated namespaces, sorted. Empty unless simulation is on.
    pub fn simulated_namespaces(&self) -> Vec<String> {
        self.simulated.keys().cloned().collect()
    }

    /// False when every class lives in the global namespace.
    pub fn has_namespaces(&self) -> bool {
        self.namespaces.iter().any(|n| !n.is_empty())
    }

    /// Whether `namespace` is known.
    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.namespaces.contains(namespace)
    }

    /// Regular classes (and traits) of a namespace, sorted.
    pub fn classes(&self, namespace: &str) -> Vec<String> {
        Self::names(&self.classes, namespace)
    }

    /// Interfaces of a namespace, sorted.
    pub fn interfaces(&self, namespace: &str) -> Vec<String> {
        Self::names(&self.interfaces, namespace)
    }

    /// Exceptions of a namespace, sorted.
    pub fn exceptions(&self, namespace: &str) -> Vec<String> {
        Self::names(&self.exceptions, namespace)
    }

    /// Every class of a namespace regardless of kind, sorted.
    pub fn all_classes(&self, namespace: &str) -> Vec<String> {
        let mut names = self.classes(namespace);
        names.extend(self.interfaces(namespace));
        names.extend(self.exceptions(namespace));
        names.sort();
        names
    }

    /// Classes filed under a simulated namespace, sorted.
    pub fn simulated_classes(&self, namespace: &str) -> Vec<String> {
        Self::names(&self.simulated, namespace)
    }

    /// All interfaces of the project, sorted.
    pub fn all_interfaces(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, e)| e.kind == ClassKind::Interface)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Direct children of `parent`; `""` lists the top-level namespaces.
    pub fn sub_namespaces(&self, parent: &str) -> Vec<String> {
        Self::children(self.namespaces.iter(), parent)
    }

    /// Direct children of a simulated namespace.
    pub fn simulated_sub_namespaces(&self, parent: &str) -> Vec<String> {
        Self::children(self.simulated.keys(), parent)
    }

    fn children<'a>(namespaces: impl Iterator<Item = &'a String>, parent: &str) -> Vec<String> {
        let prefix = if parent.is_empty() {
            String::new()
        } else {
            format!("{parent}{NAMESPACE_SEPARATOR}")
        };
        namespaces
            .filter(|ns| ns.as_str() != parent)
            .filter_map(|ns| {
                let rest = ns.strip_prefix(&prefix)?;
                (!rest.is_empty() && !rest.contains(NAMESPACE_SEPARATOR)).then(|| ns.clone())
            })
            .collect()
    }

    fn names(map: &BTreeMap<String, BTreeSet<String>>, namespace: &str) -> Vec<String> {
        map.get(namespace)
            .map(|names| names.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(simulate: bool) -> NamespaceIndex {
        let mut index = NamespaceIndex::new(simulate);
        index.insert("Acme\\Http\\Client", "Acme\\Http", ClassKind::Class);
        index.insert("Acme\\Http\\Sender", "Acme\\Http", ClassKind::Interface);
        index.insert("Acme\\Http\\Timeout", "Acme\\Http", ClassKind::Exception);
        index.insert("Acme\\Util", "Acme", ClassKind::Class);
        index.insert("Legacy_Db_Table", "", ClassKind::Class);
        index
    }

    #[test]
    fn files_classes_by_kind_and_namespace() {
        let index = sample(false);
        assert_eq!(index.namespaces(), ["", "Acme", "Acme\\Http"]);
        assert_eq!(index.classes("Acme\\Http"), ["Acme\\Http\\Client"]);
        assert_eq!(index.interfaces("Acme\\Http"), ["Acme\\Http\\Sender"]);
        assert_eq!(index.exceptions("Acme\\Http"), ["Acme\\Http\\Timeout"]);
        assert_eq!(index.all_classes("Acme\\Http").len(), 3);
        assert_eq!(index.all_interfaces(), ["Acme\\Http\\Sender"]);
        assert!(index.has_namespaces());
        assert!(index.classes("Nope").is_empty());
    }

    #[test]
    fn ancestors_are_registered() {
        let mut index = NamespaceIndex::new(false);
        index.insert("A\\B\\C\\D", "A\\B\\C", ClassKind::Class);
        assert_eq!(index.namespaces(), ["A", "A\\B", "A\\B\\C"]);
        assert!(index.has_namespace("A\\B"));
    }

    #[test]
    fn global_only_has_no_namespaces() {
        let mut index = NamespaceIndex::new(false);
        index.insert("Foo", "", ClassKind::Class);
        assert!(!index.has_namespaces());
    }

    #[test]
    fn sub_namespaces_are_direct_children() {
        let index = sample(false);
        assert_eq!(index.sub_namespaces(""), ["Acme"]);
        assert_eq!(index.sub_namespaces("Acme"), ["Acme\\Http"]);
        assert!(index.sub_namespaces("Acme\\Http").is_empty());
    }

    #[test]
    fn simulated_namespaces() {
        let index = sample(true);
        assert_eq!(simulated_namespace("Legacy_Db_Table"), "Legacy\\Db");
        assert_eq!(simulated_namespace("Plain"), "");
        assert!(index.simulated_namespaces().contains(&"Legacy".to_string()));
        assert_eq!(index.simulated_classes("Legacy\\Db"), ["Legacy_Db_Table"]);
        assert!(index.simulated_classes("Legacy").is_empty());
        assert_eq!(index.simulated_sub_namespaces("Legacy"), ["Legacy\\Db"]);
    }

    #[test]
    fn namespace_of_name() {
        assert_eq!(namespace_of("Acme\\Http\\Client"), "Acme\\Http");
        assert_eq!(namespace_of("Client"), "");
    }

    #[test]
    fn incremental_updates_match_rebuild() {
        let mut incremental = sample(true);
        incremental.remove("Acme\\Http\\Timeout");
        incremental.remove("Legacy_Db_Table");
        incremental.insert("Acme\\Http\\Client", "Acme\\Http", ClassKind::Exception);
        incremental.insert("Other_Thing", "", ClassKind::Class);
        incremental.remove("Acme\\Util");
        assert!(!incremental.remove("Acme\\Util"));

        let mut rebuilt = NamespaceIndex::new(true);
        rebuilt.insert("Acme\\Http\\Sender", "Acme\\Http", ClassKind::Interface);
        rebuilt.insert("Other_Thing", "", ClassKind::Class);
        rebuilt.insert("Acme\\Http\\Client", "Acme\\Http", ClassKind::Exception);

        assert_eq!(incremental, rebuilt);
    }

    #[test]
    fn removing_last_class_drops_namespace() {
        let mut index = NamespaceIndex::new(false);
        index.insert("A\\B\\C", "A\\B", ClassKind::Class);
        index.remove("A\\B\\C");
        assert!(index.namespaces().is_empty());
        assert_eq!(index, NamespaceIndex::new(false));
    }
}
