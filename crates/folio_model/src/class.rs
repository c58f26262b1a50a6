//! Classes, interfaces and traits.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use folio_common::{normalize_class_name, short_name, ContentHash};
use serde::{Deserialize, Serialize};

use crate::entity::{Documented, EntityInfo};
use crate::member::{ConstantEntity, MethodEntity, PropertyEntity};
use crate::modifiers::Modifiers;

/// What kind of type a [`ClassEntity`] declares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassCategory {
    /// A concrete or abstract class.
    #[default]
    Class,
    /// An interface.
    Interface,
    /// A trait.
    Trait,
}

impl ClassCategory {
    /// Lowercase keyword, as used by themes.
    pub fn name(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Trait => "trait",
        }
    }
}

impl fmt::Display for ClassCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A class produced by parsing one source unit of the project.
///
/// Relationships to other classes (parent, interfaces, traits) are stored as
/// fully qualified names and resolved through a
/// [`ClassResolver`](crate::ClassResolver). Member maps are keyed by member
/// name, so names are unique per class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassEntity {
    /// Shared documentation facts. `info.name` is fully qualified.
    pub info: EntityInfo,
    /// Declaring namespace; `""` is the global namespace.
    #[serde(default)]
    pub namespace: String,
    /// Class, interface or trait.
    #[serde(default)]
    pub category: ClassCategory,
    /// Only `ABSTRACT` and `FINAL` are meaningful here.
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    interfaces: Vec<String>,
    #[serde(default)]
    traits: Vec<String>,
    #[serde(default)]
    methods: BTreeMap<String, MethodEntity>,
    #[serde(default)]
    properties: BTreeMap<String, PropertyEntity>,
    #[serde(default)]
    constants: BTreeMap<String, ConstantEntity>,
    /// Hash of the source unit that produced this class.
    #[serde(default)]
    pub hash: Option<ContentHash>,
    /// Absolute path of the source unit.
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Path relative to the source root, filled by a post-parse visitor.
    #[serde(default)]
    pub relative_file: Option<String>,
    /// `use` aliases in scope where the class was declared.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    /// Doc comment problems found while parsing the class.
    #[serde(default)]
    pub errors: Vec<String>,
    /// Set when the entity was read back from a store rather than parsed in
    /// the current run. Never persisted.
    #[serde(skip)]
    pub from_cache: bool,
}

impl ClassEntity {
    /// Creates an empty class declared at `line`. Leading separators are stripped.
    pub fn new(name: &str, line: u32) -> Self {
        Self {
            info: EntityInfo::new(normalize_class_name(name), line),
            ..Self::default()
        }
    }

    /// Unqualified name.
    pub fn short_name(&self) -> &str {
        short_name(&self.info.name)
    }

    /// `class`, `interface` or `trait`.
    pub fn category_name(&self) -> &'static str {
        self.category.name()
    }

    /// Sets the namespace, stripping leading separators.
    pub fn set_namespace(&mut self, namespace: &str) {
        self.namespace = normalize_class_name(namespace).to_string();
    }

    /// Declared with `interface`.
    pub fn is_interface(&self) -> bool {
        self.category == ClassCategory::Interface
    }

    /// Declared with `trait`.
    pub fn is_trait(&self) -> bool {
        self.category == ClassCategory::Trait
    }

    /// Declared `abstract`.
    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(Modifiers::ABSTRACT)
    }

    /// Declared `final`.
    pub fn is_final(&self) -> bool {
        self.modifiers.contains(Modifiers::FINAL)
    }

    /// Name of the direct parent class.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Sets the parent class name. An empty name clears it.
    pub fn set_parent(&mut self, parent: Option<&str>) {
        self.parent = parent
            .map(normalize_class_name)
            .filter(|p| !p.is_empty())
            .map(str::to_string);
    }

    /// Directly implemented (or, for interfaces, extended) interface names.
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    /// Adds an interface name unless already present.
    pub fn add_interface(&mut self, interface: &str) {
        let interface = normalize_class_name(interface);
        if !self.interfaces.iter().any(|i| i == interface) {
            self.interfaces.push(interface.to_string());
        }
    }

    /// Directly used trait names.
    pub fn traits(&self) -> &[String] {
        &self.traits
    }

    /// Adds a trait name unless already present.
    pub fn add_trait(&mut self, name: &str) {
        let name = normalize_class_name(name);
        if !self.traits.iter().any(|t| t == name) {
            self.traits.push(name.to_string());
        }
    }

    /// Adds a method, replacing any method of the same name.
    pub fn add_method(&mut self, method: MethodEntity) {
        self.methods.insert(method.info.name.clone(), method);
    }

    /// A method declared on this class itself.
    pub fn method(&self, name: &str) -> Option<&MethodEntity> {
        self.methods.get(name)
    }

    /// Methods declared on this class itself, by name.
    pub fn methods(&self) -> &BTreeMap<String, MethodEntity> {
        &self.methods
    }

    /// Adds a property, replacing any property of the same name.
    pub fn add_property(&mut self, property: PropertyEntity) {
        self.properties.insert(property.info.name.clone(), property);
    }

    /// Properties declared on this class itself, by name.
    pub fn properties(&self) -> &BTreeMap<String, PropertyEntity> {
        &self.properties
    }

    /// Adds a constant, replacing any constant of the same name.
    pub fn add_constant(&mut self, constant: ConstantEntity) {
        self.constants.insert(constant.info.name.clone(), constant);
    }

    /// Constants declared on this class itself, by name.
    pub fn constants(&self) -> &BTreeMap<String, ConstantEntity> {
        &self.constants
    }

    /// Mutable access to own methods, for post-parse visitors.
    pub fn methods_mut(&mut self) -> impl Iterator<Item = &mut MethodEntity> {
        self.methods.values_mut()
    }

    /// Mutable access to own properties, for post-parse visitors.
    pub fn properties_mut(&mut self) -> impl Iterator<Item = &mut PropertyEntity> {
        self.properties.values_mut()
    }
}

impl Documented for ClassEntity {
    fn info(&self) -> &EntityInfo {
        &self.info
    }
}

impl fmt::Display for ClassEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.info.name)
    }
}
