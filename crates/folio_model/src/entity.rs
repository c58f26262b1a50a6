//! Documentation facts shared by every entity kind.

use std::collections::BTreeMap;

use folio_common::{normalize_class_name, short_name};
use serde::{Deserialize, Serialize};

/// Tag name to the ordered payloads of each occurrence of that tag.
///
/// `@throws \Foo when closed` appears as `"throws" => [["\Foo", "when closed"]]`.
pub type Tags = BTreeMap<String, Vec<Vec<String>>>;

/// Type names that never refer to a class.
const BUILTIN_TYPES: &[&str] = &[
    "", "scalar", "object", "boolean", "bool", "true", "false", "int", "integer", "array",
    "string", "mixed", "void", "null", "resource", "double", "float", "callable", "$this",
];

/// Returns `true` if `hint` is a builtin type rather than a class reference.
pub fn is_builtin_type(hint: &str) -> bool {
    let lower = hint.to_ascii_lowercase();
    BUILTIN_TYPES.contains(&lower.as_str())
}

/// One member of a union type hint, as written in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    /// A builtin type name or a class name.
    pub name: String,
    /// `Foo[]` rather than `Foo`.
    #[serde(default)]
    pub array: bool,
}

impl Hint {
    /// Creates a hint.
    pub fn new(name: impl Into<String>, array: bool) -> Self {
        Self {
            name: name.into(),
            array,
        }
    }

    /// Classifies the hint as builtin or class reference.
    pub fn resolve(&self) -> ResolvedHint {
        if is_builtin_type(&self.name) {
            ResolvedHint::Builtin {
                name: self.name.clone(),
                array: self.array,
            }
        } else {
            ResolvedHint::Class {
                name: normalize_class_name(&self.name).to_string(),
                array: self.array,
            }
        }
    }
}

/// A hint after classification. Class names are looked up through the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedHint {
    /// A builtin type such as `int` or `mixed`.
    Builtin {
        /// The type name.
        name: String,
        /// Array of this type.
        array: bool,
    },
    /// A class, interface or trait, by fully qualified name.
    Class {
        /// Fully qualified class name without a leading separator.
        name: String,
        /// Array of this type.
        array: bool,
    },
}

impl ResolvedHint {
    /// The type or class name.
    pub fn name(&self) -> &str {
        match self {
            Self::Builtin { name, .. } | Self::Class { name, .. } => name,
        }
    }

    /// Whether the hint names a class.
    pub fn is_class(&self) -> bool {
        matches!(self, Self::Class { .. })
    }

    /// Whether the hint is an array of its type.
    pub fn is_array(&self) -> bool {
        match self {
            Self::Builtin { array, .. } | Self::Class { array, .. } => *array,
        }
    }
}

/// A raw `@see` reference. The target is resolved lazily against the project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeeRef {
    /// The reference text as written.
    pub reference: String,
    /// Free text following the reference.
    #[serde(default)]
    pub description: String,
    /// Class part of the reference, if it names one.
    #[serde(default)]
    pub class: Option<String>,
    /// Method part of the reference, if it names one.
    #[serde(default)]
    pub method: Option<String>,
}

/// Facts common to classes, methods, properties, constants and parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityInfo {
    /// Unique within the immediate parent scope.
    pub name: String,
    /// Declaration line.
    pub line: u32,
    /// First sentence of the doc comment.
    #[serde(default)]
    pub short_desc: String,
    /// Remainder of the doc comment.
    #[serde(default)]
    pub long_desc: String,
    /// Union type, in declaration order.
    #[serde(default)]
    pub hint: Vec<Hint>,
    /// Description attached to the type (`@return Foo the client`).
    #[serde(default)]
    pub hint_desc: String,
    /// Doc tags by name.
    #[serde(default)]
    pub tags: Tags,
    /// Raw `@see` references.
    #[serde(default)]
    pub see: Vec<SeeRef>,
}

impl EntityInfo {
    /// Creates the facts for an entity declared at `line`.
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            line,
            ..Self::default()
        }
    }
}

/// Read access to the documentation facts of an entity.
pub trait Documented {
    /// The underlying facts.
    fn info(&self) -> &EntityInfo;

    /// The entity name.
    fn name(&self) -> &str {
        &self.info().name
    }

    /// Declaration line.
    fn line(&self) -> u32 {
        self.info().line
    }

    /// First sentence of the doc comment.
    fn short_desc(&self) -> &str {
        &self.info().short_desc
    }

    /// Remainder of the doc comment.
    fn long_desc(&self) -> &str {
        &self.info().long_desc
    }

    /// Payloads of every occurrence of tag `name`, or an empty slice.
    fn tags(&self, name: &str) -> &[Vec<String>] {
        self.info().tags.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `@deprecated` payloads.
    fn deprecated(&self) -> &[Vec<String>] {
        self.tags("deprecated")
    }

    /// `@todo` payloads.
    fn todo(&self) -> &[Vec<String>] {
        self.tags("todo")
    }

    /// Whether any type hint was declared.
    fn has_hint(&self) -> bool {
        !self.info().hint.is_empty()
    }

    /// Hints classified as builtin types or class references.
    fn hints(&self) -> Vec<ResolvedHint> {
        self.info().hint.iter().map(Hint::resolve).collect()
    }

    /// Compact rendering such as `Client|string[]`, using short class names.
    fn hint_as_string(&self) -> String {
        self.hints()
            .iter()
            .map(|hint| {
                let name = match hint {
                    ResolvedHint::Class { name, .. } => short_name(name),
                    ResolvedHint::Builtin { name, .. } => name.as_str(),
                };
                if hint.is_array() {
                    format!("{name}[]")
                } else {
                    name.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("|")
    }
}
