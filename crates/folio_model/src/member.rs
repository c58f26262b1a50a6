//! Class members: methods, parameters, properties and constants.

use folio_common::normalize_class_name;
use serde::{Deserialize, Serialize};

use crate::entity::{Documented, EntityInfo};
use crate::modifiers::Modifiers;

/// An exception a method documents as thrown. The class is a name, resolved
/// through the project when needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionRef {
    /// Exception class name.
    pub class: String,
    /// When it is thrown.
    #[serde(default)]
    pub description: String,
}

/// A method parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterEntity {
    /// Shared documentation facts.
    pub info: EntityInfo,
    /// Parameter modifiers (promoted constructor parameters carry a visibility).
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Default value expression as written.
    #[serde(default)]
    pub default: Option<String>,
    /// Collects the remaining arguments.
    #[serde(default)]
    pub variadic: bool,
    /// Passed by reference.
    #[serde(default)]
    pub by_ref: bool,
}

impl ParameterEntity {
    /// Creates a parameter declared at `line`.
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        Self {
            info: EntityInfo::new(name, line),
            ..Self::default()
        }
    }
}

impl Documented for ParameterEntity {
    fn info(&self) -> &EntityInfo {
        &self.info
    }
}

/// A method declared on a class, interface or trait.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodEntity {
    /// Shared documentation facts.
    pub info: EntityInfo,
    #[serde(default)]
    modifiers: Modifiers,
    /// Returns by reference.
    #[serde(default)]
    pub by_ref: bool,
    /// Parameters in declaration order; names are unique.
    #[serde(default)]
    pub parameters: Vec<ParameterEntity>,
    /// Documented `@throws`.
    #[serde(default)]
    pub exceptions: Vec<ExceptionRef>,
    /// Doc comment problems found while parsing this method.
    #[serde(default)]
    pub errors: Vec<String>,
}

impl MethodEntity {
    /// Creates a public method declared at `line`.
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        Self {
            info: EntityInfo::new(name, line),
            modifiers: Modifiers::PUBLIC,
            ..Self::default()
        }
    }

    /// Sets the modifiers; no visibility bit means public.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers.with_default_visibility();
    }

    /// The modifier bitset.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers.with_default_visibility()
    }

    /// Declared `public`, or declared without a visibility.
    pub fn is_public(&self) -> bool {
        self.modifiers().contains(Modifiers::PUBLIC)
    }

    /// Declared `protected`.
    pub fn is_protected(&self) -> bool {
        self.modifiers().contains(Modifiers::PROTECTED)
    }

    /// Declared `private`.
    pub fn is_private(&self) -> bool {
        self.modifiers().contains(Modifiers::PRIVATE)
    }

    /// Declared `static`.
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }

    /// Declared `abstract`.
    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(Modifiers::ABSTRACT)
    }

    /// Declared `final`.
    pub fn is_final(&self) -> bool {
        self.modifiers.contains(Modifiers::FINAL)
    }

    /// Adds a parameter, replacing any existing parameter with the same name.
    pub fn add_parameter(&mut self, parameter: ParameterEntity) {
        match self
            .parameters
            .iter_mut()
            .find(|p| p.info.name == parameter.info.name)
        {
            Some(existing) => *existing = parameter,
            None => self.parameters.push(parameter),
        }
    }

    /// Looks a parameter up by name.
    pub fn parameter(&self, name: &str) -> Option<&ParameterEntity> {
        self.parameters.iter().find(|p| p.info.name == name)
    }

    /// Looks a parameter up by position.
    pub fn parameter_at(&self, index: usize) -> Option<&ParameterEntity> {
        self.parameters.get(index)
    }

    /// Names of the documented exception classes.
    pub fn exception_classes(&self) -> impl Iterator<Item = &str> {
        self.exceptions
            .iter()
            .map(|e| normalize_class_name(&e.class))
    }
}

impl Documented for MethodEntity {
    fn info(&self) -> &EntityInfo {
        &self.info
    }
}

/// A property declared on a class or trait.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyEntity {
    /// Shared documentation facts.
    pub info: EntityInfo,
    #[serde(default)]
    modifiers: Modifiers,
    /// Default value expression as written.
    #[serde(default)]
    pub default: Option<String>,
    /// Doc comment problems found while parsing this property.
    #[serde(default)]
    pub errors: Vec<String>,
}

impl PropertyEntity {
    /// Creates a public property declared at `line`.
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        Self {
            info: EntityInfo::new(name, line),
            modifiers: Modifiers::PUBLIC,
            ..Self::default()
        }
    }

    /// Sets the modifiers; no visibility bit means public.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers.with_default_visibility();
    }

    /// The modifier bitset.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers.with_default_visibility()
    }

    /// Declared `public`, or declared without a visibility.
    pub fn is_public(&self) -> bool {
        self.modifiers().contains(Modifiers::PUBLIC)
    }

    /// Declared `protected`.
    pub fn is_protected(&self) -> bool {
        self.modifiers().contains(Modifiers::PROTECTED)
    }

    /// Declared `private`.
    pub fn is_private(&self) -> bool {
        self.modifiers().contains(Modifiers::PRIVATE)
    }

    /// Declared `static`.
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }

    /// Declared `final`.
    pub fn is_final(&self) -> bool {
        self.modifiers.contains(Modifiers::FINAL)
    }
}

impl Documented for PropertyEntity {
    fn info(&self) -> &EntityInfo {
        &self.info
    }
}

/// A class constant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstantEntity {
    /// Shared documentation facts.
    pub info: EntityInfo,
}

impl ConstantEntity {
    /// Creates a constant declared at `line`.
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        Self {
            info: EntityInfo::new(name, line),
        }
    }
}

impl Documented for ConstantEntity {
    fn info(&self) -> &EntityInfo {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_without_visibility_is_public() {
        let mut m = MethodEntity::new("run", 10);
        m.set_modifiers(Modifiers::STATIC);
        assert!(m.is_public());
        assert!(m.is_static());
        assert!(!m.is_private());
    }

    #[test]
    fn deserialized_member_defaults_to_public() {
        let p: PropertyEntity =
            serde_json::from_str(r#"{"info":{"name":"x","line":1}}"#).unwrap();
        assert!(p.is_public());
    }

    #[test]
    fn parameters_by_name_and_position() {
        let mut m = MethodEntity::new("send", 4);
        m.add_parameter(ParameterEntity::new("request", 4));
        m.add_parameter(ParameterEntity::new("options", 4));
        let mut replacement = ParameterEntity::new("request", 5);
        replacement.variadic = true;
        m.add_parameter(replacement);

        assert_eq!(m.parameters.len(), 2);
        assert!(m.parameter("request").unwrap().variadic);
        assert_eq!(m.parameter_at(1).unwrap().info.name, "options");
        assert!(m.parameter_at(2).is_none());
    }

    #[test]
    fn exception_names_are_normalized() {
        let mut m = MethodEntity::new("open", 1);
        m.exceptions.push(ExceptionRef {
            class: "\\Acme\\IoException".to_string(),
            description: "when the file is missing".to_string(),
        });
        assert_eq!(m.exception_classes().collect::<Vec<_>>(), vec!["Acme\\IoException"]);
    }
}
