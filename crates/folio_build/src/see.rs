//! Resolution of `@see` references.

use std::rc::Rc;

use folio_model::{is_builtin_type, ClassEntity, SeeRef};

use crate::error::BuildError;
use crate::project::Project;

/// What a [`SeeRef`] points at.
#[derive(Debug, Clone, PartialEq)]
pub enum SeeTarget {
    /// A method of a project class, possibly inherited.
    Method {
        /// The class named by the reference.
        class: Rc<ClassEntity>,
        /// The method name.
        method: String,
    },
    /// A project class.
    Class(Rc<ClassEntity>),
    /// A builtin type such as `string`.
    Builtin(String),
    /// A class outside the project.
    External(String),
    /// Plain text or a URL, or a method that does not exist.
    Unresolved(String),
}

impl SeeTarget {
    /// Lower-case name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Method { .. } => "method",
            Self::Class(_) => "class",
            Self::Builtin(_) => "builtin",
            Self::External(_) => "external",
            Self::Unresolved(_) => "unresolved",
        }
    }

    /// What the reference points at: `Class::method`, a type name, or the
    /// reference text when unresolved.
    pub fn target(&self) -> String {
        match self {
            Self::Method { class, method } => format!("{}::{method}", class.info.name),
            Self::Class(class) => class.info.name.clone(),
            Self::Builtin(name) | Self::External(name) | Self::Unresolved(name) => name.clone(),
        }
    }
}

impl Project {
    /// Resolves a reference against the current registry.
    pub fn resolve_see(&self, see: &SeeRef) -> Result<SeeTarget, BuildError> {
        match (&see.class, &see.method) {
            (Some(class), Some(method)) => {
                let Some(entity) = self.load_class(class)? else {
                    return Ok(SeeTarget::Unresolved(see.reference.clone()));
                };
                if entity.methods_deep(self)?.contains_key(method) {
                    Ok(SeeTarget::Method {
                        class: entity,
                        method: method.clone(),
                    })
                } else {
                    Ok(SeeTarget::Unresolved(see.reference.clone()))
                }
            }
            (Some(class), None) if is_builtin_type(class) => Ok(SeeTarget::Builtin(class.clone())),
            (Some(class), None) => Ok(match self.load_class(class)? {
                Some(entity) => SeeTarget::Class(entity),
                None => SeeTarget::External(class.clone()),
            }),
            (None, _) => Ok(SeeTarget::Unresolved(see.reference.clone())),
        }
    }
}
