//! The in-memory documentation model: classes and their members.
//!
//! Entities reference each other by name, never by pointer. A [`ClassEntity`]
//! names its parent, interfaces and traits; walking those relationships goes
//! through a [`ClassResolver`] (the owning project registry), which keeps the
//! graph free of ownership cycles and lets references be loaded lazily.

#![warn(missing_docs)]

pub mod class;
pub mod entity;
pub mod inherit;
pub mod member;
pub mod modifiers;

pub use class::{ClassCategory, ClassEntity};
pub use entity::{is_builtin_type, Documented, EntityInfo, Hint, ResolvedHint, SeeRef, Tags};
pub use inherit::{ClassResolver, Member};
pub use member::{ConstantEntity, ExceptionRef, MethodEntity, ParameterEntity, PropertyEntity};
pub use modifiers::Modifiers;
