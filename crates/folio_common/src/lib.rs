//! Shared foundational types used across the Folio documentation builder.
//!
//! This crate provides content hashing for change detection and helpers for
//! working with backslash-qualified class and namespace names.

#![warn(missing_docs)]

pub mod hash;
pub mod name;

pub use hash::{ContentHash, ParseHashError};
pub use name::{namespace_ancestors, normalize_class_name, short_name, NAMESPACE_SEPARATOR};
