//! The incremental documentation pipeline.
//!
//! A [`Project`] holds the class registry of one [`Version`] at a time. The
//! [`Parser`] driver hashes every source unit, skips units whose hash is
//! already known, hands the rest to an external [`UnitParser`] and commits the
//! resulting classes to the project and its store. The [`Renderer`] compares a
//! fresh [`Index`] of the project with the snapshot left by the previous
//! render and only regenerates what the resulting [`Diff`] reports.

#![warn(missing_docs)]

pub mod diff;
pub mod error;
pub mod event;
pub mod index;
pub mod lazy;
pub mod namespace;
pub mod parser;
pub mod project;
pub mod renderer;
pub mod see;
pub mod source;
pub mod theme;
pub mod transaction;
pub mod version;
pub mod visitor;

pub use diff::Diff;
pub use error::BuildError;
pub use event::{BuildEvent, BuildObserver, RenderSection};
pub use index::Index;
pub use lazy::LazyClass;
pub use namespace::NamespaceIndex;
pub use parser::{Parser, UnitOutput, UnitParser};
pub use project::{BuildSettings, Project};
pub use renderer::Renderer;
pub use see::SeeTarget;
pub use source::{DirectorySource, MemorySource, UnitSource};
pub use theme::{JsonTheme, Page, Theme, ThemeSet};
pub use transaction::Transaction;
pub use version::{Version, VersionCollection};
pub use visitor::{ClassVisitor, SourceRootVisitor};
