//! Error types for the build pipeline.

use std::path::PathBuf;

use folio_config::ConfigError;
use folio_store::StoreError;

/// Errors that abort a parse or render run.
///
/// Unit parse errors are not represented here: they are collected per unit,
/// reported through the observer and counted by the [`Parser`](crate::Parser).
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The store failed for a reason other than a missing class.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An I/O error occurred on a build, cache or source path.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Invalid setup detected before any work started.
    #[error("configuration error: {0}")]
    Config(String),

    /// A theme failed to produce a page.
    #[error("render error: {0}")]
    Render(String),

    /// The unit parser could not be run at all.
    #[error("parser error: {0}")]
    Parser(String),
}

impl From<ConfigError> for BuildError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Builds a `map_err` adapter that attaches `path` to an I/O error.
pub(crate) fn io_error(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> BuildError {
    let path = path.into();
    move |source| BuildError::Io { path, source }
}
