//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `folio.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing from the configuration.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A directory template lacks the version placeholder although several
    /// versions are configured, so every version would share one directory.
    #[error("{setting} must contain the %version% placeholder when several versions are configured")]
    MissingPlaceholder {
        /// The offending setting, e.g. `project.build_dir`.
        setting: String,
    },

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// The configured theme is not available.
    #[error("unknown theme '{0}'")]
    UnknownTheme(String),
}
