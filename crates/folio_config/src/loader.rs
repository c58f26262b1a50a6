//! Configuration file loading and validation.

use std::collections::HashSet;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::{FolioConfig, VERSION_PLACEHOLDER};

/// File name looked up in the project directory.
pub const CONFIG_FILE_NAME: &str = "folio.toml";

/// Loads and validates a `folio.toml` configuration from a project directory.
pub fn load_config(project_dir: &Path) -> Result<FolioConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<FolioConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `folio.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<FolioConfig, ConfigError> {
    let config: FolioConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and configuration values are consistent.
fn validate_config(config: &FolioConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.project.extensions.is_empty() {
        return Err(ConfigError::ValidationError(
            "project.extensions must not be empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for version in &config.versions {
        if version.name.is_empty() {
            return Err(ConfigError::MissingField("versions.name".to_string()));
        }
        if !seen.insert(version.name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate version '{}'",
                version.name
            )));
        }
    }

    if config.versions.len() > 1 {
        for (setting, value) in [
            ("project.build_dir", &config.project.build_dir),
            ("project.cache_dir", &config.project.cache_dir),
        ] {
            if !value.contains(VERSION_PLACEHOLDER) {
                return Err(ConfigError::MissingPlaceholder {
                    setting: setting.to_string(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
[project]
name = "acme"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.name, "acme");
        assert_eq!(config.project.title(), "acme");
        assert_eq!(config.project.source_dir, "src");
        assert_eq!(config.project.extensions, vec!["php"]);
        assert_eq!(config.project.build_dir, "build/%version%");
        assert_eq!(config.project.cache_dir, "cache/%version%");
        assert_eq!(config.project.theme, "json");
        assert!(config.project.include_parent_data);
        assert!(!config.project.simulate_namespaces);
        assert_eq!(config.project.exception_root, "Exception");
        assert!(config.project.source_url.is_none());
        assert!(config.parser.command.is_empty());

        let versions = config.effective_versions();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].name, "main");
        assert!(!versions[0].frozen);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[project]
name = "acme"
title = "Acme API"
source_dir = "lib"
extensions = ["php", "inc"]
build_dir = "out/%version%/html"
cache_dir = "/tmp/acme/%version%"
include_parent_data = false
simulate_namespaces = true
exception_root = "Throwable"
source_url = "https://example.com/acme/blob/%version%/%path%#L%line%"

[parser]
command = ["php", "bin/extract.php"]

[[versions]]
name = "1.0"
long_name = "1.0 (LTS)"
frozen = true

[[versions]]
name = "2.x"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.title(), "Acme API");
        assert_eq!(config.project.extensions.len(), 2);
        assert!(!config.project.include_parent_data);
        assert!(config.project.simulate_namespaces);
        assert_eq!(
            config.project.source_url.as_deref(),
            Some("https://example.com/acme/blob/%version%/%path%#L%line%")
        );
        assert_eq!(config.parser.command, vec!["php", "bin/extract.php"]);

        let versions = config.effective_versions();
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[0].long_name(), "1.0 (LTS)");
        assert!(versions[0].frozen);
        assert_eq!(versions[1].long_name(), "2.x");
    }

    #[test]
    fn missing_name_errors() {
        let err = load_config_from_str("[project]\nname = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn absent_project_table_errors() {
        let err = load_config_from_str("[parser]\ncommand = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn multiple_versions_require_placeholder() {
        let toml = r#"
[project]
name = "acme"
build_dir = "build"

[[versions]]
name = "1.0"

[[versions]]
name = "2.0"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        match err {
            ConfigError::MissingPlaceholder { setting } => {
                assert_eq!(setting, "project.build_dir")
            }
            other => panic!("expected MissingPlaceholder, got {other:?}"),
        }
    }

    #[test]
    fn single_version_without_placeholder_is_fine() {
        let toml = r#"
[project]
name = "acme"
build_dir = "build"
cache_dir = "cache"

[[versions]]
name = "1.0"
"#;
        assert!(load_config_from_str(toml).is_ok());
    }

    #[test]
    fn duplicate_versions_error() {
        let toml = r#"
[project]
name = "acme"

[[versions]]
name = "1.0"

[[versions]]
name = "1.0"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn empty_extensions_error() {
        let toml = "[project]\nname = \"acme\"\nextensions = []\n";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[project]\nname = \"acme\"\n").unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.project.name, "acme");

        let missing = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_config(missing.path()).unwrap_err(),
            ConfigError::IoError(_)
        ));
    }
}
