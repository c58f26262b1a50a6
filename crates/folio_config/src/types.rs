//! Configuration types deserialized from `folio.toml`.

use serde::Deserialize;

/// Placeholder substituted with the version name in directory templates.
pub const VERSION_PLACEHOLDER: &str = "%version%";

/// Placeholder substituted with a unit's path in the source URL template.
pub const PATH_PLACEHOLDER: &str = "%path%";

/// Placeholder substituted with a declaration line in the source URL template.
pub const LINE_PLACEHOLDER: &str = "%line%";

/// Name of the version used when none are configured.
pub const DEFAULT_VERSION: &str = "main";

/// The top-level configuration parsed from `folio.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct FolioConfig {
    /// Project metadata and build settings.
    pub project: ProjectSettings,
    /// External unit parser settings.
    #[serde(default)]
    pub parser: ParserConfig,
    /// Versions to build, oldest first.
    #[serde(default)]
    pub versions: Vec<VersionConfig>,
}

impl FolioConfig {
    /// Configured versions, or a single implicit `main` version when the
    /// file declares none.
    pub fn effective_versions(&self) -> Vec<VersionConfig> {
        if self.versions.is_empty() {
            vec![VersionConfig {
                name: DEFAULT_VERSION.to_string(),
                long_name: None,
                frozen: false,
            }]
        } else {
            self.versions.clone()
        }
    }
}

/// The `[project]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSettings {
    /// Project name.
    pub name: String,
    /// Title shown by themes; defaults to the name.
    #[serde(default)]
    pub title: Option<String>,
    /// Directory holding the sources to document.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,
    /// File extensions treated as source units.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Output directory template.
    #[serde(default = "default_build_dir")]
    pub build_dir: String,
    /// Cache directory template.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
    /// Theme name.
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Whether class pages include inherited members.
    #[serde(default = "default_true")]
    pub include_parent_data: bool,
    /// File `Foo_Bar_Baz` style classes under `Foo\Bar`.
    #[serde(default)]
    pub simulate_namespaces: bool,
    /// Ancestor name that makes a class an exception.
    #[serde(default = "default_exception_root")]
    pub exception_root: String,
    /// Link to a class in a hosted repository, such as
    /// `https://example.com/acme/blob/%version%/%path%#L%line%`.
    #[serde(default)]
    pub source_url: Option<String>,
}

impl ProjectSettings {
    /// The display title.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

fn default_source_dir() -> String {
    "src".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["php".to_string()]
}

fn default_build_dir() -> String {
    format!("build/{VERSION_PLACEHOLDER}")
}

fn default_cache_dir() -> String {
    format!("cache/{VERSION_PLACEHOLDER}")
}

fn default_theme() -> String {
    "json".to_string()
}

fn default_true() -> bool {
    true
}

fn default_exception_root() -> String {
    "Exception".to_string()
}

/// The `[parser]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParserConfig {
    /// Program and arguments of the external unit parser.
    #[serde(default)]
    pub command: Vec<String>,
}

/// One `[[versions]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionConfig {
    /// Short name, substituted into directory templates.
    pub name: String,
    /// Human readable name; defaults to `name`.
    #[serde(default)]
    pub long_name: Option<String>,
    /// Frozen versions are parsed and rendered once, then left alone.
    #[serde(default)]
    pub frozen: bool,
}

impl VersionConfig {
    /// The human readable name.
    pub fn long_name(&self) -> &str {
        self.long_name.as_deref().unwrap_or(&self.name)
    }
}
