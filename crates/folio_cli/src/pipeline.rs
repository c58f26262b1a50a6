//! Shared setup for the build commands: locating the project, loading its
//! configuration and wiring the parse and render drivers.

use std::path::{Path, PathBuf};

use folio_build::{
    BuildSettings, DirectorySource, Parser, Project, Renderer, SourceRootVisitor, ThemeSet,
    VersionCollection,
};
use folio_config::{FolioConfig, CONFIG_FILE_NAME};
use folio_store::JsonStore;

use crate::unit_parser::CommandUnitParser;
use crate::{BuildArgs, GlobalArgs};

/// Walks up from `start` looking for the nearest directory containing `folio.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE_NAME).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE_NAME} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Loads the configuration named by `--config`, or the nearest `folio.toml`.
///
/// Returns the configuration and the directory relative paths are resolved
/// against.
pub fn load_project_config(
    global: &GlobalArgs,
) -> Result<(FolioConfig, PathBuf), Box<dyn std::error::Error>> {
    match global.config {
        Some(ref config_path) => {
            let path = PathBuf::from(config_path);
            if path.is_file() {
                let root = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                Ok((folio_config::load_config_file(&path)?, root))
            } else {
                Ok((folio_config::load_config(&path)?, path))
            }
        }
        None => {
            let root = find_project_root(&std::env::current_dir()?)?;
            Ok((folio_config::load_config(&root)?, root))
        }
    }
}

/// Everything a build command needs.
pub struct Session {
    /// The loaded configuration.
    pub config: FolioConfig,
    /// Directory holding the configuration.
    pub root: PathBuf,
    /// The project, positioned on its first version.
    pub project: Project,
}

impl Session {
    /// Loads the configuration and creates the project.
    pub fn open(args: &BuildArgs, global: &GlobalArgs) -> Result<Self, Box<dyn std::error::Error>> {
        let (config, root) = load_project_config(global)?;
        Self::from_config(config, root, args)
    }

    /// Creates the project for an already loaded configuration.
    pub fn from_config(
        config: FolioConfig,
        root: PathBuf,
        args: &BuildArgs,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut versions = VersionCollection::from_config(&config)?;
        if let Some(ref name) = args.only_version {
            versions = versions.only(name)?;
        }
        let settings = BuildSettings::from_config(&config, &root);
        // Fail before any work is done.
        ThemeSet::builtin().get(&settings.theme)?;
        let project = Project::new(Box::new(JsonStore::new()), versions, settings)?;
        Ok(Self {
            config,
            root,
            project,
        })
    }

    /// The source directory of the project.
    pub fn source_dir(&self) -> PathBuf {
        self.root.join(&self.config.project.source_dir)
    }

    /// A parse driver over the source directory.
    pub fn parser(&self) -> Result<Parser, Box<dyn std::error::Error>> {
        let source_dir = self.source_dir();
        let source = DirectorySource::new(&source_dir, &self.config.project.extensions);
        let unit_parser = CommandUnitParser::new(&self.config.parser.command)?;
        Ok(Parser::new(Box::new(source), Box::new(unit_parser))
            .with_visitor(Box::new(SourceRootVisitor::new(source_dir))))
    }

    /// A render driver with the built-in themes.
    pub fn renderer(&self) -> Renderer {
        Renderer::new(ThemeSet::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CONFIG: &str = r#"
[project]
name = "acme"
theme = "json"

[parser]
command = ["extract-classes", "--json"]

[[versions]]
name = "1.x"
frozen = true

[[versions]]
name = "2.x"
"#;

    fn global(config: Option<String>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config,
            ignore_errors: false,
        }
    }

    #[test]
    fn find_root_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), CONFIG).unwrap();
        let nested = dir.path().join("src/App/Http");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested).unwrap(), dir.path());
    }

    #[test]
    fn find_root_fails_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_project_root(dir.path()).unwrap_err();
        assert!(err.to_string().contains("folio.toml"));
    }

    #[test]
    fn config_flag_accepts_file_or_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&file, CONFIG).unwrap();

        let (config, root) =
            load_project_config(&global(Some(file.to_string_lossy().into_owned()))).unwrap();
        assert_eq!(config.project.name, "acme");
        assert_eq!(root, dir.path());

        let (_, root) =
            load_project_config(&global(Some(dir.path().to_string_lossy().into_owned())))
                .unwrap();
        assert_eq!(root, dir.path());
    }

    #[test]
    fn session_selects_one_version() {
        let dir = tempfile::tempdir().unwrap();
        let config = folio_config::load_config_from_str(CONFIG).unwrap();
        let args = BuildArgs {
            only_version: Some("2.x".to_string()),
            ..BuildArgs::default()
        };

        let session = Session::from_config(config, dir.path().to_path_buf(), &args).unwrap();
        assert_eq!(session.project.versions().names(), ["2.x"]);
        assert_eq!(session.source_dir(), dir.path().join("src"));
        assert!(session.parser().is_ok());
    }

    #[test]
    fn session_rejects_unknown_version_and_theme() {
        let dir = tempfile::tempdir().unwrap();
        let config = folio_config::load_config_from_str(CONFIG).unwrap();
        let args = BuildArgs {
            only_version: Some("9.x".to_string()),
            ..BuildArgs::default()
        };
        assert!(Session::from_config(config, dir.path().to_path_buf(), &args).is_err());

        let config =
            folio_config::load_config_from_str(&CONFIG.replace("\"json\"", "\"fancy\"")).unwrap();
        let err = Session::from_config(config, dir.path().to_path_buf(), &BuildArgs::default())
            .err()
            .unwrap();
        assert!(err.to_string().contains("fancy"));
    }
}
