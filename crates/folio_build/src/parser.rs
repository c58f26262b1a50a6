//! The parse driver.

use std::collections::BTreeSet;
use std::path::Path;

use folio_common::ContentHash;
use folio_model::ClassEntity;

use crate::error::BuildError;
use crate::event::{percent, BuildEvent, BuildObserver};
use crate::project::Project;
use crate::source::UnitSource;
use crate::transaction::Transaction;
use crate::visitor::ClassVisitor;

/// What the unit parser extracted from one source unit.
#[derive(Debug, Default)]
pub struct UnitOutput {
    /// Classes declared by the unit.
    pub classes: Vec<ClassEntity>,
    /// Problems found in the unit. They never stop a run.
    pub errors: Vec<String>,
}

/// Extracts classes from the raw bytes of one unit.
///
/// Implementations are called once per changed unit and must not carry
/// errors over from one unit to the next. An `Err` means the parser itself
/// could not run and aborts the build; problems with the unit's content
/// belong in [`UnitOutput::errors`].
pub trait UnitParser {
    /// Parses one unit.
    fn parse(&mut self, path: &Path, content: &[u8]) -> Result<UnitOutput, BuildError>;
}

/// Runs the unit parser over every changed unit and commits the results.
pub struct Parser {
    source: Box<dyn UnitSource>,
    unit_parser: Box<dyn UnitParser>,
    visitors: Vec<Box<dyn ClassVisitor>>,
    errors: usize,
    units_parsed: usize,
}

impl Parser {
    /// Creates a driver without post-parse visitors.
    pub fn new(source: Box<dyn UnitSource>, unit_parser: Box<dyn UnitParser>) -> Self {
        Self {
            source,
            unit_parser,
            visitors: Vec::new(),
            errors: 0,
            units_parsed: 0,
        }
    }

    /// Adds a post-parse visitor. Visitors run in insertion order.
    pub fn with_visitor(mut self, visitor: Box<dyn ClassVisitor>) -> Self {
        self.visitors.push(visitor);
        self
    }

    /// Unit parse errors reported since the driver was created.
    pub fn error_count(&self) -> usize {
        self.errors
    }

    /// Units handed to the unit parser since the driver was created.
    pub fn units_parsed(&self) -> usize {
        self.units_parsed
    }

    /// Parses the current version of `project`.
    ///
    /// Units whose content hash is already known are skipped. Classes whose
    /// unit disappeared are removed from the project and the store. Only
    /// classes parsed in this run or changed by a visitor are written.
    pub fn parse(
        &mut self,
        project: &mut Project,
        observer: &mut dyn BuildObserver,
    ) -> Result<Transaction, BuildError> {
        let units = self.source.list()?;
        let total = units.len();
        let mut transaction = Transaction::new(project);
        let mut touched = BTreeSet::new();
        let mut parsed = 0usize;

        for (step, path) in units.iter().enumerate() {
            let content = self.source.read(path)?;
            let hash = ContentHash::from_bytes(&content);
            if transaction.has_hash(&hash) {
                tracing::debug!(unit = %path.display(), "unchanged, skipping");
                continue;
            }

            let output = self.unit_parser.parse(path, &content)?;
            parsed += 1;

            if !output.errors.is_empty() {
                self.errors += output.errors.len();
                for error in &output.errors {
                    tracing::warn!(unit = %path.display(), "{error}");
                }
                observer.on_event(BuildEvent::ParseErrors {
                    path,
                    errors: &output.errors,
                });
            }

            let percent = percent(step + 1, total);
            for mut class in output.classes {
                class.hash = Some(hash);
                class.file = Some(path.clone());
                class.from_cache = false;
                observer.on_event(BuildEvent::ClassParsed {
                    percent,
                    class: &class,
                });

                let name = class.info.name.clone();
                transaction.add_class(&name, hash);
                project.add_class(class)?;
                touched.insert(name);
            }
        }
        self.units_parsed += parsed;

        let removed = transaction.removed_classes();
        for name in &removed {
            touched.remove(name);
            match project.unstore_class(name) {
                Ok(()) => {}
                Err(BuildError::Store(e)) if e.is_not_found() => {
                    tracing::warn!(class = %name, "removed class was not in the store");
                }
                Err(e) => return Err(e),
            }
            project.remove_class(name)?;
        }

        project.rebuild_indices()?;

        for name in project.project_class_names() {
            for visitor in &mut self.visitors {
                if project.modify_class(&name, |class| visitor.visit(class))? {
                    touched.insert(name.clone());
                }
            }
        }

        for name in &touched {
            project.store_class(name)?;
        }

        tracing::info!(
            version = %project.version(),
            units = total,
            parsed,
            modified = transaction.modified_classes().len(),
            removed = removed.len(),
            stored = touched.len(),
            "parse finished"
        );
        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use folio_store::MemoryStore;

    use super::*;
    use crate::project::BuildSettings;
    use crate::source::MemorySource;
    use crate::version::{Version, VersionCollection};
    use crate::visitor::SourceRootVisitor;

    /// Declares one class per line of `class Name` in the unit.
    struct LineParser;

    impl UnitParser for LineParser {
        fn parse(&mut self, _path: &Path, content: &[u8]) -> Result<UnitOutput, BuildError> {
            let text = String::from_utf8_lossy(content);
            let mut output = UnitOutput::default();
            for (line, row) in text.lines().enumerate() {
                match row.strip_prefix("class ") {
                    Some(name) => output.classes.push(ClassEntity::new(name.trim(), line as u32 + 1)),
                    None if row.starts_with("error") => output.errors.push(row.to_string()),
                    None => {}
                }
            }
            Ok(output)
        }
    }

    #[derive(Default)]
    struct Recorder {
        parsed: Vec<(u8, String)>,
        error_batches: HashMap<String, usize>,
    }

    impl BuildObserver for Recorder {
        fn on_event(&mut self, event: BuildEvent<'_>) {
            match event {
                BuildEvent::ClassParsed { percent, class } => {
                    self.parsed.push((percent, class.info.name.clone()))
                }
                BuildEvent::ParseErrors { path, errors } => {
                    self.error_batches
                        .insert(path.display().to_string(), errors.len());
                }
                _ => {}
            }
        }
    }

    fn project(dir: &Path) -> Project {
        let settings = BuildSettings::new(
            dir.join("build").to_string_lossy(),
            dir.join("cache").to_string_lossy(),
        );
        Project::new(
            Box::new(MemoryStore::new()),
            VersionCollection::single(Version::new("main")),
            settings,
        )
        .unwrap()
    }

    #[test]
    fn reports_progress_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut project = project(dir.path());
        let mut source = MemorySource::new();
        source.insert("/src/a.php", "class A\nclass B\n");
        source.insert("/src/b.php", "error: bad docblock\nclass C\n");
        let mut parser = Parser::new(Box::new(source), Box::new(LineParser));
        let mut recorder = Recorder::default();

        let transaction = parser.parse(&mut project, &mut recorder).unwrap();

        assert_eq!(transaction.modified_classes(), ["A", "B", "C"]);
        assert_eq!(
            recorder.parsed,
            [(50, "A".to_string()), (50, "B".to_string()), (100, "C".to_string())]
        );
        assert_eq!(recorder.error_batches["/src/b.php"], 1);
        assert_eq!(parser.error_count(), 1);
        assert_eq!(parser.units_parsed(), 2);

        let c = project.loaded_class("C").unwrap();
        assert_eq!(c.file.as_deref(), Some(Path::new("/src/b.php")));
        assert!(c.hash.is_some());
        assert!(!c.from_cache);
    }

    #[test]
    fn visitors_touch_cached_classes() {
        let dir = tempfile::tempdir().unwrap();
        let mut project = project(dir.path());
        let mut source = MemorySource::new();
        source.insert("/src/Foo.php", "class Foo\n");

        let mut parser = Parser::new(Box::new(source.clone()), Box::new(LineParser));
        parser.parse(&mut project, &mut ()).unwrap();
        assert!(project.loaded_class("Foo").unwrap().relative_file.is_none());

        let mut parser = Parser::new(Box::new(source), Box::new(LineParser))
            .with_visitor(Box::new(SourceRootVisitor::new("/src")));
        let transaction = parser.parse(&mut project, &mut ()).unwrap();

        assert!(transaction.modified_classes().is_empty());
        assert_eq!(parser.units_parsed(), 0);
        let foo = project.loaded_class("Foo").unwrap();
        assert_eq!(foo.relative_file.as_deref(), Some("Foo.php"));

        project.read().unwrap();
        let stored = project.loaded_class("Foo").unwrap();
        assert_eq!(stored.relative_file.as_deref(), Some("Foo.php"));
        assert!(stored.from_cache);
    }
}
