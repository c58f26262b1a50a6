//! One project, one version at a time.
//!
//! The [`Project`] owns the class registry of the current version, the
//! namespace indices derived from it and the lifecycle of the version's
//! cache and build directories. It also drives the outer loops over
//! versions for `parse`, `render` and `update`.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use folio_common::normalize_class_name;
use folio_config::{
    ConfigError, FolioConfig, LINE_PLACEHOLDER, PATH_PLACEHOLDER, VERSION_PLACEHOLDER,
};
use folio_model::{ClassEntity, ClassResolver};
use folio_store::{Store, StoreScope};
use walkdir::WalkDir;

use crate::diff::Diff;
use crate::error::{io_error, BuildError};
use crate::event::{BuildEvent, BuildObserver};
use crate::lazy::LazyClass;
use crate::namespace::{ClassKind, NamespaceIndex};
use crate::parser::Parser;
use crate::renderer::Renderer;
use crate::transaction::Transaction;
use crate::version::{Version, VersionCollection};

/// Stamp file holding the tool version that prepared a directory.
pub const TOOL_STAMP: &str = "FOLIO_VERSION";

/// Stamp file holding the project version a directory belongs to.
pub const PROJECT_STAMP: &str = "PROJECT_VERSION";

/// Settings a [`Project`] needs from the configuration.
#[derive(Debug, Clone)]
pub struct BuildSettings {
    /// Title shown by themes.
    pub title: String,
    /// Build directory template; may contain `%version%`.
    pub build_dir: String,
    /// Cache directory template; may contain `%version%`.
    pub cache_dir: String,
    /// Theme name.
    pub theme: String,
    /// Whether class pages include inherited members.
    pub include_parent_data: bool,
    /// File underscore-separated names under simulated namespaces.
    pub simulate_namespaces: bool,
    /// Ancestor name that makes a class an exception.
    pub exception_root: String,
    /// Written to [`TOOL_STAMP`]; a mismatch invalidates a directory.
    pub tool_version: String,
    /// Template linking a declaration to hosted sources; may contain
    /// `%version%`, `%path%` and `%line%`.
    pub source_url: Option<String>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            title: String::new(),
            build_dir: format!("build/{VERSION_PLACEHOLDER}"),
            cache_dir: format!("cache/{VERSION_PLACEHOLDER}"),
            theme: "json".to_string(),
            include_parent_data: true,
            simulate_namespaces: false,
            exception_root: "Exception".to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            source_url: None,
        }
    }
}

impl BuildSettings {
    /// Settings with explicit directory templates and defaults elsewhere.
    pub fn new(build_dir: impl Into<String>, cache_dir: impl Into<String>) -> Self {
        Self {
            build_dir: build_dir.into(),
            cache_dir: cache_dir.into(),
            ..Self::default()
        }
    }

    /// Settings from a loaded configuration. Relative directories are taken
    /// relative to `root`.
    pub fn from_config(config: &FolioConfig, root: &Path) -> Self {
        let under_root = |template: &str| root.join(template).to_string_lossy().into_owned();
        Self {
            title: config.project.title().to_string(),
            build_dir: under_root(&config.project.build_dir),
            cache_dir: under_root(&config.project.cache_dir),
            theme: config.project.theme.clone(),
            include_parent_data: config.project.include_parent_data,
            simulate_namespaces: config.project.simulate_namespaces,
            exception_root: config.project.exception_root.clone(),
            source_url: config.project.source_url.clone(),
            ..Self::default()
        }
    }

    /// Link to `path` at `line` in `version`, if a template is configured.
    pub fn source_url(&self, version: &Version, path: &str, line: u32) -> Option<String> {
        let template = self.source_url.as_deref()?;
        Some(
            template
                .replace(VERSION_PLACEHOLDER, version.name())
                .replace(PATH_PLACEHOLDER, path.trim_start_matches('/'))
                .replace(LINE_PLACEHOLDER, &line.to_string()),
        )
    }
}

#[derive(Debug)]
enum Slot {
    /// Referenced by name, not looked up yet.
    Unresolved,
    Loaded(Rc<ClassEntity>),
    /// Not in the store: a builtin or third-party type.
    External,
}

#[derive(Debug)]
struct Registry {
    slots: BTreeMap<String, Slot>,
    index: NamespaceIndex,
}

impl Registry {
    fn new(simulate: bool) -> Self {
        Self {
            slots: BTreeMap::new(),
            index: NamespaceIndex::new(simulate),
        }
    }
}

/// The class registry and directory lifecycle of one documented project.
///
/// Classes are only reachable by name through [`Project::get_class`] and
/// [`Project::load_class`], so there is at most one entity per name. Looking
/// a name up may load it from the store, which is why the registry sits
/// behind a `RefCell`: lookups work through `&Project`. Registered classes
/// are shared and immutable; [`Project::modify_class`] is the only way to
/// change one.
pub struct Project {
    store: Box<dyn Store>,
    settings: BuildSettings,
    versions: VersionCollection,
    version: Version,
    registry: RefCell<Registry>,
    prepared: RefCell<HashSet<PathBuf>>,
}

impl Project {
    /// Creates a project positioned on the first version.
    ///
    /// Fails when several versions would share one directory because a
    /// template lacks `%version%`.
    pub fn new(
        store: Box<dyn Store>,
        versions: VersionCollection,
        settings: BuildSettings,
    ) -> Result<Self, BuildError> {
        if versions.len() > 1 {
            for (setting, template) in [
                ("build_dir", &settings.build_dir),
                ("cache_dir", &settings.cache_dir),
            ] {
                if !template.contains(VERSION_PLACEHOLDER) {
                    return Err(ConfigError::MissingPlaceholder {
                        setting: setting.to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(Self {
            store,
            version: versions.first().clone(),
            registry: RefCell::new(Registry::new(settings.simulate_namespaces)),
            prepared: RefCell::new(HashSet::new()),
            settings,
            versions,
        })
    }

    /// The project settings.
    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    /// The version currently loaded.
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Every version of the project, in build order.
    pub fn versions(&self) -> &VersionCollection {
        &self.versions
    }

    // ---- registry ----

    /// Returns a handle for `name`, registering a placeholder if the name
    /// was never seen. Nothing is loaded until the handle is resolved.
    pub fn get_class(&self, name: &str) -> LazyClass<'_> {
        let name = normalize_class_name(name);
        self.registry
            .borrow_mut()
            .slots
            .entry(name.to_string())
            .or_insert(Slot::Unresolved);
        LazyClass::new(self, name.to_string())
    }

    /// Resolves `name` to a project class, loading it from the store on
    /// first use. `Ok(None)` means the store has no such class: it is a
    /// builtin or external type.
    pub fn load_class(&self, name: &str) -> Result<Option<Rc<ClassEntity>>, BuildError> {
        let name = normalize_class_name(name);
        match self.registry.borrow().slots.get(name) {
            Some(Slot::Loaded(class)) => return Ok(Some(Rc::clone(class))),
            Some(Slot::External) => return Ok(None),
            Some(Slot::Unresolved) | None => {}
        }

        let cache_dir = self.cache_dir()?;
        let scope = StoreScope {
            version: self.version.name(),
            cache_dir: &cache_dir,
        };
        match self.store.read_class(&scope, name) {
            Ok(class) => {
                let class = Rc::new(class);
                self.registry
                    .borrow_mut()
                    .slots
                    .insert(name.to_string(), Slot::Loaded(Rc::clone(&class)));
                self.index_class(&class)?;
                Ok(Some(class))
            }
            Err(e) if e.is_not_found() => {
                self.registry
                    .borrow_mut()
                    .slots
                    .insert(name.to_string(), Slot::External);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// A registered class, without touching the store.
    pub fn loaded_class(&self, name: &str) -> Option<Rc<ClassEntity>> {
        match self.registry.borrow().slots.get(normalize_class_name(name)) {
            Some(Slot::Loaded(class)) => Some(Rc::clone(class)),
            _ => None,
        }
    }

    /// Registers a class, replacing any entity of the same name, and files
    /// it and its registered descendants in the namespace indices.
    pub fn add_class(&mut self, class: ClassEntity) -> Result<Rc<ClassEntity>, BuildError> {
        let class = Rc::new(class);
        self.registry
            .get_mut()
            .slots
            .insert(class.info.name.clone(), Slot::Loaded(Rc::clone(&class)));
        self.reindex_from(&class.info.name)?;
        Ok(class)
    }

    /// Evicts a class from the registry and every namespace index, then
    /// refiles its registered descendants.
    ///
    /// Descendants resolve the removed name again while being refiled, so a
    /// class that should stay gone must be deleted from the store first.
    pub fn remove_class(&mut self, name: &str) -> Result<Option<Rc<ClassEntity>>, BuildError> {
        let name = normalize_class_name(name);
        let registry = self.registry.get_mut();
        registry.index.remove(name);
        let removed = match registry.slots.remove(name) {
            Some(Slot::Loaded(class)) => Some(class),
            _ => None,
        };
        self.reindex_from(name)?;
        Ok(removed)
    }

    /// Applies `f` to a registered class, copying it first if the entity is
    /// shared. Returns what `f` returned: whether it changed anything.
    pub fn modify_class(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut ClassEntity) -> bool,
    ) -> Result<bool, BuildError> {
        let name = normalize_class_name(name);
        let changed = match self.registry.get_mut().slots.get_mut(name) {
            Some(Slot::Loaded(class)) => f(Rc::make_mut(class)),
            _ => return Ok(false),
        };
        if changed {
            self.reindex_from(name)?;
        }
        Ok(changed)
    }

    /// Whether no class is registered.
    pub fn is_empty(&self) -> bool {
        !self
            .registry
            .borrow()
            .slots
            .values()
            .any(|slot| matches!(slot, Slot::Loaded(_)))
    }

    /// Every registered class, sorted by name.
    pub fn project_classes(&self) -> Vec<Rc<ClassEntity>> {
        self.registry
            .borrow()
            .slots
            .values()
            .filter_map(|slot| match slot {
                Slot::Loaded(class) => Some(Rc::clone(class)),
                _ => None,
            })
            .collect()
    }

    /// Names of every registered class, sorted.
    pub fn project_class_names(&self) -> Vec<String> {
        self.registry
            .borrow()
            .slots
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Loaded(_)))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Every registered interface, sorted by name.
    pub fn project_interfaces(&self) -> Vec<Rc<ClassEntity>> {
        let names = self.registry.borrow().index.all_interfaces();
        self.loaded_classes(names)
    }

    fn loaded_classes(&self, names: Vec<String>) -> Vec<Rc<ClassEntity>> {
        names
            .iter()
            .filter_map(|name| self.loaded_class(name))
            .collect()
    }

    fn classify(&self, class: &ClassEntity) -> Result<ClassKind, BuildError> {
        Ok(if class.is_exception(self, &self.settings.exception_root)? {
            ClassKind::Exception
        } else if class.is_interface() {
            ClassKind::Interface
        } else {
            ClassKind::Class
        })
    }

    fn index_class(&self, class: &ClassEntity) -> Result<(), BuildError> {
        let kind = self.classify(class)?;
        self.registry
            .borrow_mut()
            .index
            .insert(&class.info.name, &class.namespace, kind);
        Ok(())
    }

    /// Refiles `name`, if registered, and every registered class whose
    /// parent chain passes through it: their exception status may have
    /// changed with it.
    fn reindex_from(&self, name: &str) -> Result<(), BuildError> {
        let mut seen = HashSet::new();
        let mut pending = vec![name.to_string()];
        while let Some(current) = pending.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(class) = self.loaded_class(&current) {
                self.index_class(&class)?;
            }
            let children: Vec<String> = self
                .registry
                .borrow()
                .slots
                .iter()
                .filter_map(|(child, slot)| match slot {
                    Slot::Loaded(class) if class.parent() == Some(current.as_str()) => {
                        Some(child.clone())
                    }
                    _ => None,
                })
                .collect();
            pending.extend(children);
        }
        Ok(())
    }

    /// Recomputes the namespace indices from the registered classes.
    ///
    /// Classification depends on ancestors that may have been registered
    /// after a class was filed, so this runs after every bulk change.
    pub fn rebuild_indices(&mut self) -> Result<(), BuildError> {
        loop {
            let classes = self.project_classes();
            let kinds = classes
                .iter()
                .map(|class| self.classify(class))
                .collect::<Result<Vec<_>, _>>()?;
            // Classification may have loaded ancestors from the store.
            if self.project_classes().len() != classes.len() {
                continue;
            }
            let mut index = NamespaceIndex::new(self.settings.simulate_namespaces);
            for (class, kind) in classes.iter().zip(kinds) {
                index.insert(&class.info.name, &class.namespace, kind);
            }
            self.registry.get_mut().index = index;
            return Ok(());
        }
    }

    /// A copy of the current namespace indices.
    pub fn namespace_index(&self) -> NamespaceIndex {
        self.registry.borrow().index.clone()
    }

    // ---- namespaces ----

    /// Namespaces holding classes, with their ancestors, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        self.registry.borrow().index.namespaces()
    }

    /// Simulated namespaces, sorted.
    pub fn simulated_namespaces(&self) -> Vec<String> {
        self.registry.borrow().index.simulated_namespaces()
    }

    /// False when every class lives in the global namespace.
    pub fn has_namespaces(&self) -> bool {
        self.registry.borrow().index.has_namespaces()
    }

    /// Whether `namespace` is known.
    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.registry.borrow().index.has_namespace(namespace)
    }

    /// Regular classes and traits of a namespace.
    pub fn namespace_classes(&self, namespace: &str) -> Vec<Rc<ClassEntity>> {
        let names = self.registry.borrow().index.classes(namespace);
        self.loaded_classes(names)
    }

    /// Interfaces of a namespace.
    pub fn namespace_interfaces(&self, namespace: &str) -> Vec<Rc<ClassEntity>> {
        let names = self.registry.borrow().index.interfaces(namespace);
        self.loaded_classes(names)
    }

    /// Exceptions of a namespace.
    pub fn namespace_exceptions(&self, namespace: &str) -> Vec<Rc<ClassEntity>> {
        let names = self.registry.borrow().index.exceptions(namespace);
        self.loaded_classes(names)
    }

    /// Every class of a namespace, sorted by name.
    pub fn namespace_all_classes(&self, namespace: &str) -> Vec<Rc<ClassEntity>> {
        let names = self.registry.borrow().index.all_classes(namespace);
        self.loaded_classes(names)
    }

    /// Classes filed under a simulated namespace.
    pub fn simulated_namespace_classes(&self, namespace: &str) -> Vec<Rc<ClassEntity>> {
        let names = self.registry.borrow().index.simulated_classes(namespace);
        self.loaded_classes(names)
    }

    /// Direct children of `parent`.
    pub fn namespace_sub_namespaces(&self, parent: &str) -> Vec<String> {
        self.registry.borrow().index.sub_namespaces(parent)
    }

    /// Direct children of a simulated namespace.
    pub fn simulated_sub_namespaces(&self, parent: &str) -> Vec<String> {
        self.registry.borrow().index.simulated_sub_namespaces(parent)
    }

    // ---- directories ----

    fn dir_for(&self, template: &str) -> PathBuf {
        PathBuf::from(template.replace(VERSION_PLACEHOLDER, self.version.name()))
    }

    /// The current version's build directory, prepared on first use.
    pub fn build_dir(&self) -> Result<PathBuf, BuildError> {
        self.prepare_dir(&self.settings.build_dir)
    }

    /// The current version's cache directory, prepared on first use.
    pub fn cache_dir(&self) -> Result<PathBuf, BuildError> {
        self.prepare_dir(&self.settings.cache_dir)
    }

    /// Creates the directory if missing and wipes it if another tool version
    /// prepared it. Each directory is checked once per project instance.
    fn prepare_dir(&self, template: &str) -> Result<PathBuf, BuildError> {
        let dir = self.dir_for(template);
        if !self.prepared.borrow_mut().insert(dir.clone()) {
            return Ok(dir);
        }

        if !dir.is_dir() {
            self.flush_dir(&dir)?;
            return Ok(dir);
        }

        let stamp = read_stamp(&dir, TOOL_STAMP);
        if stamp.as_deref() != Some(self.settings.tool_version.as_str()) {
            tracing::debug!(
                dir = %dir.display(),
                found = stamp.as_deref().unwrap_or("none"),
                "directory prepared by another tool version"
            );
            self.flush_dir(&dir)?;
        }
        Ok(dir)
    }

    /// Empties a directory and stamps it with the tool and project versions.
    pub fn flush_dir(&self, dir: &Path) -> Result<(), BuildError> {
        tracing::debug!(dir = %dir.display(), "flushing directory");
        if dir.exists() {
            std::fs::remove_dir_all(dir).map_err(io_error(dir))?;
        }
        std::fs::create_dir_all(dir).map_err(io_error(dir))?;
        write_stamp(dir, TOOL_STAMP, &self.settings.tool_version)?;
        write_stamp(dir, PROJECT_STAMP, self.version.name())
    }

    /// Replaces `current` with a copy of `previous`, restamped for the
    /// current version.
    fn seed_dir(&self, previous: &Path, current: &Path) -> Result<(), BuildError> {
        tracing::debug!(
            from = %previous.display(),
            to = %current.display(),
            "seeding directory"
        );
        mirror_dir(previous, current)?;
        write_stamp(current, PROJECT_STAMP, self.version.name())
    }

    fn seed_cache(&mut self, previous: &Version, from: &Path) -> Result<(), BuildError> {
        let to = self.cache_dir()?;
        self.seed_dir(from, &to)?;
        let from_scope = StoreScope {
            version: previous.name(),
            cache_dir: from,
        };
        let to_scope = StoreScope {
            version: self.version.name(),
            cache_dir: &to,
        };
        self.store.seed(&from_scope, &to_scope)?;
        self.read()
    }

    // ---- store ----

    /// Reloads the registry from the store.
    pub fn read(&mut self) -> Result<(), BuildError> {
        self.reset();
        let cache_dir = self.cache_dir()?;
        let scope = StoreScope {
            version: self.version.name(),
            cache_dir: &cache_dir,
        };
        let classes = self.store.read_project(&scope)?;
        let slots = &mut self.registry.get_mut().slots;
        for class in classes {
            slots.insert(class.info.name.clone(), Slot::Loaded(Rc::new(class)));
        }
        self.rebuild_indices()
    }

    fn reset(&mut self) {
        *self.registry.get_mut() = Registry::new(self.settings.simulate_namespaces);
    }

    /// Writes a registered class to the store.
    pub(crate) fn store_class(&mut self, name: &str) -> Result<(), BuildError> {
        let Some(class) = self.loaded_class(name) else {
            return Ok(());
        };
        let cache_dir = self.cache_dir()?;
        let scope = StoreScope {
            version: self.version.name(),
            cache_dir: &cache_dir,
        };
        self.store.write_class(&scope, &class)?;
        Ok(())
    }

    /// Deletes a class from the store.
    pub(crate) fn unstore_class(&mut self, name: &str) -> Result<(), BuildError> {
        let cache_dir = self.cache_dir()?;
        let scope = StoreScope {
            version: self.version.name(),
            cache_dir: &cache_dir,
        };
        self.store.remove_class(&scope, name)?;
        Ok(())
    }

    fn flush_store(&mut self) -> Result<(), BuildError> {
        let cache_dir = self.cache_dir()?;
        let scope = StoreScope {
            version: self.version.name(),
            cache_dir: &cache_dir,
        };
        self.store.flush_project(&scope)?;
        Ok(())
    }

    // ---- orchestration ----

    /// Makes `version` current. Without `force` the registry is reloaded
    /// from the version's store; with it the registry starts empty.
    pub fn switch_version(
        &mut self,
        version: &Version,
        observer: &mut dyn BuildObserver,
        force: bool,
    ) -> Result<(), BuildError> {
        observer.on_event(BuildEvent::VersionSwitched(version));
        tracing::info!(version = %version, "switching version");
        self.version = version.clone();
        self.reset();
        if !force {
            self.read()?;
        }
        Ok(())
    }

    /// Parses then renders every version in turn. Each version is built
    /// from its own cache and build directories only, so `force` rebuilds
    /// every version from scratch.
    pub fn update(
        &mut self,
        parser: &mut Parser,
        renderer: &mut Renderer,
        observer: &mut dyn BuildObserver,
        force: bool,
    ) -> Result<(), BuildError> {
        let versions = self.versions.clone();
        for version in &versions {
            self.switch_version(version, observer, force)?;
            self.parse_version(parser, None, observer, force)?;
            self.render_version(renderer, None, observer, force)?;
        }
        Ok(())
    }

    /// Parses every version in turn. A version starting with an empty cache
    /// is seeded from the previous version's cache first.
    pub fn parse(
        &mut self,
        parser: &mut Parser,
        observer: &mut dyn BuildObserver,
        force: bool,
    ) -> Result<(), BuildError> {
        let versions = self.versions.clone();
        let mut previous: Option<(Version, PathBuf)> = None;
        for version in &versions {
            self.switch_version(version, observer, force)?;
            self.parse_version(parser, previous.as_ref(), observer, force)?;
            previous = Some((version.clone(), self.cache_dir()?));
        }
        Ok(())
    }

    /// Renders every version in turn. A version never rendered before starts
    /// from a copy of the previous version's build directory.
    pub fn render(
        &mut self,
        renderer: &mut Renderer,
        observer: &mut dyn BuildObserver,
        force: bool,
    ) -> Result<(), BuildError> {
        let versions = self.versions.clone();
        let mut previous: Option<PathBuf> = None;
        for version in &versions {
            // Rendering never discards parsed state.
            self.switch_version(version, observer, false)?;
            self.render_version(renderer, previous.as_deref(), observer, force)?;
            previous = Some(self.build_dir()?);
        }
        Ok(())
    }

    fn parse_version(
        &mut self,
        parser: &mut Parser,
        previous: Option<&(Version, PathBuf)>,
        observer: &mut dyn BuildObserver,
        force: bool,
    ) -> Result<Option<Transaction>, BuildError> {
        if self.version.is_frozen() && !self.is_empty() {
            tracing::info!(version = %self.version, "version is frozen, skipping parse");
            return Ok(None);
        }

        if force {
            self.flush_store()?;
        }

        if let Some((previous, cache_dir)) = previous {
            if self.is_empty() && cache_dir.is_dir() {
                self.seed_cache(previous, cache_dir)?;
            }
        }

        let transaction = parser.parse(self, observer)?;
        observer.on_event(BuildEvent::ParseFinished(&transaction));
        Ok(Some(transaction))
    }

    fn render_version(
        &mut self,
        renderer: &mut Renderer,
        previous: Option<&Path>,
        observer: &mut dyn BuildObserver,
        force: bool,
    ) -> Result<Option<Diff>, BuildError> {
        let build_dir = self.build_dir()?;
        let frozen = self.version.is_frozen()
            && renderer.is_rendered(self)?
            && read_stamp(&build_dir, PROJECT_STAMP).as_deref() == Some(self.version.name());
        if frozen {
            tracing::info!(version = %self.version, "version is frozen, skipping render");
            return Ok(None);
        }

        if force {
            self.flush_dir(&build_dir)?;
        }

        if let Some(previous) = previous {
            if previous.is_dir() && !renderer.is_rendered(self)? {
                self.seed_dir(previous, &build_dir)?;
            }
        }

        let diff = renderer.render(self, observer)?;
        observer.on_event(BuildEvent::RenderFinished(&diff));
        Ok(Some(diff))
    }
}

impl ClassResolver for Project {
    type Error = BuildError;

    fn resolve(&self, name: &str) -> Result<Option<Rc<ClassEntity>>, BuildError> {
        self.load_class(name)
    }
}

/// Reads a stamp file, if present.
pub fn read_stamp(dir: &Path, stamp: &str) -> Option<String> {
    std::fs::read_to_string(dir.join(stamp)).ok()
}

fn write_stamp(dir: &Path, stamp: &str, value: &str) -> Result<(), BuildError> {
    let path = dir.join(stamp);
    std::fs::write(&path, value).map_err(io_error(path))
}

/// Replaces `to` with a recursive copy of `from`.
fn mirror_dir(from: &Path, to: &Path) -> Result<(), BuildError> {
    if to.exists() {
        std::fs::remove_dir_all(to).map_err(io_error(to))?;
    }
    for entry in WalkDir::new(from) {
        let entry = entry.map_err(|e| BuildError::Io {
            path: from.to_path_buf(),
            source: e.into(),
        })?;
        let Ok(relative) = entry.path().strip_prefix(from) else {
            continue;
        };
        let target = to.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(io_error(&target))?;
        } else {
            std::fs::copy(entry.path(), &target).map_err(io_error(&target))?;
        }
    }
    Ok(())
}
