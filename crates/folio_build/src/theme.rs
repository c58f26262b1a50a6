//! Themes turn the model into output files.
//!
//! A theme decides what pages exist and what they contain; the
//! [`Renderer`](crate::Renderer) decides which of them to regenerate and
//! writes them under the build directory.

use std::collections::BTreeMap;

use folio_config::ConfigError;
use folio_model::{ClassEntity, ConstantEntity, Documented, Member, MethodEntity, PropertyEntity};
use serde::Serialize;

use crate::error::BuildError;
use crate::project::Project;

/// One output file, relative to the build directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Relative path using `/` separators.
    pub target: String,
    /// File contents.
    pub body: Vec<u8>,
}

/// An output format.
pub trait Theme {
    /// Name used in the configuration.
    fn name(&self) -> &str;

    /// Files written on every render regardless of what changed.
    fn static_files(&self, project: &Project) -> Result<Vec<Page>, BuildError>;

    /// Targets of the project-wide pages.
    fn global_pages(&self) -> Vec<String>;

    /// Renders one project-wide page.
    fn render_global(&self, target: &str, project: &Project) -> Result<Vec<u8>, BuildError>;

    /// Renders the pages of one namespace.
    fn render_namespace(&self, namespace: &str, project: &Project) -> Result<Vec<Page>, BuildError>;

    /// Renders the pages of one class.
    fn render_class(&self, class: &ClassEntity, project: &Project) -> Result<Vec<Page>, BuildError>;

    /// Targets written for a class, used to delete them once it is gone.
    fn class_outputs(&self, class: &str) -> Vec<String>;

    /// Targets written for a namespace.
    fn namespace_outputs(&self, namespace: &str) -> Vec<String>;
}

/// The available themes, by name.
pub struct ThemeSet {
    themes: BTreeMap<String, Box<dyn Theme>>,
}

impl ThemeSet {
    /// A set holding no theme.
    pub fn empty() -> Self {
        Self {
            themes: BTreeMap::new(),
        }
    }

    /// A set holding the built-in themes.
    pub fn builtin() -> Self {
        let mut set = Self::empty();
        set.register(Box::new(JsonTheme));
        set
    }

    /// Adds a theme, replacing one of the same name.
    pub fn register(&mut self, theme: Box<dyn Theme>) {
        self.themes.insert(theme.name().to_string(), theme);
    }

    /// Looks a theme up by name.
    pub fn get(&self, name: &str) -> Result<&dyn Theme, ConfigError> {
        self.themes
            .get(name)
            .map(|theme| theme.as_ref())
            .ok_or_else(|| ConfigError::UnknownTheme(name.to_string()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.themes.keys().map(String::as_str).collect()
    }
}

impl Default for ThemeSet {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Machine-readable output: one JSON document per page.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTheme;

const INDEX_PAGE: &str = "index.json";
const SEARCH_PAGE: &str = "search.json";

fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, BuildError> {
    serde_json::to_vec_pretty(value).map_err(|e| BuildError::Render(e.to_string()))
}

fn names(classes: &[std::rc::Rc<ClassEntity>]) -> Vec<&str> {
    classes.iter().map(|c| c.info.name.as_str()).collect()
}

#[derive(Serialize)]
struct VersionEntry<'a> {
    name: &'a str,
    long_name: &'a str,
}

#[derive(Serialize)]
struct SearchEntry {
    kind: &'static str,
    name: String,
    class: String,
}

#[derive(Serialize)]
struct Declared<T> {
    declared_in: String,
    #[serde(flatten)]
    item: T,
}

impl<T> From<Member<T>> for Declared<T> {
    fn from(member: Member<T>) -> Self {
        Self {
            declared_in: member.class,
            item: member.item,
        }
    }
}

#[derive(Serialize)]
struct SeeLink<'a> {
    kind: &'static str,
    target: String,
    description: &'a str,
}

#[derive(Serialize)]
struct ClassPage<'a> {
    name: &'a str,
    short_name: &'a str,
    namespace: &'a str,
    category: &'static str,
    is_abstract: bool,
    is_final: bool,
    is_exception: bool,
    short_desc: &'a str,
    long_desc: &'a str,
    deprecated: bool,
    parent: Option<&'a str>,
    parents: Vec<String>,
    interfaces: Vec<String>,
    traits: Vec<String>,
    file: Option<&'a str>,
    line: u32,
    source_url: Option<String>,
    see: Vec<SeeLink<'a>>,
    methods: BTreeMap<String, Declared<MethodEntity>>,
    properties: BTreeMap<String, Declared<PropertyEntity>>,
    constants: BTreeMap<String, Declared<ConstantEntity>>,
}

fn own<T: Clone>(class: &ClassEntity, members: &BTreeMap<String, T>) -> BTreeMap<String, Declared<T>> {
    members
        .iter()
        .map(|(name, item)| {
            (
                name.clone(),
                Declared {
                    declared_in: class.info.name.clone(),
                    item: item.clone(),
                },
            )
        })
        .collect()
}

fn declared<T>(members: BTreeMap<String, Member<T>>) -> BTreeMap<String, Declared<T>> {
    members.into_iter().map(|(k, v)| (k, v.into())).collect()
}

impl JsonTheme {
    fn index_page(&self, project: &Project) -> Result<Vec<u8>, BuildError> {
        #[derive(Serialize)]
        struct IndexPage<'a> {
            title: &'a str,
            version: VersionEntry<'a>,
            versions: Vec<VersionEntry<'a>>,
            has_namespaces: bool,
            namespaces: Vec<String>,
            classes: Vec<&'a str>,
            interfaces: Vec<&'a str>,
        }

        let classes = project.project_classes();
        let interfaces = project.project_interfaces();
        let version = project.version();
        to_json(&IndexPage {
            title: &project.settings().title,
            version: VersionEntry {
                name: version.name(),
                long_name: version.long_name(),
            },
            versions: project
                .versions()
                .iter()
                .map(|v| VersionEntry {
                    name: v.name(),
                    long_name: v.long_name(),
                })
                .collect(),
            has_namespaces: project.has_namespaces(),
            namespaces: if project.settings().simulate_namespaces {
                project.simulated_namespaces()
            } else {
                project.namespaces()
            },
            classes: names(&classes),
            interfaces: names(&interfaces),
        })
    }

    /// Classes, methods and properties grouped by upper-cased first letter.
    fn search_page(&self, project: &Project) -> Result<Vec<u8>, BuildError> {
        let mut items: BTreeMap<String, Vec<SearchEntry>> = BTreeMap::new();
        let mut add = |kind: &'static str, name: &str, class: &str| {
            let letter = name
                .chars()
                .next()
                .map(|c| c.to_uppercase().to_string())
                .unwrap_or_default();
            items.entry(letter).or_default().push(SearchEntry {
                kind,
                name: name.to_string(),
                class: class.to_string(),
            });
        };
        for class in project.project_classes() {
            let class_name = class.info.name.as_str();
            add("class", class.short_name(), class_name);
            for property in class.properties().keys() {
                add("property", property, class_name);
            }
            for method in class.methods().keys() {
                add("method", method, class_name);
            }
        }
        to_json(&items)
    }
}

impl Theme for JsonTheme {
    fn name(&self) -> &str {
        "json"
    }

    fn static_files(&self, _project: &Project) -> Result<Vec<Page>, BuildError> {
        #[derive(Serialize)]
        struct Manifest {
            theme: &'static str,
            format: u32,
        }
        Ok(vec![Page {
            target: "theme.json".to_string(),
            body: to_json(&Manifest {
                theme: "json",
                format: 1,
            })?,
        }])
    }

    fn global_pages(&self) -> Vec<String> {
        vec![INDEX_PAGE.to_string(), SEARCH_PAGE.to_string()]
    }

    fn render_global(&self, target: &str, project: &Project) -> Result<Vec<u8>, BuildError> {
        match target {
            INDEX_PAGE => self.index_page(project),
            SEARCH_PAGE => self.search_page(project),
            other => Err(BuildError::Render(format!("json theme has no page {other}"))),
        }
    }

    fn render_namespace(&self, namespace: &str, project: &Project) -> Result<Vec<Page>, BuildError> {
        #[derive(Serialize)]
        struct NamespacePage<'a> {
            namespace: &'a str,
            sub_namespaces: Vec<String>,
            classes: Vec<&'a str>,
            interfaces: Vec<&'a str>,
            exceptions: Vec<&'a str>,
        }

        let (sub_namespaces, classes, interfaces, exceptions) =
            if project.settings().simulate_namespaces {
                (
                    project.simulated_sub_namespaces(namespace),
                    project.simulated_namespace_classes(namespace),
                    Vec::new(),
                    Vec::new(),
                )
            } else {
                (
                    project.namespace_sub_namespaces(namespace),
                    project.namespace_classes(namespace),
                    project.namespace_interfaces(namespace),
                    project.namespace_exceptions(namespace),
                )
            };
        let body = to_json(&NamespacePage {
            namespace,
            sub_namespaces,
            classes: names(&classes),
            interfaces: names(&interfaces),
            exceptions: names(&exceptions),
        })?;
        Ok(self
            .namespace_outputs(namespace)
            .into_iter()
            .map(|target| Page {
                target,
                body: body.clone(),
            })
            .collect())
    }

    fn render_class(&self, class: &ClassEntity, project: &Project) -> Result<Vec<Page>, BuildError> {
        let settings = project.settings();
        let deep = settings.include_parent_data;
        let (methods, properties, constants) = if deep {
            (
                declared(class.methods_deep(project)?),
                declared(class.properties_deep(project)?),
                declared(class.constants_deep(project)?),
            )
        } else {
            (
                own(class, class.methods()),
                own(class, class.properties()),
                own(class, class.constants()),
            )
        };

        let see = class
            .info
            .see
            .iter()
            .map(|see| {
                let target = project.resolve_see(see)?;
                Ok(SeeLink {
                    kind: target.kind(),
                    target: target.target(),
                    description: &see.description,
                })
            })
            .collect::<Result<Vec<_>, BuildError>>()?;
        let source_url = class
            .relative_file
            .as_deref()
            .and_then(|path| settings.source_url(project.version(), path, class.line()));

        let body = to_json(&ClassPage {
            name: &class.info.name,
            short_name: class.short_name(),
            namespace: &class.namespace,
            category: class.category_name(),
            is_abstract: class.is_abstract(),
            is_final: class.is_final(),
            is_exception: class.is_exception(project, &settings.exception_root)?,
            short_desc: class.short_desc(),
            long_desc: class.long_desc(),
            deprecated: !class.deprecated().is_empty(),
            parent: class.parent(),
            parents: class.parent_names(project)?,
            interfaces: class.interface_names(project, deep)?,
            traits: class.trait_names(project, deep)?,
            file: class.relative_file.as_deref(),
            line: class.line(),
            source_url,
            see,
            methods,
            properties,
            constants,
        })?;
        Ok(self
            .class_outputs(&class.info.name)
            .into_iter()
            .map(|target| Page {
                target,
                body: body.clone(),
            })
            .collect())
    }

    fn class_outputs(&self, class: &str) -> Vec<String> {
        vec![format!("classes/{}.json", class.replace('\\', "/"))]
    }

    fn namespace_outputs(&self, namespace: &str) -> Vec<String> {
        let path = if namespace.is_empty() {
            "_global".to_string()
        } else {
            namespace.replace('\\', "/")
        };
        vec![format!("namespaces/{path}.json")]
    }
}

#[cfg(test)]
mod tests {
    use folio_model::SeeRef;
    use folio_store::MemoryStore;

    use super::*;
    use crate::project::BuildSettings;
    use crate::version::{Version, VersionCollection};

    fn project(dir: &std::path::Path, include_parent_data: bool) -> Project {
        let mut settings = BuildSettings::new(
            dir.join("build").to_string_lossy(),
            dir.join("cache").to_string_lossy(),
        );
        settings.title = "Acme".to_string();
        settings.include_parent_data = include_parent_data;
        let mut project = Project::new(
            Box::new(MemoryStore::new()),
            VersionCollection::single(Version::new("main")),
            settings,
        )
        .unwrap();
        let mut base = ClassEntity::new("Acme\\Base", 1);
        base.set_namespace("Acme");
        base.add_method(MethodEntity::new("boot", 2));
        project.add_class(base).unwrap();
        let mut child = ClassEntity::new("Acme\\Http\\Client", 1);
        child.set_namespace("Acme\\Http");
        child.set_parent(Some("Acme\\Base"));
        child.add_method(MethodEntity::new("send", 5));
        project.add_class(child).unwrap();
        project
    }

    fn json(bytes: &[u8]) -> serde_json::Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn unknown_theme_is_rejected() {
        let themes = ThemeSet::builtin();
        assert_eq!(themes.names(), ["json"]);
        assert!(themes.get("json").is_ok());
        assert!(matches!(
            themes.get("fancy"),
            Err(ConfigError::UnknownTheme(name)) if name == "fancy"
        ));
    }

    #[test]
    fn output_paths() {
        assert_eq!(
            JsonTheme.class_outputs("Acme\\Http\\Client"),
            ["classes/Acme/Http/Client.json"]
        );
        assert_eq!(JsonTheme.namespace_outputs(""), ["namespaces/_global.json"]);
        assert_eq!(JsonTheme.namespace_outputs("Acme\\Http"), ["namespaces/Acme/Http.json"]);
    }

    #[test]
    fn class_page_includes_inherited_members() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path(), true);
        let client = project.loaded_class("Acme\\Http\\Client").unwrap();

        let pages = JsonTheme.render_class(&client, &project).unwrap();
        let page = json(&pages[0].body);
        assert_eq!(page["short_name"], "Client");
        assert_eq!(page["parents"][0], "Acme\\Base");
        assert_eq!(page["methods"]["boot"]["declared_in"], "Acme\\Base");
        assert_eq!(page["methods"]["send"]["declared_in"], "Acme\\Http\\Client");
    }

    #[test]
    fn class_page_without_parent_data() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path(), false);
        let client = project.loaded_class("Acme\\Http\\Client").unwrap();

        let page = json(&JsonTheme.render_class(&client, &project).unwrap()[0].body);
        assert!(page["methods"].get("boot").is_none());
        assert!(page["methods"].get("send").is_some());
    }

    #[test]
    fn class_page_links_see_references_and_sources() {
        let dir = tempfile::tempdir().unwrap();
        let mut project = project(dir.path(), true);
        project
            .modify_class("Acme\\Http\\Client", |c| {
                c.relative_file = Some("Http/Client.php".to_string());
                c.info.see = vec![
                    SeeRef {
                        reference: "Acme\\Base::boot()".to_string(),
                        description: "startup".to_string(),
                        class: Some("Acme\\Base".to_string()),
                        method: Some("boot".to_string()),
                    },
                    SeeRef {
                        reference: "Psr\\Log".to_string(),
                        class: Some("Psr\\Log".to_string()),
                        ..SeeRef::default()
                    },
                    SeeRef {
                        reference: "https://example.com".to_string(),
                        ..SeeRef::default()
                    },
                ];
                true
            })
            .unwrap();
        let client = project.loaded_class("Acme\\Http\\Client").unwrap();

        let page = json(&JsonTheme.render_class(&client, &project).unwrap()[0].body);
        assert_eq!(page["see"][0]["kind"], "method");
        assert_eq!(page["see"][0]["target"], "Acme\\Base::boot");
        assert_eq!(page["see"][0]["description"], "startup");
        assert_eq!(page["see"][1]["kind"], "external");
        assert_eq!(page["see"][2]["kind"], "unresolved");
        assert_eq!(page["see"][2]["target"], "https://example.com");
        assert!(page["source_url"].is_null());
    }

    #[test]
    fn class_page_source_url_uses_the_template() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = BuildSettings::new(
            dir.path().join("build").to_string_lossy(),
            dir.path().join("cache").to_string_lossy(),
        );
        settings.source_url = Some("https://example.com/acme/blob/%version%/%path%#L%line%".into());
        let mut project = Project::new(
            Box::new(MemoryStore::new()),
            VersionCollection::single(Version::new("main")),
            settings,
        )
        .unwrap();
        let mut kernel = ClassEntity::new("Kernel", 7);
        kernel.relative_file = Some("src/Kernel.php".to_string());
        let kernel = project.add_class(kernel).unwrap();

        let page = json(&JsonTheme.render_class(&kernel, &project).unwrap()[0].body);
        assert_eq!(
            page["source_url"],
            "https://example.com/acme/blob/main/src/Kernel.php#L7"
        );
    }

    #[test]
    fn global_and_namespace_pages() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path(), true);

        let index = json(&JsonTheme.render_global(INDEX_PAGE, &project).unwrap());
        assert_eq!(index["title"], "Acme");
        assert_eq!(index["namespaces"][1], "Acme\\Http");
        assert_eq!(index["classes"].as_array().unwrap().len(), 2);

        let search = json(&JsonTheme.render_global(SEARCH_PAGE, &project).unwrap());
        assert_eq!(search["S"][0]["name"], "send");
        assert_eq!(search["C"][0]["kind"], "class");

        let pages = JsonTheme.render_namespace("Acme", &project).unwrap();
        let page = json(&pages[0].body);
        assert_eq!(page["sub_namespaces"][0], "Acme\\Http");
        assert_eq!(page["classes"][0], "Acme\\Base");

        assert!(JsonTheme.render_global("nope.json", &project).is_err());
    }
}
