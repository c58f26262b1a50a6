//! Writes a theme's pages for whatever the [`Diff`] says changed.

use std::io;
use std::path::Path;

use crate::diff::Diff;
use crate::error::{io_error, BuildError};
use crate::event::{percent, BuildEvent, BuildObserver, RenderSection};
use crate::project::Project;
use crate::theme::{Page, ThemeSet};

/// Renders the current version of a project with the configured theme.
pub struct Renderer {
    themes: ThemeSet,
}

struct Progress {
    step: usize,
    steps: usize,
}

impl Progress {
    fn advance(&mut self) -> u8 {
        self.step += 1;
        percent(self.step, self.steps)
    }
}

impl Renderer {
    /// A renderer choosing among `themes`.
    pub fn new(themes: ThemeSet) -> Self {
        Self { themes }
    }

    /// Whether the current version's build directory holds a valid snapshot.
    pub fn is_rendered(&self, project: &Project) -> Result<bool, BuildError> {
        Ok(Diff::for_project(project)?.is_already_rendered())
    }

    /// Renders the pages affected since the last render and stores the new
    /// snapshot. Returns the diff that drove the render.
    pub fn render(
        &mut self,
        project: &Project,
        observer: &mut dyn BuildObserver,
    ) -> Result<Diff, BuildError> {
        let diff = Diff::for_project(project)?;
        if diff.is_empty() {
            tracing::debug!(version = %project.version(), "nothing to render");
            return Ok(diff);
        }

        let theme = self.themes.get(&project.settings().theme)?;
        let build_dir = project.build_dir()?;
        let classes = diff.modified_classes();
        let namespaces = diff.namespaces_to_render(project.settings().simulate_namespaces);
        let globals = theme.global_pages();
        let mut progress = Progress {
            step: 0,
            steps: classes.len() + namespaces.len() + globals.len() + 1,
        };
        let mut written = 0usize;

        observer.on_event(BuildEvent::RenderProgress {
            section: RenderSection::Static,
            message: "Rendering static files",
            percent: progress.advance(),
        });
        for page in theme.static_files(project)? {
            write_page(&build_dir, &page)?;
            written += 1;
        }

        for target in &globals {
            observer.on_event(BuildEvent::RenderProgress {
                section: RenderSection::Global,
                message: target,
                percent: progress.advance(),
            });
            let page = Page {
                target: target.clone(),
                body: theme.render_global(target, project)?,
            };
            write_page(&build_dir, &page)?;
            written += 1;
        }

        for namespace in &namespaces {
            observer.on_event(BuildEvent::RenderProgress {
                section: RenderSection::Namespace,
                message: namespace,
                percent: progress.advance(),
            });
            for page in theme.render_namespace(namespace, project)? {
                write_page(&build_dir, &page)?;
                written += 1;
            }
        }

        for name in &classes {
            observer.on_event(BuildEvent::RenderProgress {
                section: RenderSection::Class,
                message: name,
                percent: progress.advance(),
            });
            let Some(class) = project.load_class(name)? else {
                tracing::warn!(class = %name, "class vanished before rendering");
                continue;
            };
            for page in theme.render_class(&class, project)? {
                write_page(&build_dir, &page)?;
                written += 1;
            }
        }

        let mut removed = 0usize;
        for name in diff.removed_classes() {
            for target in theme.class_outputs(&name) {
                removed += remove_page(&build_dir, &target)? as usize;
            }
        }
        for namespace in diff.removed_namespaces() {
            for target in theme.namespace_outputs(&namespace) {
                removed += remove_page(&build_dir, &target)? as usize;
            }
        }

        diff.save()?;
        tracing::info!(
            version = %project.version(),
            classes = classes.len(),
            namespaces = namespaces.len(),
            written,
            removed,
            "render complete"
        );
        Ok(diff)
    }
}

fn write_page(build_dir: &Path, page: &Page) -> Result<(), BuildError> {
    let path = build_dir.join(&page.target);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    std::fs::write(&path, &page.body).map_err(io_error(&path))
}

/// Returns whether a file was actually deleted.
fn remove_page(build_dir: &Path, target: &str) -> Result<bool, BuildError> {
    let path = build_dir.join(target);
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_error(&path)(e)),
    }
}
