//! Terminal status lines for build events.

use std::io::Write;

use folio_build::{BuildEvent, BuildObserver};

/// Prints build events as right-aligned status lines.
///
/// Per-class progress only shows with `--verbose`; `--quiet` silences
/// everything.
pub struct StatusPrinter<W: Write> {
    out: W,
    quiet: bool,
    verbose: bool,
}

impl StatusPrinter<std::io::Stderr> {
    /// A printer writing to stderr.
    pub fn stderr(quiet: bool, verbose: bool) -> Self {
        Self::new(std::io::stderr(), quiet, verbose)
    }
}

impl<W: Write> StatusPrinter<W> {
    /// A printer writing to `out`.
    pub fn new(out: W, quiet: bool, verbose: bool) -> Self {
        Self {
            out,
            quiet,
            verbose,
        }
    }

    fn line(&mut self, status: &str, message: std::fmt::Arguments<'_>) {
        // Progress output is best effort.
        let _ = writeln!(self.out, "{status:>10} {message}");
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> BuildObserver for StatusPrinter<W> {
    fn on_event(&mut self, event: BuildEvent<'_>) {
        if self.quiet {
            return;
        }
        match event {
            BuildEvent::VersionSwitched(version) => {
                self.line("Version", format_args!("{}", version.long_name()));
            }
            BuildEvent::ClassParsed { percent, class } if self.verbose => {
                self.line("Parsing", format_args!("[{percent:>3}%] {}", class.info.name));
            }
            BuildEvent::ParseErrors { path, errors } => {
                for error in errors {
                    self.line("warning", format_args!("{}: {error}", path.display()));
                }
            }
            BuildEvent::ParseFinished(transaction) => {
                let modified = transaction.modified_classes().len();
                let removed = transaction.removed_classes().len();
                self.line(
                    "Parsed",
                    format_args!("{modified} classes changed, {removed} removed"),
                );
            }
            BuildEvent::RenderProgress {
                section,
                message,
                percent,
            } if self.verbose => {
                self.line(
                    "Rendering",
                    format_args!("[{percent:>3}%] {section} {message}"),
                );
            }
            BuildEvent::RenderFinished(diff) => {
                if diff.is_empty() {
                    self.line("Rendered", format_args!("nothing changed"));
                } else {
                    self.line(
                        "Rendered",
                        format_args!(
                            "{} classes changed, {} removed",
                            diff.modified_classes().len(),
                            diff.removed_classes().len()
                        ),
                    );
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use folio_build::{RenderSection, Version};
    use folio_model::ClassEntity;

    use super::*;

    fn output(printer: StatusPrinter<Vec<u8>>) -> String {
        String::from_utf8(printer.into_inner()).unwrap()
    }

    #[test]
    fn default_output_skips_per_item_progress() {
        let mut printer = StatusPrinter::new(Vec::new(), false, false);
        let version = Version::new("2.x").with_long_name("2.x (dev)");
        let class = ClassEntity::new("App\\Kernel", 1);

        printer.on_event(BuildEvent::VersionSwitched(&version));
        printer.on_event(BuildEvent::ClassParsed {
            percent: 50,
            class: &class,
        });
        printer.on_event(BuildEvent::ParseErrors {
            path: Path::new("src/Kernel.php"),
            errors: &["missing @return".to_string()],
        });

        assert_eq!(
            output(printer),
            "   Version 2.x (dev)\n   warning src/Kernel.php: missing @return\n"
        );
    }

    #[test]
    fn verbose_output_shows_progress() {
        let mut printer = StatusPrinter::new(Vec::new(), false, true);
        printer.on_event(BuildEvent::RenderProgress {
            section: RenderSection::Class,
            message: "App\\Kernel",
            percent: 7,
        });
        assert_eq!(output(printer), " Rendering [  7%] Class App\\Kernel\n");
    }

    #[test]
    fn quiet_prints_nothing() {
        let mut printer = StatusPrinter::new(Vec::new(), true, true);
        let version = Version::new("main");
        printer.on_event(BuildEvent::VersionSwitched(&version));
        assert!(output(printer).is_empty());
    }
}
