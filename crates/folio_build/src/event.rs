//! Progress reporting.

use std::fmt;
use std::path::Path;

use folio_model::ClassEntity;

use crate::diff::Diff;
use crate::transaction::Transaction;
use crate::version::Version;

/// Phase of a render run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderSection {
    /// Files copied verbatim from the theme.
    Static,
    /// Project-wide pages.
    Global,
    /// One page per namespace.
    Namespace,
    /// One page per class.
    Class,
}

impl fmt::Display for RenderSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Static => "Static",
            Self::Global => "Global",
            Self::Namespace => "Namespace",
            Self::Class => "Class",
        })
    }
}

/// Something worth reporting while a build runs.
#[derive(Debug)]
pub enum BuildEvent<'a> {
    /// A class was produced by the unit parser.
    ClassParsed {
        /// Share of units processed so far, `0..=100`.
        percent: u8,
        /// The freshly parsed class.
        class: &'a ClassEntity,
    },
    /// The unit parser reported problems for one unit.
    ParseErrors {
        /// The unit.
        path: &'a Path,
        /// The reported problems.
        errors: &'a [String],
    },
    /// The project now works on this version.
    VersionSwitched(&'a Version),
    /// A parse run finished.
    ParseFinished(&'a Transaction),
    /// A page or group of files is being written.
    RenderProgress {
        /// Current phase.
        section: RenderSection,
        /// What is being rendered.
        message: &'a str,
        /// Share of steps done, `0..=100`.
        percent: u8,
    },
    /// A render run finished.
    RenderFinished(&'a Diff),
}

/// Receives [`BuildEvent`]s. `()` ignores them.
pub trait BuildObserver {
    /// Called inline from the pipeline; keep it cheap.
    fn on_event(&mut self, event: BuildEvent<'_>);
}

impl BuildObserver for () {
    fn on_event(&mut self, _event: BuildEvent<'_>) {}
}

/// `floor(step / total * 100)`, with an empty run counting as done.
pub(crate) fn percent(step: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (step.min(total) * 100 / total) as u8
}
