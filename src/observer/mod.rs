//! Build observer
//!
//! Records every in-scope module the host build resolves and, once the
//! build completes, walks the project tree and writes the files that were
//! never resolved to the report.
//!
//! Each [`BuildObserver`] owns its own touched-file set, so several observers
//! can run side by side in one process. Clones share the same state and can
//! be handed to every task that emits resolution events.

mod touched;

pub use touched::TouchedFiles;

use crate::classifier::PathClassifier;
use crate::config::Config;
use crate::discovery::{absolute_root, FileFinder};
use crate::report::{ExcludedFileReport, JsonReporter, ReportOutcome};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, error, info, trace, warn};

/// Lifecycle of an observer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, no resolution event yet
    Idle,
    /// Build in progress
    Recording,
    /// Completion signalled, walk and diff running
    Diffing,
    /// Report written or failed
    Finished,
}

impl Phase {
    fn as_u8(self) -> u8 {
        match self {
            Phase::Idle => 0,
            Phase::Recording => 1,
            Phase::Diffing => 2,
            Phase::Finished => 3,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Phase::Idle,
            1 => Phase::Recording,
            2 => Phase::Diffing,
            3 => Phase::Finished,
            other => {
                debug_assert!(false, "invalid observer phase {}", other);
                Phase::Finished
            }
        }
    }
}

/// Signals a host build pipeline delivers to an observer
pub trait BuildHooks {
    /// A module was resolved to `path`
    fn on_module_resolved(&self, path: &str);

    /// The build finished. The returned handle completes once the report
    /// has been written or has failed.
    fn on_build_complete(&self) -> CompletionHandle;
}

struct Inner {
    root: PathBuf,
    config: Config,
    classifier: PathClassifier,
    touched: TouchedFiles,
    phase: AtomicU8,
}

/// Shared handle to one build's observer state
#[derive(Clone)]
pub struct BuildObserver {
    inner: Arc<Inner>,
}

impl BuildObserver {
    /// Observer for a build rooted at `root`
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        let classifier = PathClassifier::new(config.rules.clone(), config.filter_mode);
        Self {
            inner: Arc::new(Inner {
                root: root.into(),
                config,
                classifier,
                touched: TouchedFiles::new(),
                phase: AtomicU8::new(Phase::Idle.as_u8()),
            }),
        }
    }

    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn classifier(&self) -> &PathClassifier {
        &self.inner.classifier
    }

    pub fn touched(&self) -> &TouchedFiles {
        &self.inner.touched
    }

    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.inner.phase.load(Ordering::Acquire))
    }

    /// Record a resolved module if it is in scope. Never fails: empty,
    /// virtual or out-of-scope paths are ignored.
    pub fn observe_resolved(&self, path: &str) {
        let _ = self.inner.phase.compare_exchange(
            Phase::Idle.as_u8(),
            Phase::Recording.as_u8(),
            Ordering::AcqRel,
            Ordering::Acquire,
        );

        if !self.inner.classifier.accepts_resolved(path) {
            trace!("Ignoring resolved path: {:?}", path);
            return;
        }

        if self.inner.touched.record(path) {
            if matches!(self.phase(), Phase::Diffing | Phase::Finished) {
                trace!("Late resolution event recorded: {}", path);
            } else {
                trace!("Touched: {}", path);
            }
        }
    }

    /// Walk `root`, diff against the touched set and write the report,
    /// synchronously on the calling thread.
    ///
    /// Shares the one-shot rule with [`finish`](Self::finish): only the first
    /// of the two to run performs the diff, and the phase ends at
    /// `Finished`. Returns `None` if a diff already started.
    pub fn produce_report(&self, root: &Path) -> Option<ReportOutcome> {
        if !self.begin_diff() {
            warn!("Report already produced for this build; ignoring");
            return None;
        }
        Some(self.diff_and_finish(root))
    }

    /// Start the walk and diff on a background thread.
    ///
    /// Only the first call runs the diff; later calls are logged and return
    /// a handle that yields `None`.
    pub fn finish(&self) -> CompletionHandle {
        if !self.begin_diff() {
            warn!("Build completion signalled more than once; ignoring");
            return CompletionHandle::skipped();
        }

        debug!("Build complete, diffing {}", self.inner.root.display());

        let observer = self.clone();
        let spawned = std::thread::Builder::new()
            .name("deadfiles-diff".to_string())
            .spawn(move || observer.diff_and_finish(&observer.inner.root));

        match spawned {
            Ok(handle) => CompletionHandle {
                state: HandleState::Running(handle),
            },
            Err(e) => {
                warn!("Could not spawn diff thread ({}); diffing inline", e);
                CompletionHandle {
                    state: HandleState::Done(Box::new(self.diff_and_finish(&self.inner.root))),
                }
            }
        }
    }

    /// Move `Idle|Recording` to `Diffing`. False if a diff already started.
    fn begin_diff(&self) -> bool {
        let phase = &self.inner.phase;
        [Phase::Idle, Phase::Recording].into_iter().any(|from| {
            phase
                .compare_exchange(
                    from.as_u8(),
                    Phase::Diffing.as_u8(),
                    Ordering::AcqRel,
                    Ordering::Acquire,
                )
                .is_ok()
        })
    }

    fn diff_and_finish(&self, root: &Path) -> ReportOutcome {
        let outcome = self.write_report(root);
        self.inner
            .phase
            .store(Phase::Finished.as_u8(), Ordering::Release);
        outcome
    }

    /// Walk failures shrink the candidate list; a failed write leaves
    /// `written_to` empty. Neither is returned as an error.
    fn write_report(&self, root: &Path) -> ReportOutcome {
        let root = absolute_root(root);
        let config = &self.inner.config;

        let walk = FileFinder::new(&self.inner.classifier)
            .with_walk_config(config.walk.clone())
            .find_candidates(&root);

        let candidates = walk.candidates.len();
        let touched = self.inner.touched.resolved_forms();
        let report = ExcludedFileReport::from_diff(walk.candidates, |path| touched.contains(path));
        let touched_count = self.inner.touched.len();

        debug!(
            "{} candidates, {} touched, {} excluded",
            candidates,
            touched_count,
            report.len()
        );

        let output = config.report_path_for(&root);
        let reporter = JsonReporter::new(output.clone()).with_pretty(config.report.pretty);
        let written_to = match reporter.write(&report) {
            Ok(()) => {
                info!("Report written to: {}", output.display());
                Some(output)
            }
            Err(e) => {
                error!("{}", e);
                None
            }
        };

        ReportOutcome {
            report,
            candidates,
            touched: touched_count,
            walk_errors: walk.errors,
            written_to,
        }
    }
}

impl BuildHooks for BuildObserver {
    fn on_module_resolved(&self, path: &str) {
        self.observe_resolved(path);
    }

    fn on_build_complete(&self) -> CompletionHandle {
        self.finish()
    }
}

enum HandleState {
    Running(JoinHandle<ReportOutcome>),
    Done(Box<ReportOutcome>),
    Skipped,
}

/// Waitable completion of a build's report
pub struct CompletionHandle {
    state: HandleState,
}

impl CompletionHandle {
    fn skipped() -> Self {
        Self {
            state: HandleState::Skipped,
        }
    }

    /// True once `wait` would return without blocking
    pub fn is_finished(&self) -> bool {
        match &self.state {
            HandleState::Running(handle) => handle.is_finished(),
            HandleState::Done(_) | HandleState::Skipped => true,
        }
    }

    /// Block until the report has been written or has failed.
    /// Returns `None` if this completion signal did not run a diff.
    pub fn wait(self) -> Option<ReportOutcome> {
        match self.state {
            HandleState::Running(handle) => match handle.join() {
                Ok(outcome) => Some(outcome),
                Err(_) => {
                    error!("Diff thread panicked");
                    None
                }
            },
            HandleState::Done(outcome) => Some(*outcome),
            HandleState::Skipped => None,
        }
    }
}
