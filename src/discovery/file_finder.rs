use crate::classifier::PathClassifier;
use crate::config::WalkConfig;
use ignore::{DirEntry, WalkBuilder, WalkState};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tracing::{debug, trace, warn};

/// Result of walking a project tree
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    /// Absolute paths of in-scope regular files, sorted
    pub candidates: Vec<String>,

    /// Entries or subtrees that could not be read
    pub errors: usize,
}

enum Found {
    Candidate(String),
    Failed,
}

/// Walks a project tree and collects candidate source files
pub struct FileFinder<'a> {
    classifier: &'a PathClassifier,
    walk: WalkConfig,
}

impl<'a> FileFinder<'a> {
    pub fn new(classifier: &'a PathClassifier) -> Self {
        Self {
            classifier,
            walk: WalkConfig::default(),
        }
    }

    pub fn with_walk_config(mut self, walk: WalkConfig) -> Self {
        self.walk = walk;
        self
    }

    /// Find every candidate file under `root`.
    ///
    /// Directories rejected by the directory denylist are pruned with all
    /// their descendants. Read failures abandon only the affected subtree.
    /// Subdirectories are visited by a pool of workers and the call returns
    /// once every worker has finished.
    pub fn find_candidates(&self, root: &Path) -> WalkOutcome {
        let root = absolute_root(root);
        debug!("Scanning for candidate files in: {}", root.display());

        let mut builder = WalkBuilder::new(&root);
        builder
            .standard_filters(self.walk.respect_ignore_files)
            .hidden(false)
            .require_git(false)
            .follow_links(self.walk.follow_links)
            .threads(self.walk.threads);

        let dir_filter = self.classifier.clone();
        builder.filter_entry(move |entry| {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                return true;
            }
            let keep = dir_filter.accepts_directory(&entry.path().to_string_lossy());
            if !keep {
                trace!("Pruning directory: {}", entry.path().display());
            }
            keep
        });

        let (tx, rx) = mpsc::channel();
        builder.build_parallel().run(|| {
            let tx = tx.clone();
            let classifier = self.classifier;
            Box::new(move |result: Result<DirEntry, ignore::Error>| {
                let found = match result {
                    Ok(entry) => {
                        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                            return WalkState::Continue;
                        }
                        let path = entry.path().to_string_lossy().into_owned();
                        if !classifier.accepts_file(&path) {
                            trace!("Skipping: {}", path);
                            return WalkState::Continue;
                        }
                        trace!("Candidate: {}", path);
                        Found::Candidate(path)
                    }
                    Err(err) => {
                        warn!("Skipping unreadable entry: {}", err);
                        Found::Failed
                    }
                };
                if tx.send(found).is_err() {
                    return WalkState::Quit;
                }
                WalkState::Continue
            })
        });
        drop(tx);

        let mut outcome = WalkOutcome::default();
        for found in rx {
            match found {
                Found::Candidate(path) => outcome.candidates.push(path),
                Found::Failed => outcome.errors += 1,
            }
        }
        outcome.candidates.sort();

        debug!(
            "Found {} candidate files ({} walk errors)",
            outcome.candidates.len(),
            outcome.errors
        );
        outcome
    }
}

/// Canonicalize the root so candidates are absolute. A root that cannot be
/// resolved is returned as given and the walk reports the failure.
pub fn absolute_root(root: &Path) -> PathBuf {
    match std::fs::canonicalize(root) {
        Ok(path) => path,
        Err(err) => {
            trace!("Could not canonicalize {}: {}", root.display(), err);
            if root.is_absolute() {
                root.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(root))
                    .unwrap_or_else(|_| root.to_path_buf())
            }
        }
    }
}
