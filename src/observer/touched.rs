//! Concurrent record of files the build resolved.

use dashmap::DashSet;
use std::collections::HashSet;
use std::path::Path;

/// Absolute paths of touched files.
///
/// Inserts are safe from any number of threads and idempotent.
#[derive(Debug, Default)]
pub struct TouchedFiles {
    seen: DashSet<String>,
}

impl TouchedFiles {
    pub fn new() -> Self {
        Self {
            seen: DashSet::new(),
        }
    }

    /// Record a path. Returns `true` the first time the path is seen.
    pub fn record(&self, path: &str) -> bool {
        if self.seen.contains(path) {
            return false;
        }
        self.seen.insert(path.to_string())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.seen.contains(path)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Every recorded path plus its canonical form where it exists on disk.
    ///
    /// Recording stores paths exactly as the host reports them. The walk
    /// produces paths under a canonical root, so a path resolved through
    /// `..` segments or a symlinked root only matches after the same
    /// canonicalization. Paths that cannot be canonicalized keep their raw
    /// form only.
    pub fn resolved_forms(&self) -> HashSet<String> {
        let mut forms = HashSet::with_capacity(self.seen.len());
        for entry in self.seen.iter() {
            let raw = entry.key();
            if let Ok(canonical) = std::fs::canonicalize(Path::new(raw)) {
                forms.insert(canonical.to_string_lossy().into_owned());
            }
            forms.insert(raw.clone());
        }
        forms
    }

    /// Copy of the recorded paths, sorted
    pub fn snapshot(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.seen.iter().map(|p| p.key().clone()).collect();
        paths.sort();
        paths
    }
}
