//! Path classification
//!
//! Pure predicates deciding whether a path is in scope for recording or for
//! the candidate list. Matching is textual: suffixes for the whitelist and
//! substrings for the denylists, both case-sensitive.

use crate::config::{FilterMode, RuleSet};
use std::sync::Arc;

/// True if `path` ends with any of the whitelisted suffixes
pub fn is_whitelisted(path: &str, whitelist: &[String]) -> bool {
    whitelist.iter().any(|suffix| path.ends_with(suffix.as_str()))
}

/// True if `path` contains none of the denylist entries
pub fn is_not_denylisted(path: &str, denylist: &[String]) -> bool {
    denylist.iter().all(|entry| !path.contains(entry.as_str()))
}

/// Applies a [`RuleSet`] to paths. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PathClassifier {
    rules: Arc<RuleSet>,
    mode: FilterMode,
}

impl PathClassifier {
    pub fn new(rules: RuleSet, mode: FilterMode) -> Self {
        Self {
            rules: Arc::new(rules),
            mode,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn is_whitelisted(&self, path: &str) -> bool {
        is_whitelisted(path, &self.rules.extension_whitelist)
    }

    /// Whether a resolved module path should enter the touched set.
    /// Empty paths are never in scope.
    pub fn accepts_resolved(&self, path: &str) -> bool {
        if path.is_empty() || !self.is_whitelisted(path) {
            return false;
        }
        if !is_not_denylisted(path, &self.rules.directory_denylist) {
            return false;
        }
        match self.mode {
            FilterMode::Legacy => true,
            FilterMode::Unified => is_not_denylisted(path, &self.rules.file_denylist),
        }
    }

    /// Whether the walk may descend into a directory
    pub fn accepts_directory(&self, path: &str) -> bool {
        is_not_denylisted(path, &self.rules.directory_denylist)
    }

    /// Whether a regular file found by the walk is a candidate
    pub fn accepts_file(&self, path: &str) -> bool {
        if !self.is_whitelisted(path) || !is_not_denylisted(path, &self.rules.file_denylist) {
            return false;
        }
        match self.mode {
            FilterMode::Legacy => true,
            FilterMode::Unified => is_not_denylisted(path, &self.rules.directory_denylist),
        }
    }
}

impl Default for PathClassifier {
    fn default() -> Self {
        Self::new(RuleSet::default(), FilterMode::default())
    }
}
