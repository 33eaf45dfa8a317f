mod json;
mod terminal;

pub use json::JsonReporter;
pub use terminal::TerminalReporter;

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors writing the excluded-file report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to serialize report: {0}")]
    SerializeError(#[from] serde_json::Error),
    #[error("Failed to write report to {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Candidate files that no resolution event ever touched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExcludedFileReport {
    paths: Vec<String>,
}

impl ExcludedFileReport {
    /// Keep every candidate that `is_touched` rejects, preserving candidate order
    pub fn from_diff<F>(candidates: Vec<String>, is_touched: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        let paths = candidates
            .into_iter()
            .filter(|path| !is_touched(path))
            .collect();
        Self { paths }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn into_paths(self) -> Vec<String> {
        self.paths
    }
}

/// What a completed diff produced
#[derive(Debug, Clone, Default)]
pub struct ReportOutcome {
    pub report: ExcludedFileReport,

    /// Number of candidate files found on disk
    pub candidates: usize,

    /// Number of touched files recorded when the diff ran
    pub touched: usize,

    /// Entries or subtrees the walk could not read
    pub walk_errors: usize,

    /// Where the report was written, `None` if the write failed
    pub written_to: Option<PathBuf>,
}

impl ReportOutcome {
    pub fn is_written(&self) -> bool {
        self.written_to.is_some()
    }
}
