use super::{ExcludedFileReport, ReportError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes the excluded-file report as a JSON array of absolute paths
pub struct JsonReporter {
    output_path: PathBuf,
    pretty: bool,
}

impl JsonReporter {
    pub fn new(output_path: PathBuf) -> Self {
        Self {
            output_path,
            pretty: false,
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Serialize the report, replacing any previous file
    pub fn write(&self, report: &ExcludedFileReport) -> Result<(), ReportError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };

        std::fs::write(&self.output_path, json).map_err(|source| ReportError::WriteError {
            path: self.output_path.clone(),
            source,
        })?;

        debug!(
            "Wrote {} excluded files to {}",
            report.len(),
            self.output_path.display()
        );
        Ok(())
    }
}
