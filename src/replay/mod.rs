//! Recorded resolution events
//!
//! Reads the module paths a build resolved so they can be replayed into an
//! observer after the fact. Accepts either a JSON array of strings or one
//! path per line.

use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::Path;

/// Parse recorded resolution events.
///
/// Line format skips blank lines and lines starting with `#`. Relative
/// entries are joined onto `root`.
pub fn parse_resolved(contents: &str, root: &Path) -> Result<Vec<String>> {
    let trimmed = contents.trim_start();

    let raw: Vec<String> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed)
            .into_diagnostic()
            .wrap_err("Resolved paths must be a JSON array of strings")?
    } else {
        contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect()
    };

    Ok(raw
        .into_iter()
        .map(|entry| {
            let path = Path::new(&entry);
            if path.is_absolute() || entry.is_empty() {
                entry
            } else {
                root.join(path).to_string_lossy().into_owned()
            }
        })
        .collect())
}

/// Read and parse a file of recorded resolution events
pub fn load_resolved(path: &Path, root: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read resolved paths: {}", path.display()))?;
    parse_resolved(&contents, root)
}
