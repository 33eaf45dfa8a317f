use super::{FilterMode, RuleSet};
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the excluded-file report, relative to the scanned root
pub const DEFAULT_REPORT_FILE: &str = "unused.json";

/// Configuration for a deadfiles run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source-file rules
    pub rules: RuleSet,

    /// How the denylists are applied to recorded and walked files
    pub filter_mode: FilterMode,

    /// Report configuration
    pub report: ReportConfig,

    /// Tree walk configuration
    pub walk: WalkConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Report location; relative paths are resolved against the scanned root
    pub path: PathBuf,

    /// Indent the JSON array
    pub pretty: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// Follow symbolic links while walking
    pub follow_links: bool,

    /// Also prune entries matched by .gitignore / .ignore files
    pub respect_ignore_files: bool,

    /// Worker threads for the walk (0 picks automatically)
    pub threads: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_REPORT_FILE),
            pretty: false,
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        let default_names = [
            ".deadfiles.yml",
            ".deadfiles.yaml",
            ".deadfiles.toml",
            "deadfiles.yml",
            "deadfiles.yaml",
            "deadfiles.toml",
        ];

        for name in &default_names {
            let path = project_root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_filter_mode(mut self, mode: FilterMode) -> Self {
        self.filter_mode = mode;
        self
    }

    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report.path = path.into();
        self
    }

    /// Where the report lands for a scan of `root`
    pub fn report_path_for(&self, root: &Path) -> PathBuf {
        if self.report.path.is_absolute() {
            self.report.path.clone()
        } else {
            root.join(&self.report.path)
        }
    }
}
