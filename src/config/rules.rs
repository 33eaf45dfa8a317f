use serde::{Deserialize, Serialize};

/// Source-file rules applied to both resolution events and the tree walk.
///
/// Every entry of the denylists is matched as a plain substring of the full
/// path, so `"dist"` also rejects `src/redistill.ts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Suffixes marking a path as a source file (`.ts` matches `foo.min.ts`)
    pub extension_whitelist: Vec<String>,

    /// Substrings that exclude a path from traversal and recording
    pub directory_denylist: Vec<String>,

    /// Substrings (filenames or path fragments) that exclude a file
    pub file_denylist: Vec<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            extension_whitelist: strings(&[".js", ".ts", ".tsx", ".jsx", ".css"]),
            directory_denylist: strings(&["node_modules", "dist", ".git", "plugins"]),
            file_denylist: strings(&[
                "package.json",
                "package-lock.json",
                ".gitignore",
                ".nvmrc",
                ".prettierrc.yaml",
                "README.md",
                "statoscope.config.js",
                "stats.json",
                "tsconfig.json",
                "usedFiles",
                "webpack.config.ts",
                "unused.json",
            ]),
        }
    }
}

impl RuleSet {
    /// Rules with every list empty. Nothing is whitelisted.
    pub fn empty() -> Self {
        Self {
            extension_whitelist: Vec::new(),
            directory_denylist: Vec::new(),
            file_denylist: Vec::new(),
        }
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extension_whitelist = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_directory_denylist<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directory_denylist = entries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_file_denylist<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_denylist = entries.into_iter().map(Into::into).collect();
        self
    }

    /// Merge caller overrides over these rules. A provided field replaces the
    /// existing list wholesale; lists are never concatenated.
    pub fn merged(mut self, overrides: RuleSetOverrides) -> Self {
        if let Some(whitelist) = overrides.extension_whitelist {
            self.extension_whitelist = whitelist;
        }
        if let Some(denylist) = overrides.directory_denylist {
            self.directory_denylist = denylist;
        }
        if let Some(denylist) = overrides.file_denylist {
            self.file_denylist = denylist;
        }
        self
    }
}

/// Partial rule configuration supplied by a caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSetOverrides {
    pub extension_whitelist: Option<Vec<String>>,
    pub directory_denylist: Option<Vec<String>>,
    pub file_denylist: Option<Vec<String>>,
}

impl RuleSetOverrides {
    pub fn is_empty(&self) -> bool {
        self.extension_whitelist.is_none()
            && self.directory_denylist.is_none()
            && self.file_denylist.is_none()
    }
}

/// How the denylists are applied when deciding whether a file counts.
///
/// `Legacy` reproduces the historical asymmetry: resolution events are only
/// checked against the directory denylist while walked files are only
/// checked against the file denylist. `Unified` applies both denylists to
/// both decisions, so a file can never be a candidate that recording would
/// refuse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    Unified,
    Legacy,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
