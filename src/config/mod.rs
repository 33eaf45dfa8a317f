mod loader;
mod rules;

pub use loader::{Config, ReportConfig, WalkConfig, DEFAULT_REPORT_FILE};
pub use rules::{FilterMode, RuleSet, RuleSetOverrides};
