//! deadfiles - find source files that never entered a build
//!
//! A [`BuildObserver`] is attached to a build pipeline. While the build runs
//! it records every resolved module that passes the [`RuleSet`]. When the
//! build completes it walks the project tree and writes the source files
//! that were never resolved to a JSON report (`unused.json` by default).
//!
//! # Architecture
//!
//! 1. **Classification** - suffix whitelist and substring denylists
//! 2. **Recording** - concurrent, idempotent touched-file set
//! 3. **Discovery** - parallel tree walk with subtree pruning
//! 4. **Reporting** - candidates minus touched files, written as JSON
//!
//! Nothing here deletes or edits source files.

pub mod classifier;
pub mod config;
pub mod discovery;
pub mod observer;
pub mod replay;
pub mod report;

pub use classifier::PathClassifier;
pub use config::{Config, FilterMode, RuleSet, RuleSetOverrides};
pub use discovery::{FileFinder, WalkOutcome};
pub use observer::{BuildHooks, BuildObserver, CompletionHandle, Phase, TouchedFiles};
pub use report::{ExcludedFileReport, JsonReporter, ReportError, ReportOutcome, TerminalReporter};
