use super::ReportOutcome;
use colored::Colorize;
use std::path::Path;

/// Terminal summary of a completed run
pub struct TerminalReporter {
    /// List every excluded path, not just the counts
    list_paths: bool,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self { list_paths: false }
    }

    pub fn with_paths(mut self, list: bool) -> Self {
        self.list_paths = list;
        self
    }

    pub fn report(&self, outcome: &ReportOutcome, root: &Path) {
        let excluded = outcome.report.len();

        if excluded == 0 {
            println!("{}", "No unused files found!".green().bold());
        } else {
            println!(
                "{}",
                format!("Found {} files outside the build graph", excluded)
                    .yellow()
                    .bold()
            );
        }

        if self.list_paths {
            for path in outcome.report.paths() {
                let shown = Path::new(path).strip_prefix(root).unwrap_or(Path::new(path));
                println!("  {} {}", "○".dimmed(), shown.display());
            }
        }

        println!(
            "{}",
            format!(
                "  {} candidates, {} touched, {} excluded",
                outcome.candidates, outcome.touched, excluded
            )
            .dimmed()
        );

        if outcome.walk_errors > 0 {
            println!(
                "{}",
                format!("  {} entries could not be read", outcome.walk_errors).yellow()
            );
        }

        match &outcome.written_to {
            Some(path) => println!("Report written to: {}", path.display()),
            None => println!("{}", "Report could not be written".red()),
        }
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
