use clap::Parser;
use colored::Colorize;
use deadfiles::discovery::absolute_root;
use deadfiles::replay::load_resolved;
use deadfiles::{BuildHooks, BuildObserver, Config, FilterMode, RuleSetOverrides, TerminalReporter};
use miette::Result;
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// deadfiles - report source files that a build never resolved
///
/// Replays the module paths a build resolved into an observer, then walks
/// the project and writes the files that were never resolved to a JSON
/// report.
#[derive(Parser, Debug)]
#[command(name = "deadfiles")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project root to scan
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Files listing resolved module paths (JSON array or one per line)
    #[arg(short, long, value_name = "FILE")]
    resolved: Vec<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source file suffixes (replaces the configured whitelist)
    #[arg(long = "ext", value_name = "SUFFIX")]
    extensions: Vec<String>,

    /// Directory denylist entries (replaces the configured list)
    #[arg(long = "deny-dir", value_name = "SUBSTRING")]
    deny_dirs: Vec<String>,

    /// File denylist entries (replaces the configured list)
    #[arg(long = "deny-file", value_name = "SUBSTRING")]
    deny_files: Vec<String>,

    /// Report location (default: unused.json in the project root)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Indent the JSON report
    #[arg(long)]
    pretty: bool,

    /// Check resolved paths against the directory denylist only and walked
    /// files against the file denylist only
    #[arg(long)]
    legacy_filtering: bool,

    /// Follow symbolic links during the walk
    #[arg(long)]
    follow_links: bool,

    /// Also skip files matched by .gitignore / .ignore
    #[arg(long)]
    respect_ignore: bool,

    /// Print every excluded path
    #[arg(short, long)]
    list: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only write the report
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("deadfiles v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    run(&config, &cli)
}

fn run(config: &Config, cli: &Cli) -> Result<()> {
    let start_time = Instant::now();
    let root = absolute_root(&cli.path);

    let mut resolved = Vec::new();
    for file in &cli.resolved {
        resolved.extend(load_resolved(file, &root)?);
    }
    info!("Replaying {} resolution events", resolved.len());

    let observer = BuildObserver::new(root.clone(), config.clone());
    resolved
        .par_iter()
        .for_each(|path| observer.on_module_resolved(path));

    let Some(outcome) = observer.on_build_complete().wait() else {
        eprintln!("{}", "Diff did not run".red());
        return Ok(());
    };

    if !cli.quiet {
        TerminalReporter::new()
            .with_paths(cli.list)
            .report(&outcome, &root);
        println!(
            "{}",
            format!("⏱  Finished in {:.2}s", start_time.elapsed().as_secs_f64()).dimmed()
        );
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::from_default_locations(&cli.path)?
    };

    // Each flag replaces its field wholesale
    let overrides = RuleSetOverrides {
        extension_whitelist: non_empty(&cli.extensions),
        directory_denylist: non_empty(&cli.deny_dirs),
        file_denylist: non_empty(&cli.deny_files),
    };
    if !overrides.is_empty() {
        config.rules = config.rules.merged(overrides);
    }

    if let Some(output) = &cli.output {
        config.report.path = output.clone();
    }
    if cli.pretty {
        config.report.pretty = true;
    }
    if cli.legacy_filtering {
        config.filter_mode = FilterMode::Legacy;
    }
    if cli.follow_links {
        config.walk.follow_links = true;
    }
    if cli.respect_ignore {
        config.walk.respect_ignore_files = true;
    }

    Ok(config)
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}
