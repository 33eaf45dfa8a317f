//! Integration tests for the build observer
//!
//! These tests drive an observer the way a host build would and check the
//! report written to disk.

use deadfiles::discovery::{absolute_root, FileFinder};
use deadfiles::{BuildHooks, BuildObserver, Config, FilterMode, PathClassifier, RuleSet};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create an empty file under `root`
fn touch(root: &Path, rel: &str) -> String {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "").unwrap();
    path.to_string_lossy().into_owned()
}

/// Temp project whose root is already canonical
fn project() -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let root = absolute_root(temp.path());
    (temp, root)
}

fn rules(extensions: &[&str]) -> RuleSet {
    RuleSet::empty().with_extensions(extensions.iter().copied())
}

fn read_report(root: &Path) -> Vec<String> {
    let contents = fs::read_to_string(root.join("unused.json")).expect("Report should exist");
    serde_json::from_str(&contents).expect("Report should be a JSON array")
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[test]
fn test_unresolved_file_is_reported() {
    let (_temp, root) = project();
    let a = touch(&root, "src/a.ts");
    let b = touch(&root, "src/b.ts");

    let observer = BuildObserver::new(&root, Config::default().with_rules(rules(&[".ts"])));
    observer.on_module_resolved(&a);
    let outcome = observer.on_build_complete().wait().expect("Diff should run");

    assert_eq!(outcome.report.paths(), [b.clone()]);
    assert_eq!(read_report(&root), vec![b]);
}

#[test]
fn test_denied_directory_never_reported() {
    let (_temp, root) = project();
    touch(&root, "node_modules/lib.ts");
    let main = touch(&root, "src/main.ts");

    let config = Config::default()
        .with_rules(rules(&[".ts"]).with_directory_denylist(["node_modules"]));
    let observer = BuildObserver::new(&root, config);
    let outcome = observer.on_build_complete().wait().unwrap();

    assert_eq!(outcome.report.paths(), [main]);
    assert!(read_report(&root).iter().all(|p| !p.contains("node_modules")));
}

#[test]
fn test_non_whitelisted_file_never_candidate() {
    let (_temp, root) = project();
    touch(&root, "README.md");
    let index = touch(&root, "index.js");

    let observer = BuildObserver::new(&root, Config::default().with_rules(rules(&[".ts", ".js"])));
    let outcome = observer.on_build_complete().wait().unwrap();

    assert_eq!(outcome.candidates, 1);
    assert_eq!(read_report(&root), vec![index]);
}

#[test]
fn test_duplicate_resolution_behaves_like_one() {
    let (_temp, root) = project();
    let a = touch(&root, "src/a.ts");
    let b = touch(&root, "src/b.ts");

    let observer = BuildObserver::new(&root, Config::default().with_rules(rules(&[".ts"])));
    observer.on_module_resolved(&a);
    observer.on_module_resolved(&a);
    assert_eq!(observer.touched().len(), 1);

    observer.on_build_complete().wait().unwrap();
    assert_eq!(read_report(&root), vec![b]);
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_subtree_pruning_at_any_depth() {
    let (_temp, root) = project();
    touch(&root, "dist/a.ts");
    touch(&root, "dist/deep/b.ts");
    touch(&root, "packages/dist/nested/c.ts");
    let kept = touch(&root, "src/d.ts");

    let classifier = PathClassifier::new(
        rules(&[".ts"]).with_directory_denylist(["dist"]),
        FilterMode::Legacy,
    );
    let outcome = FileFinder::new(&classifier).find_candidates(&root);

    assert_eq!(outcome.candidates, vec![kept]);
}

#[test]
fn test_report_disjoint_from_touched_and_within_candidates() {
    let (_temp, root) = project();
    let files: Vec<String> = (0..20)
        .map(|i| touch(&root, &format!("src/mod{}/file{}.tsx", i % 4, i)))
        .collect();

    let observer = BuildObserver::new(&root, Config::default());
    for file in files.iter().step_by(3) {
        observer.on_module_resolved(file);
    }
    let outcome = observer.on_build_complete().wait().unwrap();

    let classifier = PathClassifier::default();
    let candidates: HashSet<String> = FileFinder::new(&classifier)
        .find_candidates(&root)
        .candidates
        .into_iter()
        .collect();

    for path in outcome.report.paths() {
        assert!(!observer.touched().contains(path), "{} was touched", path);
        assert!(candidates.contains(path), "{} is not a candidate", path);
    }
    assert_eq!(outcome.report.len(), 20 - files.iter().step_by(3).count());
}

#[test]
fn test_report_set_independent_of_event_order() {
    let (_temp, root) = project();
    let files: Vec<String> = (0..50)
        .map(|i| touch(&root, &format!("src/f{}.ts", i)))
        .collect();
    let resolved: Vec<&String> = files.iter().filter(|f| f.ends_with("0.ts") || f.ends_with("7.ts")).collect();

    let run = |events: Vec<&String>| -> HashSet<String> {
        let observer = BuildObserver::new(&root, Config::default().with_rules(rules(&[".ts"])));
        for path in events {
            observer.on_module_resolved(path);
        }
        observer
            .on_build_complete()
            .wait()
            .unwrap()
            .report
            .into_paths()
            .into_iter()
            .collect()
    };

    let forward = run(resolved.clone());
    let reversed = run(resolved.iter().rev().copied().collect());
    assert_eq!(forward, reversed);
    assert_eq!(forward.len(), 50 - resolved.len());
}

#[test]
fn test_concurrent_resolution_events() {
    let (_temp, root) = project();
    let files: Vec<String> = (0..200)
        .map(|i| touch(&root, &format!("src/dir{}/f{}.js", i % 10, i)))
        .collect();

    let observer = BuildObserver::new(&root, Config::default());
    files
        .par_iter()
        .chain(files.par_iter())
        .for_each(|path| observer.on_module_resolved(path));

    assert_eq!(observer.touched().len(), 200);
    let outcome = observer.on_build_complete().wait().unwrap();
    assert!(outcome.report.is_empty());
    assert_eq!(read_report(&root), Vec::<String>::new());
}

// ============================================================================
// Filtering modes and defaults
// ============================================================================

#[test]
fn test_default_rules_skip_tooling_files() {
    let (_temp, root) = project();
    touch(&root, "webpack.config.ts");
    touch(&root, "plugins/moduleExcludedFiles.ts");
    touch(&root, ".git/hooks/pre-commit.js");
    touch(&root, "package.json");
    let app = touch(&root, "src/app.jsx");
    let styles = touch(&root, "src/styles.css");

    let observer = BuildObserver::new(&root, Config::default());
    let outcome = observer.on_build_complete().wait().unwrap();

    assert_eq!(outcome.report.paths(), [app, styles]);
}

#[test]
fn test_legacy_mode_reports_file_denied_only_for_recording() {
    let (_temp, root) = project();
    // Passes the walk in legacy mode but can never be recorded
    let trap = touch(&root, "src/dist.ts");

    let config = Config::default()
        .with_rules(rules(&[".ts"]).with_directory_denylist(["dist"]))
        .with_filter_mode(FilterMode::Legacy);
    let legacy = BuildObserver::new(&root, config);
    legacy.on_module_resolved(&trap);
    let outcome = legacy.on_build_complete().wait().unwrap();
    assert_eq!(outcome.report.paths(), [trap.clone()]);

    let config = Config::default().with_rules(rules(&[".ts"]).with_directory_denylist(["dist"]));
    let unified = BuildObserver::new(&root, config);
    unified.on_module_resolved(&trap);
    let outcome = unified.on_build_complete().wait().unwrap();
    assert!(outcome.report.is_empty());
}

#[test]
fn test_report_overwritten_each_run() {
    let (_temp, root) = project();
    let a = touch(&root, "a.ts");
    fs::write(root.join("unused.json"), r#"["/old/entry.ts"]"#).unwrap();

    let observer = BuildObserver::new(&root, Config::default().with_rules(rules(&[".ts"])));
    observer.on_build_complete().wait().unwrap();
    assert_eq!(read_report(&root), vec![a.clone()]);

    let observer = BuildObserver::new(&root, Config::default().with_rules(rules(&[".ts"])));
    observer.on_module_resolved(&a);
    observer.on_build_complete().wait().unwrap();
    assert!(read_report(&root).is_empty());
}

#[test]
fn test_empty_whitelist_reports_nothing() {
    let (_temp, root) = project();
    touch(&root, "src/a.ts");

    let observer = BuildObserver::new(&root, Config::default().with_rules(RuleSet::empty()));
    observer.on_module_resolved(&root.join("src/a.ts").to_string_lossy());
    let outcome = observer.on_build_complete().wait().unwrap();

    assert!(observer.touched().is_empty());
    assert_eq!(outcome.candidates, 0);
    assert!(read_report(&root).is_empty());
}

#[test]
fn test_missing_root_still_completes() {
    let (_temp, root) = project();
    let missing = root.join("gone");
    let config = Config::default().with_report_path(root.join("unused.json"));

    let observer = BuildObserver::new(&missing, config);
    let outcome = observer.on_build_complete().wait().unwrap();

    assert!(outcome.walk_errors >= 1);
    assert!(outcome.report.is_empty());
    assert!(outcome.is_written());
}

// ============================================================================
// Path normalization
// ============================================================================

#[test]
fn test_resolved_path_with_dot_dot_segments_matches() {
    let (_temp, root) = project();
    touch(&root, "src/a.ts");
    let b = touch(&root, "src/b.ts");

    let dotted_root = root.join("src/..");
    let observer = BuildObserver::new(&dotted_root, Config::default().with_rules(rules(&[".ts"])));
    observer.on_module_resolved(&dotted_root.join("src/a.ts").to_string_lossy());
    let outcome = observer.on_build_complete().wait().unwrap();

    assert_eq!(outcome.report.paths(), [b]);
}

#[cfg(unix)]
#[test]
fn test_resolved_path_under_symlinked_root_matches() {
    let (_temp, base) = project();
    let real = base.join("real");
    touch(&real, "src/a.ts");
    let b = touch(&real, "src/b.ts");
    let link = base.join("link");
    std::os::unix::fs::symlink(&real, &link).unwrap();

    let observer = BuildObserver::new(&link, Config::default().with_rules(rules(&[".ts"])));
    observer.on_module_resolved(&link.join("src/a.ts").to_string_lossy());
    let outcome = observer.on_build_complete().wait().unwrap();

    assert_eq!(outcome.report.paths(), [b]);
    assert!(real.join("unused.json").exists());
}

// ============================================================================
// Walk options and partial failures
// ============================================================================

#[cfg(unix)]
#[test]
fn test_broken_subtrees_do_not_stop_siblings() {
    use std::os::unix::fs::symlink;

    let (_temp, root) = project();
    let a = touch(&root, "src/a.ts");
    let b = touch(&root, "zz/b.ts");
    // A directory link back to the root and a link to nothing
    symlink(&root, root.join("src/loop")).unwrap();
    symlink(root.join("missing.ts"), root.join("dangling.ts")).unwrap();

    let mut config = Config::default().with_rules(rules(&[".ts"]));
    config.walk.follow_links = true;
    let observer = BuildObserver::new(&root, config);
    let outcome = observer.on_build_complete().wait().unwrap();

    assert!(outcome.walk_errors > 0);
    assert_eq!(outcome.report.paths(), [a.clone(), b.clone()]);
    assert!(outcome.is_written());
    assert_eq!(read_report(&root), vec![a, b]);
}

#[cfg(unix)]
#[test]
fn test_symlinks_skipped_by_default() {
    use std::os::unix::fs::symlink;

    let (_temp, root) = project();
    let real = touch(&root, "src/real.ts");
    touch(&root, "other/hidden.ts");
    symlink(&real, root.join("src/alias.ts")).unwrap();
    symlink(root.join("other"), root.join("src/linked")).unwrap();

    let classifier = PathClassifier::new(
        rules(&[".ts"]).with_directory_denylist(["other"]),
        FilterMode::Legacy,
    );
    let outcome = FileFinder::new(&classifier).find_candidates(&root);

    assert_eq!(outcome.candidates, vec![real]);
    assert_eq!(outcome.errors, 0);
}

#[test]
fn test_gitignore_prunes_when_enabled() {
    let (_temp, root) = project();
    let a = touch(&root, "src/a.ts");
    let generated = touch(&root, "generated/schema.ts");
    fs::write(root.join(".gitignore"), "generated/\n").unwrap();

    let config = Config::default().with_rules(rules(&[".ts"]));
    let observer = BuildObserver::new(&root, config.clone());
    let outcome = observer.on_build_complete().wait().unwrap();
    assert_eq!(outcome.report.paths(), [generated, a.clone()]);

    let mut config = config;
    config.walk.respect_ignore_files = true;
    let observer = BuildObserver::new(&root, config);
    let outcome = observer.on_build_complete().wait().unwrap();
    assert_eq!(outcome.report.paths(), [a]);
}
