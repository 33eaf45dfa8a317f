mod file_finder;

pub use file_finder::{absolute_root, FileFinder, WalkOutcome};
