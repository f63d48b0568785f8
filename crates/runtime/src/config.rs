use std::path::PathBuf;

pub const PROGRAM_NAME: &str = "trigrep";
pub const PROGRAM_LOG_LEVEL: &str = "TRIGREP_LOG_LEVEL";

/// Default project root to index when none is given on the command line.
pub fn default_scan_root() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Default project-relative ignore patterns, applied in addition to any
/// project `.gitignore` and the unconditional hidden-file rule (see
/// `trigrep_fs::IgnoreEngine`).
pub const DEFAULT_PROJECT_IGNORE_PATTERNS: &[&str] = &[
    ".git/",
    ".hg/",
    ".svn/",
    "__pycache__/",
    "node_modules/",
    "target/",
    "dist/",
    "build/",
    "vendor/",
    ".venv/",
    "venv/",
    "*.pyc",
    "*.pyo",
    "*.o",
    "*.obj",
    "*.so",
    "*.swp",
    "*.swo",
    "*~",
    "package-lock.json",
    "poetry.lock",
    ".DS_Store",
    "Thumbs.db",
];
