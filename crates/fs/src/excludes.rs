use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};
use trigrep_runtime::DEFAULT_PROJECT_IGNORE_PATTERNS;

/// gitignore-style matcher plus the unconditional hidden-file rule.
///
/// Hidden files and directories (any path component starting with `.`) are
/// always ignored, independent of what the gitignore patterns say -- this is
/// "Variant B": stricter than plain gitignore semantics, but the right
/// default for a code-search index where `.git/`, `.env`, and editor state
/// are noise far more often than they're a file worth indexing.
#[derive(Clone)]
pub struct IgnoreEngine {
    matcher: Gitignore,
}

#[derive(Debug, Clone)]
pub struct IgnoreOptions {
    /// Whether to use the built-in project ignore patterns.
    pub use_default_patterns: bool,

    /// Whether to consult `<root>/.gitignore`, if present.
    pub use_project_gitignore: bool,

    /// Paths to additional ignore files layered on top.
    pub extra_ignore_files: Box<[PathBuf]>,
}

impl Default for IgnoreOptions {
    fn default() -> Self {
        Self {
            use_default_patterns: true,
            use_project_gitignore: true,
            extra_ignore_files: Box::default(),
        }
    }
}

impl Default for IgnoreEngine {
    fn default() -> Self {
        let matcher = GitignoreBuilder::new(Path::new("."))
            .build()
            .expect("build empty ignore matcher");
        IgnoreEngine { matcher }
    }
}

fn has_hidden_component(path: &Path) -> bool {
    path.components().any(|c| {
        c.as_os_str()
            .to_str()
            .is_some_and(|s| s.starts_with('.') && s != "." && s != "..")
    })
}

impl IgnoreEngine {
    /// Build an IgnoreEngine rooted at `root`, with the built-in project
    /// patterns and any extra ignore files (e.g. `.gitignore`) layered on.
    pub fn new(root: &Path, options: Option<IgnoreOptions>) -> Result<Self, ignore::Error> {
        let IgnoreOptions {
            use_default_patterns,
            use_project_gitignore,
            extra_ignore_files,
        } = options.unwrap_or_default();
        let mut builder = GitignoreBuilder::new(root);

        if use_default_patterns {
            for pat in DEFAULT_PROJECT_IGNORE_PATTERNS {
                builder.add_line(None, pat)?;
            }
        }

        // A project without a `.gitignore` is the common case, not an error;
        // `add` reports problems reading/parsing the file, which we treat as
        // non-fatal here too (log and carry on with whatever did parse).
        if use_project_gitignore
            && let Some(err) = builder.add(root.join(".gitignore"))
        {
            log::warn!("failed to read {}: {err}", root.join(".gitignore").display());
        }

        for path in &*extra_ignore_files {
            builder.add(path);
        }

        Ok(IgnoreEngine {
            matcher: builder.build()?,
        })
    }

    #[inline]
    pub fn with_defaults(root: &Path) -> Result<Self, ignore::Error> {
        Self::new(root, None)
    }

    #[inline]
    #[must_use]
    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        if has_hidden_component(path) {
            return true;
        }
        self.matcher
            .matched_path_or_any_parents(path, is_dir)
            .is_ignore()
    }
}

#[cfg(test)]
#[path = "excludes_tests.rs"]
mod tests;
