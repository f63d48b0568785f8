pub mod codec;

use serde::{Deserialize, Serialize};

/// A request read off the line-framed stdio transport. Tagged on the
/// `command` field so a malformed or unknown command fails to deserialize
/// cleanly rather than silently picking a variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Request {
    Search {
        pattern: String,
        #[serde(default = "default_max_results")]
        max_results: usize,
    },
    ApplyChanges {
        changes: String,
    },
    Shutdown,
}

fn default_max_results() -> usize {
    100
}

/// One match within a single matching file, enriched past the bare
/// doc-id-list contract of the search engine with the coordinates a
/// client needs to render a result.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
    /// 1-based line number of `start`.
    pub line: usize,
    /// Up to 50 bytes of content on either side of the match, clipped to
    /// document bounds.
    pub context: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileMatches {
    pub file: String,
    pub matches: Vec<MatchSpan>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub status: &'static str,
    pub total_matches: usize,
    pub returned_matches: usize,
    pub matches: Vec<FileMatches>,
}

impl SearchResponse {
    pub fn new(total_matches: usize, matches: Vec<FileMatches>) -> Self {
        Self {
            status: "success",
            total_matches,
            returned_matches: matches.len(),
            matches,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub status: &'static str,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { status: "success" }
    }

    pub fn shutdown() -> Self {
        Self { status: "shutdown" }
    }
}

/// `{status: "error", message}`, used for changeset failures.
#[derive(Debug, Clone, Serialize)]
pub struct ChangesetErrorResponse {
    pub status: &'static str,
    pub message: String,
}

impl ChangesetErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}

/// `{error}`, used for query errors and transport-level failures
/// (malformed framing, invalid JSON, unknown command).
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
