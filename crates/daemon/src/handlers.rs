use std::collections::HashMap;

use log::warn;
use trigrep_engine::{self, ChangesetError, SearchError};
use trigrep_indexer::ProjectIndex;
use trigrep_protocol::{ChangesetErrorResponse, ErrorResponse, FileMatches, MatchSpan, Request, SearchResponse, SuccessResponse};

/// Maximum number of enriched match spans returned per file (spec §6
/// "Result enrichment": "up to five match records").
const MAX_MATCHES_PER_FILE: usize = 5;

/// Handles one decoded request and returns the JSON value to frame back to
/// the client. Every branch always produces a value; there is no panic
/// path from a well-formed `Request`.
pub fn handle(req: Request, project: &ProjectIndex) -> serde_json::Value {
    match req {
        Request::Search {
            pattern,
            max_results,
        } => to_value(search(project, &pattern, max_results).map_err(|e| e.to_string())),
        Request::ApplyChanges { changes } => match apply_changes(project, &changes) {
            Ok(()) => serde_json::to_value(SuccessResponse::ok())
                .expect("SuccessResponse serializes"),
            Err(err) => serde_json::to_value(ChangesetErrorResponse::new(err.to_string()))
                .expect("ChangesetErrorResponse serializes"),
        },
        Request::Shutdown => {
            serde_json::to_value(SuccessResponse::shutdown()).expect("SuccessResponse serializes")
        }
    }
}

fn to_value<T: serde::Serialize>(result: Result<T, String>) -> serde_json::Value {
    match result {
        Ok(value) => serde_json::to_value(value).expect("response type always serializes"),
        Err(message) => {
            serde_json::to_value(ErrorResponse::new(message)).expect("ErrorResponse serializes")
        }
    }
}

/// A query whose first two bytes are `r:` is a raw regex after stripping
/// the prefix; anything else is auto-escaped to a literal-only pattern
/// (spec §6 "Pattern syntax").
fn resolve_pattern(pattern: &str) -> String {
    match pattern.strip_prefix("r:") {
        Some(raw) => raw.to_string(),
        None => regex::escape(pattern),
    }
}

fn search(
    project: &ProjectIndex,
    pattern: &str,
    max_results: usize,
) -> Result<SearchResponse, SearchError> {
    let resolved = resolve_pattern(pattern);
    let index = project.index.read();
    let doc_ids = index.search(&resolved)?;
    let total_matches = doc_ids.len();

    let paths = project.paths.read();
    let mut matches = Vec::new();
    for doc_id in doc_ids.into_iter().take(max_results) {
        let Some(content) = index.content(doc_id) else {
            continue;
        };
        let Some(path) = paths.path_for(doc_id) else {
            continue;
        };
        let spans = trigrep_engine::enrich_matches(content, &resolved, MAX_MATCHES_PER_FILE)?;
        matches.push(FileMatches {
            file: path.display().to_string(),
            matches: spans.into_iter().map(to_wire_span).collect(),
        });
    }

    Ok(SearchResponse::new(total_matches, matches))
}

fn to_wire_span(span: trigrep_engine::MatchSpan) -> MatchSpan {
    MatchSpan {
        start: span.start,
        end: span.end,
        line: span.line,
        context: span.context,
    }
}

/// Reads current contents for every file the changeset references, applies
/// it in memory, and writes the result atomically. The filesystem watcher
/// observes these writes the same way it would observe any other editor's
/// and updates the index itself; this handler never touches the index
/// directly (spec.md §2: "the changeset applicator operates on the
/// filesystem only").
fn apply_changes(project: &ProjectIndex, changes: &str) -> Result<(), ChangesetError> {
    let mut current = HashMap::new();
    for path in trigrep_engine::referenced_paths(changes) {
        let full_path = project.root.join(&path);
        match std::fs::read(&full_path) {
            Ok(bytes) => {
                current.insert(path, String::from_utf8_lossy(&bytes).into_owned());
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!("failed to read {}: {err}", full_path.display()),
        }
    }

    let file_changes = trigrep_engine::apply_changeset(changes, &current)?;
    trigrep_engine::write_all(&project.root, &file_changes)
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
