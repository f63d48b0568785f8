use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::ChangesetError;

const SEARCH_MARK: &str = "<<<<<<< SEARCH";
const SEP_MARK: &str = "=======";
const REPLACE_MARK: &str = ">>>>>>> REPLACE";

/// One file's worth of change, fully computed in memory. `previous_content`
/// is `None` for a newly created file, which is what lets `write_all` undo
/// it (by deleting, rather than restoring) if a later file in the same
/// changeset fails to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    pub new_content: String,
    pub previous_content: Option<String>,
}

impl FileChange {
    pub fn is_creation(&self) -> bool {
        self.previous_content.is_none()
    }
}

struct RawBlock {
    path: String,
    body: String,
}

struct Hunk {
    search: String,
    replace: String,
}

/// Returns the file path named by every fenced block in `text`, in the
/// order they appear, without validating or applying anything. Callers
/// that need to gather current file contents before calling
/// `apply_changeset` use this to know which files to read.
pub fn referenced_paths(text: &str) -> Vec<String> {
    parse_blocks(text).into_iter().map(|b| b.path).collect()
}

/// Parses a changeset message and computes the new content for every file
/// it touches, against `current_contents` (path -> current file text).
///
/// Nothing is written to disk here. Either every block in the changeset
/// resolves cleanly - every search string is found in its target file,
/// every modified file already exists, every created file doesn't yet -
/// or the whole changeset is rejected and the caller sees no partial
/// result to apply.
pub fn apply_changeset(
    text: &str,
    current_contents: &HashMap<String, String>,
) -> Result<Vec<FileChange>, ChangesetError> {
    let blocks = parse_blocks(text);
    let mut changes = Vec::with_capacity(blocks.len());

    for block in blocks {
        if block.path.is_empty() {
            return Err(ChangesetError::MissingPath);
        }
        let existing = current_contents.get(&block.path);
        let has_hunks = block.body.contains(SEARCH_MARK);

        let change = match (has_hunks, existing) {
            (true, None) => return Err(ChangesetError::HunksOnMissingFile(block.path)),
            (false, Some(_)) => return Err(ChangesetError::BodyOnExistingFile(block.path)),
            (true, Some(content)) => apply_hunks(&block.path, content, &block.body)?,
            (false, None) => creation_change(&block.path, &block.body)?,
        };
        changes.push(change);
    }

    Ok(changes)
}

fn apply_hunks(path: &str, content: &str, body: &str) -> Result<FileChange, ChangesetError> {
    let hunks = parse_hunks(body);
    if hunks.is_empty() {
        return Err(ChangesetError::EmptyBlock(path.to_string()));
    }

    let mut working = content.to_string();
    for hunk in &hunks {
        if !working.contains(hunk.search.as_str()) {
            return Err(ChangesetError::SearchNotFound {
                path: path.to_string(),
                search: hunk.search.clone(),
            });
        }
        working = working.replace(&hunk.search, &hunk.replace);
    }

    Ok(FileChange {
        path: path.to_string(),
        new_content: working,
        previous_content: Some(content.to_string()),
    })
}

fn creation_change(path: &str, body: &str) -> Result<FileChange, ChangesetError> {
    let body = body.strip_prefix('\n').unwrap_or(body);
    let body = body.strip_suffix('\n').unwrap_or(body);
    if body.is_empty() {
        return Err(ChangesetError::EmptyBlock(path.to_string()));
    }
    Ok(FileChange {
        path: path.to_string(),
        new_content: body.to_string(),
        previous_content: None,
    })
}

/// Splits the message into fenced ` ```<path>\n<body>``` ` blocks. A path
/// is just whatever follows the opening fence up to the next newline.
fn parse_blocks(text: &str) -> Vec<RawBlock> {
    const FENCE: &str = "```";
    let mut blocks = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find(FENCE) {
        let after_open = &rest[open + FENCE.len()..];
        let Some(nl) = after_open.find('\n') else {
            break;
        };
        let path = after_open[..nl].trim().to_string();
        let after_path = &after_open[nl + 1..];
        let Some(close) = after_path.find(FENCE) else {
            break;
        };
        blocks.push(RawBlock {
            path,
            body: after_path[..close].to_string(),
        });
        rest = &after_path[close + FENCE.len()..];
    }
    blocks
}

/// Extracts every SEARCH/REPLACE hunk from a block body, applied in the
/// order they appear. Accepts the separator either immediately followed by
/// a newline or directly by replacement text on the same line.
fn parse_hunks(body: &str) -> Vec<Hunk> {
    let mut hunks = Vec::new();
    let mut rest = body;

    while let Some(search_start) = rest.find(SEARCH_MARK) {
        let after_search = &rest[search_start + SEARCH_MARK.len()..];
        let after_search = after_search.strip_prefix('\n').unwrap_or(after_search);

        let Some(sep_pos) = after_search.find(SEP_MARK) else {
            break;
        };
        let search_text = after_search[..sep_pos]
            .strip_suffix('\n')
            .unwrap_or(&after_search[..sep_pos]);

        let after_sep = &after_search[sep_pos + SEP_MARK.len()..];
        let after_sep = after_sep.strip_prefix('\n').unwrap_or(after_sep);

        let Some(replace_end) = after_sep.find(REPLACE_MARK) else {
            break;
        };
        let replace_text = after_sep[..replace_end]
            .strip_suffix('\n')
            .unwrap_or(&after_sep[..replace_end]);

        hunks.push(Hunk {
            search: search_text.to_string(),
            replace: replace_text.to_string(),
        });
        rest = &after_sep[replace_end + REPLACE_MARK.len()..];
    }
    hunks
}

/// Writes an already-validated changeset to disk, rooted at `root`. If any
/// write fails partway through, every file written so far in this call is
/// rolled back - restored to its previous content, or deleted if it was a
/// fresh creation - before the original error is returned.
pub fn write_all(root: &Path, changes: &[FileChange]) -> Result<(), ChangesetError> {
    let mut applied: Vec<&FileChange> = Vec::with_capacity(changes.len());

    for change in changes {
        let full_path = root.join(&change.path);
        let result = (|| -> std::io::Result<()> {
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&full_path, &change.new_content)
        })();

        if let Err(source) = result {
            rollback(root, &applied);
            return Err(ChangesetError::Io {
                path: change.path.clone(),
                source,
            });
        }
        applied.push(change);
    }
    Ok(())
}

fn rollback(root: &Path, applied: &[&FileChange]) {
    for change in applied.iter().rev() {
        let full_path = root.join(&change.path);
        let outcome = match &change.previous_content {
            Some(previous) => fs::write(&full_path, previous),
            None => fs::remove_file(&full_path),
        };
        if let Err(err) = outcome {
            log::warn!("rollback of {} failed: {err}", change.path);
        }
    }
}

#[cfg(test)]
#[path = "changeset_tests.rs"]
mod tests;
