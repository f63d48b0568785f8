use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc;

use log::{debug, warn};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;

use trigrep_engine::SharedIndex;
use trigrep_fs::IgnoreEngine;
use trigrep_indexer::PathTable;

/// A running filesystem watcher. Dropping this stops the watch: the
/// underlying `notify` watcher and the event-processing thread are both
/// torn down once the last handle is gone.
pub struct WatcherHandle {
    _watcher: RecommendedWatcher,
}

/// Attaches a change watcher to `root`, applying events to `index`/`paths`
/// on a single dedicated thread in the order `notify` delivers them (spec
/// §4.6's ordering guarantee — no coalescing that could reorder a
/// create-vs-delete pair for the same path).
pub fn spawn(
    root: PathBuf,
    ignore: Arc<IgnoreEngine>,
    index: SharedIndex,
    paths: Arc<RwLock<PathTable>>,
) -> notify::Result<WatcherHandle> {
    let (tx, rx) = mpsc::channel::<notify::Result<Event>>();

    let mut watcher = notify::recommended_watcher(tx)?;
    watcher.watch(&root, RecursiveMode::Recursive)?;

    std::thread::spawn(move || {
        for result in rx {
            match result {
                Ok(event) => handle_event(&root, &ignore, &index, &paths, event),
                Err(err) => warn!("filesystem watch error: {err}"),
            }
        }
        debug!("watcher event channel closed, stopping");
    });

    Ok(WatcherHandle { _watcher: watcher })
}

fn handle_event(
    root: &Path,
    ignore: &IgnoreEngine,
    index: &SharedIndex,
    paths: &Arc<RwLock<PathTable>>,
    event: Event,
) {
    let kind = classify(event.kind);
    let Some(kind) = kind else { return };

    for full_path in event.paths {
        if full_path.is_dir() {
            continue;
        }
        if ignore.is_ignored(&full_path, false) {
            continue;
        }
        let rel = full_path
            .strip_prefix(root)
            .unwrap_or(&full_path)
            .to_path_buf();
        apply(kind, &full_path, &rel, index, paths);
    }
}

#[derive(Clone, Copy)]
enum Kind {
    CreatedOrModified,
    Deleted,
}

fn classify(kind: EventKind) -> Option<Kind> {
    match kind {
        EventKind::Create(_) | EventKind::Modify(_) => Some(Kind::CreatedOrModified),
        EventKind::Remove(_) => Some(Kind::Deleted),
        _ => None,
    }
}

/// Applies one event to one path, following spec §4.6's state table:
/// created/modified collapse into "read and add, or replace if already
/// present"; deleted removes the document if indexed and is a no-op
/// otherwise.
fn apply(
    kind: Kind,
    full_path: &Path,
    rel: &Path,
    index: &SharedIndex,
    paths: &Arc<RwLock<PathTable>>,
) {
    match kind {
        Kind::CreatedOrModified => {
            let content = match fs::read(full_path) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(err) => {
                    warn!("failed to read {}: {err}", full_path.display());
                    return;
                }
            };

            let existing_id = paths.read().id_for(rel);
            match existing_id {
                Some(doc_id) => index.write().replace_document(doc_id, content),
                None => {
                    let doc_id = {
                        let mut index = index.write();
                        let doc_id = index.alloc_doc_id();
                        index.add_document(doc_id, content);
                        doc_id
                    };
                    paths.write().insert(doc_id, rel.to_path_buf());
                }
            }
        }
        Kind::Deleted => {
            let Some(doc_id) = paths.write().remove_by_path(rel) else {
                return;
            };
            index.write().remove_document(doc_id);
        }
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
