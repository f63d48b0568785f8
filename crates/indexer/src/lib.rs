mod paths;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{fs, thread};

use crossbeam::channel;
use log::warn;
use parking_lot::RwLock;

use trigrep_engine::{Index, SharedIndex};
use trigrep_fs::{FileRecord, IgnoreEngine, IgnoreOptions, ScanContext, walk_parallel};

pub use paths::PathTable;

/// A fully-loaded project: the live trigram index, the id↔path bijection
/// that names its documents, and the ignore engine that filtered them (so
/// a caller that also wants to attach a watcher reuses the same policy
/// rather than re-deriving it).
pub struct ProjectIndex {
    pub root: PathBuf,
    pub index: SharedIndex,
    pub paths: Arc<RwLock<PathTable>>,
    pub ignore: Arc<IgnoreEngine>,
}

/// Walks `root`, honouring the default ignore policy plus any project
/// `.gitignore`, reading every surviving file as lossy UTF-8 and loading
/// it into a fresh in-memory index (spec §4.5).
pub fn index_project(root: &Path) -> anyhow::Result<ProjectIndex> {
    index_project_with_options(root, IgnoreOptions::default())
}

pub fn index_project_with_options(
    root: &Path,
    options: IgnoreOptions,
) -> anyhow::Result<ProjectIndex> {
    let ignore = Arc::new(IgnoreEngine::new(root, Some(options))?);
    let ctx = Arc::new(ScanContext {
        ignore: (*ignore).clone(),
    });

    let (file_tx, file_rx) = channel::unbounded::<Vec<FileRecord>>();
    let num_threads = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);

    let walker_root = root.to_path_buf();
    let walker_handle = {
        let ctx = Arc::clone(&ctx);
        let tx = file_tx.clone();
        thread::spawn(move || walk_parallel(vec![walker_root], tx, ctx, num_threads))
    };
    drop(file_tx);

    let index: SharedIndex = Arc::new(RwLock::new(Index::new()));
    let paths = Arc::new(RwLock::new(PathTable::new()));

    while let Ok(batch) = file_rx.recv() {
        for record in batch {
            if record.is_dir || record.is_symlink {
                continue;
            }
            ingest(root, &record.full_path, &index, &paths);
        }
    }

    walker_handle
        .join()
        .map_err(|_| anyhow::anyhow!("filesystem walker thread panicked"))??;

    Ok(ProjectIndex {
        root: root.to_path_buf(),
        index,
        paths,
        ignore,
    })
}

/// Reads and indexes one file under a freshly-allocated doc id. A read
/// failure is logged and the file is skipped; the caller's walk continues
/// (spec §4.5's "per-file read failure" error policy).
fn ingest(root: &Path, full_path: &Path, index: &SharedIndex, paths: &Arc<RwLock<PathTable>>) {
    let rel = full_path
        .strip_prefix(root)
        .unwrap_or(full_path)
        .to_path_buf();

    let bytes = match fs::read(full_path) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("failed to read {}: {err}", full_path.display());
            return;
        }
    };
    let content = String::from_utf8_lossy(&bytes).into_owned();

    let doc_id = {
        let mut index = index.write();
        let doc_id = index.alloc_doc_id();
        index.add_document(doc_id, content);
        doc_id
    };
    paths.write().insert(doc_id, rel);
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
