use std::collections::HashMap;
use std::path::{Path, PathBuf};

use trigrep_engine::DocId;

/// The id↔path bijection a live project index maintains alongside the
/// trigram index itself (spec §3's "Document" invariants). Paths are
/// stored relative to the project root.
#[derive(Debug, Default)]
pub struct PathTable {
    id_to_path: HashMap<DocId, PathBuf>,
    path_to_id: HashMap<PathBuf, DocId>,
}

impl PathTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `id` as the document for `path`, replacing any previous
    /// mapping for either side so the bijection never goes stale.
    pub fn insert(&mut self, id: DocId, path: PathBuf) {
        if let Some(old_path) = self.id_to_path.remove(&id) {
            self.path_to_id.remove(&old_path);
        }
        if let Some(old_id) = self.path_to_id.insert(path.clone(), id) {
            self.id_to_path.remove(&old_id);
        }
        self.id_to_path.insert(id, path);
    }

    /// Removes the mapping for `path`, returning the id it named if any.
    pub fn remove_by_path(&mut self, path: &Path) -> Option<DocId> {
        let id = self.path_to_id.remove(path)?;
        self.id_to_path.remove(&id);
        Some(id)
    }

    pub fn id_for(&self, path: &Path) -> Option<DocId> {
        self.path_to_id.get(path).copied()
    }

    pub fn path_for(&self, id: DocId) -> Option<&Path> {
        self.id_to_path.get(&id).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.id_to_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_path.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DocId, &Path)> {
        self.id_to_path.iter().map(|(id, path)| (*id, path.as_path()))
    }
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
