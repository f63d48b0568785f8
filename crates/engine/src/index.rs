use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use parking_lot::RwLock;
use regex::Regex;

use crate::error::SearchError;
use crate::required::required_trigrams;
use crate::trigram::{Trigram, trigrams_of};

/// Identifies a document within an `Index`. Allocated once per document by
/// `Index::alloc_doc_id` and never reused, even after the document it
/// named is removed: a stale id from a deleted document must never come
/// to refer to an unrelated later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocId(pub u32);

/// An in-memory trigram index over a set of documents.
///
/// There is no on-disk format: the index lives for the lifetime of the
/// process and is rebuilt from a fresh scan on every start.
#[derive(Default)]
pub struct Index {
    docs: HashMap<DocId, Box<str>>,
    postings: HashMap<Trigram, HashSet<DocId>>,
    next_id: u32,
}

/// An `Index` shared between the search path, the changeset applicator and
/// the filesystem watcher. `search` takes a read guard; every mutation
/// takes a write guard for the whole operation, including the
/// remove-then-add pair behind `replace_document`.
pub type SharedIndex = Arc<RwLock<Index>>;

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_doc_id(&mut self) -> DocId {
        let id = DocId(self.next_id);
        self.next_id = self.next_id.checked_add(1).expect("doc id space exhausted");
        id
    }

    pub fn add_document(&mut self, doc_id: DocId, content: impl Into<Box<str>>) {
        let content = content.into();
        for tg in distinct_trigrams(&content) {
            self.postings.entry(tg).or_default().insert(doc_id);
        }
        self.docs.insert(doc_id, content);
    }

    pub fn remove_document(&mut self, doc_id: DocId) {
        let Some(content) = self.docs.remove(&doc_id) else {
            return;
        };
        for tg in distinct_trigrams(&content) {
            if let Some(set) = self.postings.get_mut(&tg) {
                set.remove(&doc_id);
                if set.is_empty() {
                    self.postings.remove(&tg);
                }
            }
        }
    }

    /// Removes the document's old content from the postings and reindexes
    /// it under the same id, so callers never see a dangling id gap.
    pub fn replace_document(&mut self, doc_id: DocId, new_content: impl Into<Box<str>>) {
        self.remove_document(doc_id);
        self.add_document(doc_id, new_content);
    }

    pub fn contains(&self, doc_id: DocId) -> bool {
        self.docs.contains_key(&doc_id)
    }

    pub fn content(&self, doc_id: DocId) -> Option<&str> {
        self.docs.get(&doc_id).map(Box::as_ref)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn doc_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.docs.keys().copied()
    }

    /// Finds every document whose content matches `pattern`, in ascending
    /// `DocId` order.
    ///
    /// Candidates are narrowed with the pattern's required trigrams before
    /// the regex itself is run, so verification only scans documents that
    /// could possibly match. A pattern with no required trigrams (e.g. one
    /// that is satisfied by the empty string) falls back to scanning every
    /// document.
    pub fn search(&self, pattern: &str) -> Result<Vec<DocId>, SearchError> {
        let required = required_trigrams(pattern)?;
        let re = Regex::new(pattern)?;

        let candidates = self.candidates(&required);

        let mut results: Vec<DocId> = candidates
            .into_iter()
            .filter(|id| {
                self.docs
                    .get(id)
                    .is_some_and(|content| re.is_match(content))
            })
            .collect();
        results.sort_unstable();
        Ok(results)
    }

    fn candidates(&self, required: &HashSet<Trigram>) -> HashSet<DocId> {
        if required.is_empty() {
            return self.docs.keys().copied().collect();
        }

        let mut acc: Option<HashSet<DocId>> = None;
        for tg in required {
            let posting = self.postings.get(tg);
            acc = Some(match (acc, posting) {
                (None, None) => return HashSet::new(),
                (None, Some(ids)) => ids.clone(),
                (Some(_), None) => return HashSet::new(),
                (Some(acc), Some(ids)) => acc.intersection(ids).copied().collect(),
            });
            if acc.as_ref().is_some_and(HashSet::is_empty) {
                return HashSet::new();
            }
        }
        acc.unwrap_or_default()
    }
}

fn distinct_trigrams(content: &str) -> HashSet<Trigram> {
    trigrams_of(content).collect()
}

#[cfg(test)]
#[path = "index_tests.rs"]
mod tests;
