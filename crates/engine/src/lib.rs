mod changeset;
mod enrich;
mod error;
mod index;
mod required;
mod trigram;

pub use changeset::{FileChange, apply_changeset, referenced_paths, write_all};
pub use enrich::{MatchSpan, enrich_matches};
pub use error::{ChangesetError, SearchError};
pub use index::{DocId, Index, SharedIndex};
pub use required::required_trigrams;
pub use trigram::{Trigram, trigrams_of};
