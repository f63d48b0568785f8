mod config;
mod excludes;
mod record;
mod walker;

pub use excludes::{IgnoreEngine, IgnoreOptions};
pub use record::FileRecord;
pub use walker::{ScanContext, walk_parallel};
