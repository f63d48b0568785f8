pub mod apply;
pub mod search;

use clap::Subcommand;
pub use apply::ApplyArgs;
pub use search::SearchArgs;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Index a directory and run a single regex search against it.
    ///
    /// Example:
    ///   trigrep search 'fn main'
    ///   trigrep search -C /path/to/project 'r:(foo|bar)baz'
    Search(SearchArgs),

    /// Apply a SEARCH/REPLACE changeset to a project directory.
    ///
    /// Example:
    ///   trigrep apply changes.txt
    Apply(ApplyArgs),
}
