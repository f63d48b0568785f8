use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "trigrepd", version, about = "trigram code search daemon")]
pub struct Cli {
    /// Project directory to index and serve. Defaults to the current
    /// working directory.
    pub root: Option<PathBuf>,

    /// Skip attaching the filesystem watcher; the index stays frozen at
    /// whatever the initial load produced.
    #[arg(long)]
    pub no_watch: bool,
}
