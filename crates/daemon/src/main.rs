mod cli;
mod handlers;
mod server;

use clap::Parser;
use log::info;

use cli::Cli;
use trigrep_runtime::logging;

fn main() -> anyhow::Result<()> {
    logging::init().ok();

    let cli = Cli::parse();
    let root = cli
        .root
        .unwrap_or_else(trigrep_runtime::default_scan_root)
        .canonicalize()?;

    info!("indexing {}", root.display());
    let project = trigrep_indexer::index_project(&root)?;
    info!(
        "indexed {} files from {}",
        project.index.read().len(),
        root.display()
    );

    let _watcher = if cli.no_watch {
        None
    } else {
        Some(trigrep_watch::spawn(
            project.root.clone(),
            project.ignore.clone(),
            project.index.clone(),
            project.paths.clone(),
        )?)
    };

    server::run(&project)
}
