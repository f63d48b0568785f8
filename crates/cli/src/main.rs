use std::process::ExitCode;

use clap::Parser;

mod commands;

use commands::Command;
use trigrep_runtime::logging;

#[derive(Debug, Parser)]
#[command(name = "trigrep", version, about = "trigram-indexed regex code search")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

fn main() -> ExitCode {
    logging::init().ok();

    let cli = Cli::parse();
    match cli.command {
        Command::Search(args) => commands::search::run(args),
        Command::Apply(args) => commands::apply::run(args),
    }
}
