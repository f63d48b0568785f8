use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use log::{error, warn};

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Path to a file containing the SEARCH/REPLACE changeset text.
    pub changeset: PathBuf,

    /// Project directory the changeset's paths are relative to. Defaults
    /// to the current working directory.
    #[arg(long, short = 'C')]
    pub root: Option<PathBuf>,
}

pub fn run(args: ApplyArgs) -> ExitCode {
    match execute(args) {
        Ok(code) => code,
        Err(err) => {
            error!("[error] {err}");
            eprintln!("[apply] {err}");
            ExitCode::from(2)
        }
    }
}

fn execute(args: ApplyArgs) -> anyhow::Result<ExitCode> {
    let root = args.root.unwrap_or_else(trigrep_runtime::default_scan_root);
    let text = std::fs::read_to_string(&args.changeset)?;

    let mut current = HashMap::new();
    for path in trigrep_engine::referenced_paths(&text) {
        let full_path = root.join(&path);
        match std::fs::read(&full_path) {
            Ok(bytes) => {
                current.insert(path, String::from_utf8_lossy(&bytes).into_owned());
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!("failed to read {}: {err}", full_path.display()),
        }
    }

    let changes = match trigrep_engine::apply_changeset(&text, &current) {
        Ok(changes) => changes,
        Err(err) => {
            eprintln!("[apply] changeset rejected: {err}");
            return Ok(ExitCode::from(1));
        }
    };

    let file_count = changes.len();
    if let Err(err) = trigrep_engine::write_all(&root, &changes) {
        eprintln!("[apply] write failed, rolled back: {err}");
        return Ok(ExitCode::from(1));
    }

    println!("applied {file_count} file change(s) under {}", root.display());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[path = "apply_tests.rs"]
mod tests;
