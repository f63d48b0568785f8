use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use log::error;

const MAX_MATCHES_PER_FILE: usize = 5;

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Regex pattern. A literal query is auto-escaped; prefix with `r:` to
    /// pass a raw regex through unescaped.
    pub pattern: String,

    /// Project directory to index and search. Defaults to the current
    /// working directory.
    #[arg(long, short = 'C')]
    pub root: Option<PathBuf>,

    /// Maximum number of files to return.
    #[arg(long, short = 'n', default_value = "100")]
    pub max_results: usize,

    /// Emit the raw JSON response instead of a human-readable report.
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: SearchArgs) -> ExitCode {
    match execute(args) {
        Ok(code) => code,
        Err(err) => {
            error!("[error] {err}");
            eprintln!("[search] {err}");
            ExitCode::from(2)
        }
    }
}

fn execute(args: SearchArgs) -> anyhow::Result<ExitCode> {
    let root = args.root.unwrap_or_else(trigrep_runtime::default_scan_root);
    let project = trigrep_indexer::index_project(&root)?;

    let resolved = resolve_pattern(&args.pattern);
    let index = project.index.read();
    let doc_ids = match index.search(&resolved) {
        Ok(ids) => ids,
        Err(err) => {
            eprintln!("[search] {err}");
            return Ok(ExitCode::from(1));
        }
    };
    let total_matches = doc_ids.len();

    let paths = project.paths.read();
    let mut files = Vec::new();
    for doc_id in doc_ids.into_iter().take(args.max_results) {
        let Some(content) = index.content(doc_id) else {
            continue;
        };
        let Some(path) = paths.path_for(doc_id) else {
            continue;
        };
        let spans = trigrep_engine::enrich_matches(content, &resolved, MAX_MATCHES_PER_FILE)?;
        files.push((path.display().to_string(), spans));
    }

    if args.json {
        print_json(total_matches, &files);
    } else {
        print_human(&args.pattern, total_matches, &files);
    }

    Ok(ExitCode::SUCCESS)
}

/// A query whose first two bytes are `r:` is a raw regex after stripping
/// the prefix; anything else is auto-escaped to a literal-only pattern
/// (spec §6 "Pattern syntax").
fn resolve_pattern(pattern: &str) -> String {
    match pattern.strip_prefix("r:") {
        Some(raw) => raw.to_string(),
        None => regex::escape(pattern),
    }
}

fn print_human(pattern: &str, total_matches: usize, files: &[(String, Vec<trigrep_engine::MatchSpan>)]) {
    println!("{total_matches} file(s) matched '{pattern}'");
    for (path, spans) in files {
        println!("\n{path}");
        for span in spans {
            let context = span.context.replace('\n', "\\n");
            println!("  {}:{}-{}  {}", span.line, span.start, span.end, context);
        }
    }
}

fn print_json(total_matches: usize, files: &[(String, Vec<trigrep_engine::MatchSpan>)]) {
    let matches: Vec<trigrep_protocol::FileMatches> = files
        .iter()
        .map(|(file, spans)| trigrep_protocol::FileMatches {
            file: file.clone(),
            matches: spans
                .iter()
                .map(|s| trigrep_protocol::MatchSpan {
                    start: s.start,
                    end: s.end,
                    line: s.line,
                    context: s.context.clone(),
                })
                .collect(),
        })
        .collect();

    let response = trigrep_protocol::SearchResponse::new(total_matches, matches);
    println!(
        "{}",
        serde_json::to_string_pretty(&response).expect("SearchResponse serializes")
    );
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
