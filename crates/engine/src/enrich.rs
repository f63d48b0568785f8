use regex::Regex;

use crate::error::SearchError;

/// Byte radius of context captured on either side of a match (spec §6
/// "Result enrichment": "a ±50-byte context window clipped to document
/// bounds").
const CONTEXT_RADIUS: usize = 50;

/// One located match within a document's content, past the bare
/// contains-a-match contract of `Index::search`. Never produced by the
/// search driver itself — only by callers (the daemon, the CLI) that want
/// to show a human or a client where a match actually is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
    /// 1-based line number of `start`.
    pub line: usize,
    /// Context clipped to document bounds and to the nearest UTF-8 char
    /// boundary on either side; never split mid-codepoint.
    pub context: String,
}

/// Re-scans `content` for `pattern` and returns up to `limit` matches, each
/// enriched with its line number and surrounding context.
///
/// This is a distinct pass from `Index::search`'s own verification scan:
/// `search` only needs to know whether a document matches at all, so it
/// never collects spans. Enrichment is purely a presentation concern.
pub fn enrich_matches(
    content: &str,
    pattern: &str,
    limit: usize,
) -> Result<Vec<MatchSpan>, SearchError> {
    let re = Regex::new(pattern)?;
    let mut spans = Vec::new();

    for m in re.find_iter(content).take(limit) {
        let start = m.start();
        let end = m.end();
        let line = content[..start].bytes().filter(|&b| b == b'\n').count() + 1;

        let ctx_start = floor_char_boundary(content, start.saturating_sub(CONTEXT_RADIUS));
        let ctx_end = ceil_char_boundary(content, (end + CONTEXT_RADIUS).min(content.len()));

        spans.push(MatchSpan {
            start,
            end,
            line,
            context: content[ctx_start..ctx_end].to_string(),
        });
    }

    Ok(spans)
}

fn floor_char_boundary(s: &str, index: usize) -> usize {
    let mut i = index.min(s.len());
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_char_boundary(s: &str, index: usize) -> usize {
    let mut i = index.min(s.len());
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

#[cfg(test)]
#[path = "enrich_tests.rs"]
mod tests;
