use hashbrown::HashSet;
use regex_syntax::ast::{self, Ast};

use crate::error::SearchError;
use crate::trigram::{Trigram, trigrams_of};

/// The set of trigrams that every string matching `pattern` must contain.
///
/// This is a soundness-first approximation, not an exact one: a document
/// missing one of these trigrams can never match `pattern`, but a document
/// containing all of them is only a candidate, not a guaranteed match. The
/// regex is still run against candidates to confirm. Returning the empty
/// set is always a valid (if useless) answer; this function favours the
/// empty set whenever a construct's contribution can't be established
/// soundly, so it never forces a false negative.
pub fn required_trigrams(pattern: &str) -> Result<HashSet<Trigram>, SearchError> {
    let ast = ast::parse::Parser::new().parse(pattern)?;
    Ok(mandatory(&ast, true))
}

fn mandatory(node: &Ast, required: bool) -> HashSet<Trigram> {
    if !required {
        return HashSet::new();
    }
    match node {
        Ast::Empty(_) => HashSet::new(),
        Ast::Literal(lit) => literal_run_trigrams(&[lit]),
        Ast::Concat(concat) => mandatory_concat(&concat.asts),
        Ast::Alternation(alt) => mandatory_alternation(&alt.asts),
        Ast::Group(group) => mandatory(&group.ast, true),
        Ast::Repetition(rep) => mandatory(&rep.ast, repetition_requires_one(&rep.op.kind)),
        Ast::Class(_) | Ast::Dot(_) | Ast::Assertion(_) | Ast::Flags(_) => HashSet::new(),
        _ => HashSet::new(),
    }
}

/// Walks a sequence of sibling nodes, merging adjacent literal-character
/// nodes into a single run before windowing it into trigrams. Each
/// non-literal sibling breaks the run and is handled on its own.
fn mandatory_concat(asts: &[Ast]) -> HashSet<Trigram> {
    let mut result = HashSet::new();
    let mut run: Vec<&ast::Literal> = Vec::new();

    for node in asts {
        if let Ast::Literal(lit) = node {
            run.push(lit);
            continue;
        }
        if !run.is_empty() {
            result.extend(literal_run_trigrams(&run));
            run.clear();
        }
        result.extend(mandatory(node, true));
    }
    if !run.is_empty() {
        result.extend(literal_run_trigrams(&run));
    }
    result
}

fn mandatory_alternation(branches: &[Ast]) -> HashSet<Trigram> {
    let mut branches = branches.iter();
    let Some(first) = branches.next() else {
        return HashSet::new();
    };
    let mut acc = mandatory(first, true);
    for branch in branches {
        let next = mandatory(branch, true);
        acc = acc.intersection(&next).copied().collect();
        if acc.is_empty() {
            break;
        }
    }
    acc
}

fn literal_run_trigrams(run: &[&ast::Literal]) -> HashSet<Trigram> {
    let text: String = run.iter().map(|lit| lit.c).collect();
    trigrams_of(&text).collect()
}

/// True when the repetition's minimum count is at least one, i.e. the
/// repeated subpattern is still mandatory.
fn repetition_requires_one(kind: &ast::RepetitionKind) -> bool {
    use ast::{RepetitionKind, RepetitionRange};
    match kind {
        RepetitionKind::ZeroOrOne | RepetitionKind::ZeroOrMore => false,
        RepetitionKind::OneOrMore => true,
        RepetitionKind::Range(range) => match range {
            RepetitionRange::Exactly(m) => *m >= 1,
            RepetitionRange::AtLeast(m) => *m >= 1,
            RepetitionRange::Bounded(m, _) => *m >= 1,
        },
    }
}

#[cfg(test)]
#[path = "required_tests.rs"]
mod tests;
