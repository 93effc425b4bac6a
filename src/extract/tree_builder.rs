use std::sync::Arc;

use itertools::Itertools;
use tracing::trace;

use super::{patterns::is_reserved_keyword, Candidate, ProtectedSpans};
use crate::{
    scope::{Scope, ScopeTree},
    ScopeKind, ScopeKinds, SourceText,
};

fn is_strictly_within_kind(candidate: &Candidate, others: &[Candidate], kinds: ScopeKinds) -> bool {
    others
        .iter()
        .any(|other| other.kind.is_of(kinds) && candidate.span.is_strictly_within(&other.span))
}

fn is_identifier_like(token: &str) -> bool {
    token
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '<' | '>'))
}

/// Whether `text` reads as declared parameters (`int a, const Foo& b`) rather
/// than constructor arguments (`5`, `"abc"`, `a, b`).
fn is_parameter_list(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() || text == "void" {
        return true;
    }
    text.split(',').all(|parameter| {
        let declaration = parameter.split('=').next().unwrap_or_default();
        let tokens = declaration
            .split(|c: char| c.is_whitespace() || c == '*' || c == '&')
            .filter(|token| !token.is_empty())
            .collect_vec();
        tokens.len() >= 2 && tokens.iter().all(|token| is_identifier_like(token))
    })
}

fn parenthesized_text<'a>(source: &'a SourceText, candidate: &Candidate) -> Option<&'a str> {
    let line = source.line(candidate.span.line_start);
    let open = candidate.span.col_start + line.get(candidate.span.col_start..)?.find('(')?;
    let close = line.rfind(')')?;
    line.get(open + 1..close)
}

fn filter_candidates(source: &SourceText, candidates: Vec<Candidate>) -> Vec<Candidate> {
    let candidates = candidates
        .into_iter()
        .filter(|candidate| {
            candidate.kind == ScopeKind::Conditional || !is_reserved_keyword(&candidate.name)
        })
        .collect_vec();

    let comments = candidates
        .iter()
        .filter(|candidate| candidate.kind.is_of(ScopeKinds::COMMENT))
        .cloned()
        .collect_vec();
    let candidates = candidates
        .into_iter()
        .filter(|candidate| !is_strictly_within_kind(candidate, &comments, ScopeKinds::COMMENT))
        .collect_vec();

    // Calls inside bodies look like declarations.
    let bodies = candidates
        .iter()
        .filter(|candidate| {
            matches!(candidate.kind, ScopeKind::Function | ScopeKind::Conditional)
        })
        .cloned()
        .collect_vec();
    let candidates = candidates
        .into_iter()
        .filter(|candidate| {
            candidate.kind != ScopeKind::Function
                || !is_strictly_within_kind(
                    candidate,
                    &bodies,
                    ScopeKinds::FUNCTION | ScopeKinds::CONDITIONAL,
                )
        })
        .collect_vec();

    // Outside of bodies `type name(params);` is a prototype, not a constructed variable.
    let functions = candidates
        .iter()
        .filter(|candidate| candidate.kind == ScopeKind::Function)
        .map(|candidate| (candidate.span, candidate.name.clone()))
        .collect_vec();
    candidates
        .into_iter()
        .filter(|candidate| {
            candidate.kind != ScopeKind::Variable
                || !functions
                    .iter()
                    .any(|(span, name)| *span == candidate.span && *name == candidate.name)
                || !parenthesized_text(source, candidate).is_some_and(is_parameter_list)
        })
        .collect()
}

/// Index of the smallest candidate strictly containing `candidates[index]`.
/// Among containers with identical spans the earliest one wins.
fn find_parent(candidates: &[Candidate], index: usize) -> Option<usize> {
    let span = &candidates[index].span;
    let mut parent: Option<usize> = None;
    for (other_index, other) in candidates.iter().enumerate() {
        if other_index == index || !span.is_strictly_within(&other.span) {
            continue;
        }
        match parent {
            Some(current) if !other.span.is_strictly_within(&candidates[current].span) => {}
            _ => parent = Some(other_index),
        }
    }
    parent
}

fn refine(kind: ScopeKind, name: &str, parent_kind: ScopeKind) -> ScopeKind {
    match kind {
        ScopeKind::Variable => match parent_kind {
            ScopeKind::Source | ScopeKind::Namespace => ScopeKind::GlobalVariable,
            ScopeKind::Conditional | ScopeKind::Function => ScopeKind::FunctionVariable,
            _ => ScopeKind::ClassVariable,
        },
        ScopeKind::Function => match parent_kind {
            ScopeKind::Class => ScopeKind::ClassFunction,
            _ if name.contains("::") => ScopeKind::ClassFunction,
            // Nested functions are normally filtered out before refinement.
            ScopeKind::Function => ScopeKind::FunctionVariable,
            _ => ScopeKind::FreeFunction,
        },
        kind => kind,
    }
}

pub fn build_tree(
    source: Arc<SourceText>,
    protected: ProtectedSpans,
    candidates: Vec<Candidate>,
) -> ScopeTree {
    let candidates = filter_candidates(&source, candidates)
        .into_iter()
        .sorted_by_key(|candidate| candidate.span.start())
        .collect_vec();

    let parents = (0..candidates.len())
        .map(|index| match candidates[index].kind {
            ScopeKind::GlobalDefine => None,
            _ => find_parent(&candidates, index),
        })
        .collect_vec();

    let mut tree = ScopeTree::new(source, protected);
    let ids = candidates
        .iter()
        .map(|candidate| {
            tree.alloc(Scope::new(
                candidate.kind,
                candidate.span,
                candidate.name.clone(),
            ))
        })
        .collect_vec();

    for (index, candidate) in candidates.iter().enumerate() {
        let (parent_id, parent_kind) = match parents[index] {
            Some(parent) => (ids[parent], candidates[parent].kind),
            None => (tree.root(), ScopeKind::Source),
        };
        let kind = refine(candidate.kind, &candidate.name, parent_kind);
        if kind != candidate.kind {
            tree.set_kind(ids[index], kind);
        }
        trace!(name = %candidate.name, %kind, parent = ?parents[index], "attached scope");
        tree.attach(parent_id, ids[index]);
    }

    tree
}
