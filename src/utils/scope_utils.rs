use std::collections::BTreeSet;

use regex::Regex;

use crate::{
    scope::{ScopeId, ScopeTree},
    span::Position,
};

/// Start positions of `pattern` matches inside the scope, outside comments and literals.
pub fn code_matches(tree: &ScopeTree, id: ScopeId, pattern: &Regex) -> Vec<Position> {
    let span = *tree.get(id).span();
    (span.line_start..=span.line_end)
        .flat_map(|line_index| {
            pattern
                .find_iter(tree.source().line(line_index))
                .map(move |found| (line_index, found.start()))
        })
        .filter(|&position| {
            span.contains_position(position) && !tree.protected_spans().is_protected(position)
        })
        .collect()
}

/// First occurrence of `byte` in the scope, outside comments and literals.
pub fn first_code_byte(tree: &ScopeTree, id: ScopeId, byte: u8) -> Option<Position> {
    let span = *tree.get(id).span();
    (span.line_start..=span.line_end)
        .flat_map(|line_index| {
            tree.source()
                .line(line_index)
                .bytes()
                .enumerate()
                .filter(move |&(_, current)| current == byte)
                .map(move |(col, _)| (line_index, col))
        })
        .find(|&position| {
            span.contains_position(position) && !tree.protected_spans().is_protected(position)
        })
}

/// Whether anything but whitespace or comments precedes `position` on its line.
pub fn has_code_before(tree: &ScopeTree, (line, col): Position) -> bool {
    tree.source()
        .line(line)
        .bytes()
        .take(col)
        .enumerate()
        .any(|(index, byte)| {
            !byte.is_ascii_whitespace() && !tree.is_within_comment((line, index))
        })
}

/// Distinct line indices covered by the given scopes.
pub fn covered_lines(tree: &ScopeTree, ids: &[ScopeId]) -> BTreeSet<usize> {
    ids.iter()
        .flat_map(|&id| {
            let span = tree.get(id).span();
            span.line_start..=span.line_end
        })
        .filter(|&line| line < tree.source().len())
        .collect()
}
