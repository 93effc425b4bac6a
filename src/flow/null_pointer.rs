use regex::Regex;

use super::{
    find_usage, tracked_parent, usage_pattern,
    value::{assigned_value, is_valid_value},
};
use crate::scope::{ScopeId, ScopeTree};

/// Line of the first use of pointer variable `id` while it holds an invalid
/// value, if any.
pub fn find_null_dereference(tree: &ScopeTree, id: ScopeId) -> Option<usize> {
    let scope = tree.get(id);
    let source = tree.source();
    let declaration_line = scope.span().line_start;
    let declaration = source.line(declaration_line);
    let name = regex::escape(scope.name());

    let pointer_pattern = Regex::new(&format!(r"\s+\*{name}(?:\s+|=|\(|\{{|;)")).ok()?;
    let declared = pointer_pattern.find(declaration)?;
    let parent = tracked_parent(tree, id)?;

    let mut value = assigned_value(declaration, declared.end() - 1, true).unwrap_or_default();
    let usage = usage_pattern(&name)?;
    for line_index in declaration_line + 1..tree.get(parent).span().line_end {
        let Some(end) = find_usage(tree, &usage, line_index) else {
            continue;
        };
        match assigned_value(source.line(line_index), end - 1, false) {
            Some(assigned) => value = assigned,
            None if !is_valid_value(&value, true) => return Some(line_index),
            None => {}
        }
    }
    None
}
