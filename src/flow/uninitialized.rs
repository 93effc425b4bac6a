use regex::Regex;

use super::{find_usage, tracked_parent, usage_pattern, value::assigned_value};
use crate::scope::{ScopeId, ScopeTree};

const PRIMITIVE_TYPES: &str = "bool|int|char|double|float|long|short";

/// Line of the first read of primitive variable `id` before any value was
/// assigned to it.
pub fn find_uninitialized_use(tree: &ScopeTree, id: ScopeId) -> Option<usize> {
    let scope = tree.get(id);
    let source = tree.source();
    let declaration_line = scope.span().line_start;
    let name = regex::escape(scope.name());

    let primitive_pattern =
        Regex::new(&format!(r"(?:^|\s)(?:{PRIMITIVE_TYPES}) {name}(?:\s+|=|\(|\{{|;)")).ok()?;
    if !primitive_pattern.is_match(source.line(declaration_line)) {
        return None;
    }
    let parent = tracked_parent(tree, id)?;

    let mut value = String::new();
    let usage = usage_pattern(&name)?;
    for line_index in declaration_line..tree.get(parent).span().line_end {
        let Some(end) = find_usage(tree, &usage, line_index) else {
            continue;
        };
        let is_declaration = line_index == declaration_line;
        match assigned_value(source.line(line_index), end - 1, is_declaration) {
            Some(assigned) => value = assigned,
            None if value.is_empty() && !is_declaration => return Some(line_index),
            None => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::rstest;
    use speculoos::prelude::*;

    use super::*;
    use crate::{extract, SourceText, ScopeKinds};

    #[rstest]
    #[case(&["void f() {", "  int x;", "  y = x + 1;", "}"], Some(2))]
    #[case(&["void f() {", "  int x;", "  x = 4;", "  y = x + 1;", "}"], None)]
    #[case(&["void f() {", "  double ratio(0.5);", "  y = ratio * 2;", "}"], None)]
    #[case(&["void f() {", "  int x = 1;", "  y = x;", "}"], None)]
    #[case(&["void f() {", "  Widget w;", "  w.draw( w);", "}"], None)]
    fn test_find_uninitialized_use(#[case] lines: &[&str], #[case] expected: Option<usize>) {
        let tree = extract(Arc::new(SourceText::from_lines("unit.cpp", lines))).unwrap();
        let variables = tree.descendants_of_kind(tree.root(), ScopeKinds::VARIABLE);
        assert_that(&variables).has_length(1);
        assert_that(&find_uninitialized_use(&tree, variables[0])).is_equal_to(expected);
    }
}
