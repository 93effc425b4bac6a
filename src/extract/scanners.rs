use regex::{Captures, Match, Regex};
use tracing::trace;

use super::{
    defines::MacroIndex,
    extent::{ExtentResolver, BRACES, PARENTHESES},
    patterns::{
        class_pattern, conditional_pattern, enum_pattern, function_pattern, loop_keyword_pattern,
        namespace_pattern, variable_pattern,
    },
    protected::ProtectedSpans,
    Candidate,
};
use crate::{
    continue_if_none,
    span::{Position, Span},
    text::{first_non_whitespace_col, last_col},
    Result, ScopeKind, SourceText,
};

/// Shared state for the structural scanners of one unit.
pub struct ScanContext<'a> {
    source: &'a SourceText,
    protected: &'a ProtectedSpans,
    macros: &'a MacroIndex,
    resolver: ExtentResolver<'a>,
    /// Lines with every comment blanked out, column-preserving.
    code_lines: Vec<String>,
}

impl<'a> ScanContext<'a> {
    pub fn new(
        source: &'a SourceText,
        protected: &'a ProtectedSpans,
        macros: &'a MacroIndex,
    ) -> Self {
        Self {
            source,
            protected,
            macros,
            resolver: ExtentResolver::new(source, protected),
            code_lines: blank_comments(source, protected),
        }
    }

    fn lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.code_lines
            .iter()
            .enumerate()
            .map(|(index, line)| (index, line.as_str()))
    }

    fn is_protected(&self, position: Position) -> bool {
        self.protected.is_protected(position)
    }

    fn candidate(&self, kind: ScopeKind, span: Span, name: &str) -> Candidate {
        trace!(unit = self.source.name(), %kind, %span, name, "found candidate");
        Candidate {
            kind,
            span,
            name: name.to_owned(),
        }
    }
}

fn blank_comments(source: &SourceText, protected: &ProtectedSpans) -> Vec<String> {
    let mut lines = source
        .lines()
        .iter()
        .map(|line| line.as_bytes().to_vec())
        .collect::<Vec<_>>();
    for comment in protected.comments() {
        for line_index in comment.span.line_start..=comment.span.line_end {
            let line = &mut lines[line_index];
            let from = if line_index == comment.span.line_start {
                comment.span.col_start
            } else {
                0
            };
            let to = if line_index == comment.span.line_end {
                (comment.span.col_end + 1).min(line.len())
            } else {
                line.len()
            };
            for byte in line.iter_mut().take(to).skip(from) {
                *byte = b' ';
            }
        }
    }
    lines
        .into_iter()
        .map(|line| String::from_utf8_lossy(&line).into_owned())
        .collect()
}

/// Braced scopes found line by line: namespaces and classes/structs/unions.
fn scan_braced(
    context: &ScanContext,
    pattern: &Regex,
    kind: ScopeKind,
    keyword_start: impl Fn(&str, &Captures) -> usize,
) -> Result<Vec<Candidate>> {
    let mut candidates = vec![];
    for (line_index, line) in context.lines() {
        if context.macros.contains_line(line_index) {
            continue;
        }
        let captures = continue_if_none!(pattern.captures(line));
        let start = (line_index, keyword_start(line, &captures));
        if context.is_protected(start) {
            continue;
        }
        let end = context.resolver.resolve(start, BRACES)?;
        candidates.push(context.candidate(kind, Span::new(start, end), &captures["name"]));
    }
    Ok(candidates)
}

pub fn scan_namespaces(context: &ScanContext) -> Result<Vec<Candidate>> {
    scan_braced(context, &namespace_pattern, ScopeKind::Namespace, |line, _| {
        first_non_whitespace_col(line)
    })
}

pub fn scan_classes(context: &ScanContext) -> Result<Vec<Candidate>> {
    scan_braced(context, &class_pattern, ScopeKind::Class, |_, captures| {
        captures.name("keyword").map_or(0, |keyword| keyword.start())
    })
}

/// Enum bodies hold no other scopes, so scanning resumes after the enum.
pub fn scan_enums(context: &ScanContext) -> Result<Vec<Candidate>> {
    let mut candidates = vec![];
    let mut line_index = 0;
    while line_index < context.code_lines.len() {
        let line = &context.code_lines[line_index];
        let captures = match enum_pattern.captures(line) {
            Some(captures) if !context.macros.contains_line(line_index) => captures,
            _ => {
                line_index += 1;
                continue;
            }
        };
        let start = (line_index, first_non_whitespace_col(line));
        if context.is_protected(start) {
            line_index += 1;
            continue;
        }
        let end = context.resolver.resolve(start, BRACES)?;
        candidates.push(context.candidate(
            ScopeKind::Enum,
            Span::new(start, end),
            &captures["name"],
        ));
        line_index = end.0 + 1;
    }
    Ok(candidates)
}

pub fn scan_functions(context: &ScanContext) -> Result<Vec<Candidate>> {
    let mut candidates = vec![];
    let mut line_index = 0;
    while line_index < context.code_lines.len() {
        if let Some((_, macro_end)) = context.macros.range_containing(line_index) {
            line_index = macro_end + 1;
            continue;
        }
        let line = &context.code_lines[line_index];
        if let Some(name) = function_pattern
            .captures(line)
            .and_then(|captures| captures.name("name"))
        {
            let start = (line_index, first_non_whitespace_col(line));
            if !context.is_protected(start) && !context.is_protected((line_index, name.start())) {
                let end = context
                    .resolver
                    .resolve_declaration_or_body((line_index, name.start()))?;
                candidates.push(context.candidate(
                    ScopeKind::Function,
                    Span::new(start, end),
                    name.as_str(),
                ));
            }
        }
        line_index += 1;
    }
    Ok(candidates)
}

pub fn scan_variables(context: &ScanContext) -> Result<Vec<Candidate>> {
    let mut candidates = vec![];
    for (line_index, line) in context.lines() {
        if context.macros.contains_line(line_index) {
            continue;
        }
        // The pattern is anchored on a short line; a backtracking failure means no match.
        let captures = continue_if_none!(variable_pattern.captures(line).ok().flatten());
        let name = continue_if_none!(captures.name("name"));
        let start = (line_index, first_non_whitespace_col(line));
        if context.is_protected(start) || context.is_protected((line_index, name.start())) {
            continue;
        }
        let end = (line_index, last_col(line.trim_end()));
        candidates.push(context.candidate(
            ScopeKind::Variable,
            Span::new(start, end),
            name.as_str(),
        ));
    }
    Ok(candidates)
}

fn conditional_name(line: &str, keyword: &Match) -> String {
    let rest = line[keyword.end()..].trim_start();
    let is_else_if = keyword.as_str() == "else"
        && rest.starts_with("if")
        && !rest[2..].starts_with(|c: char| c.is_alphanumeric() || c == '_');
    if is_else_if {
        "else if".to_owned()
    } else {
        keyword.as_str().to_owned()
    }
}

pub fn scan_conditionals(context: &ScanContext) -> Result<Vec<Candidate>> {
    let mut candidates = vec![];
    for (line_index, line) in context.lines() {
        if context.macros.contains_line(line_index) {
            continue;
        }
        let keyword = continue_if_none!(conditional_pattern
            .captures_iter(line)
            .filter_map(|captures| captures.name("keyword"))
            .find(|keyword| !context.is_protected((line_index, keyword.start()))));
        let start = (line_index, keyword.start());
        let after_keyword = (line_index, keyword.end());
        let end = match keyword.as_str() {
            "while" if context.resolver.is_loop_closing_while(after_keyword) => continue,
            "for" => {
                let (line, col) = context.resolver.resolve(start, PARENTHESES)?;
                context.resolver.resolve_declaration_or_body((line, col + 1))?
            }
            "do" => resolve_do_while(context, after_keyword)?,
            _ => context.resolver.resolve_declaration_or_body(start)?,
        };
        candidates.push(context.candidate(
            ScopeKind::Conditional,
            Span::new(start, end),
            &conditional_name(line, &keyword),
        ));
    }
    Ok(candidates)
}

/// Finds the `while (...);` closing the loop whose `do` ends at `after_do`,
/// skipping over nested do-loops.
fn resolve_do_while(context: &ScanContext, after_do: Position) -> Result<Position> {
    let mut nested = 0usize;
    let mut from = after_do;
    while from.0 < context.code_lines.len() {
        let line_index = from.0;
        if !context.macros.contains_line(line_index) {
            let line = &context.code_lines[line_index];
            let rest = line.get(from.1..).unwrap_or("");
            for keyword in loop_keyword_pattern
                .captures_iter(rest)
                .filter_map(|captures| captures.name("keyword"))
            {
                let col = from.1 + keyword.start();
                if context.is_protected((line_index, col)) {
                    continue;
                }
                if keyword.as_str() == "do" {
                    nested += 1;
                    continue;
                }
                let statement_end = continue_if_none!(context
                    .resolver
                    .loop_closing_statement((line_index, from.1 + keyword.end())));
                if nested == 0 {
                    return Ok(statement_end);
                }
                nested -= 1;
            }
        }
        from = (line_index + 1, 0);
    }
    Err(context
        .resolver
        .unbalanced(after_do.0, "`do` without a closing `while`"))
}

#[cfg(test)]
mod tests {
    use speculoos::prelude::*;

    use super::*;
    use crate::extract::defines::scan_defines;

    fn scan_with<TReturn>(
        lines: &[&str],
        scanner: impl FnOnce(&ScanContext) -> Result<TReturn>,
    ) -> Result<TReturn> {
        let source = SourceText::from_lines("unit.cpp", lines);
        let protected = ProtectedSpans::scan(&source);
        let macros = MacroIndex::new(&scan_defines(&source, &protected));
        scanner(&ScanContext::new(&source, &protected, &macros))
    }

    fn names(candidates: &[Candidate]) -> Vec<&str> {
        candidates
            .iter()
            .map(|candidate| candidate.name.as_str())
            .collect()
    }

    #[test]
    fn test_class_starts_at_keyword() {
        let classes = scan_with(&["  union TestCase {", "  };"], scan_classes).unwrap();
        assert_that(&classes).is_equal_to(vec![Candidate {
            kind: ScopeKind::Class,
            span: Span::new((0, 2), (1, 2)),
            name: "TestCase".to_owned(),
        }]);
    }

    #[test]
    fn test_class_body_on_following_line() {
        let classes = scan_with(
            &["class InheritanceClass ", "  : public BaseClass {", "};"],
            scan_classes,
        )
        .unwrap();
        assert_that(&classes[0].span).is_equal_to(Span::new((0, 0), (2, 0)));
    }

    #[test]
    fn test_nested_namespaces_are_flat_siblings() {
        let namespaces = scan_with(
            &["namespace Outer {", "namespace Inner {", "}", "}"],
            scan_namespaces,
        )
        .unwrap();
        assert_that(&names(&namespaces)).is_equal_to(vec!["Outer", "Inner"]);
        assert_that(&namespaces[0].span).is_equal_to(Span::new((0, 0), (3, 0)));
        assert_that(&namespaces[1].span).is_equal_to(Span::new((1, 0), (2, 0)));
    }

    #[test]
    fn test_enum_resumes_after_its_body() {
        let enums = scan_with(&["enum class Color {", "  RED,", "  GREEN", "};"], scan_enums)
            .unwrap();
        assert_that(&enums).has_length(1);
        assert_that(&enums[0].span).is_equal_to(Span::new((0, 0), (3, 0)));
    }

    #[test]
    fn test_function_declaration_and_definition() {
        let functions = scan_with(
            &["int declared(int a);", "int defined(int a)", "{", "  return a;", "}"],
            scan_functions,
        )
        .unwrap();
        assert_that(&names(&functions)).is_equal_to(vec!["declared", "defined"]);
        assert_that(&functions[0].span).is_equal_to(Span::single_line(0, 0, 19));
        assert_that(&functions[1].span).is_equal_to(Span::new((1, 0), (4, 0)));
    }

    #[test]
    fn test_function_skips_macro_bodies() {
        let functions = scan_with(
            &["#define CALL(x) \\", "  run(x);", "void after();"],
            scan_functions,
        )
        .unwrap();
        assert_that(&names(&functions)).is_equal_to(vec!["after"]);
    }

    #[test]
    fn test_function_without_body_or_statement_is_unbalanced() {
        let result = scan_with(&["void dangling()"], scan_functions);
        assert!(result.is_err());
    }

    #[test]
    fn test_function_in_comment_is_ignored() {
        let functions = scan_with(&["/* void hidden();", "*/", "// int other();"], scan_functions)
            .unwrap();
        assert_that(&functions).is_empty();
    }

    #[test]
    fn test_variable_span_ends_at_statement() {
        let variables = scan_with(&["  int count = 0; // counter"], scan_variables).unwrap();
        assert_that(&variables).is_equal_to(vec![Candidate {
            kind: ScopeKind::Variable,
            span: Span::single_line(0, 2, 15),
            name: "count".to_owned(),
        }]);
    }

    #[test]
    fn test_conditional_extents() {
        let conditionals = scan_with(
            &[
                "if (a) {",
                "  b();",
                "} else if (c)",
                "  d();",
                "for (int i = 0; i < n; ++i)",
                "  e();",
                "switch (f) {",
                "}",
            ],
            scan_conditionals,
        )
        .unwrap();
        assert_that(&names(&conditionals)).is_equal_to(vec!["if", "else if", "for", "switch"]);
        assert_that(&conditionals[0].span).is_equal_to(Span::new((0, 0), (2, 0)));
        assert_that(&conditionals[1].span).is_equal_to(Span::new((2, 2), (3, 5)));
        assert_that(&conditionals[2].span).is_equal_to(Span::new((4, 0), (5, 5)));
        assert_that(&conditionals[3].span).is_equal_to(Span::new((6, 0), (7, 0)));
    }

    #[test]
    fn test_do_while_with_nested_loops() {
        let conditionals = scan_with(
            &[
                "do {",
                "  do {",
                "    a();",
                "  } while (b);",
                "  while (c) {",
                "  }",
                "} while (d);",
            ],
            scan_conditionals,
        )
        .unwrap();
        assert_that(&conditionals).has_length(3);
        assert_that(&conditionals[0].name).is_equal_to("do".to_owned());
        assert_that(&conditionals[0].span).is_equal_to(Span::new((0, 0), (6, 11)));
        assert_that(&conditionals[1].span).is_equal_to(Span::new((1, 2), (3, 13)));
        assert_that(&conditionals[2].name).is_equal_to("while".to_owned());
        assert_that(&conditionals[2].span).is_equal_to(Span::new((4, 2), (5, 2)));
    }

    #[test]
    fn test_do_without_while_is_unbalanced() {
        assert!(scan_with(&["do {", "}"], scan_conditionals).is_err());
    }
}
