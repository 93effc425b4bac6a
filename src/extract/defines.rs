use tracing::trace;

use super::{patterns::define_pattern, protected::ProtectedSpans};
use crate::{span::Span, text::last_col, SourceText};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Define {
    pub span: Span,
    pub text: String,
}

fn is_continued(line: &str) -> bool {
    line.trim_end().ends_with('\\')
}

pub fn scan_defines(source: &SourceText, protected: &ProtectedSpans) -> Vec<Define> {
    let mut defines = vec![];
    let mut line_index = 0;
    while line_index < source.len() {
        let line = source.line(line_index);
        let start_col = match line
            .contains("#define")
            .then(|| define_pattern.captures(line))
            .flatten()
            .and_then(|captures| captures.name("directive"))
        {
            Some(directive) if !protected.is_protected((line_index, directive.start())) => {
                directive.start()
            }
            _ => {
                line_index += 1;
                continue;
            }
        };

        let first_line = line_index;
        while is_continued(source.line(line_index)) && line_index + 1 < source.len() {
            line_index += 1;
        }

        let define = if first_line == line_index {
            let end_col = protected
                .comments()
                .iter()
                .find(|comment| comment.span.start() > (line_index, start_col))
                .filter(|comment| comment.span.line_start == line_index)
                .map_or(last_col(line), |comment| {
                    last_col(line[..comment.span.col_start].trim_end())
                });
            Define {
                span: Span::single_line(line_index, start_col, end_col.max(start_col)),
                text: line.to_owned(),
            }
        } else {
            Define {
                span: Span::new(
                    (first_line, start_col),
                    (line_index, last_col(source.line(line_index))),
                ),
                text: source.lines()[first_line..=line_index].concat(),
            }
        };
        trace!(define = %define.text, span = %define.span, "found define");
        defines.push(define);
        line_index += 1;
    }
    defines
}

/// Line ranges covered by macro bodies.
#[derive(Clone, Debug, Default)]
pub struct MacroIndex {
    ranges: Vec<(usize, usize)>,
}

impl MacroIndex {
    pub fn new(defines: &[Define]) -> Self {
        Self {
            ranges: defines
                .iter()
                .map(|define| (define.span.line_start, define.span.line_end))
                .collect(),
        }
    }

    pub fn range_containing(&self, line: usize) -> Option<(usize, usize)> {
        let index = self.ranges.partition_point(|&(start, _)| start <= line);
        let range = *self.ranges.get(index.checked_sub(1)?)?;
        (line <= range.1).then_some(range)
    }

    pub fn contains_line(&self, line: usize) -> bool {
        self.range_containing(line).is_some()
    }
}

#[cfg(test)]
mod tests {
    use speculoos::prelude::*;

    use super::*;

    fn scan(lines: &[&str]) -> Vec<Define> {
        let source = SourceText::from_lines("unit.cpp", lines);
        scan_defines(&source, &ProtectedSpans::scan(&source))
    }

    #[test]
    fn test_single_line_define() {
        let defines = scan(&["#include <vector>", "  #define MAX 10", "int a;"]);
        assert_that(&defines).is_equal_to(vec![Define {
            span: Span::single_line(1, 2, 15),
            text: "  #define MAX 10".to_owned(),
        }]);
    }

    #[test]
    fn test_trailing_comment_is_not_part_of_define() {
        let defines = scan(&["#define MAX 10 // limit"]);
        assert_that(&defines[0].span).is_equal_to(Span::single_line(0, 0, 13));
    }

    #[test]
    fn test_continued_define_concatenates_physical_lines() {
        let defines = scan(&[
            "#define FOO(x) \\",
            "  do { bar(x); \\",
            "  } while (0)",
            "int after;",
        ]);
        assert_that(&defines).has_length(1);
        assert_that(&defines[0].span).is_equal_to(Span::new((0, 0), (2, 12)));
        assert_that(&defines[0].text)
            .is_equal_to("#define FOO(x) \\  do { bar(x); \\  } while (0)".to_owned());
    }

    #[test]
    fn test_leading_block_comment_is_allowed() {
        let defines = scan(&["/* config */ #define DEBUG 1"]);
        assert_that(&defines[0].span.col_start).is_equal_to(13);
    }

    #[test]
    fn test_commented_out_define_is_ignored() {
        assert_that(&scan(&["// #define DEBUG 1", "/*", "#define X", "*/"])).is_empty();
    }

    #[test]
    fn test_macro_index() {
        let index = MacroIndex::new(&scan(&["#define A \\", "  1", "int a;", "#define B 2"]));
        assert_that(&index.range_containing(1)).is_equal_to(Some((0, 1)));
        assert_that(&index.contains_line(2)).is_false();
        assert_that(&index.contains_line(3)).is_true();
    }
}
