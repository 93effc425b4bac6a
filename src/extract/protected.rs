use crate::{
    span::{find_containing, Position, Span},
    text::last_col,
    ScopeKind, SourceText,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CommentStyle {
    SingleLine,
    MultiLine,
}

impl CommentStyle {
    pub fn kind(self) -> ScopeKind {
        match self {
            Self::SingleLine => ScopeKind::SingleLineComment,
            Self::MultiLine => ScopeKind::MultiLineComment,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub span: Span,
    pub style: CommentStyle,
}

/// Comments and string/character literals of a unit, each list sorted and
/// non-overlapping. Positions inside them are inert to every other scanner.
#[derive(Clone, Debug, Default)]
pub struct ProtectedSpans {
    comments: Vec<Comment>,
    literals: Vec<Span>,
}

#[derive(Copy, Clone)]
enum State {
    Code,
    BlockComment { start: Position },
    StringLiteral { start: Position },
}

impl ProtectedSpans {
    pub fn scan(source: &SourceText) -> Self {
        let mut comments = vec![];
        let mut literals = vec![];
        let mut state = State::Code;

        for (line_index, line) in source.lines().iter().enumerate() {
            let bytes = line.as_bytes();
            let end_of_line = last_col(line);
            let mut col = 0;
            while col < bytes.len() {
                let next = bytes.get(col + 1).copied();
                match state {
                    State::Code => match (bytes[col], next) {
                        (b'/', Some(b'/')) => {
                            comments.push(Comment {
                                span: Span::single_line(line_index, col, end_of_line),
                                style: CommentStyle::SingleLine,
                            });
                            break;
                        }
                        (b'/', Some(b'*')) => {
                            state = State::BlockComment {
                                start: (line_index, col),
                            };
                            col += 2;
                        }
                        (b'"', _) => {
                            state = State::StringLiteral {
                                start: (line_index, col),
                            };
                            col += 1;
                        }
                        (b'\'', _) => {
                            let end = if col == end_of_line {
                                col
                            } else if next == Some(b'\\') {
                                (col + 3).min(end_of_line)
                            } else {
                                (col + 2).min(end_of_line)
                            };
                            literals.push(Span::single_line(line_index, col, end));
                            col = end + 1;
                        }
                        _ => col += 1,
                    },
                    State::BlockComment { start } => {
                        if bytes[col] == b'*' && next == Some(b'/') {
                            comments.push(Comment {
                                span: Span::new(start, (line_index, col + 1)),
                                style: CommentStyle::MultiLine,
                            });
                            state = State::Code;
                            col += 2;
                        } else {
                            col += 1;
                        }
                    }
                    State::StringLiteral { start } => match bytes[col] {
                        b'\\' => col += 2,
                        b'"' => {
                            literals.push(Span::new(start, (line_index, col)));
                            state = State::Code;
                            col += 1;
                        }
                        _ => col += 1,
                    },
                }
            }

            // Unterminated string literals end with their line.
            if let State::StringLiteral { start } = state {
                literals.push(Span::new(start, (line_index, end_of_line)));
                state = State::Code;
            }
        }

        if let State::BlockComment { start } = state {
            comments.push(Comment {
                span: Span::new(start, source.last_position().max(start)),
                style: CommentStyle::MultiLine,
            });
        }

        Self { comments, literals }
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn literals(&self) -> &[Span] {
        &self.literals
    }

    pub fn comment_at(&self, position: Position) -> Option<&Comment> {
        find_containing(&self.comments, position, |comment| &comment.span)
    }

    pub fn is_within_comment(&self, position: Position) -> bool {
        self.comment_at(position).is_some()
    }

    pub fn is_within_literal(&self, position: Position) -> bool {
        find_containing(&self.literals, position, |span| span).is_some()
    }

    pub fn is_protected(&self, position: Position) -> bool {
        self.is_within_comment(position) || self.is_within_literal(position)
    }

    pub fn comment_text(&self, source: &SourceText, comment: &Comment) -> String {
        source
            .slice(comment.span.start(), comment.span.end())
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use speculoos::prelude::*;

    use super::*;

    fn scan(lines: &[&str]) -> ProtectedSpans {
        ProtectedSpans::scan(&SourceText::from_lines("unit.cpp", lines))
    }

    #[test]
    fn test_single_line_comment_runs_to_end_of_line() {
        let spans = scan(&["int a; // trailing", "int b;"]);
        assert_that(&spans.comments().to_vec()).has_length(1);
        assert_that(&spans.comments()[0].span).is_equal_to(Span::single_line(0, 7, 17));
        assert_that(&spans.is_within_comment((0, 6))).is_false();
        assert_that(&spans.is_within_comment((0, 10))).is_true();
        assert_that(&spans.is_within_comment((1, 0))).is_false();
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let spans = scan(&["/* void f();", "   int a; */ int b;"]);
        assert_that(&spans.comments()[0]).is_equal_to(Comment {
            span: Span::new((0, 0), (1, 11)),
            style: CommentStyle::MultiLine,
        });
        assert_that(&spans.is_within_comment((1, 3))).is_true();
        assert_that(&spans.is_within_comment((1, 13))).is_false();
    }

    #[test]
    fn test_unterminated_block_comment_runs_to_end_of_unit() {
        let spans = scan(&["int a; /*", "int b;"]);
        assert_that(&spans.comments()[0].span).is_equal_to(Span::new((0, 7), (1, 5)));
    }

    #[test]
    fn test_comment_markers_inside_literals_are_ignored() {
        let spans = scan(&[r#"const char* s = "// not a comment";"#]);
        assert_that(&spans.comments().to_vec()).is_empty();
        assert_that(&spans.literals().to_vec()).has_length(1);
        assert_that(&spans.is_within_literal((0, 20))).is_true();
    }

    #[test]
    fn test_escaped_quotes() {
        let spans = scan(&[r#"s = "a \" b"; t = "c\\"; u = 1;"#]);
        assert_that(&spans.literals()).is_equal_to(
            &[Span::single_line(0, 4, 11), Span::single_line(0, 18, 22)][..],
        );
    }

    #[test]
    fn test_character_literals() {
        let spans = scan(&[r"char a = '\''; char b = '/'; // c"]);
        assert_that(&spans.literals()).is_equal_to(
            &[Span::single_line(0, 9, 12), Span::single_line(0, 24, 26)][..],
        );
        assert_that(&spans.comments().to_vec()).has_length(1);
    }

    #[test]
    fn test_unterminated_string_ends_with_its_line() {
        let spans = scan(&[r#"s = "open"#, "int a;"]);
        assert_that(&spans.literals()).is_equal_to(&[Span::single_line(0, 4, 8)][..]);
        assert_that(&spans.is_protected((1, 0))).is_false();
    }
}
