use super::protected::ProtectedSpans;
use crate::{span::Position, Error, Result, SourceText};

pub const MAX_NESTING_DEPTH: usize = 128;

/// Walks the bytes of a unit from a starting position, skipping everything
/// inside comments and literals.
pub struct Cursor<'a> {
    source: &'a SourceText,
    protected: &'a ProtectedSpans,
    line: usize,
    col: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a SourceText, protected: &'a ProtectedSpans, start: Position) -> Self {
        Self {
            source,
            protected,
            line: start.0,
            col: start.1,
        }
    }
}

impl Iterator for Cursor<'_> {
    type Item = (Position, u8);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.line >= self.source.len() {
                return None;
            }
            let position = (self.line, self.col);
            let Some(byte) = self.source.byte_at(position) else {
                self.line += 1;
                self.col = 0;
                continue;
            };
            self.col += 1;
            if self.protected.is_protected(position) {
                continue;
            }
            return Some((position, byte));
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExtentState {
    Scanning,
    InDepth(usize),
    Closed(Position),
    Failed,
}

#[derive(Copy, Clone, Debug)]
pub struct Delimiters {
    pub open: u8,
    pub close: u8,
    /// A `;` seen before any opening delimiter ends the extent there.
    pub ends_at_statement: bool,
}

pub const BRACES: Delimiters = Delimiters {
    open: b'{',
    close: b'}',
    ends_at_statement: false,
};

pub const BRACES_OR_STATEMENT: Delimiters = Delimiters {
    ends_at_statement: true,
    ..BRACES
};

pub const PARENTHESES: Delimiters = Delimiters {
    open: b'(',
    close: b')',
    ends_at_statement: false,
};

impl ExtentState {
    fn advance(self, byte: u8, position: Position, delimiters: Delimiters) -> Self {
        match self {
            Self::Scanning if byte == delimiters.open => Self::InDepth(1),
            Self::Scanning if byte == b';' && delimiters.ends_at_statement => {
                Self::Closed(position)
            }
            Self::InDepth(depth) if byte == delimiters.open => {
                if depth + 1 > MAX_NESTING_DEPTH {
                    Self::Failed
                } else {
                    Self::InDepth(depth + 1)
                }
            }
            Self::InDepth(1) if byte == delimiters.close => Self::Closed(position),
            Self::InDepth(depth) if byte == delimiters.close => Self::InDepth(depth - 1),
            state => state,
        }
    }
}

pub struct ExtentResolver<'a> {
    source: &'a SourceText,
    protected: &'a ProtectedSpans,
}

impl<'a> ExtentResolver<'a> {
    pub fn new(source: &'a SourceText, protected: &'a ProtectedSpans) -> Self {
        Self { source, protected }
    }

    pub fn cursor(&self, start: Position) -> Cursor<'a> {
        Cursor::new(self.source, self.protected, start)
    }

    pub fn unbalanced(&self, line: usize, reason: impl Into<String>) -> Error {
        Error::unbalanced(self.source.name(), line, reason)
    }

    /// Position of the delimiter closing the first group opened at or after `start`.
    pub fn resolve(&self, start: Position, delimiters: Delimiters) -> Result<Position> {
        let mut state = ExtentState::Scanning;
        for (position, byte) in self.cursor(start) {
            state = state.advance(byte, position, delimiters);
            match state {
                ExtentState::Closed(end) => return Ok(end),
                ExtentState::Failed => {
                    return Err(self.unbalanced(
                        position.0,
                        format!("nesting deeper than {MAX_NESTING_DEPTH}"),
                    ))
                }
                _ => (),
            }
        }
        Err(self.unbalanced(
            start.0,
            format!(
                "end of unit reached before closing `{}`",
                delimiters.close as char
            ),
        ))
    }

    /// The first `;` or `{` decides between a declaration and a braced body.
    pub fn resolve_declaration_or_body(&self, start: Position) -> Result<Position> {
        self.resolve(start, BRACES_OR_STATEMENT)
    }

    pub fn next_non_whitespace(&self, start: Position) -> Option<(Position, u8)> {
        self.cursor(start)
            .find(|(_, byte)| !byte.is_ascii_whitespace())
    }

    /// The `;` ending a `while` that closes a `do` loop, ie one followed by a
    /// parenthesized condition and then `;`.
    pub fn loop_closing_statement(&self, after_keyword: Position) -> Option<Position> {
        let (open, byte) = self.next_non_whitespace(after_keyword)?;
        if byte != b'(' {
            return None;
        }
        let (line, col) = self.resolve(open, PARENTHESES).ok()?;
        self.next_non_whitespace((line, col + 1))
            .filter(|(_, byte)| *byte == b';')
            .map(|(position, _)| position)
    }

    pub fn is_loop_closing_while(&self, after_keyword: Position) -> bool {
        self.loop_closing_statement(after_keyword).is_some()
    }
}
