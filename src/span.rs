use std::fmt;

/// An inclusive region of a unit, in 0-indexed lines and byte columns.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub line_start: usize,
    pub line_end: usize,
    pub col_start: usize,
    pub col_end: usize,
}

pub type Position = (usize, usize);

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start <= end);
        Self {
            line_start: start.0,
            col_start: start.1,
            line_end: end.0,
            col_end: end.1,
        }
    }

    pub fn single_line(line: usize, col_start: usize, col_end: usize) -> Self {
        Self::new((line, col_start), (line, col_end))
    }

    pub fn start(&self) -> Position {
        (self.line_start, self.col_start)
    }

    pub fn end(&self) -> Position {
        (self.line_end, self.col_end)
    }

    pub fn is_within(&self, other: &Span) -> bool {
        self.start() >= other.start() && self.end() <= other.end()
    }

    /// Identical spans never strictly contain each other.
    pub fn is_strictly_within(&self, other: &Span) -> bool {
        self != other && self.is_within(other)
    }

    pub fn contains_position(&self, position: Position) -> bool {
        self.start() <= position && position <= self.end()
    }

    pub fn contains_line(&self, line: usize) -> bool {
        (self.line_start..=self.line_end).contains(&line)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.line_start, self.col_start, self.line_end, self.col_end
        )
    }
}

/// Finds the span containing `position` in a sorted list of non-overlapping spans.
pub fn find_containing<T>(
    items: &[T],
    position: Position,
    get_span: impl Fn(&T) -> &Span,
) -> Option<&T> {
    let index = items.partition_point(|item| get_span(item).start() <= position);
    let candidate = items.get(index.checked_sub(1)?)?;
    get_span(candidate)
        .contains_position(position)
        .then_some(candidate)
}
