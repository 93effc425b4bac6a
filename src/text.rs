use std::{fs, path::Path};

use crate::{span::Position, Error, Result};

/// One unit of input: an ordered list of lines plus the name it is reported under.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceText {
    name: String,
    lines: Vec<String>,
}

impl SourceText {
    pub fn new(name: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            name: name.into(),
            lines,
        }
    }

    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self::new(
            name,
            text.lines()
                .map(|line| line.strip_suffix('\r').unwrap_or(line).to_owned())
                .collect(),
        )
    }

    pub fn from_lines<TLine: AsRef<str>>(
        name: impl Into<String>,
        lines: impl IntoIterator<Item = TLine>,
    ) -> Self {
        Self::new(
            name,
            lines
                .into_iter()
                .map(|line| line.as_ref().to_owned())
                .collect(),
        )
    }

    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| Error::UnreadableUnit {
            path: path.to_owned(),
            source,
        })?;
        Ok(Self::from_text(
            path.display().to_string(),
            &String::from_utf8_lossy(&bytes),
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> &str {
        self.lines.get(index).map_or("", String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn byte_at(&self, (line, col): Position) -> Option<u8> {
        self.lines.get(line)?.as_bytes().get(col).copied()
    }

    pub fn last_position(&self) -> Position {
        let last_line = self.lines.len().saturating_sub(1);
        (last_line, last_col(self.line(last_line)))
    }

    /// The text between two inclusive positions.
    pub fn slice(&self, start: Position, end: Position) -> Vec<&str> {
        (start.0..=end.0.min(self.lines.len().saturating_sub(1)))
            .filter(|&index| index < self.lines.len())
            .map(|index| {
                let line = self.line(index);
                let from = if index == start.0 { start.1 } else { 0 };
                let to = if index == end.0 { end.1 + 1 } else { line.len() };
                slice_line(line, from, to)
            })
            .collect()
    }
}

pub fn last_col(line: &str) -> usize {
    line.len().saturating_sub(1)
}

pub fn first_non_whitespace_col(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn slice_line(line: &str, from: usize, to: usize) -> &str {
    let mut to = to.min(line.len());
    while !line.is_char_boundary(to) {
        to += 1;
    }
    let mut from = from.min(to);
    while !line.is_char_boundary(from) {
        from -= 1;
    }
    &line[from..to]
}
