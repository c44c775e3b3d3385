//! Mapping between absolute char offsets and line/column positions.

/// One source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Line text without its terminator.
    pub text: &'a str,
    /// Char offset of the first character.
    pub start: usize,
    /// Length in chars, terminator excluded.
    pub len: usize,
    /// Width of the terminator: 0 (last line), 1 (`\n` or `\r`) or 2 (`\r\n`).
    pub terminator: usize,
}

impl Line<'_> {
    /// Offset one past the terminator.
    pub fn next_start(&self) -> usize {
        self.start + self.len + self.terminator
    }
}

/// Line table for a source text, built in one pass.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    lines: Vec<Line<'a>>,
    len: usize,
}

impl<'a> LineIndex<'a> {
    /// Splits `source` on `\r\n`, `\n` or a lone `\r`.
    pub fn new(source: &'a str) -> Self {
        let mut lines = Vec::new();
        let mut start = 0;
        let mut rest = source;
        loop {
            match rest.find(['\n', '\r']) {
                Some(end) => {
                    let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                    let text = &rest[..end];
                    let len = text.chars().count();
                    lines.push(Line {
                        text,
                        start,
                        len,
                        terminator,
                    });
                    start += len + terminator;
                    rest = &rest[end + terminator..];
                }
                None => {
                    let len = rest.chars().count();
                    lines.push(Line {
                        text: rest,
                        start,
                        len,
                        terminator: 0,
                    });
                    start += len;
                    break;
                }
            }
        }
        Self { lines, len: start }
    }

    /// All lines; never empty.
    pub fn lines(&self) -> &[Line<'a>] {
        &self.lines
    }

    /// Source length in chars.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for an empty source.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Line holding `offset`; offsets inside a terminator belong to the line it ends.
    pub fn line_of(&self, offset: usize) -> Option<usize> {
        if offset > self.len {
            return None;
        }
        Some(self.lines.partition_point(|line| line.start <= offset) - 1)
    }

    /// Zero-based `(line, column)` for `offset`, with columns clamped to the line text.
    pub fn position(&self, offset: usize) -> Option<(usize, usize)> {
        let line = self.line_of(offset)?;
        let info = &self.lines[line];
        Some((line, (offset - info.start).min(info.len)))
    }
}

/// Byte slice of `text` between two char positions.
pub(crate) fn char_slice(text: &str, from: usize, to: usize) -> &str {
    let mut indices = text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len()));
    let start = indices.nth(from).unwrap_or(text.len());
    let end = if to > from {
        indices.nth(to - from - 1).unwrap_or(text.len())
    } else {
        start
    };
    &text[start..end]
}
