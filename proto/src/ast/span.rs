//! Source location tracking for serialized programs and config files

use serde::{Deserialize, Serialize};

/// A byte range in a source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at a 1-based line/column position, as reported by
    /// serde_json. Positions past the end clamp to the source length.
    pub fn at_line_col(source: &str, line: usize, column: usize) -> Span {
        let mut offset = 0;
        for (i, text) in source.split_inclusive('\n').enumerate() {
            if i + 1 == line {
                let col = column.saturating_sub(1).min(text.len());
                let pos = (offset + col).min(source.len());
                return Span::new(pos, pos);
            }
            offset += text.len();
        }
        Span::new(source.len(), source.len())
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_display() {
        assert_eq!(Span::new(3, 9).to_string(), "3..9");
    }

    #[test]
    fn test_span_range_roundtrip() {
        let range: std::ops::Range<usize> = Span::new(2, 5).into();
        assert_eq!(range, 2..5);
        assert_eq!(Span::from(2..5), Span::new(2, 5));
    }

    #[test]
    fn test_at_line_col_first_line() {
        assert_eq!(Span::at_line_col("abc\ndef", 1, 2), Span::new(1, 1));
    }

    #[test]
    fn test_at_line_col_second_line() {
        assert_eq!(Span::at_line_col("abc\ndef", 2, 3), Span::new(6, 6));
    }

    #[test]
    fn test_at_line_col_past_end() {
        assert_eq!(Span::at_line_col("abc", 7, 1), Span::new(3, 3));
        assert_eq!(Span::at_line_col("abc", 1, 99), Span::new(3, 3));
    }
}
