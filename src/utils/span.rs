//! Source location tracking

/// A span represents a range in the source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Start char offset
    pub start: usize,
    /// End char offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a dummy span (for built-ins and tests)
    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    /// Merge two spans
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// 1-based line and column of the span start within `source`
    pub fn line_col(&self, source: &str) -> (u32, u32) {
        let mut line = 1;
        let mut column = 1;
        for c in source.chars().take(self.start) {
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        (line, column)
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::dummy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge() {
        let span = Span::new(4, 6).merge(&Span::new(1, 3));
        assert_eq!(span, Span::new(1, 6));
    }

    #[test]
    fn test_line_col() {
        let source = "class Main\n  : Object";
        assert_eq!(Span::new(0, 5).line_col(source), (1, 1));
        assert_eq!(Span::new(13, 14).line_col(source), (2, 3));
    }
}
