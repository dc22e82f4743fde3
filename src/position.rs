//! Points in the input buffer.

/// A place in the input.
///
/// `line` and `column` are 1-indexed and count code points; `offset` is the
/// 0-indexed byte offset into the UTF-8 input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset (0-indexed).
    pub offset: usize,
}

impl Position {
    /// Create a position.
    #[inline]
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// The position after moving over `c`.
    #[inline]
    pub fn advance(self, c: char) -> Self {
        if c == '\n' {
            Self {
                line: self.line + 1,
                column: 1,
                offset: self.offset + 1,
            }
        } else {
            Self {
                line: self.line,
                column: self.column + 1,
                offset: self.offset + c.len_utf8(),
            }
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1, 0)
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.offset.cmp(&other.offset)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_start() {
        assert_eq!(Position::default(), Position::new(1, 1, 0));
    }

    #[test]
    fn test_advance_column() {
        let p = Position::default().advance('a').advance('b');
        assert_eq!(p, Position::new(1, 3, 2));
    }

    #[test]
    fn test_advance_line_feed() {
        let p = Position::new(1, 4, 3).advance('\n');
        assert_eq!(p, Position::new(2, 1, 4));
    }

    #[test]
    fn test_advance_multibyte() {
        let p = Position::default().advance('ä');
        assert_eq!(p.column, 2);
        assert_eq!(p.offset, 2);
    }

    #[test]
    fn test_ordering_by_offset() {
        assert!(Position::new(1, 2, 1) < Position::new(2, 1, 5));
    }
}
