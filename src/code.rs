//! Code points fed to construct states.
//!
//! The end of input is an ordinary value here: every state receives it
//! and must decide what to do with it. Line feeds are plain characters.

/// Backtick, one of the two fence markers.
pub const GRAVE_ACCENT: char = '`';
/// Tilde, the other fence marker.
pub const TILDE: char = '~';
/// Line feed, the only line ending the tokenizer knows about.
pub const LINE_FEED: char = '\n';
/// Horizontal tab.
pub const TAB: char = '\t';
/// Space.
pub const SPACE: char = ' ';

/// A single unit of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    /// A character from the input buffer.
    Char(char),
    /// End of input sentinel.
    Eof,
}

impl Code {
    /// Get the character, if this is not the end of input.
    #[inline]
    pub const fn char(self) -> Option<char> {
        match self {
            Self::Char(c) => Some(c),
            Self::Eof => None,
        }
    }

    /// Check whether this is exactly `c`.
    #[inline]
    pub fn is(self, c: char) -> bool {
        self == Self::Char(c)
    }

    /// Space or tab.
    #[inline]
    pub fn is_space_or_tab(self) -> bool {
        matches!(self, Self::Char(SPACE | TAB))
    }

    /// End of input or a line feed.
    #[inline]
    pub fn is_eol_or_eof(self) -> bool {
        matches!(self, Self::Eof | Self::Char(LINE_FEED))
    }

    /// Column width used for indentation.
    ///
    /// A tab is a flat four columns, not rounded to the next tab stop.
    #[inline]
    pub fn indent_width(self) -> usize {
        if self.is(TAB) { 4 } else { 1 }
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{c:?}"),
            Self::Eof => f.write_str("EOF"),
        }
    }
}

/// Indentation width of a run of spaces and tabs.
pub fn indent_width(text: &str) -> usize {
    text.chars().map(|c| Code::Char(c).indent_width()).sum()
}
