//! Position-tracking cursor over the input buffer.
//!
//! The cursor owns the only notion of "where we are". It decodes one code
//! point at a time, keeps line/column/offset in sync, and can be reset to an
//! earlier [`Position`] when an attempt is rolled back.

use crate::code::Code;
use crate::position::Position;

/// A cursor for code point by code point scanning.
///
/// # Example
/// ```
/// use fencemark::cursor::Cursor;
/// use fencemark::Code;
///
/// let mut cursor = Cursor::new("a\nb");
/// assert_eq!(cursor.current(), Code::Char('a'));
/// cursor.bump();
/// cursor.bump();
/// assert_eq!(cursor.position().line, 2);
/// assert_eq!(cursor.current(), Code::Char('b'));
/// ```
#[derive(Clone, Copy)]
pub struct Cursor<'a> {
    input: &'a str,
    position: Position,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at the start of `input`.
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: Position::default(),
        }
    }

    /// Current position.
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// The code point under the cursor.
    #[inline]
    pub fn current(&self) -> Code {
        match self.remaining_slice().chars().next() {
            Some(c) => Code::Char(c),
            None => Code::Eof,
        }
    }

    /// Move past the current code point.
    ///
    /// Does nothing at end of input.
    #[inline]
    pub fn bump(&mut self) {
        if let Code::Char(c) = self.current() {
            self.position = self.position.advance(c);
        }
    }

    /// Move back to an earlier position.
    #[inline]
    pub fn reset(&mut self, position: Position) {
        debug_assert!(position.offset <= self.position.offset);
        self.position = position;
    }

    /// Input not yet consumed.
    #[inline]
    pub fn remaining_slice(&self) -> &'a str {
        &self.input[self.position.offset..]
    }

}

impl std::fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.position)
            .field("remaining", &self.remaining_slice().len())
            .finish()
    }
}
