//! Plain text tokenizer used to refine raw spans.
//!
//! Splits text into runs of `whitespace` (spaces and tabs) and `data`
//! (everything else). Text can arrive in several chunks: a run still open
//! at the end of a chunk is only emitted once a later chunk ends it or
//! [`PlainText::flush`] is called.

use crate::event::{Event, Token, TokenType};
use crate::position::Position;

/// Chunked plain text tokenizer.
///
/// # Example
/// ```
/// use fencemark::{PlainText, Position, TokenType};
///
/// let mut text = PlainText::new(Position::new(1, 4, 3));
/// let mut events = text.write("rust ");
/// events.extend(text.flush());
/// assert_eq!(events.len(), 4);
/// assert_eq!(events[0].token.kind, TokenType::Data);
/// assert_eq!(events[0].token.start.column, 4);
/// ```
#[derive(Debug, Clone)]
pub struct PlainText {
    position: Position,
    open: Option<(TokenType, Position)>,
}

impl PlainText {
    /// Start tokenizing text whose first code point sits at `start`.
    pub fn new(start: Position) -> Self {
        Self {
            position: start,
            open: None,
        }
    }

    /// Tokenize the next chunk.
    pub fn write(&mut self, text: &str) -> Vec<Event> {
        let mut events = Vec::new();
        let mut rest = text;

        while let Some(first) = rest.bytes().next() {
            let (kind, len) = if is_space_or_tab(first) {
                let len = rest.bytes().take_while(|&b| is_space_or_tab(b)).count();
                (TokenType::Whitespace, len)
            } else {
                let len = memchr::memchr2(b' ', b'\t', rest.as_bytes()).unwrap_or(rest.len());
                (TokenType::Data, len)
            };

            let (run, tail) = rest.split_at(len);
            self.extend(kind, run, &mut events);
            rest = tail;
        }

        events
    }

    /// Emit the run still open, if any.
    pub fn flush(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        self.close(&mut events);
        events
    }

    fn extend(&mut self, kind: TokenType, run: &str, events: &mut Vec<Event>) {
        if self.open.is_some_and(|(open, _)| open != kind) {
            self.close(events);
        }
        if self.open.is_none() {
            self.open = Some((kind, self.position));
        }
        for c in run.chars() {
            self.position = self.position.advance(c);
        }
    }

    fn close(&mut self, events: &mut Vec<Event>) {
        if let Some((kind, start)) = self.open.take() {
            let token = Token {
                kind,
                start,
                end: Some(self.position),
            };
            events.push(Event::enter(token));
            events.push(Event::exit(token));
        }
    }
}

#[inline]
fn is_space_or_tab(b: u8) -> bool {
    b == b' ' || b == b'\t'
}
