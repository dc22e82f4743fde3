//! Tokens and the events that open and close them.

use crate::Range;
use crate::position::Position;

/// Kind of a token.
///
/// The fenced code construct uses the first eleven; the rest belong to
/// the flow router and the plain text tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// A whole fenced code block.
    FencedCode,
    /// Opening fence line: sequence, info, and meta.
    FencedCodeFenceStart,
    /// Run of fence markers.
    FencedCodeFenceSequence,
    /// Spaces and tabs inside a fence line.
    FencedCodeFenceWhitespace,
    /// Info string (language).
    FencedCodeFenceInfo,
    /// Meta string after the info string.
    FencedCodeFenceMeta,
    /// Closing fence line.
    FencedCodeFenceEnd,
    /// Indentation at the start of a line.
    LinePrefix,
    /// Text of a line of code.
    CodeLineData,
    /// Line feed inside a code block.
    CodeLineFeed,
    /// Line feed outside code content.
    LineFeed,
    /// A line not claimed by any construct.
    Content,
    /// Run of non-whitespace text.
    Data,
    /// Run of spaces and tabs.
    Whitespace,
}

impl TokenType {
    /// The tag used in fixtures and debug output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FencedCode => "fencedCode",
            Self::FencedCodeFenceStart => "fencedCodeFenceStart",
            Self::FencedCodeFenceSequence => "fencedCodeFenceSequence",
            Self::FencedCodeFenceWhitespace => "fencedCodeFenceWhitespace",
            Self::FencedCodeFenceInfo => "fencedCodeFenceInfo",
            Self::FencedCodeFenceMeta => "fencedCodeFenceMeta",
            Self::FencedCodeFenceEnd => "fencedCodeFenceEnd",
            Self::LinePrefix => "linePrefix",
            Self::CodeLineData => "codeLineData",
            Self::CodeLineFeed => "codeLineFeed",
            Self::LineFeed => "lineFeed",
            Self::Content => "content",
            Self::Data => "data",
            Self::Whitespace => "whitespace",
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A span of input with a kind.
///
/// `end` is `None` while the token is open and set once by its exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenType,
    pub start: Position,
    pub end: Option<Position>,
}

impl Token {
    /// Open a token at `start`.
    #[inline]
    pub const fn open(kind: TokenType, start: Position) -> Self {
        Self {
            kind,
            start,
            end: None,
        }
    }

    /// Whether the matching exit has been seen.
    #[inline]
    pub const fn is_closed(&self) -> bool {
        self.end.is_some()
    }

    /// Byte range covered by a closed token.
    ///
    /// # Panics
    /// Panics if the token is still open.
    pub fn range(&self) -> Range {
        let end = match self.end {
            Some(end) => end,
            None => panic!("`{}` token is still open", self.kind),
        };
        Range::from_usize(self.start.offset, end.offset)
    }

    /// Text covered by a closed token.
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        self.range().slice(input)
    }
}

/// Whether an event opens or closes its token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Enter,
    Exit,
}

impl Phase {
    /// Lowercase name used when printing events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enter => "enter",
            Self::Exit => "exit",
        }
    }
}

/// One entry of the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub phase: Phase,
    pub token: Token,
}

impl Event {
    /// Event that opens `token`.
    #[inline]
    pub const fn enter(token: Token) -> Self {
        Self {
            phase: Phase::Enter,
            token,
        }
    }

    /// Event that closes `token`.
    #[inline]
    pub const fn exit(token: Token) -> Self {
        Self {
            phase: Phase::Exit,
            token,
        }
    }

    #[inline]
    pub fn is_enter(&self, kind: TokenType) -> bool {
        self.phase == Phase::Enter && self.token.kind == kind
    }

    #[inline]
    pub fn is_exit(&self, kind: TokenType) -> bool {
        self.phase == Phase::Exit && self.token.kind == kind
    }
}

impl std::fmt::Display for Event {
    /// `enter fencedCode 1:1-3:4`; open tokens show `?` as their end.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}-",
            self.phase.as_str(),
            self.token.kind,
            self.token.start
        )?;
        match self.token.end {
            Some(end) => write!(f, "{end}"),
            None => f.write_str("?"),
        }
    }
}

/// Ways an event list can be malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Imbalance {
    /// Exit at `index` does not match the innermost open token.
    Crossed { index: usize },
    /// Exit at `index` with nothing open.
    Unopened { index: usize },
    /// Tokens still open at the end.
    Unclosed { open: usize },
    /// Position at `index` is before the previous event's position.
    Regressed { index: usize },
    /// Token at `index` ends before it starts.
    Inverted { index: usize },
}

/// Check that events nest properly and positions never move backwards.
pub fn check_balance(events: &[Event]) -> Result<(), Imbalance> {
    let mut stack: Vec<(TokenType, Position)> = Vec::new();
    let mut last = None;

    for (index, event) in events.iter().enumerate() {
        let here = match event.phase {
            Phase::Enter => event.token.start,
            Phase::Exit => match event.token.end {
                Some(end) => end,
                None => return Err(Imbalance::Inverted { index }),
            },
        };
        if event.token.end.is_some_and(|end| end < event.token.start) {
            return Err(Imbalance::Inverted { index });
        }
        if last.is_some_and(|last| here < last) {
            return Err(Imbalance::Regressed { index });
        }
        last = Some(here);

        match event.phase {
            Phase::Enter => stack.push((event.token.kind, event.token.start)),
            Phase::Exit => match stack.pop() {
                Some((kind, start)) if kind == event.token.kind && start == event.token.start => {}
                Some(_) => return Err(Imbalance::Crossed { index }),
                None => return Err(Imbalance::Unopened { index }),
            },
        }
    }

    if stack.is_empty() {
        Ok(())
    } else {
        Err(Imbalance::Unclosed { open: stack.len() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed(kind: TokenType, start: usize, end: usize) -> Token {
        Token {
            kind,
            start: Position::new(1, start + 1, start),
            end: Some(Position::new(1, end + 1, end)),
        }
    }

    #[test]
    fn test_tags() {
        assert_eq!(TokenType::FencedCodeFenceInfo.as_str(), "fencedCodeFenceInfo");
        assert_eq!(TokenType::CodeLineFeed.to_string(), "codeLineFeed");
    }

    #[test]
    fn test_token_slice() {
        let token = closed(TokenType::FencedCodeFenceInfo, 3, 5);
        assert_eq!(token.slice("```js\n"), "js");
    }

    #[test]
    #[should_panic(expected = "still open")]
    fn test_open_token_has_no_range() {
        Token::open(TokenType::Data, Position::default()).range();
    }

    #[test]
    fn test_display() {
        let event = Event::exit(closed(TokenType::CodeLineData, 0, 4));
        assert_eq!(event.to_string(), "exit codeLineData 1:1-1:5");
        let event = Event::enter(Token::open(TokenType::Data, Position::default()));
        assert_eq!(event.to_string(), "enter data 1:1-?");
    }

    #[test]
    fn test_balance_ok() {
        let outer = closed(TokenType::FencedCode, 0, 4);
        let inner = closed(TokenType::FencedCodeFenceSequence, 0, 3);
        let events = [
            Event::enter(outer),
            Event::enter(inner),
            Event::exit(inner),
            Event::exit(outer),
        ];
        assert_eq!(check_balance(&events), Ok(()));
    }

    #[test]
    fn test_balance_crossed() {
        let a = closed(TokenType::Data, 0, 2);
        let b = closed(TokenType::Whitespace, 1, 3);
        let events = [Event::enter(a), Event::enter(b), Event::exit(a), Event::exit(b)];
        assert_eq!(check_balance(&events), Err(Imbalance::Crossed { index: 2 }));
    }

    #[test]
    fn test_balance_unclosed() {
        let a = closed(TokenType::Data, 0, 2);
        assert_eq!(
            check_balance(&[Event::enter(a)]),
            Err(Imbalance::Unclosed { open: 1 })
        );
    }
}
