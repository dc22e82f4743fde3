//! The construct-execution engine.
//!
//! [`Tokenizer`] is the effects object handed to every state: it records
//! `enter`/`exit` events, consumes code points, and runs constructs
//! speculatively through [`Tokenizer::attempt`]. The driver in
//! [`Tokenizer::run`] is a trampoline that feeds the current code point to
//! the current state until the outermost construct finishes.
//!
//! Attempts are transactional: an attempt record remembers how long the
//! event log was, where the cursor stood, and which tokens were open. A
//! `nok` inside the attempt truncates the log back to that length and
//! rewinds the cursor; an `ok` simply keeps everything.

use smallvec::SmallVec;

use crate::Options;
use crate::code::Code;
use crate::construct::{self, Construct, ConstructTable, State, StateName};
use crate::construct::fenced_code::FenceState;
use crate::construct::flow::FlowState;
use crate::cursor::Cursor;
use crate::error::Error;
use crate::event::{Event, Token, TokenType};
use crate::limits::MAX_ATTEMPT_DEPTH;
use crate::position::Position;

/// Snapshot taken before a construct runs speculatively.
#[derive(Debug, Clone)]
struct Attempt {
    construct: Construct,
    ok: StateName,
    nok: StateName,
    event_count: usize,
    position: Position,
    stack: SmallVec<[usize; 8]>,
    pending_count: usize,
}

/// A committed construct waiting for its resolver.
#[derive(Debug, Clone, Copy)]
struct PendingResolve {
    construct: Construct,
    start: usize,
}

/// Effects and driver for one input buffer.
pub struct Tokenizer<'a> {
    input: &'a str,
    cursor: Cursor<'a>,
    events: Vec<Event>,
    /// Indices of enter events whose tokens are still open.
    stack: SmallVec<[usize; 8]>,
    attempts: SmallVec<[Attempt; 4]>,
    pending: Vec<PendingResolve>,
    consumed: bool,
    resolve: bool,
    pub(crate) table: ConstructTable,
    pub(crate) fence: FenceState,
    pub(crate) flow: FlowState,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer over a complete input buffer.
    pub fn new(input: &'a str, options: &Options) -> Self {
        Self {
            input,
            cursor: Cursor::new(input),
            events: Vec::with_capacity(input.len() / 8 + 8),
            stack: SmallVec::new(),
            attempts: SmallVec::new(),
            pending: Vec::new(),
            consumed: false,
            resolve: options.resolve,
            table: ConstructTable::flow(options),
            fence: FenceState::default(),
            flow: FlowState::default(),
        }
    }

    /// The whole input buffer.
    #[inline]
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Code point under the cursor.
    #[inline]
    pub fn current(&self) -> Code {
        self.cursor.current()
    }

    /// Current position.
    #[inline]
    pub fn position(&self) -> Position {
        self.cursor.position()
    }

    /// Events recorded so far.
    #[inline]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Take the event log.
    ///
    /// # Panics
    /// Panics if tokens are still open or an attempt is unresolved.
    pub fn into_events(self) -> Vec<Event> {
        assert!(
            self.attempts.is_empty(),
            "{} attempt(s) still open",
            self.attempts.len()
        );
        if let Some(&index) = self.stack.last() {
            panic!("`{}` token was never exited", self.events[index].token.kind);
        }
        self.events
    }

    /// Token of the most recent event, if any.
    ///
    /// Right after an `exit` this is the token that was just closed, which
    /// is how a construct inspects the indentation in front of it.
    #[inline]
    pub fn previous_token(&self) -> Option<&Token> {
        self.events.last().map(|event| &event.token)
    }

    /// Text of a closed token.
    #[inline]
    pub fn slice(&self, token: &Token) -> &'a str {
        token.slice(self.input)
    }

    /// Open a token at the current position.
    pub fn enter(&mut self, kind: TokenType) {
        let token = Token::open(kind, self.cursor.position());
        self.stack.push(self.events.len());
        self.events.push(Event::enter(token));
    }

    /// Close the innermost open token, which must be of `kind`.
    ///
    /// # Panics
    /// Panics on a mismatched or missing token: that is a construct bug.
    pub fn exit(&mut self, kind: TokenType) {
        let index = match self.stack.pop() {
            Some(index) => index,
            None => panic!("cannot exit `{kind}`: no token is open"),
        };
        let open = self.events[index].token.kind;
        assert!(open == kind, "cannot exit `{kind}`: innermost open token is `{open}`");

        let end = self.cursor.position();
        self.events[index].token.end = Some(end);
        let token = self.events[index].token;
        self.events.push(Event::exit(token));
    }

    /// Move past `code`, which must be the code point under the cursor.
    ///
    /// # Panics
    /// Panics when consuming anything but the current lookahead, the end of
    /// input, or twice within one state.
    pub fn consume(&mut self, code: Code) {
        let current = self.cursor.current();
        assert!(code == current, "cannot consume {code}: current code point is {current}");
        assert!(code != Code::Eof, "cannot consume the end of input");
        assert!(!self.consumed, "cannot consume twice in one state");
        self.cursor.bump();
        self.consumed = true;
    }

    /// Run `construct` speculatively.
    ///
    /// Returns the state to continue with; the driver picks `ok` or `nok`
    /// once the construct finishes.
    pub fn attempt(&mut self, construct: Construct, ok: StateName, nok: StateName) -> State {
        log::debug!(
            "attempt {} at {}",
            construct.name(),
            self.cursor.position()
        );
        self.attempts.push(Attempt {
            construct,
            ok,
            nok,
            event_count: self.events.len(),
            position: self.cursor.position(),
            stack: self.stack.clone(),
            pending_count: self.pending.len(),
        });
        State::Retry(construct.start())
    }

    /// Drive states from `start` until the outermost construct finishes.
    ///
    /// Returns whether it matched.
    ///
    /// # Errors
    /// [`Error::AttemptDepthExceeded`] once more than
    /// [`MAX_ATTEMPT_DEPTH`] attempts are open. The constructs in this
    /// crate never nest that deep; the limit stops runaway constructs.
    pub fn run(&mut self, start: StateName) -> Result<bool, Error> {
        let mut state = State::Retry(start);

        loop {
            if self.attempts.len() > MAX_ATTEMPT_DEPTH {
                return Err(Error::AttemptDepthExceeded {
                    max: MAX_ATTEMPT_DEPTH,
                });
            }

            let name = match state {
                State::Next(name) => {
                    assert!(self.consumed, "{name:?} was entered without consuming");
                    name
                }
                State::Retry(name) => {
                    assert!(!self.consumed, "{name:?} was retried after consuming");
                    name
                }
                State::Ok => match self.attempts.pop() {
                    Some(attempt) => self.commit(attempt),
                    None => return Ok(true),
                },
                State::Nok => match self.attempts.pop() {
                    Some(attempt) => self.rollback(attempt),
                    None => return Ok(false),
                },
            };

            self.consumed = false;
            let code = self.cursor.current();

            #[cfg(feature = "trace")]
            log::trace!("{name:?} <- {code} at {}", self.cursor.position());

            state = construct::call(self, name, code);
        }
    }

    /// Keep an attempt's effects.
    fn commit(&mut self, attempt: Attempt) -> StateName {
        log::debug!(
            "commit {} at {}..{}",
            attempt.construct.name(),
            attempt.position,
            self.cursor.position()
        );

        if attempt.construct.resolver().is_some() {
            self.pending.push(PendingResolve {
                construct: attempt.construct,
                start: attempt.event_count,
            });
        }

        if self.attempts.is_empty() {
            self.run_resolvers();
        }

        attempt.ok
    }

    /// Discard an attempt's effects and rewind.
    fn rollback(&mut self, attempt: Attempt) -> StateName {
        log::debug!(
            "rollback {} to {}",
            attempt.construct.name(),
            attempt.position
        );

        self.events.truncate(attempt.event_count);
        for &index in &attempt.stack {
            self.events[index].token.end = None;
        }
        self.stack = attempt.stack;
        self.pending.truncate(attempt.pending_count);
        self.cursor.reset(attempt.position);

        attempt.nok
    }

    /// Apply resolvers of constructs committed at the top level.
    ///
    /// Later constructs resolve first so earlier start indices stay valid.
    ///
    /// # Panics
    /// Panics if an attempt is still open: nothing is final yet.
    fn run_resolvers(&mut self) {
        assert!(
            self.attempts.is_empty(),
            "cannot resolve while an attempt is open"
        );

        let pending = std::mem::take(&mut self.pending);
        if !self.resolve {
            return;
        }

        for item in pending.into_iter().rev() {
            let Some(resolver) = item.construct.resolver() else {
                continue;
            };
            debug_assert!(self.stack.iter().all(|&index| index < item.start));
            log::debug!("resolve {} from event {}", item.construct.name(), item.start);
            let tail = self.events.split_off(item.start);
            let resolved = resolver(tail, self.input);
            self.events.extend(resolved);
        }
    }
}

impl std::fmt::Debug for Tokenizer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer")
            .field("cursor", &self.cursor)
            .field("events", &self.events.len())
            .field("open", &self.stack.len())
            .field("attempts", &self.attempts.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer(input: &str) -> Tokenizer<'_> {
        Tokenizer::new(input, &Options::default())
    }

    #[test]
    fn test_enter_exit_records_positions() {
        let mut t = tokenizer("ab");
        t.enter(TokenType::Data);
        t.consume(Code::Char('a'));
        t.consumed = false;
        t.consume(Code::Char('b'));
        t.exit(TokenType::Data);

        let events = t.into_events();
        assert_eq!(events.len(), 2);
        assert!(events[0].is_enter(TokenType::Data));
        assert_eq!(events[0].token.end, Some(Position::new(1, 3, 2)));
        assert!(events[1].is_exit(TokenType::Data));
        assert_eq!(events[1].token.start, Position::default());
    }

    #[test]
    fn test_previous_token_is_last_exit() {
        let mut t = tokenizer("  `");
        assert!(t.previous_token().is_none());
        t.enter(TokenType::LinePrefix);
        t.consume(Code::Char(' '));
        t.consumed = false;
        t.consume(Code::Char(' '));
        t.exit(TokenType::LinePrefix);

        let previous = *t.previous_token().unwrap();
        assert_eq!(previous.kind, TokenType::LinePrefix);
        assert_eq!(t.slice(&previous), "  ");
    }

    #[test]
    #[should_panic(expected = "innermost open token is `data`")]
    fn test_exit_mismatch_panics() {
        let mut t = tokenizer("a");
        t.enter(TokenType::Data);
        t.exit(TokenType::Whitespace);
    }

    #[test]
    #[should_panic(expected = "no token is open")]
    fn test_exit_without_enter_panics() {
        let mut t = tokenizer("a");
        t.exit(TokenType::Data);
    }

    #[test]
    #[should_panic(expected = "current code point is 'a'")]
    fn test_consume_wrong_code_panics() {
        let mut t = tokenizer("a");
        t.consume(Code::Char('b'));
    }

    #[test]
    #[should_panic(expected = "end of input")]
    fn test_consume_eof_panics() {
        let mut t = tokenizer("");
        t.consume(Code::Eof);
    }

    #[test]
    #[should_panic(expected = "never exited")]
    fn test_unclosed_token_panics() {
        let mut t = tokenizer("a");
        t.enter(TokenType::Data);
        t.into_events();
    }

    #[test]
    fn test_rollback_restores_everything() {
        // Two backticks: the fence attempt fails and leaves nothing behind.
        let mut t = tokenizer("``\n");
        let state = t.attempt(Construct::FencedCode, StateName::FlowAfter, StateName::FlowContent);
        assert_eq!(state, State::Retry(StateName::FencedCodeStart));

        let mut state = state;
        loop {
            let name = match state {
                State::Next(name) | State::Retry(name) => name,
                State::Ok | State::Nok => break,
            };
            t.consumed = false;
            let code = t.current();
            state = construct::call(&mut t, name, code);
        }
        assert_eq!(state, State::Nok);
        assert!(!t.events().is_empty());

        let attempt = t.attempts.pop().unwrap();
        assert_eq!(t.rollback(attempt), StateName::FlowContent);
        assert!(t.events().is_empty());
        assert_eq!(t.position(), Position::default());
        assert!(t.stack.is_empty());
    }

    #[test]
    fn test_rollback_reopens_outer_tokens() {
        let mut t = tokenizer("``");
        t.enter(TokenType::Content);
        t.attempt(Construct::ClosingFence, StateName::FlowAfter, StateName::FlowContent);
        // The attempt closes a token that was open before it began.
        t.exit(TokenType::Content);
        assert!(t.events()[0].token.is_closed());

        let attempt = t.attempts.pop().unwrap();
        t.rollback(attempt);
        assert_eq!(t.events().len(), 1);
        assert!(!t.events()[0].token.is_closed());
        t.exit(TokenType::Content);
        assert_eq!(t.into_events().len(), 2);
    }

    #[test]
    fn test_run_stops_runaway_attempts() {
        let mut t = tokenizer("```\n```");
        for _ in 0..MAX_ATTEMPT_DEPTH {
            t.attempt(Construct::FencedCode, StateName::FlowAfter, StateName::FlowContent);
        }
        // One more nested attempt from inside a running construct.
        assert_eq!(
            t.run(StateName::FencedCodeContinuation),
            Err(Error::AttemptDepthExceeded {
                max: MAX_ATTEMPT_DEPTH
            })
        );
        assert_eq!(t.attempts.len(), MAX_ATTEMPT_DEPTH + 1);
    }

    #[test]
    fn test_run_matches_document() {
        let mut t = tokenizer("```\nx\n```");
        assert_eq!(t.run(StateName::FlowStart), Ok(true));
        assert!(t.into_events().iter().any(|e| e.is_enter(TokenType::FencedCode)));
    }
}
