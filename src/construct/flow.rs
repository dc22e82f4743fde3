//! Line router for block content.
//!
//! Each line gets its indentation as a `linePrefix`, then every construct
//! registered for its first code point is attempted in order. A line no
//! construct claims becomes one `content` token. This is deliberately
//! small: paragraphs, headings and the rest are not tokenized here.

use crate::code::{Code, LINE_FEED, indent_width};
use crate::construct::{State, StateName};
use crate::event::TokenType;
use crate::limits::TAB_SIZE;
use crate::tokenizer::Tokenizer;

/// Router context for the current line.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowState {
    /// Index of the next candidate construct to try.
    pub candidate: usize,
    /// Indentation in front of the line's first non-whitespace code point.
    pub prefix_width: usize,
}

/// Start of a line.
pub fn start(tokenizer: &mut Tokenizer, code: Code) -> State {
    tokenizer.flow = FlowState::default();

    match code {
        Code::Eof => State::Ok,
        Code::Char(LINE_FEED) => {
            tokenizer.enter(TokenType::LineFeed);
            tokenizer.consume(code);
            tokenizer.exit(TokenType::LineFeed);
            State::Next(StateName::FlowStart)
        }
        _ if code.is_space_or_tab() => {
            tokenizer.enter(TokenType::LinePrefix);
            State::Retry(StateName::FlowPrefix)
        }
        _ => State::Retry(StateName::FlowBefore),
    }
}

/// In line indentation.
pub fn prefix(tokenizer: &mut Tokenizer, code: Code) -> State {
    if code.is_space_or_tab() {
        tokenizer.consume(code);
        return State::Next(StateName::FlowPrefix);
    }

    tokenizer.exit(TokenType::LinePrefix);
    tokenizer.flow.prefix_width = tokenizer
        .previous_token()
        .map_or(0, |token| indent_width(tokenizer.slice(token)));
    before(tokenizer, code)
}

/// Before the line's content: try the next candidate construct.
pub fn before(tokenizer: &mut Tokenizer, code: Code) -> State {
    if code.is_eol_or_eof() {
        return after(tokenizer, code);
    }

    if tokenizer.flow.prefix_width < TAB_SIZE {
        let candidate = tokenizer
            .table
            .get(code)
            .get(tokenizer.flow.candidate)
            .copied();

        if let Some(construct) = candidate {
            return tokenizer.attempt(construct, StateName::FlowAfter, StateName::FlowBeforeNext);
        }
    }

    tokenizer.enter(TokenType::Content);
    State::Retry(StateName::FlowContent)
}

/// A candidate did not match; move on to the next one.
pub fn before_next(tokenizer: &mut Tokenizer, code: Code) -> State {
    tokenizer.flow.candidate += 1;
    before(tokenizer, code)
}

/// In a line nothing else claimed.
pub fn content(tokenizer: &mut Tokenizer, code: Code) -> State {
    if code.is_eol_or_eof() {
        tokenizer.exit(TokenType::Content);
        return after(tokenizer, code);
    }

    tokenizer.consume(code);
    State::Next(StateName::FlowContent)
}

/// After a construct or a content line.
pub fn after(tokenizer: &mut Tokenizer, code: Code) -> State {
    match code {
        Code::Eof => State::Ok,
        Code::Char(LINE_FEED) => {
            tokenizer.enter(TokenType::LineFeed);
            tokenizer.consume(code);
            tokenizer.exit(TokenType::LineFeed);
            State::Next(StateName::FlowStart)
        }
        _ => {
            tokenizer.enter(TokenType::Content);
            State::Retry(StateName::FlowContent)
        }
    }
}
