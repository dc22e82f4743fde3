//! Fenced code blocks.
//!
//! ```markdown
//! ~~~js eval
//! console.log(1)
//! ~~~
//! ```
//!
//! The opening fence is a run of at least three backticks or tildes,
//! optionally followed by an info string and a meta string. Every following
//! line is first tried as a closing fence (same marker, at least as long,
//! indented less than four columns, nothing but whitespace after it); when
//! that fails the line is content. Content lines lose up to as much
//! indentation as the opening fence had. End of input closes the block.
//!
//! Backtick fences cannot have a backtick in their info or meta string, as
//! that would be ambiguous with inline code.
//!
//! The resolver re-tokenizes the info and meta strings as plain text.

use crate::code::{Code, GRAVE_ACCENT, LINE_FEED, TILDE, indent_width};
use crate::construct::{Construct, State, StateName};
use crate::event::{Event, TokenType};
use crate::limits::{MIN_FENCE_LEN, TAB_SIZE};
use crate::plain_text::PlainText;
use crate::tokenizer::Tokenizer;

/// Per-block context shared by the states below.
#[derive(Debug, Clone, Copy, Default)]
pub struct FenceState {
    /// Marker of the opening fence.
    pub marker: char,
    /// Length of the opening sequence.
    pub size_open: usize,
    /// Indentation in front of the opening fence.
    pub initial_prefix_size: usize,
    /// Indentation consumed on the current line.
    pub prefix_size: usize,
    /// Length of the closing sequence being scanned.
    pub size_close: usize,
}

/// Start of a fenced code block, at the first marker.
pub fn start(tokenizer: &mut Tokenizer, code: Code) -> State {
    let marker = match code {
        Code::Char(c @ (GRAVE_ACCENT | TILDE)) => c,
        _ => return State::Nok,
    };

    let initial_prefix_size = match tokenizer.previous_token() {
        Some(token) if token.kind == TokenType::LinePrefix && token.is_closed() => {
            indent_width(tokenizer.slice(token))
        }
        _ => 0,
    };

    tokenizer.fence = FenceState {
        marker,
        initial_prefix_size,
        ..FenceState::default()
    };
    tokenizer.enter(TokenType::FencedCode);
    tokenizer.enter(TokenType::FencedCodeFenceStart);
    tokenizer.enter(TokenType::FencedCodeFenceSequence);
    State::Retry(StateName::FencedCodeSequenceOpen)
}

/// In the opening sequence.
pub fn sequence_open(tokenizer: &mut Tokenizer, code: Code) -> State {
    if code.is(tokenizer.fence.marker) {
        tokenizer.fence.size_open += 1;
        tokenizer.consume(code);
        return State::Next(StateName::FencedCodeSequenceOpen);
    }

    if tokenizer.fence.size_open < MIN_FENCE_LEN {
        return State::Nok;
    }

    tokenizer.exit(TokenType::FencedCodeFenceSequence);

    if code.is_eol_or_eof() {
        open_after(tokenizer, code)
    } else if code.is_space_or_tab() {
        tokenizer.enter(TokenType::FencedCodeFenceWhitespace);
        State::Retry(StateName::FencedCodeSequenceOpenAfter)
    } else {
        tokenizer.enter(TokenType::FencedCodeFenceInfo);
        State::Retry(StateName::FencedCodeInfo)
    }
}

/// Whitespace between the sequence and the info string.
pub fn sequence_open_after(tokenizer: &mut Tokenizer, code: Code) -> State {
    if code.is_space_or_tab() {
        tokenizer.consume(code);
        return State::Next(StateName::FencedCodeSequenceOpenAfter);
    }

    tokenizer.exit(TokenType::FencedCodeFenceWhitespace);

    if code.is_eol_or_eof() {
        return open_after(tokenizer, code);
    }

    tokenizer.enter(TokenType::FencedCodeFenceInfo);
    State::Retry(StateName::FencedCodeInfo)
}

/// In the info string.
pub fn info(tokenizer: &mut Tokenizer, code: Code) -> State {
    if tokenizer.fence.marker == GRAVE_ACCENT && code.is(GRAVE_ACCENT) {
        return State::Nok;
    }

    if code.is_space_or_tab() {
        tokenizer.exit(TokenType::FencedCodeFenceInfo);
        tokenizer.enter(TokenType::FencedCodeFenceWhitespace);
        return State::Retry(StateName::FencedCodeInfoAfter);
    }

    if code.is_eol_or_eof() {
        tokenizer.exit(TokenType::FencedCodeFenceInfo);
        return open_after(tokenizer, code);
    }

    tokenizer.consume(code);
    State::Next(StateName::FencedCodeInfo)
}

/// Whitespace between the info and meta strings.
pub fn info_after(tokenizer: &mut Tokenizer, code: Code) -> State {
    if code.is_space_or_tab() {
        tokenizer.consume(code);
        return State::Next(StateName::FencedCodeInfoAfter);
    }

    tokenizer.exit(TokenType::FencedCodeFenceWhitespace);

    if code.is_eol_or_eof() {
        return open_after(tokenizer, code);
    }

    tokenizer.enter(TokenType::FencedCodeFenceMeta);
    State::Retry(StateName::FencedCodeMeta)
}

/// In the meta string, which runs to the end of the line.
pub fn meta(tokenizer: &mut Tokenizer, code: Code) -> State {
    if tokenizer.fence.marker == GRAVE_ACCENT && code.is(GRAVE_ACCENT) {
        return State::Nok;
    }

    if code.is_eol_or_eof() {
        tokenizer.exit(TokenType::FencedCodeFenceMeta);
        return open_after(tokenizer, code);
    }

    tokenizer.consume(code);
    State::Next(StateName::FencedCodeMeta)
}

/// End of the opening fence line.
fn open_after(tokenizer: &mut Tokenizer, code: Code) -> State {
    tokenizer.exit(TokenType::FencedCodeFenceStart);

    if code.is(LINE_FEED) {
        tokenizer.enter(TokenType::LineFeed);
        tokenizer.consume(code);
        tokenizer.exit(TokenType::LineFeed);
        return State::Next(StateName::FencedCodeContinuation);
    }

    line_end(tokenizer, code)
}

/// At the start of a line: try a closing fence before anything else.
pub fn continuation(tokenizer: &mut Tokenizer, _code: Code) -> State {
    tokenizer.attempt(
        Construct::ClosingFence,
        StateName::FencedCodeAfter,
        StateName::FencedCodeLineStart,
    )
}

/// At the start of a content line.
pub fn line_start(tokenizer: &mut Tokenizer, code: Code) -> State {
    if code.is_eol_or_eof() {
        return line_end(tokenizer, code);
    }

    if tokenizer.fence.initial_prefix_size != 0 && code.is_space_or_tab() {
        tokenizer.enter(TokenType::LinePrefix);
        tokenizer.fence.prefix_size = 0;
        return State::Retry(StateName::FencedCodeLinePrefix);
    }

    tokenizer.enter(TokenType::CodeLineData);
    State::Retry(StateName::FencedCodeLineData)
}

/// In indentation that is stripped from a content line.
pub fn line_prefix(tokenizer: &mut Tokenizer, code: Code) -> State {
    if tokenizer.fence.prefix_size < tokenizer.fence.initial_prefix_size
        && code.is_space_or_tab()
    {
        tokenizer.fence.prefix_size += code.indent_width();
        tokenizer.consume(code);
        return State::Next(StateName::FencedCodeLinePrefix);
    }

    tokenizer.exit(TokenType::LinePrefix);
    tokenizer.fence.prefix_size = 0;

    if code.is_eol_or_eof() {
        return line_end(tokenizer, code);
    }

    tokenizer.enter(TokenType::CodeLineData);
    State::Retry(StateName::FencedCodeLineData)
}

/// In the text of a content line.
pub fn line_data(tokenizer: &mut Tokenizer, code: Code) -> State {
    if code.is_eol_or_eof() {
        tokenizer.exit(TokenType::CodeLineData);
        return line_end(tokenizer, code);
    }

    tokenizer.consume(code);
    State::Next(StateName::FencedCodeLineData)
}

/// At the end of a line inside the block.
///
/// # Panics
/// Panics on anything but a line feed or end of input.
fn line_end(tokenizer: &mut Tokenizer, code: Code) -> State {
    match code {
        Code::Eof => after(tokenizer, code),
        Code::Char(LINE_FEED) => {
            tokenizer.enter(TokenType::CodeLineFeed);
            tokenizer.consume(code);
            tokenizer.exit(TokenType::CodeLineFeed);
            State::Next(StateName::FencedCodeContinuation)
        }
        _ => panic!("expected end of line or input, found {code}"),
    }
}

/// After the block.
pub fn after(tokenizer: &mut Tokenizer, _code: Code) -> State {
    tokenizer.exit(TokenType::FencedCode);
    State::Ok
}

/// Start of a possible closing fence.
pub fn closing_start(tokenizer: &mut Tokenizer, code: Code) -> State {
    tokenizer.fence.size_close = 0;

    if code.is_space_or_tab() {
        tokenizer.enter(TokenType::LinePrefix);
        tokenizer.fence.prefix_size = 0;
        return State::Retry(StateName::ClosingFencePrefix);
    }

    closing_prefix_after(tokenizer, code)
}

/// In indentation before a closing fence.
pub fn closing_prefix(tokenizer: &mut Tokenizer, code: Code) -> State {
    if code.is_space_or_tab() {
        tokenizer.fence.prefix_size += code.indent_width();

        // Four columns in, the line is content.
        if tokenizer.fence.prefix_size >= TAB_SIZE {
            tokenizer.fence.prefix_size = 0;
            return State::Nok;
        }

        tokenizer.consume(code);
        return State::Next(StateName::ClosingFencePrefix);
    }

    tokenizer.fence.prefix_size = 0;
    tokenizer.exit(TokenType::LinePrefix);
    closing_prefix_after(tokenizer, code)
}

/// After optional indentation, at the closing sequence.
fn closing_prefix_after(tokenizer: &mut Tokenizer, code: Code) -> State {
    if code.is(tokenizer.fence.marker) {
        tokenizer.enter(TokenType::FencedCodeFenceEnd);
        tokenizer.enter(TokenType::FencedCodeFenceSequence);
        return State::Retry(StateName::ClosingFenceSequence);
    }

    State::Nok
}

/// In the closing sequence.
pub fn closing_sequence(tokenizer: &mut Tokenizer, code: Code) -> State {
    if code.is(tokenizer.fence.marker) {
        tokenizer.fence.size_close += 1;
        tokenizer.consume(code);
        return State::Next(StateName::ClosingFenceSequence);
    }

    if tokenizer.fence.size_close < tokenizer.fence.size_open {
        return State::Nok;
    }

    tokenizer.exit(TokenType::FencedCodeFenceSequence);

    if code.is_space_or_tab() {
        tokenizer.enter(TokenType::FencedCodeFenceWhitespace);
        return State::Retry(StateName::ClosingFenceSequenceAfter);
    }

    closing_sequence_end(tokenizer, code)
}

/// Trailing whitespace after the closing sequence.
pub fn closing_sequence_after(tokenizer: &mut Tokenizer, code: Code) -> State {
    if code.is_space_or_tab() {
        tokenizer.consume(code);
        return State::Next(StateName::ClosingFenceSequenceAfter);
    }

    tokenizer.exit(TokenType::FencedCodeFenceWhitespace);
    closing_sequence_end(tokenizer, code)
}

/// The closing fence must end the line.
fn closing_sequence_end(tokenizer: &mut Tokenizer, code: Code) -> State {
    if code.is_eol_or_eof() {
        tokenizer.exit(TokenType::FencedCodeFenceEnd);
        return State::Ok;
    }

    State::Nok
}

/// Re-tokenize the info and meta strings as plain text.
///
/// The plain text events are nested inside the info and meta tokens. A
/// token that already has children is left alone, so running this twice
/// changes nothing.
pub fn resolve(events: Vec<Event>, input: &str) -> Vec<Event> {
    let mut info = None;
    let mut meta = None;

    for (index, event) in events.iter().enumerate() {
        if event.is_exit(TokenType::FencedCodeFenceStart) {
            break;
        }

        let bare = || {
            events
                .get(index + 1)
                .is_some_and(|next| next.is_exit(event.token.kind))
        };

        if info.is_none() && event.is_enter(TokenType::FencedCodeFenceInfo) {
            info = bare().then_some(index);
        } else if meta.is_none() && event.is_enter(TokenType::FencedCodeFenceMeta) {
            meta = bare().then_some(index);
        }
    }

    if info.is_none() && meta.is_none() {
        return events;
    }

    let mut result = Vec::with_capacity(events.len() + 8);
    for (index, event) in events.into_iter().enumerate() {
        result.push(event);

        if Some(index) == info || Some(index) == meta {
            log::debug!(
                "refining `{}` at {}",
                event.token.kind,
                event.token.start
            );
            let mut text = PlainText::new(event.token.start);
            result.extend(text.write(event.token.slice(input)));
            result.extend(text.flush());
        }
    }

    result
}
