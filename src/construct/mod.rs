//! Grammar rules that plug into the tokenizer.
//!
//! A construct is a stateless descriptor: a start state plus an optional
//! resolver. Its states are plain functions of the tokenizer and the
//! current code point that return the next [`State`]. Everything a
//! construct remembers between states lives in a context struct on the
//! tokenizer.

pub mod fenced_code;
pub mod flow;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::Options;
use crate::code::{Code, GRAVE_ACCENT, TILDE};
use crate::event::Event;
use crate::tokenizer::Tokenizer;

/// A grammar rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Construct {
    /// Fenced code block.
    FencedCode,
    /// Closing fence of a fenced code block, tried before each content line.
    ClosingFence,
}

/// Rewrites a committed construct's events once its token list is final.
///
/// Receives the events from the construct's first enter to the end of the
/// log, and the full input buffer.
pub type Resolver = fn(Vec<Event>, &str) -> Vec<Event>;

impl Construct {
    /// State that receives the first code point.
    pub fn start(self) -> StateName {
        match self {
            Self::FencedCode => StateName::FencedCodeStart,
            Self::ClosingFence => StateName::ClosingFenceStart,
        }
    }

    /// Post-processing pass, if the construct has one.
    pub fn resolver(self) -> Option<Resolver> {
        match self {
            Self::FencedCode => Some(fenced_code::resolve),
            Self::ClosingFence => None,
        }
    }

    /// Name used in log output.
    pub fn name(self) -> &'static str {
        match self {
            Self::FencedCode => "fencedCode",
            Self::ClosingFence => "closingFence",
        }
    }
}

/// What a state hands back to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// The code point was consumed; feed the next one to this state.
    Next(StateName),
    /// Nothing was consumed; feed the same code point to this state.
    Retry(StateName),
    /// The construct matched.
    Ok,
    /// The construct does not match here.
    Nok,
}

/// Every state of every construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateName {
    FlowStart,
    FlowPrefix,
    FlowBefore,
    FlowBeforeNext,
    FlowContent,
    FlowAfter,

    FencedCodeStart,
    FencedCodeSequenceOpen,
    FencedCodeSequenceOpenAfter,
    FencedCodeInfo,
    FencedCodeInfoAfter,
    FencedCodeMeta,
    FencedCodeContinuation,
    FencedCodeLineStart,
    FencedCodeLinePrefix,
    FencedCodeLineData,
    FencedCodeAfter,

    ClosingFenceStart,
    ClosingFencePrefix,
    ClosingFenceSequence,
    ClosingFenceSequenceAfter,
}

/// Run one state.
pub fn call(tokenizer: &mut Tokenizer, name: StateName, code: Code) -> State {
    match name {
        StateName::FlowStart => flow::start(tokenizer, code),
        StateName::FlowPrefix => flow::prefix(tokenizer, code),
        StateName::FlowBefore => flow::before(tokenizer, code),
        StateName::FlowBeforeNext => flow::before_next(tokenizer, code),
        StateName::FlowContent => flow::content(tokenizer, code),
        StateName::FlowAfter => flow::after(tokenizer, code),

        StateName::FencedCodeStart => fenced_code::start(tokenizer, code),
        StateName::FencedCodeSequenceOpen => fenced_code::sequence_open(tokenizer, code),
        StateName::FencedCodeSequenceOpenAfter => {
            fenced_code::sequence_open_after(tokenizer, code)
        }
        StateName::FencedCodeInfo => fenced_code::info(tokenizer, code),
        StateName::FencedCodeInfoAfter => fenced_code::info_after(tokenizer, code),
        StateName::FencedCodeMeta => fenced_code::meta(tokenizer, code),
        StateName::FencedCodeContinuation => fenced_code::continuation(tokenizer, code),
        StateName::FencedCodeLineStart => fenced_code::line_start(tokenizer, code),
        StateName::FencedCodeLinePrefix => fenced_code::line_prefix(tokenizer, code),
        StateName::FencedCodeLineData => fenced_code::line_data(tokenizer, code),
        StateName::FencedCodeAfter => fenced_code::after(tokenizer, code),

        StateName::ClosingFenceStart => fenced_code::closing_start(tokenizer, code),
        StateName::ClosingFencePrefix => fenced_code::closing_prefix(tokenizer, code),
        StateName::ClosingFenceSequence => fenced_code::closing_sequence(tokenizer, code),
        StateName::ClosingFenceSequenceAfter => {
            fenced_code::closing_sequence_after(tokenizer, code)
        }
    }
}

/// Constructs that may start at a given code point, in priority order.
#[derive(Debug, Clone, Default)]
pub struct ConstructTable {
    map: FxHashMap<char, SmallVec<[Construct; 2]>>,
}

impl ConstructTable {
    /// Constructs eligible to start a flow line.
    pub fn flow(options: &Options) -> Self {
        let mut table = Self::default();
        if options.fenced_code {
            table.insert(GRAVE_ACCENT, Construct::FencedCode);
            table.insert(TILDE, Construct::FencedCode);
        }
        table
    }

    /// Register `construct` for lines starting with `c`.
    pub fn insert(&mut self, c: char, construct: Construct) {
        self.map.entry(c).or_default().push(construct);
    }

    /// Candidates for `code`; empty at end of input.
    pub fn get(&self, code: Code) -> &[Construct] {
        code.char()
            .and_then(|c| self.map.get(&c))
            .map(|constructs| constructs.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_table() {
        let table = ConstructTable::flow(&Options::default());
        assert_eq!(table.get(Code::Char('`')), &[Construct::FencedCode]);
        assert_eq!(table.get(Code::Char('~')), &[Construct::FencedCode]);
        assert!(table.get(Code::Char('a')).is_empty());
        assert!(table.get(Code::Eof).is_empty());
    }

    #[test]
    fn test_flow_table_disabled() {
        let options = Options {
            fenced_code: false,
            ..Options::default()
        };
        let table = ConstructTable::flow(&options);
        assert!(table.get(Code::Char('`')).is_empty());
    }

    #[test]
    fn test_resolvers() {
        assert!(Construct::FencedCode.resolver().is_some());
        assert!(Construct::ClosingFence.resolver().is_none());
    }
}
