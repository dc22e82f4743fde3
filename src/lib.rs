//! fencemark: construct-driven CommonMark tokenizer
//!
//! Turns a complete input buffer into a flat, balanced list of
//! enter/exit [`Event`]s for a renderer to consume.
//!
//! # Design Principles
//! - Constructs are state machines: one state per code point, no regex
//! - Backtracking only through attempts, which leave nothing behind on failure
//! - Tokens are coarse spans; resolvers refine them once they are final
//! - Zero-copy: tokens carry positions into the input buffer
//!
//! # Example
//! ```
//! use fencemark::{TokenType, tokenize};
//!
//! let input = "```rust\nfn main() {}\n```";
//! let events = tokenize(input).unwrap();
//! let code: Vec<&str> = events
//!     .iter()
//!     .filter(|e| e.is_enter(TokenType::CodeLineData))
//!     .map(|e| e.token.slice(input))
//!     .collect();
//! assert_eq!(code, ["fn main() {}"]);
//! ```

pub mod code;
pub mod construct;
pub mod cursor;
pub mod error;
pub mod event;
pub mod limits;
pub mod plain_text;
pub mod position;
pub mod range;
pub mod tokenizer;

// Re-export primary types
pub use code::Code;
pub use construct::{Construct, State, StateName};
pub use error::Error;
pub use event::{Event, Phase, Token, TokenType, check_balance};
pub use plain_text::PlainText;
pub use position::Position;
pub use range::Range;
pub use tokenizer::Tokenizer;

/// Tokenizer options.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Recognize fenced code blocks.
    pub fenced_code: bool,
    /// Run construct resolvers (plain text refinement of fence info/meta).
    pub resolve: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fenced_code: true,
            resolve: true,
        }
    }
}

/// Tokenize a complete document.
///
/// This is the primary API for simple use cases.
pub fn tokenize(input: &str) -> Result<Vec<Event>, Error> {
    tokenize_with_options(input, &Options::default())
}

/// Tokenize a complete document with options.
pub fn tokenize_with_options(input: &str, options: &Options) -> Result<Vec<Event>, Error> {
    if input.len() > limits::MAX_INPUT_LEN {
        return Err(Error::InputTooLarge {
            len: input.len(),
            max: limits::MAX_INPUT_LEN,
        });
    }

    let mut tokenizer = Tokenizer::new(input, options);
    let matched = tokenizer.run(StateName::FlowStart)?;
    debug_assert!(matched, "flow never fails");
    log::debug!("tokenized {} bytes", input.len());
    Ok(tokenizer.into_events())
}
