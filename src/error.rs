//! Errors surfaced by the public entry points.
//!
//! Grammar mismatches never show up here: they are handled inside the
//! engine by trying another construct. Broken engine contracts panic.

/// Reasons tokenizing can fail as a whole.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("input is {len} bytes, the limit is {max}")]
    InputTooLarge { len: usize, max: usize },
    #[error("construct attempts nested deeper than {max}")]
    AttemptDepthExceeded { max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = Error::InputTooLarge { len: 10, max: 5 };
        assert_eq!(err.to_string(), "input is 10 bytes, the limit is 5");

        let err = Error::AttemptDepthExceeded { max: 32 };
        assert_eq!(err.to_string(), "construct attempts nested deeper than 32");
    }
}
