//! Hard limits on input and engine nesting.

/// Largest accepted input in bytes (offsets are stored as `u32`).
pub const MAX_INPUT_LEN: usize = u32::MAX as usize;

/// Maximum number of construct attempts open at the same time.
///
/// Constructs in this crate nest at most two deep; anything beyond the
/// limit is a runaway construct.
pub const MAX_ATTEMPT_DEPTH: usize = 32;

/// Minimum number of markers in a code fence.
pub const MIN_FENCE_LEN: usize = 3;

/// Indentation at which a line becomes indented code.
pub const TAB_SIZE: usize = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_reasonable() {
        const { assert!(MAX_ATTEMPT_DEPTH >= 2) };
        const { assert!(MIN_FENCE_LEN == 3) };
        const { assert!(TAB_SIZE == 4) };
        const { assert!(MAX_INPUT_LEN <= u32::MAX as usize) };
    }
}
