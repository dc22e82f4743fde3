//! Compact byte range for zero-copy token text.
//!
//! Uses `u32` offsets; inputs are capped at [`MAX_INPUT_LEN`](crate::limits::MAX_INPUT_LEN).

/// Compact range into the input buffer.
///
/// # Example
/// ```
/// use fencemark::Range;
///
/// let input = "```js";
/// let range = Range::new(3, 5);
/// assert_eq!(range.slice(input), "js");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(C)]
pub struct Range {
    pub start: u32,
    pub end: u32,
}

const _: () = assert!(std::mem::size_of::<Range>() == 8);

impl Range {
    /// Create a new range.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create a range from usize values.
    ///
    /// # Panics
    /// Panics in debug mode if values exceed u32::MAX.
    #[inline]
    pub fn from_usize(start: usize, end: usize) -> Self {
        debug_assert!(start <= u32::MAX as usize);
        debug_assert!(end <= u32::MAX as usize);
        debug_assert!(start <= end);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// Get the text this range refers to.
    ///
    /// # Panics
    /// Panics if the range is out of bounds or splits a character.
    #[inline]
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start as usize..self.end as usize]
    }
}
