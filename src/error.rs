use core::fmt;

/// Textual encodings a [`Bitmap`](crate::Bitmap) can be decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// `'0'`/`'1'` characters, most significant bit first.
    Binary,
    /// Hexadecimal digits, most significant nibble first.
    Hex,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => f.write_str("binary"),
            Self::Hex => f.write_str("hex"),
        }
    }
}

/// Errors returned by fallible [`Bitmap`](crate::Bitmap) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The bit index lies outside `0..len`.
    #[error("bit index {index} out of range for bitmap of {len} bits")]
    IndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// Number of addressable bits in the bitmap.
        len: usize,
    },

    /// A character that is not valid for the encoding was found.
    #[error("invalid character {ch:?} at position {pos} in {encoding} string")]
    InvalidEncoding {
        /// The encoding being decoded.
        encoding: Encoding,
        /// The offending character.
        ch: char,
        /// Byte offset of the character in the input.
        pos: usize,
    },

    /// A value other than `0`/`1` (or `false`/`true`) was assigned to a bit.
    #[error("cannot assign {0} to a bit, expected 0 or 1")]
    InvalidAssignment(u64),
}

/// Shorthand for results carrying an [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
