//! A fixed-capacity, byte-granular bitmap written in pure Rust.
//! No `unsafe`, and `no_std` compatible when the `std` feature is disabled
//! (only `alloc` is needed).
//!
//! [`Bitmap`] is the main struct in this library. Its [features](#features)
//! are listed below.
//!
//! # Examples
//! ```
//! use byte_bitmap::Bitmap;
//!
//! let mut bitmap = Bitmap::new(10);
//! assert_eq!(bitmap.len(), 16); // rounded up to whole bytes
//! assert_eq!(bitmap.popcount(), 0);
//! bitmap.set(3)?;
//! assert!(bitmap.is_set(3)?);
//! assert_eq!(bitmap.popcount(), 1);
//! assert_eq!(bitmap.to_hex_string(), "0008");
//! # Ok::<(), byte_bitmap::Error>(())
//! ```
//!
//! # Layout
//!
//! Bit `i` lives in byte `i / 8` at position `i % 8`, least significant bit
//! first. The textual encodings are big-endian: the highest byte is written
//! first and each byte is written most significant bit first, so the string
//! reads like the binary numeral of the whole buffer.
//!
//! # Features
//!
//! - Capacity chosen at runtime, fixed for the lifetime of the bitmap
//! - Bounds-checked bit operations returning [`Error::IndexOutOfRange`]
//! - Table-driven population count, `any` / `none` / `all` predicates
//! - Iteration over all bits, set bits (`iter_ones`) or unset bits (`iter_zeros`)
//! - Range operations: `set_range`, `unset_range`
//! - Binary and hexadecimal string codecs (`Display`, `FromStr`, `{:b}`, `{:x}`)
//! - Optional `std` feature (enabled by default)

#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod bitmap;
mod codec;
mod error;

pub use bitmap::{Bitmap, BitmapIter, IterOnes, IterZeros};
pub use error::{Encoding, Error, Result};

/// Computes the number of bytes needed to store `bit_count` bits.
///
/// # Examples
/// ```
/// use byte_bitmap::bucket_count;
///
/// assert_eq!(bucket_count(0), 0);
/// assert_eq!(bucket_count(9), 2);
/// assert_eq!(bucket_count(16), 2);
/// assert_eq!(bucket_count(17), 3);
/// ```
pub const fn bucket_count(bit_count: usize) -> usize {
    bit_count.div_ceil(8)
}

/// Single-bit masks indexed by the position of the bit within its byte.
pub(crate) const BITMASK: [u8; 8] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80];

/// Number of set bits for every possible byte value.
pub(crate) const BIT_COUNT: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut value = 1;
    while value < 256 {
        // popcount(v) = popcount(v >> 1) + lowest bit
        table[value] = table[value >> 1] + (value & 1) as u8;
        value += 1;
    }
    table
};

pub(crate) const fn ones_mask(start_bit: usize, width: usize) -> u8 {
    if width >= 8 {
        // shift would be undefined / panic on u8
        !0u8
    } else {
        // if `1u8 << shift_amount` == 0 wrap around
        (1u8 << width).wrapping_sub(1) << start_bit
    }
}
