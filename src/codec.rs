//! Binary and hexadecimal string encodings of a [`Bitmap`].
//!
//! Both encodings are big-endian: the byte holding the highest bit indices is
//! written first, and within a byte the most significant bit comes first.

use crate::bitmap::Bitmap;
use crate::error::{Encoding, Error, Result};
use crate::{BITMASK, bucket_count};
use alloc::string::{String, ToString};
use alloc::vec;
use core::fmt;
use core::str::FromStr;
use tracing::{debug, trace};

impl Bitmap {
    /// Renders the bitmap as `len()` `'0'`/`'1'` characters, highest bit first.
    ///
    /// # Examples
    /// ```
    /// use byte_bitmap::Bitmap;
    ///
    /// let mut bm = Bitmap::new(16);
    /// bm.set(0)?;
    /// bm.set(9)?;
    /// assert_eq!(bm.to_binary_string(), "0000001000000001");
    /// # Ok::<(), byte_bitmap::Error>(())
    /// ```
    pub fn to_binary_string(&self) -> String {
        self.to_string()
    }

    /// Renders the bitmap as lowercase hex, two digits per byte, highest byte
    /// first.
    ///
    /// # Examples
    /// ```
    /// use byte_bitmap::Bitmap;
    ///
    /// let mut bm = Bitmap::new(16);
    /// bm.set(0)?;
    /// bm.set(12)?;
    /// assert_eq!(bm.to_hex_string(), "1001");
    /// assert_eq!(Bitmap::new(24).to_hex_string(), "000000");
    /// # Ok::<(), byte_bitmap::Error>(())
    /// ```
    pub fn to_hex_string(&self) -> String {
        alloc::format!("{self:x}")
    }

    /// Decodes a string of `'0'`/`'1'` characters. The last character is bit 0.
    ///
    /// The bitmap gets room for `bitstring.len()` bits, rounded up to whole
    /// bytes like [`Bitmap::new`].
    ///
    /// # Errors
    /// Returns [`Error::InvalidEncoding`] for the first character that is
    /// neither `'0'` nor `'1'`.
    ///
    /// # Examples
    /// ```
    /// use byte_bitmap::Bitmap;
    ///
    /// let bm = Bitmap::from_binary_str("1010")?;
    /// assert_eq!(bm.iter_ones().collect::<Vec<_>>(), [1, 3]);
    /// assert!(Bitmap::from_binary_str("102").is_err());
    /// # Ok::<(), byte_bitmap::Error>(())
    /// ```
    pub fn from_binary_str(bitstring: &str) -> Result<Self> {
        let nbits = bitstring.len();
        trace!(nbits, "decoding binary string");
        let mut bytes = vec![0u8; bucket_count(nbits)];
        for (pos, ch) in bitstring.char_indices() {
            let idx = nbits - 1 - pos;
            match ch {
                '1' => bytes[idx / 8] |= BITMASK[idx % 8],
                '0' => {}
                _ => return Err(invalid(Encoding::Binary, ch, pos)),
            }
        }
        Ok(Self(bytes.into_boxed_slice()))
    }

    /// Decodes a string of hex digits (either case). The last digit holds bits
    /// 0 to 3.
    ///
    /// Every digit contributes exactly four bits, so the bitmap gets room for
    /// `hexstring.len() * 4` bits, rounded up to whole bytes. An odd number of
    /// digits therefore leaves the top nibble of the highest byte clear.
    ///
    /// # Errors
    /// Returns [`Error::InvalidEncoding`] for the first character that is not
    /// a hex digit.
    ///
    /// # Examples
    /// ```
    /// use byte_bitmap::Bitmap;
    ///
    /// let bm = Bitmap::from_hex_str("ff")?;
    /// assert_eq!(bm.len(), 8);
    /// assert_eq!(bm.popcount(), 8);
    /// assert_eq!(bm.to_hex_string(), "ff");
    ///
    /// let odd = Bitmap::from_hex_str("abc")?;
    /// assert_eq!(odd.to_hex_string(), "0abc");
    /// # Ok::<(), byte_bitmap::Error>(())
    /// ```
    pub fn from_hex_str(hexstring: &str) -> Result<Self> {
        let ndigits = hexstring.len();
        trace!(ndigits, "decoding hex string");
        let mut bytes = vec![0u8; bucket_count(ndigits * 4)];
        for (pos, ch) in hexstring.char_indices() {
            let Some(nibble) = ch.to_digit(16) else {
                return Err(invalid(Encoding::Hex, ch, pos));
            };
            let digit = ndigits - 1 - pos;
            bytes[digit / 2] |= (nibble as u8) << ((digit % 2) * 4);
        }
        Ok(Self(bytes.into_boxed_slice()))
    }
}

fn invalid(encoding: Encoding, ch: char, pos: usize) -> Error {
    debug!(%encoding, ?ch, pos, "rejected bitmap encoding");
    Error::InvalidEncoding { encoding, ch, pos }
}

/// Same output as [`fmt::Binary`].
impl fmt::Display for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Binary::fmt(self, f)
    }
}

/// `{:b}` renders the binary encoding, `{:#b}` prefixes it with `0b`.
impl fmt::Binary for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("0b")?;
        }
        for byte in self.as_bytes().iter().rev() {
            write!(f, "{byte:08b}")?;
        }
        Ok(())
    }
}

/// `{:x}` renders the hex encoding, `{:#x}` prefixes it with `0x`.
impl fmt::LowerHex for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }
        for byte in self.as_bytes().iter().rev() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for Bitmap {
    type Err = Error;

    /// Parses the binary encoding, see [`Bitmap::from_binary_str`].
    fn from_str(s: &str) -> Result<Self> {
        Self::from_binary_str(s)
    }
}
