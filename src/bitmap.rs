use crate::error::{Error, Result};
use crate::{BIT_COUNT, BITMASK, bucket_count, ones_mask};
use alloc::boxed::Box;
use alloc::vec;
use core::fmt::{Debug, Formatter};
use core::iter::FusedIterator;
use core::ops::{Index, Range};
use tracing::debug;

/// The main type that stores the information.
///
/// Internally stores bits in a boxed slice of `u8` whose length is fixed at
/// construction. Every bit of every byte is addressable, so [`len`] is always
/// a multiple of 8, even when the requested capacity was not.
///
/// [`len`]: Bitmap::len
#[derive(PartialEq, Eq, Hash, Clone)]
pub struct Bitmap(pub(crate) Box<[u8]>);

impl Bitmap {
    /// Creates a new bitmap with room for at least `capacity` bits, all unset.
    ///
    /// The capacity is rounded up to whole bytes. A capacity of zero yields an
    /// empty bitmap with no addressable bits.
    ///
    /// # Examples
    /// ```
    /// use byte_bitmap::Bitmap;
    ///
    /// let bitmap = Bitmap::new(12);
    /// assert_eq!(bitmap.len(), 16);
    /// assert_eq!(bitmap.popcount(), 0);
    /// assert!(Bitmap::new(0).is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self(vec![0u8; bucket_count(capacity)].into_boxed_slice())
    }

    /// Creates a new bitmap with room for at least `capacity` bits, all set.
    ///
    /// # Examples
    /// ```
    /// use byte_bitmap::Bitmap;
    ///
    /// let bitmap = Bitmap::with_all_set(10);
    /// assert_eq!(bitmap.popcount(), 16);
    /// assert!(bitmap.all());
    /// ```
    pub fn with_all_set(capacity: usize) -> Self {
        Self(vec![!0u8; bucket_count(capacity)].into_boxed_slice())
    }

    /// Constructs a bitmap by setting only the indices provided in the iterator.
    ///
    /// All unspecified indices are left unset.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] for the first index that does not
    /// fit; no bitmap is returned in that case.
    ///
    /// # Examples
    /// ```
    /// use byte_bitmap::Bitmap;
    ///
    /// let bitmap = Bitmap::from_ones_iter(5, [0, 2, 4])?;
    /// assert!(bitmap.is_set(0)?);
    /// assert!(!bitmap.is_set(1)?);
    /// assert_eq!(bitmap.popcount(), 3);
    /// # Ok::<(), byte_bitmap::Error>(())
    /// ```
    pub fn from_ones_iter<I: IntoIterator<Item = usize>>(
        capacity: usize,
        iter: I,
    ) -> Result<Self> {
        let mut bitmap = Self::new(capacity);
        for idx in iter {
            bitmap.set(idx)?;
        }
        Ok(bitmap)
    }

    /// Returns the number of bytes backing the bitmap.
    #[inline]
    pub fn byte_count(&self) -> usize {
        self.0.len()
    }

    /// Returns the number of addressable bits, `byte_count() * 8`.
    ///
    /// This never changes over the lifetime of the bitmap.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len() * 8
    }

    /// Returns `true` if the bitmap has no addressable bits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the backing bytes, lowest bit indices first.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Sets the bit at the given index.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] if `idx >= len()`.
    ///
    /// # Examples
    /// ```
    /// use byte_bitmap::Bitmap;
    ///
    /// let mut bm = Bitmap::new(8);
    /// assert!(!bm.is_set(3)?);
    /// bm.set(3)?;
    /// assert!(bm.is_set(3)?);
    /// assert!(bm.set(8).is_err());
    /// # Ok::<(), byte_bitmap::Error>(())
    /// ```
    #[inline]
    pub fn set(&mut self, idx: usize) -> Result<()> {
        let (group_idx, item_idx) = self.idxs(idx)?;
        self.0[group_idx] |= BITMASK[item_idx];
        Ok(())
    }

    /// Unsets the bit at the given index.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] if `idx >= len()`.
    ///
    /// # Examples
    /// ```
    /// use byte_bitmap::Bitmap;
    ///
    /// let mut bm = Bitmap::with_all_set(8);
    /// bm.unset(3)?;
    /// assert!(!bm.is_set(3)?);
    /// # Ok::<(), byte_bitmap::Error>(())
    /// ```
    #[inline]
    pub fn unset(&mut self, idx: usize) -> Result<()> {
        let (group_idx, item_idx) = self.idxs(idx)?;
        self.0[group_idx] &= !BITMASK[item_idx];
        Ok(())
    }

    /// Toggles the bit at the given index.
    ///
    /// Returns the new value of the bit (after the toggle).
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] if `idx >= len()`.
    ///
    /// # Examples
    /// ```
    /// use byte_bitmap::Bitmap;
    ///
    /// let mut bm = Bitmap::new(8);
    /// assert_eq!(bm.toggle(4)?, true); // flipped from false to true
    /// assert_eq!(bm.toggle(4)?, false); // flipped from true to false
    /// # Ok::<(), byte_bitmap::Error>(())
    /// ```
    #[inline]
    pub fn toggle(&mut self, idx: usize) -> Result<bool> {
        let (group_idx, item_idx) = self.idxs(idx)?;
        self.0[group_idx] ^= BITMASK[item_idx];
        Ok(self.0[group_idx] & BITMASK[item_idx] != 0)
    }

    /// Returns `true` if the bit at the given index is set.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] if `idx >= len()`.
    ///
    /// # Examples
    /// ```
    /// use byte_bitmap::Bitmap;
    ///
    /// let mut bm = Bitmap::new(8);
    /// bm.set(1)?;
    /// assert!(bm.is_set(1)?);
    /// assert!(!bm.is_set(0)?);
    /// # Ok::<(), byte_bitmap::Error>(())
    /// ```
    #[inline]
    pub fn is_set(&self, idx: usize) -> Result<bool> {
        let (group_idx, item_idx) = self.idxs(idx)?;
        Ok(self.0[group_idx] & BITMASK[item_idx] != 0)
    }

    /// Returns `true` if `idx` is addressable and set. Never fails.
    ///
    /// # Examples
    /// ```
    /// use byte_bitmap::Bitmap;
    ///
    /// let bm = Bitmap::with_all_set(8);
    /// assert!(bm.contains(7));
    /// assert!(!bm.contains(8));
    /// ```
    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        self.0
            .get(idx / 8)
            .is_some_and(|byte| byte & BITMASK[idx % 8] != 0)
    }

    /// Assigns a bit from any value convertible to `u64`, which includes
    /// `bool` and the unsigned integer types.
    ///
    /// `0`/`false` unsets the bit and `1`/`true` sets it.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAssignment`] for any other value and
    /// [`Error::IndexOutOfRange`] if `idx >= len()`. The bitmap is unchanged
    /// on error.
    ///
    /// # Examples
    /// ```
    /// use byte_bitmap::{Bitmap, Error};
    ///
    /// let mut bm = Bitmap::new(8);
    /// bm.assign(2, true)?;
    /// bm.assign(5, 1u8)?;
    /// bm.assign(2, 0u8)?;
    /// assert_eq!(bm.iter_ones().collect::<Vec<_>>(), [5]);
    /// assert_eq!(bm.assign(1, 2u8), Err(Error::InvalidAssignment(2)));
    /// # Ok::<(), byte_bitmap::Error>(())
    /// ```
    pub fn assign(&mut self, idx: usize, value: impl Into<u64>) -> Result<()> {
        match value.into() {
            0 => self.unset(idx),
            1 => self.set(idx),
            other => {
                debug!(index = idx, value = other, "rejected non-boolean bit assignment");
                Err(Error::InvalidAssignment(other))
            }
        }
    }

    /// Sets all bits in the given range.
    ///
    /// An empty range is a no-op.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] if `range.end > len()`.
    ///
    /// # Examples
    /// ```
    /// use byte_bitmap::Bitmap;
    ///
    /// let mut bm = Bitmap::new(8);
    /// bm.set_range(2..6)?;
    /// assert!(bm.is_set(2)?);
    /// assert!(bm.is_set(5)?);
    /// assert!(!bm.is_set(6)?);
    /// # Ok::<(), byte_bitmap::Error>(())
    /// ```
    pub fn set_range(&mut self, range: Range<usize>) -> Result<()> {
        let Some((start_byte, start_bit, end_byte, end_bit)) = self.range_idxs(&range)? else {
            return Ok(());
        };

        // all within one byte
        if start_byte == end_byte {
            let width = end_bit - start_bit + 1;
            self.0[start_byte] |= ones_mask(start_bit, width);
            return Ok(());
        }

        self.0[start_byte] |= !0u8 << start_bit;
        self.0[start_byte + 1..end_byte].fill(!0);
        self.0[end_byte] |= ones_mask(0, end_bit + 1);
        Ok(())
    }

    /// Unsets all bits in the given range.
    ///
    /// An empty range is a no-op.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] if `range.end > len()`.
    ///
    /// # Examples
    /// ```
    /// use byte_bitmap::Bitmap;
    ///
    /// let mut bm = Bitmap::with_all_set(8);
    /// bm.unset_range(2..6)?;
    /// assert!(!bm.is_set(2)?);
    /// assert!(!bm.is_set(5)?);
    /// assert!(bm.is_set(6)?);
    /// # Ok::<(), byte_bitmap::Error>(())
    /// ```
    pub fn unset_range(&mut self, range: Range<usize>) -> Result<()> {
        let Some((start_byte, start_bit, end_byte, end_bit)) = self.range_idxs(&range)? else {
            return Ok(());
        };

        // all within one byte
        if start_byte == end_byte {
            let width = end_bit - start_bit + 1;
            self.0[start_byte] &= !ones_mask(start_bit, width);
            return Ok(());
        }

        self.0[start_byte] &= (1u8 << start_bit) - 1;
        self.0[start_byte + 1..end_byte].fill(0);
        self.0[end_byte] &= !ones_mask(0, end_bit + 1);
        Ok(())
    }

    /// Sets every bit to `value`.
    #[inline]
    pub fn fill(&mut self, value: bool) {
        self.0.fill(if value { !0 } else { 0 });
    }

    /// Unsets every bit.
    #[inline]
    pub fn reset(&mut self) {
        self.fill(false);
    }

    #[inline]
    fn idxs(&self, idx: usize) -> Result<(usize, usize)> {
        if idx >= self.len() {
            debug!(index = idx, len = self.len(), "bit index out of range");
            return Err(Error::IndexOutOfRange {
                index: idx,
                len: self.len(),
            });
        }
        Ok((idx / 8, idx % 8))
    }

    /// Splits a non-empty range into `(start_byte, start_bit, end_byte, end_bit)`
    /// of its first and last bit. `None` for an empty range.
    fn range_idxs(&self, range: &Range<usize>) -> Result<Option<(usize, usize, usize, usize)>> {
        if range.start >= range.end {
            return Ok(None);
        }
        let (start_byte, start_bit) = self.idxs(range.start)?;
        let (end_byte, end_bit) = self.idxs(range.end - 1)?;
        Ok(Some((start_byte, start_bit, end_byte, end_bit)))
    }

    /// Returns an iterator over all bits as `bool`, from least to most significant.
    ///
    /// The iterator yields exactly `len()` items in order.
    ///
    /// # Examples
    /// ```
    /// use byte_bitmap::Bitmap;
    ///
    /// let bm = Bitmap::from_binary_str("00000101")?;
    /// let bits: Vec<bool> = bm.iter().collect();
    /// assert_eq!(bits, [true, false, true, false, false, false, false, false]);
    /// # Ok::<(), byte_bitmap::Error>(())
    /// ```
    #[inline]
    pub fn iter(&self) -> BitmapIter<'_> {
        BitmapIter {
            bytes: &self.0,
            group_idx: 0,
            item_idx: 0,
        }
    }

    /// Returns an iterator over the indices of all set bits, in ascending
    /// order.
    ///
    /// Each call starts a fresh pass over the current contents; the iterator
    /// borrows the bitmap, so it cannot observe mutation mid-way. Iterating
    /// through the entire iterator runs in O(max(k, b)) where k is the number
    /// of set bits and b is the byte count.
    ///
    /// # Examples
    /// ```
    /// use byte_bitmap::Bitmap;
    ///
    /// let bm = Bitmap::from_ones_iter(16, [0, 2, 9])?;
    /// assert_eq!(bm.iter_ones().collect::<Vec<_>>(), [0, 2, 9]);
    /// assert_eq!(bm.iter_ones().count(), 3);
    /// # Ok::<(), byte_bitmap::Error>(())
    /// ```
    #[inline]
    pub fn iter_ones(&self) -> IterOnes<'_> {
        IterOnes::new(&self.0)
    }

    /// Returns an iterator over the indices of all unset bits, in ascending
    /// order.
    ///
    /// # Examples
    /// ```
    /// use byte_bitmap::Bitmap;
    ///
    /// let bm = Bitmap::from_binary_str("11110101")?;
    /// assert_eq!(bm.iter_zeros().collect::<Vec<_>>(), [1, 3]);
    /// # Ok::<(), byte_bitmap::Error>(())
    /// ```
    #[inline]
    pub fn iter_zeros(&self) -> IterZeros<'_> {
        IterZeros::new(&self.0)
    }

    /// Returns the number of set bits in the bitmap.
    ///
    /// Runs in O(b) where b is the byte count, using a per-byte lookup table.
    ///
    /// # Examples
    /// ```
    /// use byte_bitmap::Bitmap;
    ///
    /// let bm = Bitmap::from_binary_str("1010")?;
    /// assert_eq!(bm.popcount(), 2);
    /// # Ok::<(), byte_bitmap::Error>(())
    /// ```
    #[inline]
    pub fn popcount(&self) -> usize {
        self.0.iter().map(|&b| BIT_COUNT[b as usize] as usize).sum()
    }

    /// Returns `true` if at least one bit is set.
    #[inline]
    pub fn any(&self) -> bool {
        self.popcount() > 0
    }

    /// Returns `true` if no bit is set.
    #[inline]
    pub fn none(&self) -> bool {
        self.popcount() == 0
    }

    /// Returns `true` if every addressable bit is set.
    ///
    /// This is an exact comparison of [`popcount`] against [`len`]; an empty
    /// bitmap is vacuously full.
    ///
    /// # Examples
    /// ```
    /// use byte_bitmap::Bitmap;
    ///
    /// let mut bm = Bitmap::with_all_set(16);
    /// assert!(bm.all());
    /// bm.unset(15)?;
    /// assert!(!bm.all());
    /// # Ok::<(), byte_bitmap::Error>(())
    /// ```
    ///
    /// [`popcount`]: Bitmap::popcount
    /// [`len`]: Bitmap::len
    #[inline]
    pub fn all(&self) -> bool {
        self.popcount() == self.len()
    }

    /// Returns the index of the first set bit or `None` if all bits are unset.
    ///
    /// Bits are checked in ascending order from least to most significant.
    /// Runs in O(b) where b is the byte count.
    ///
    /// # Examples
    /// ```
    /// use byte_bitmap::Bitmap;
    ///
    /// let mut bm = Bitmap::new(16);
    /// assert_eq!(bm.first_set_bit(), None);
    /// bm.set(10)?;
    /// assert_eq!(bm.first_set_bit(), Some(10));
    /// # Ok::<(), byte_bitmap::Error>(())
    /// ```
    pub fn first_set_bit(&self) -> Option<usize> {
        self.0
            .iter()
            .enumerate()
            .find(|(_, byte)| **byte != 0)
            .map(|(i, byte)| i * 8 + byte.trailing_zeros() as usize)
    }
}

impl Default for Bitmap {
    /// A bitmap for a single requested bit, which occupies one byte.
    fn default() -> Self {
        Self::new(1)
    }
}

impl Index<usize> for Bitmap {
    type Output = bool;

    /// Allows reading bits using the `[]` operator.
    ///
    /// Panics if out of bounds; use [`Bitmap::is_set`] for a fallible read.
    #[inline]
    fn index(&self, idx: usize) -> &Self::Output {
        let len = self.len();
        assert!(idx < len, "Bit index {idx} out of bounds for {len} bits");
        if self.0[idx / 8] & BITMASK[idx % 8] != 0 {
            &true
        } else {
            &false
        }
    }
}

impl<'bitmap> IntoIterator for &'bitmap Bitmap {
    type Item = bool;
    type IntoIter = BitmapIter<'bitmap>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Debug for Bitmap {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "LSB -> ")?;
        for (i, bit) in self.iter().enumerate() {
            if i % 8 == 0 {
                write!(f, "{i}: ")?;
            }
            write!(f, "{}", if bit { '1' } else { '0' })?;
            if i % 8 == 7 && i < self.len() - 1 {
                write!(f, " ")?;
            }
        }
        write!(f, " <- MSB")?;
        Ok(())
    }
}

/// Iterator over all bits in the bitmap as `bool` values.
///
/// Yields `true` for set bits and `false` for unset bits, starting from index 0.
///
/// Returned by [`Bitmap::iter()`].
#[derive(Clone, Copy)]
pub struct BitmapIter<'bitmap> {
    bytes: &'bitmap [u8],
    group_idx: usize,
    item_idx: usize,
}

impl Iterator for BitmapIter<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        let byte = *self.bytes.get(self.group_idx)?;
        let bit = byte & BITMASK[self.item_idx];
        self.item_idx += 1;
        if self.item_idx == 8 {
            self.item_idx = 0;
            self.group_idx += 1;
        }
        Some(bit != 0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.bytes.len() * 8).saturating_sub(self.group_idx * 8 + self.item_idx);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitmapIter<'_> {}

impl FusedIterator for BitmapIter<'_> {}

/// Scans byte by byte for set bits of `transform(byte)`, yielding their
/// absolute indices in ascending order.
#[derive(Clone, Copy)]
struct IndexScan<'bitmap> {
    bytes: &'bitmap [u8],
    byte_idx: usize,
    current: u8,
    transform: fn(u8) -> u8,
}

impl<'bitmap> IndexScan<'bitmap> {
    fn new(bytes: &'bitmap [u8], transform: fn(u8) -> u8) -> Self {
        Self {
            bytes,
            byte_idx: 0,
            current: bytes.first().map_or(0, |&byte| transform(byte)),
            transform,
        }
    }

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let tz = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1; // unset LSB
                return Some(self.byte_idx * 8 + tz);
            }
            let byte = *self.bytes.get(self.byte_idx + 1)?;
            self.byte_idx += 1;
            self.current = (self.transform)(byte);
        }
    }

    /// Indices still to be yielded, counted with the popcount table.
    fn remaining(&self) -> usize {
        let rest = self.bytes.get(self.byte_idx + 1..).unwrap_or(&[]);
        rest.iter()
            .map(|&byte| BIT_COUNT[(self.transform)(byte) as usize] as usize)
            .sum::<usize>()
            + BIT_COUNT[self.current as usize] as usize
    }
}

fn ones(byte: u8) -> u8 {
    byte
}

fn zeros(byte: u8) -> u8 {
    !byte
}

/// Iterator over the indices of set bits in the bitmap.
///
/// Yields the positions of all bits that are set, in ascending order.
///
/// Returned by [`Bitmap::iter_ones()`].
#[derive(Clone, Copy)]
pub struct IterOnes<'bitmap>(IndexScan<'bitmap>);

impl<'bitmap> IterOnes<'bitmap> {
    fn new(bytes: &'bitmap [u8]) -> Self {
        Self(IndexScan::new(bytes, ones))
    }
}

impl Iterator for IterOnes<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.0.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for IterOnes<'_> {}

impl FusedIterator for IterOnes<'_> {}

/// Iterator over the indices of unset bits in the bitmap.
///
/// Yields the positions of all bits that are unset, in ascending order.
///
/// Returned by [`Bitmap::iter_zeros()`].
#[derive(Clone, Copy)]
pub struct IterZeros<'bitmap>(IndexScan<'bitmap>);

impl<'bitmap> IterZeros<'bitmap> {
    fn new(bytes: &'bitmap [u8]) -> Self {
        Self(IndexScan::new(bytes, zeros))
    }
}

impl Iterator for IterZeros<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.0.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for IterZeros<'_> {}

impl FusedIterator for IterZeros<'_> {}
