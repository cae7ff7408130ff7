//! # Fixed-Width Bitset
//!
//! A 128-bit flag set stored as two `u64` words.
//!
//! ```text
//! words[0]: bits [0, 64)
//! words[1]: bits [64, 128)
//! ```
//!
//! Word selection uses `index < 64` and masks are always 64-bit
//! (`1u64 << (index % 64)`), so every bit of the range is addressable.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign};

use bytemuck::{Pod, Zeroable};

/// A 128-bit flag set.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct FixedBitset128 {
    words: [u64; 2],
}

impl FixedBitset128 {
    /// Number of addressable bits.
    pub const BITS: usize = 128;

    /// Bits per backing word.
    const WORD_BITS: usize = 64;

    /// An empty bitset.
    pub const EMPTY: Self = Self { words: [0; 2] };

    /// Creates an empty bitset.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Creates a bitset from its two backing words (low word first).
    #[inline]
    #[must_use]
    pub const fn from_words(low: u64, high: u64) -> Self {
        Self { words: [low, high] }
    }

    /// Returns the two backing words (low word first).
    #[inline]
    #[must_use]
    pub const fn words(&self) -> [u64; 2] {
        self.words
    }

    #[inline]
    fn locate(index: usize) -> (usize, u64) {
        debug_assert!(
            index < Self::BITS,
            "bit index {index} out of range for a {}-bit set",
            Self::BITS
        );
        let word = if index < Self::WORD_BITS { 0 } else { 1 };
        (word, 1u64 << (index % Self::WORD_BITS))
    }

    /// Returns whether bit `index` is set.
    ///
    /// `index` must be below 128; this is checked in debug builds.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> bool {
        let (word, mask) = Self::locate(index);
        self.words[word] & mask != 0
    }

    /// Sets or clears bit `index`.
    ///
    /// `index` must be below 128; this is checked in debug builds.
    #[inline]
    pub fn set(&mut self, index: usize, value: bool) {
        let (word, mask) = Self::locate(index);
        if value {
            self.words[word] |= mask;
        } else {
            self.words[word] &= !mask;
        }
    }

    /// Clears every bit.
    #[inline]
    pub fn clear(&mut self) {
        self.words = [0; 2];
    }

    /// Bitwise AND of two sets.
    #[inline]
    #[must_use]
    pub const fn and(&self, other: &Self) -> Self {
        Self {
            words: [self.words[0] & other.words[0], self.words[1] & other.words[1]],
        }
    }

    /// Bitwise OR of two sets.
    #[inline]
    #[must_use]
    pub const fn or(&self, other: &Self) -> Self {
        Self {
            words: [self.words[0] | other.words[0], self.words[1] | other.words[1]],
        }
    }

    /// Returns true if every bit set in `other` is also set in `self`.
    #[inline]
    #[must_use]
    pub fn is_superset_of(&self, other: &Self) -> bool {
        self.and(other) == *other
    }

    /// Returns true if no bit is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.words[0] == 0 && self.words[1] == 0
    }

    /// Number of set bits.
    #[inline]
    #[must_use]
    pub const fn count_ones(&self) -> u32 {
        self.words[0].count_ones() + self.words[1].count_ones()
    }

    /// Iterates over the indices of set bits in ascending order.
    pub fn iter_ones(&self) -> IterOnes {
        IterOnes {
            words: self.words,
            word_idx: 0,
        }
    }
}

impl BitAnd for FixedBitset128 {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        self.and(&rhs)
    }
}

impl BitOr for FixedBitset128 {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        self.or(&rhs)
    }
}

impl BitAndAssign for FixedBitset128 {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        *self = self.and(&rhs);
    }
}

impl BitOrAssign for FixedBitset128 {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.or(&rhs);
    }
}

impl fmt::Debug for FixedBitset128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter_ones()).finish()
    }
}

/// Iterator over set bit indices of a [`FixedBitset128`].
pub struct IterOnes {
    words: [u64; 2],
    word_idx: usize,
}

impl Iterator for IterOnes {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        while self.word_idx < self.words.len() {
            let word = &mut self.words[self.word_idx];
            if *word != 0 {
                let bit = word.trailing_zeros() as usize;
                // Clear lowest set bit
                *word &= *word - 1;
                return Some(self.word_idx * FixedBitset128::WORD_BITS + bit);
            }
            self.word_idx += 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_bit_is_addressable() {
        for i in 0..FixedBitset128::BITS {
            let mut bits = FixedBitset128::new();
            bits.set(i, true);
            assert!(bits.get(i), "bit {i} did not stick");
            assert_eq!(bits.count_ones(), 1, "bit {i} leaked into another bit");
            bits.set(i, false);
            assert!(bits.is_empty());
        }
    }

    #[test]
    fn test_word_boundaries() {
        let mut bits = FixedBitset128::new();
        bits.set(31, true);
        bits.set(32, true);
        bits.set(63, true);
        bits.set(64, true);
        bits.set(127, true);

        let words = bits.words();
        assert_eq!(words[0], (1 << 31) | (1 << 32) | (1 << 63));
        assert_eq!(words[1], 1 | (1 << 63));
        assert_eq!(bits.iter_ones().collect::<Vec<_>>(), vec![31, 32, 63, 64, 127]);
    }

    #[test]
    fn test_and_or() {
        let a = FixedBitset128::from_words(0b1100, 0b1);
        let b = FixedBitset128::from_words(0b1010, 0b11);

        assert_eq!(a & b, FixedBitset128::from_words(0b1000, 0b1));
        assert_eq!(a | b, FixedBitset128::from_words(0b1110, 0b11));

        let mut c = a;
        c |= b;
        c &= FixedBitset128::from_words(0b0110, 0);
        assert_eq!(c, FixedBitset128::from_words(0b0110, 0));
    }

    #[test]
    fn test_superset() {
        let required = FixedBitset128::from_words(0b101, 1 << 3);
        let entity = FixedBitset128::from_words(0b111, (1 << 3) | (1 << 9));

        assert!(entity.is_superset_of(&required));
        assert!(!required.is_superset_of(&entity));
        assert!(entity.is_superset_of(&FixedBitset128::EMPTY));
    }

    #[test]
    fn test_clear() {
        let mut bits = FixedBitset128::from_words(u64::MAX, u64::MAX);
        assert_eq!(bits.count_ones(), 128);
        bits.clear();
        assert!(bits.is_empty());
        assert_eq!(bits, FixedBitset128::default());
    }

    #[test]
    fn test_debug_lists_indices() {
        let mut bits = FixedBitset128::new();
        bits.set(2, true);
        bits.set(100, true);
        assert_eq!(format!("{bits:?}"), "{2, 100}");
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_index_is_caught_in_debug() {
        let bits = FixedBitset128::new();
        let _ = bits.get(128);
    }
}
