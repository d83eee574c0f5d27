//! Bitboards over the 12×10 grid: one bit per [`Square`].

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use crate::square::Square;

/// A 128-bit board where bit `i` is grid square `i`. Bits 120..128 stay clear.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(u128);

impl Bitboard {
    /// Empty bitboard (no squares set).
    pub const EMPTY: Bitboard = Bitboard(0);

    /// Every grid square.
    pub const FULL: Bitboard = Bitboard((1u128 << Square::COUNT) - 1);

    /// Create a bitboard from raw bits; bits beyond the grid are dropped.
    #[inline]
    pub const fn new(bits: u128) -> Bitboard {
        Bitboard(bits & Self::FULL.0)
    }

    /// Return the underlying bits.
    #[inline]
    pub const fn inner(self) -> u128 {
        self.0
    }

    /// Return `true` if no bits are set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Return `true` if at least one bit is set.
    #[inline]
    pub const fn is_nonempty(self) -> bool {
        self.0 != 0
    }

    /// Count the number of set bits.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Return `true` if the given square's bit is set.
    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        (self.0 & (1u128 << sq.index())) != 0
    }

    /// Return a new bitboard with the given square set.
    #[inline]
    pub const fn with(self, sq: Square) -> Bitboard {
        Bitboard(self.0 | (1u128 << sq.index()))
    }

    /// Return a new bitboard with the given square cleared.
    #[inline]
    pub const fn without(self, sq: Square) -> Bitboard {
        Bitboard(self.0 & !(1u128 << sq.index()))
    }

    /// Return the least significant set bit as a square, or `None` if empty.
    #[inline]
    pub const fn lsb(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(Square::from_index_unchecked(self.0.trailing_zeros() as u8))
        }
    }

    /// All squares of a rank (0-based).
    pub fn rank_mask(rank: u8) -> Bitboard {
        (0..Square::FILE_NB)
            .filter_map(|file| Square::new(file, rank))
            .collect()
    }

    /// All squares of a file (0-based).
    pub fn file_mask(file: u8) -> Bitboard {
        (0..Square::RANK_NB)
            .filter_map(|rank| Square::new(file, rank))
            .collect()
    }
}

// --- Operator impls ---

impl BitAnd for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitand(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitAndAssign for Bitboard {
    #[inline]
    fn bitand_assign(&mut self, rhs: Bitboard) {
        self.0 &= rhs.0;
    }
}

impl BitOr for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Bitboard) {
        self.0 |= rhs.0;
    }
}

impl BitXor for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitxor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Bitboard {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Bitboard) {
        self.0 ^= rhs.0;
    }
}

impl Not for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0 & Self::FULL.0)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Bitboard {
        iter.into_iter().fold(Bitboard::EMPTY, Bitboard::with)
    }
}

// --- Iterator ---

impl Iterator for Bitboard {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            let sq = Square::from_index_unchecked(self.0.trailing_zeros() as u8);
            self.0 &= self.0 - 1;
            Some(sq)
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.count() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for Bitboard {}

// --- Debug (12x10 grid) ---

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for rank in (0..Square::RANK_NB).rev() {
            write!(f, "{:>3} ", rank + 1)?;
            for file in 0..Square::FILE_NB {
                let set = Square::new(file, rank).is_some_and(|sq| self.contains(sq));
                write!(f, "{}", if set { "1 " } else { ". " })?;
            }
            writeln!(f)?;
        }
        write!(f, "    a b c d e f g h i j k l")
    }
}
