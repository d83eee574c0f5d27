//! Squares on the maximum supported grid.

use std::fmt;

use crate::bitboard::Bitboard;

/// A square on the 12×10 grid, encoded as `rank * FILE_NB + file`.
///
/// Every variant board is a lower-left sub-rectangle of this grid, so a
/// square keeps its index when a configuration changes the board extent.
/// See [`BoardExtent`](crate::BoardExtent) for the dense per-variant
/// numbering used by feature indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    /// Number of files on the grid (a..l).
    pub const FILE_NB: u8 = 12;
    /// Number of ranks on the grid (1..10).
    pub const RANK_NB: u8 = 10;
    /// Total number of grid squares.
    pub const COUNT: usize = Self::FILE_NB as usize * Self::RANK_NB as usize;

    /// Create a square from a zero-based file and rank.
    #[inline]
    pub const fn new(file: u8, rank: u8) -> Option<Square> {
        if file < Self::FILE_NB && rank < Self::RANK_NB {
            Some(Square(rank * Self::FILE_NB + file))
        } else {
            None
        }
    }

    /// Create a square from a zero-based grid index.
    #[inline]
    pub const fn from_index(index: usize) -> Option<Square> {
        if index < Self::COUNT {
            Some(Square(index as u8))
        } else {
            None
        }
    }

    #[inline]
    pub(crate) const fn from_index_unchecked(index: u8) -> Square {
        debug_assert!((index as usize) < Self::COUNT);
        Square(index)
    }

    /// Parse algebraic notation (`a1` through `l10`).
    pub fn from_algebraic(s: &str) -> Option<Square> {
        let mut chars = s.chars();
        let file_char = chars.next()?;
        if !file_char.is_ascii_lowercase() {
            return None;
        }
        let file = file_char as u8 - b'a';
        let rank: u8 = chars.as_str().parse().ok()?;
        if rank == 0 {
            return None;
        }
        Square::new(file, rank - 1)
    }

    /// Return the zero-based grid index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Zero-based file (0 = a).
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % Self::FILE_NB
    }

    /// Zero-based rank (0 = rank 1).
    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / Self::FILE_NB
    }

    /// Return a bitboard with only this square set.
    #[inline]
    pub const fn bitboard(self) -> Bitboard {
        Bitboard::new(1u128 << self.0)
    }

    /// Iterate over all grid squares in index order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..Self::COUNT as u8).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, self.rank() + 1)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self)
    }
}
