//! Variant board extent and the dense per-variant square numbering.

use crate::bitboard::Bitboard;
use crate::square::Square;

/// The board rectangle of a variant: files `0..=max_file`, ranks `0..=max_rank`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardExtent {
    /// Highest zero-based file (7 for an 8-file board).
    pub max_file: u8,
    /// Highest zero-based rank (7 for an 8-rank board).
    pub max_rank: u8,
}

impl BoardExtent {
    /// The 8×8 board.
    pub const CHESS: BoardExtent = BoardExtent { max_file: 7, max_rank: 7 };

    /// The largest extent that fits the grid.
    pub const MAX: BoardExtent = BoardExtent {
        max_file: Square::FILE_NB - 1,
        max_rank: Square::RANK_NB - 1,
    };

    /// Number of files.
    #[inline]
    pub const fn files(self) -> usize {
        self.max_file as usize + 1
    }

    /// Number of ranks.
    #[inline]
    pub const fn ranks(self) -> usize {
        self.max_rank as usize + 1
    }

    /// Number of squares on the variant board.
    #[inline]
    pub const fn square_count(self) -> usize {
        self.files() * self.ranks()
    }

    /// Return `true` if the extent fits the 12×10 grid.
    #[inline]
    pub const fn fits_grid(self) -> bool {
        self.max_file <= Self::MAX.max_file && self.max_rank <= Self::MAX.max_rank
    }

    /// Return `true` if `sq` lies on the variant board.
    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        sq.file() <= self.max_file && sq.rank() <= self.max_rank
    }

    /// Dense index of a board square: `rank * files + file`.
    #[inline]
    pub const fn variant_index(self, sq: Square) -> usize {
        sq.rank() as usize * self.files() + sq.file() as usize
    }

    /// Inverse of [`BoardExtent::variant_index`].
    pub fn from_variant_index(self, index: usize) -> Option<Square> {
        if index >= self.square_count() {
            return None;
        }
        Square::new((index % self.files()) as u8, (index / self.files()) as u8)
    }

    /// Rotate a board square by 180° within the variant board.
    #[inline]
    pub fn rotate(self, sq: Square) -> Square {
        debug_assert!(self.contains(sq));
        match (self.max_file.checked_sub(sq.file()), self.max_rank.checked_sub(sq.rank())) {
            (Some(file), Some(rank)) => Square::new(file, rank).unwrap_or(sq),
            _ => sq,
        }
    }

    /// Mirror a board square across the middle rank, keeping its file.
    #[inline]
    pub fn flip_rank(self, sq: Square) -> Square {
        debug_assert!(self.contains(sq));
        self.max_rank
            .checked_sub(sq.rank())
            .and_then(|rank| Square::new(sq.file(), rank))
            .unwrap_or(sq)
    }

    /// Board squares in dense order (a1, b1, ..., last file of the last rank).
    pub fn squares(self) -> impl Iterator<Item = Square> {
        (0..self.square_count()).filter_map(move |i| self.from_variant_index(i))
    }

    /// Bitboard of all board squares.
    pub fn mask(self) -> Bitboard {
        self.squares().collect()
    }
}

impl Default for BoardExtent {
    fn default() -> Self {
        Self::CHESS
    }
}
