//! Sets of piece types.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not, Sub};

use crate::piece_type::PieceType;

/// A set of [`PieceType`]s, one bit per type.
///
/// Iteration is always in ascending type index.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PieceSet(u32);

impl PieceSet {
    /// The empty set.
    pub const EMPTY: PieceSet = PieceSet(0);

    /// Pawn, knight, bishop, rook, queen and king.
    pub const CHESS: PieceSet = PieceSet(
        1 << PieceType::Pawn as u32
            | 1 << PieceType::Knight as u32
            | 1 << PieceType::Bishop as u32
            | 1 << PieceType::Rook as u32
            | 1 << PieceType::Queen as u32
            | 1 << PieceType::King as u32,
    );

    /// Return a set containing only `pt`.
    #[inline]
    pub const fn single(pt: PieceType) -> PieceSet {
        PieceSet(1 << pt as u32)
    }

    /// Return `true` if the set contains no piece type.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Return the number of piece types in the set.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Return `true` if `pt` is in the set.
    #[inline]
    pub const fn contains(self, pt: PieceType) -> bool {
        self.0 & (1 << pt as u32) != 0
    }

    /// Return a copy of the set with `pt` added.
    #[inline]
    pub const fn with(self, pt: PieceType) -> PieceSet {
        PieceSet(self.0 | 1 << pt as u32)
    }

    /// Return a copy of the set with `pt` removed.
    #[inline]
    pub const fn without(self, pt: PieceType) -> PieceSet {
        PieceSet(self.0 & !(1 << pt as u32))
    }

    /// Iterate in ascending type order.
    #[inline]
    pub fn iter(self) -> PieceSetIter {
        PieceSetIter { bits: self.0 }
    }

    /// Iterate in ascending type order, except that `anchor` (when it is a
    /// member) is visited last.
    pub fn iter_anchor_last(self, anchor: Option<PieceType>) -> impl Iterator<Item = PieceType> {
        let tail = anchor.filter(|&pt| self.contains(pt));
        let head = match tail {
            Some(pt) => self.without(pt),
            None => self,
        };
        head.iter().chain(tail)
    }
}

/// Ascending iterator over a [`PieceSet`].
#[derive(Clone)]
pub struct PieceSetIter {
    bits: u32,
}

impl Iterator for PieceSetIter {
    type Item = PieceType;

    #[inline]
    fn next(&mut self) -> Option<PieceType> {
        if self.bits == 0 {
            return None;
        }
        let index = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        PieceType::from_index(index)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.bits.count_ones() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for PieceSetIter {}

impl IntoIterator for PieceSet {
    type Item = PieceType;
    type IntoIter = PieceSetIter;

    fn into_iter(self) -> PieceSetIter {
        self.iter()
    }
}

impl FromIterator<PieceType> for PieceSet {
    fn from_iter<I: IntoIterator<Item = PieceType>>(iter: I) -> PieceSet {
        iter.into_iter().fold(PieceSet::EMPTY, PieceSet::with)
    }
}

impl From<PieceType> for PieceSet {
    fn from(pt: PieceType) -> PieceSet {
        PieceSet::single(pt)
    }
}

impl BitOr for PieceSet {
    type Output = PieceSet;
    #[inline]
    fn bitor(self, rhs: PieceSet) -> PieceSet {
        PieceSet(self.0 | rhs.0)
    }
}

impl BitOrAssign for PieceSet {
    #[inline]
    fn bitor_assign(&mut self, rhs: PieceSet) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for PieceSet {
    type Output = PieceSet;
    #[inline]
    fn bitand(self, rhs: PieceSet) -> PieceSet {
        PieceSet(self.0 & rhs.0)
    }
}

impl Sub for PieceSet {
    type Output = PieceSet;
    #[inline]
    fn sub(self, rhs: PieceSet) -> PieceSet {
        PieceSet(self.0 & !rhs.0)
    }
}

impl Not for PieceSet {
    type Output = PieceSet;
    #[inline]
    fn not(self) -> PieceSet {
        PieceSet(!self.0 & ((1 << PieceType::COUNT) - 1))
    }
}

impl fmt::Debug for PieceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
