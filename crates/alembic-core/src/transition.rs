//! Transition records: what changed between two consecutive positions.
//!
//! A [`Transition`] lists every piece that left or entered a board square or
//! a hand slot, plus every potion whose zone or cooldown changed. The feature
//! indexer turns these into removed/added feature lists without looking at
//! the rest of the position.

use arrayvec::ArrayVec;

use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::error::PositionError;
use crate::piece::Piece;
use crate::piece_type::PieceType;
use crate::position::Position;
use crate::potion::PotionType;
use crate::square::Square;

/// Maximum number of dirty pieces in one transition.
pub const MAX_DIRTY_PIECES: usize = 12;

/// Maximum number of potion changes in one transition.
pub const MAX_POTION_CHANGES: usize = Color::COUNT * PotionType::COUNT;

/// Where a piece sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Place {
    /// On a board square.
    Board(Square),
    /// In its owner's hand, as the `n`-th held piece of its type (0-based).
    Hand(u8),
}

/// A piece at a place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub piece: Piece,
    pub place: Place,
}

impl Placement {
    /// A piece on a board square.
    #[inline]
    pub const fn board(piece: Piece, sq: Square) -> Placement {
        Placement { piece, place: Place::Board(sq) }
    }

    /// A piece in a hand slot.
    #[inline]
    pub const fn hand(piece: Piece, slot: u8) -> Placement {
        Placement { piece, place: Place::Hand(slot) }
    }
}

/// One piece whose placement changed.
///
/// `from == None` means the piece entered the game, `to == None` that it
/// left it. A promotion is a single entry whose two sides differ in type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyPiece {
    pub from: Option<Placement>,
    pub to: Option<Placement>,
}

impl DirtyPiece {
    /// Return `true` if `piece` is on either side of this change.
    #[inline]
    pub fn involves(&self, piece: Piece) -> bool {
        self.from.is_some_and(|p| p.piece == piece) || self.to.is_some_and(|p| p.piece == piece)
    }
}

/// A change of one side's potion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PotionChange {
    pub color: Color,
    pub potion: PotionType,
    pub old_zone: Bitboard,
    pub new_zone: Bitboard,
    pub old_cooldown: u8,
    pub new_cooldown: u8,
}

/// Everything that changed between a position and its successor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    dirty: ArrayVec<DirtyPiece, MAX_DIRTY_PIECES>,
    potions: ArrayVec<PotionChange, MAX_POTION_CHANGES>,
}

impl Transition {
    /// An empty transition.
    pub fn new() -> Transition {
        Transition::default()
    }

    /// Record a dirty piece.
    ///
    /// # Panics
    ///
    /// Panics if more than [`MAX_DIRTY_PIECES`] entries are recorded.
    pub fn push_dirty(&mut self, dirty: DirtyPiece) {
        self.dirty.push(dirty);
    }

    /// Record a potion change.
    ///
    /// # Panics
    ///
    /// Panics if more than [`MAX_POTION_CHANGES`] entries are recorded.
    pub fn push_potion(&mut self, change: PotionChange) {
        self.potions.push(change);
    }

    /// Dirty pieces, in the order they were recorded.
    #[inline]
    pub fn dirty(&self) -> &[DirtyPiece] {
        &self.dirty
    }

    /// Potion changes, in the order they were recorded.
    #[inline]
    pub fn potions(&self) -> &[PotionChange] {
        &self.potions
    }

    /// Append all entries of `other`.
    pub fn extend(&mut self, other: &Transition) {
        for &dirty in other.dirty() {
            self.push_dirty(dirty);
        }
        for &change in other.potions() {
            self.push_potion(change);
        }
    }
}

impl Position {
    /// Move the piece on `from` to `to`, capturing whatever stands there.
    ///
    /// With `captures_to_hand` the captured piece changes color and joins the
    /// mover's hand.
    pub fn relocate(&mut self, from: Square, to: Square, captures_to_hand: bool) -> Result<Transition, PositionError> {
        self.move_and_promote(from, to, None, captures_to_hand)
    }

    /// Move the piece on `from` to `to` and replace it by a `promoted` piece of the same color.
    pub fn promote(
        &mut self,
        from: Square,
        to: Square,
        promoted: PieceType,
        captures_to_hand: bool,
    ) -> Result<Transition, PositionError> {
        self.move_and_promote(from, to, Some(promoted), captures_to_hand)
    }

    fn move_and_promote(
        &mut self,
        from: Square,
        to: Square,
        promoted: Option<PieceType>,
        captures_to_hand: bool,
    ) -> Result<Transition, PositionError> {
        for sq in [from, to] {
            if !self.extent().contains(sq) {
                return Err(PositionError::OffBoard(sq));
            }
        }
        let mover = self.piece_on(from).ok_or(PositionError::EmptySquare(from))?;
        let arrived = promoted.map_or(mover, |pt| Piece::new(pt, mover.color()));
        let mut transition = Transition::new();

        self.remove_piece(from);
        transition.push_dirty(DirtyPiece {
            from: Some(Placement::board(mover, from)),
            to: Some(Placement::board(arrived, to)),
        });

        if let Some(captured) = self.remove_piece(to) {
            let to_hand = captures_to_hand.then(|| {
                let held = captured.flip();
                let slot = self.count_in_hand(held.color(), held.kind());
                self.set_hand(held, slot.saturating_add(1));
                Placement::hand(held, slot)
            });
            transition.push_dirty(DirtyPiece {
                from: Some(Placement::board(captured, to)),
                to: to_hand,
            });
        }

        self.put_piece(to, arrived);
        self.set_side_to_move(!self.side_to_move());
        Ok(transition)
    }

    /// Drop a piece from its owner's hand onto an empty square.
    pub fn drop_piece(&mut self, piece: Piece, to: Square) -> Result<Transition, PositionError> {
        if !self.extent().contains(to) {
            return Err(PositionError::OffBoard(to));
        }
        if self.piece_on(to).is_some() {
            return Err(PositionError::Occupied(to));
        }
        let held = self.count_in_hand(piece.color(), piece.kind());
        if held == 0 {
            return Err(PositionError::EmptyHand(piece));
        }

        self.set_hand(piece, held - 1);
        self.put_piece(to, piece);
        self.set_side_to_move(!self.side_to_move());

        let mut transition = Transition::new();
        transition.push_dirty(DirtyPiece {
            from: Some(Placement::hand(piece, held - 1)),
            to: Some(Placement::board(piece, to)),
        });
        Ok(transition)
    }

    /// Set `color`'s `potion` zone and cooldown, consuming one `potion_piece`
    /// from the hand when given.
    ///
    /// Does not change the side to move: casting accompanies a regular move.
    pub fn cast_potion(
        &mut self,
        color: Color,
        potion: PotionType,
        potion_piece: Option<PieceType>,
        zone: Bitboard,
        cooldown: u8,
    ) -> Result<Transition, PositionError> {
        let mut transition = Transition::new();

        if let Some(pt) = potion_piece {
            let piece = Piece::new(pt, color);
            let held = self.count_in_hand(color, pt);
            if held == 0 {
                return Err(PositionError::EmptyHand(piece));
            }
            self.set_hand(piece, held - 1);
            transition.push_dirty(DirtyPiece {
                from: Some(Placement::hand(piece, held - 1)),
                to: None,
            });
        }

        transition.extend(&self.set_potion(color, potion, zone, cooldown));
        Ok(transition)
    }

    /// Overwrite `color`'s `potion` state and record the change.
    ///
    /// Returns an empty transition when nothing changed.
    pub fn set_potion(&mut self, color: Color, potion: PotionType, zone: Bitboard, cooldown: u8) -> Transition {
        let old_zone = self.potion_zone(color, potion);
        let old_cooldown = self.potion_cooldown(color, potion);
        self.set_potion_state(color, potion, zone, cooldown);

        let mut transition = Transition::new();
        let new_zone = self.potion_zone(color, potion);
        if old_zone != new_zone || old_cooldown != cooldown {
            transition.push_potion(PotionChange {
                color,
                potion,
                old_zone,
                new_zone,
                old_cooldown,
                new_cooldown: cooldown,
            });
        }
        transition
    }
}
