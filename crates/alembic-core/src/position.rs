//! Position snapshot: board placement, hands, potion state and side to move.

use std::fmt;

use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::extent::BoardExtent;
use crate::piece::Piece;
use crate::piece_type::PieceType;
use crate::potion::PotionType;
use crate::square::Square;

/// A position of a configurable variant, as seen by the feature indexer.
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    extent: BoardExtent,
    /// Piece on each grid square.
    board: [Option<Piece>; Square::COUNT],
    /// Bitboard for each piece type (both colors).
    by_type: [Bitboard; PieceType::COUNT],
    /// Bitboard for each side.
    by_color: [Bitboard; Color::COUNT],
    /// Pieces in hand, indexed by owner and type.
    hands: [[u8; PieceType::COUNT]; Color::COUNT],
    /// Squares covered by each side's active potion effects.
    potion_zones: [[Bitboard; PotionType::COUNT]; Color::COUNT],
    /// Remaining cooldown of each side's potions.
    potion_cooldowns: [[u8; PotionType::COUNT]; Color::COUNT],
    side_to_move: Color,
}

impl Position {
    /// An empty position on the given board.
    pub fn empty(extent: BoardExtent) -> Position {
        Position {
            extent,
            board: [None; Square::COUNT],
            by_type: [Bitboard::EMPTY; PieceType::COUNT],
            by_color: [Bitboard::EMPTY; Color::COUNT],
            hands: [[0; PieceType::COUNT]; Color::COUNT],
            potion_zones: [[Bitboard::EMPTY; PotionType::COUNT]; Color::COUNT],
            potion_cooldowns: [[0; PotionType::COUNT]; Color::COUNT],
            side_to_move: Color::White,
        }
    }

    /// Return the board extent.
    #[inline]
    pub fn extent(&self) -> BoardExtent {
        self.extent
    }

    /// Return the piece on the given square, if any.
    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.board[sq.index()]
    }

    /// Return the occupied squares.
    #[inline]
    pub fn pieces(&self) -> Bitboard {
        self.by_color[Color::White.index()] | self.by_color[Color::Black.index()]
    }

    /// Return the squares occupied by `color`.
    #[inline]
    pub fn side(&self, color: Color) -> Bitboard {
        self.by_color[color.index()]
    }

    /// Return the squares occupied by pieces of `color` and type `pt`.
    #[inline]
    pub fn pieces_of(&self, color: Color, pt: PieceType) -> Bitboard {
        self.by_type[pt.index()] & self.by_color[color.index()]
    }

    /// Number of pieces on the board.
    #[inline]
    pub fn piece_count(&self) -> usize {
        self.pieces().count() as usize
    }

    /// Number of pieces of type `pt` that `color` holds in hand.
    #[inline]
    pub fn count_in_hand(&self, color: Color, pt: PieceType) -> u8 {
        self.hands[color.index()][pt.index()]
    }

    /// Squares covered by `color`'s `potion` effect.
    #[inline]
    pub fn potion_zone(&self, color: Color, potion: PotionType) -> Bitboard {
        self.potion_zones[color.index()][potion.index()]
    }

    /// Remaining cooldown of `color`'s `potion`.
    #[inline]
    pub fn potion_cooldown(&self, color: Color, potion: PotionType) -> u8 {
        self.potion_cooldowns[color.index()][potion.index()]
    }

    /// Square of `color`'s anchor piece of type `anchor`, if it is on the board.
    #[inline]
    pub fn anchor_square(&self, color: Color, anchor: PieceType) -> Option<Square> {
        self.pieces_of(color, anchor).lsb()
    }

    /// Return the side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Set the side to move.
    #[inline]
    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    /// Place `piece` on an empty square.
    pub fn put_piece(&mut self, sq: Square, piece: Piece) {
        debug_assert!(self.extent.contains(sq));
        debug_assert!(self.board[sq.index()].is_none());
        self.board[sq.index()] = Some(piece);
        self.by_type[piece.kind().index()] |= sq.bitboard();
        self.by_color[piece.color().index()] |= sq.bitboard();
    }

    /// Remove and return the piece on `sq`.
    pub fn remove_piece(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.board[sq.index()].take()?;
        self.by_type[piece.kind().index()] = self.by_type[piece.kind().index()].without(sq);
        self.by_color[piece.color().index()] = self.by_color[piece.color().index()].without(sq);
        Some(piece)
    }

    /// Set the number of `piece`s held in its owner's hand.
    #[inline]
    pub fn set_hand(&mut self, piece: Piece, count: u8) {
        self.hands[piece.color().index()][piece.kind().index()] = count;
    }

    /// Overwrite `color`'s `potion` state.
    #[inline]
    pub fn set_potion_state(&mut self, color: Color, potion: PotionType, zone: Bitboard, cooldown: u8) {
        self.potion_zones[color.index()][potion.index()] = zone & self.extent.mask();
        self.potion_cooldowns[color.index()][potion.index()] = cooldown;
    }

    /// The color-swapped position rotated by 180°.
    ///
    /// Every piece moves to the rotated square and changes color; hands,
    /// potion state and the side to move are exchanged between the sides.
    pub fn mirrored(&self) -> Position {
        let mut out = Position::empty(self.extent);
        for sq in self.pieces() {
            if let Some(piece) = self.piece_on(sq) {
                out.put_piece(self.extent.rotate(sq), piece.flip());
            }
        }
        for color in Color::ALL {
            out.hands[(!color).index()] = self.hands[color.index()];
            for potion in PotionType::ALL {
                let zone = self
                    .potion_zone(color, potion)
                    .map(|sq| self.extent.rotate(sq))
                    .collect();
                out.set_potion_state(!color, potion, zone, self.potion_cooldown(color, potion));
            }
        }
        out.side_to_move = !self.side_to_move;
        out
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let placement: Vec<_> = self
            .pieces()
            .filter_map(|sq| self.piece_on(sq).map(|piece| (sq, piece)))
            .collect();
        f.debug_struct("Position")
            .field("extent", &self.extent)
            .field("placement", &placement)
            .field("hands", &self.hands)
            .field("side_to_move", &self.side_to_move)
            .finish_non_exhaustive()
    }
}
