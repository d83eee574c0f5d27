//! Core types for configurable board-game variants: pieces, squares on a
//! 12×10 grid, position snapshots and transition records.

mod bitboard;
mod color;
mod error;
mod extent;
mod fen;
mod piece;
mod piece_chars;
mod piece_set;
mod piece_type;
mod position;
mod potion;
mod square;
mod transition;

pub use bitboard::Bitboard;
pub use color::Color;
pub use error::{FenError, PositionError};
pub use extent::BoardExtent;
pub use fen::{STARTING_FEN, split_placement};
pub use piece::Piece;
pub use piece_chars::PieceChars;
pub use piece_set::{PieceSet, PieceSetIter};
pub use piece_type::PieceType;
pub use position::Position;
pub use potion::{POTION_COOLDOWN_BITS, PotionType, encoded_cooldown};
pub use square::Square;
pub use transition::{
    DirtyPiece, MAX_DIRTY_PIECES, MAX_POTION_CHANGES, Place, Placement, PotionChange, Transition,
};
